//! Supervisor contract and its directives.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::message::{ActorError, Invocation};
use crate::util::ActorId;

/// What the harness should do with a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Keep the message at the queue front and retry on the next poll.
    /// The caller's reply stays pending.
    RetryMessage,

    /// Discard the message and reject the caller.
    DropMessage,

    /// Hand the failure upward; the harness finalizes by rejecting the
    /// caller, like `DropMessage`.
    Escalate,
}

/// Policy deciding how an actor's failed invocation is handled.
///
/// Consulted by the harness after the materializer `on_error` fan-out. The
/// chain of policies forms the escalation tree: a child spawned through the
/// actor context inherits its parent's policy handle unless one is supplied
/// explicitly.
#[async_trait]
pub trait Supervisor: Send + Sync + 'static {
    /// Select a directive for `error` raised while `actor` processed
    /// `invocation`.
    async fn supervise(
        &self,
        actor: &ActorId,
        error: &ActorError,
        invocation: &Invocation,
    ) -> Directive;
}
