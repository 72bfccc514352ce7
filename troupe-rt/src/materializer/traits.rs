//! Materializer contract.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::message::{ActorError, Invocation};
use crate::util::ActorId;

/// Observation hooks fanned out by the harness around every message.
///
/// Hooks are fire-and-forget and infallible: they return `()`, so a hook
/// cannot abort or delay message processing. All hooks have empty default
/// bodies; implement only the ones you observe.
///
/// Call order per message: `on_before_message`, then the dispatch, then
/// either `on_after_message` (success and every supervision outcome) with
/// `on_error` inserted before it on failure. `on_initialize` fires once
/// when the actor is registered.
pub trait Materializer: Send + Sync + 'static {
    /// The actor finished registering with the system.
    fn on_initialize(&self, actor: &ActorId) {
        let _ = actor;
    }

    /// An invocation is about to be dispatched.
    fn on_before_message(&self, actor: &ActorId, invocation: &Invocation) {
        let _ = (actor, invocation);
    }

    /// Dispatch bookkeeping for an invocation finished.
    fn on_after_message(&self, actor: &ActorId, invocation: &Invocation) {
        let _ = (actor, invocation);
    }

    /// Dispatch raised an error, before the supervisor is consulted.
    fn on_error(&self, actor: &ActorId, invocation: &Invocation, error: &ActorError) {
        let _ = (actor, invocation, error);
    }
}
