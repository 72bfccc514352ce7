//! Built-in supervision policies.
//!
//! Three stateless policies cover the common cases; applications needing
//! counters, backoff, or per-method decisions implement [`Supervisor`]
//! themselves.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use tracing::warn;

// Layer 3: Internal module imports
use super::traits::{Directive, Supervisor};
use crate::message::{ActorError, Invocation};
use crate::util::ActorId;

/// Terminal policy: every failure escalates and finalizes.
///
/// This is the system default. The caller's reply is rejected with the
/// handler's error.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscalateSupervisor;

#[async_trait]
impl Supervisor for EscalateSupervisor {
    async fn supervise(
        &self,
        actor: &ActorId,
        error: &ActorError,
        invocation: &Invocation,
    ) -> Directive {
        warn!(actor = %actor, method = invocation.method(), error = %error, "escalating actor failure");
        Directive::Escalate
    }
}

/// Discard the failed message and reject the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropSupervisor;

#[async_trait]
impl Supervisor for DropSupervisor {
    async fn supervise(
        &self,
        _actor: &ActorId,
        _error: &ActorError,
        _invocation: &Invocation,
    ) -> Directive {
        Directive::DropMessage
    }
}

/// Keep the failed message at the queue front and retry on the next poll.
///
/// The caller's reply stays pending until an attempt succeeds or another
/// policy takes over; there is no retry cap and no backoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrySupervisor;

#[async_trait]
impl Supervisor for RetrySupervisor {
    async fn supervise(
        &self,
        _actor: &ActorId,
        _error: &ActorError,
        _invocation: &Invocation,
    ) -> Directive {
        Directive::RetryMessage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> (ActorId, ActorError, Invocation) {
        (
            ActorId::new("a"),
            ActorError::failure("x"),
            Invocation::detached("m", vec![]),
        )
    }

    #[tokio::test]
    async fn test_escalate_policy() {
        let (actor, error, invocation) = probe();
        let directive = EscalateSupervisor
            .supervise(&actor, &error, &invocation)
            .await;
        assert_eq!(directive, Directive::Escalate);
    }

    #[tokio::test]
    async fn test_drop_policy() {
        let (actor, error, invocation) = probe();
        let directive = DropSupervisor.supervise(&actor, &error, &invocation).await;
        assert_eq!(directive, Directive::DropMessage);
    }

    #[tokio::test]
    async fn test_retry_policy() {
        let (actor, error, invocation) = probe();
        let directive = RetrySupervisor.supervise(&actor, &error, &invocation).await;
        assert_eq!(directive, Directive::RetryMessage);
    }
}
