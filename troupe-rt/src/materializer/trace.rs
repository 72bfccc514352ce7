//! Materializer forwarding every hook to `tracing`.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::traits::Materializer;
use crate::message::{ActorError, Invocation};
use crate::util::ActorId;

/// Emits a `tracing` event for each lifecycle hook.
///
/// # Example
/// ```rust
/// use troupe_rt::materializer::TraceMaterializer;
/// use troupe_rt::system::ActorSystem;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let system = ActorSystem::builder()
///     .with_materializer(TraceMaterializer)
///     .build();
/// # system.free().await;
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceMaterializer;

impl Materializer for TraceMaterializer {
    fn on_initialize(&self, actor: &ActorId) {
        debug!(actor = %actor, "actor initialized");
    }

    fn on_before_message(&self, actor: &ActorId, invocation: &Invocation) {
        debug!(actor = %actor, method = invocation.method(), "dispatching");
    }

    fn on_after_message(&self, actor: &ActorId, invocation: &Invocation) {
        debug!(actor = %actor, method = invocation.method(), "dispatched");
    }

    fn on_error(&self, actor: &ActorId, invocation: &Invocation, error: &ActorError) {
        warn!(actor = %actor, method = invocation.method(), error = %error, "dispatch failed");
    }
}
