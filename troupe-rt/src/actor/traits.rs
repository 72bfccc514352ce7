//! The contract application actors implement.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use serde_json::Value;

// Layer 3: Internal module imports
use super::context::ActorContext;
use crate::message::ActorError;
use crate::util::{ActorId, Partition};

/// A stateful unit processing one serialized method call at a time.
///
/// Methods are dispatched by name through a string method table: the harness
/// hands `handle_call` the method name and serialized arguments, and the
/// implementation matches on the name. The unmatched arm returns
/// [`ActorError::method_not_found`], which the runtime turns into the
/// documented `Method <name> not found` rejection.
///
/// The harness guarantees at most one `handle_call` is in flight per actor,
/// so implementations never need internal locking for their own state.
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
/// use troupe_rt::actor::{Actor, ActorContext};
/// use troupe_rt::message::ActorError;
///
/// struct Counter {
///     count: u64,
/// }
///
/// #[async_trait]
/// impl Actor for Counter {
///     async fn handle_call(
///         &mut self,
///         method: &str,
///         _args: &[Value],
///         _ctx: &ActorContext,
///     ) -> Result<Value, ActorError> {
///         match method {
///             "increment" => {
///                 self.count += 1;
///                 Ok(json!(self.count))
///             }
///             "count" => Ok(json!(self.count)),
///             other => Err(ActorError::method_not_found(other)),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + 'static {
    /// Dispatch one method call against the actor's state.
    async fn handle_call(
        &mut self,
        method: &str,
        args: &[Value],
        ctx: &ActorContext,
    ) -> Result<Value, ActorError>;

    /// Partitions this actor receives on. Defaults to the actor's own id.
    fn partitions(&self, id: &ActorId) -> Vec<Partition> {
        vec![Partition::from(id)]
    }

    /// Hook invoked once the actor is fully registered in the system.
    ///
    /// The place to install schedules or subscribe to topics.
    async fn initialized(&mut self, ctx: &ActorContext) {
        let _ = ctx;
    }
}
