//! The actor proxy: every method call becomes a mailbox message.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

// Layer 3: Internal module imports
use crate::mailbox::Mailbox;
use crate::message::{ActorError, Envelope, Invocation, PendingReply};
use crate::util::{ActorId, Partition};

/// Build an invocation for `actor`, push it, and hand back the pending
/// reply the harness will settle.
pub fn send_and_return(
    mailbox: &Mailbox<Invocation>,
    actor: &ActorId,
    method: &str,
    args: Vec<Value>,
) -> PendingReply {
    let (invocation, reply) = Invocation::new(method, args);
    mailbox.push(Envelope::new(Partition::from(actor), invocation));
    reply
}

/// Cheap, cloneable handle to one actor.
///
/// A ref holds only the target id and the mailbox; it stays valid (but
/// undeliverable) after the target is stopped — queued calls then settle
/// with [`ActorError::Abandoned`].
///
/// # Example
/// ```rust,no_run
/// use serde_json::json;
/// use troupe_rt::system::ActorSystem;
/// # use troupe_rt::actor::{Actor, ActorContext};
/// # use troupe_rt::message::ActorError;
/// # use async_trait::async_trait;
/// # struct Greeter;
/// # #[async_trait]
/// # impl Actor for Greeter {
/// #     async fn handle_call(
/// #         &mut self,
/// #         method: &str,
/// #         _args: &[serde_json::Value],
/// #         _ctx: &ActorContext,
/// #     ) -> Result<serde_json::Value, ActorError> {
/// #         match method {
/// #             "greet" => Ok(json!("hi")),
/// #             other => Err(ActorError::method_not_found(other)),
/// #         }
/// #     }
/// # }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let system = ActorSystem::builder().build();
/// let greeter = system.actor_of("greeter", Greeter).await?;
///
/// let reply = greeter.call("greet", vec![json!("world")]).await?;
/// assert_eq!(reply, json!("hi"));
/// # system.free().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ActorRef {
    id: ActorId,
    mailbox: Mailbox<Invocation>,
}

impl std::fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorRef").field("id", &self.id).finish()
    }
}

impl ActorRef {
    pub(crate) fn new(id: ActorId, mailbox: Mailbox<Invocation>) -> Self {
        Self { id, mailbox }
    }

    /// Id of the actor this ref points at.
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Invoke `method` and await its result.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, ActorError> {
        send_and_return(&self.mailbox, &self.id, method, args)
            .await_reply()
            .await
    }

    /// Invoke `method` and deserialize its result into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<T, ActorError> {
        let value = self.call(method, args).await?;
        serde_json::from_value(value)
            .map_err(|e| ActorError::failure(format!("failed to decode reply from {method}: {e}")))
    }

    /// Invoke `method` without waiting for the result.
    ///
    /// A rejection is reported out of band on the log channel and never
    /// reaches the caller. Must be called within a Tokio runtime.
    pub fn tell(&self, method: &str, args: Vec<Value>) {
        let reply = send_and_return(&self.mailbox, &self.id, method, args);
        let id = self.id.clone();
        let method = method.to_owned();
        tokio::spawn(async move {
            if let Err(error) = reply.await_reply().await {
                debug!(actor = %id, method = %method, error = %error, "fire-and-forget send failed");
            }
        });
    }

    /// Write a named property on the actor.
    ///
    /// Travels as a synthetic `set_property(name, value)` invocation,
    /// fire-and-forget; the actor's `set_property` method owns the state
    /// change.
    pub fn put(&self, property: &str, value: Value) {
        self.tell("set_property", vec![json!(property), value]);
    }
}
