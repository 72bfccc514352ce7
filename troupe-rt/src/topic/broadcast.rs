//! One-to-many method fan-out.
//!
//! A topic is itself an actor registered at `topics/<name>`: its state is a
//! map of subscriber proxies and its method table is `subscribe`,
//! `unsubscribe`, and `notify`. Because notifications travel through the
//! topic's own mailbox, fan-out is serialized like any other actor work.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorContext};
use crate::message::ActorError;
use crate::proxy::ActorRef;
use crate::system::{ActorSystem, SystemError};
use crate::util::{ActorId, SubscriptionId};

/// Handle to a named topic.
///
/// Obtained via [`Topic::of`], which registers the backing topic actor on
/// first use and reuses it afterwards. Cloneable and cheap to pass around.
///
/// # Example
/// ```rust,no_run
/// use serde_json::json;
/// use troupe_rt::system::ActorSystem;
/// use troupe_rt::topic::Topic;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let system = ActorSystem::builder().build();
/// let updates = Topic::of(&system, "updates").await?;
/// # let listener = system.actor_ref("listener");
///
/// let subscription = updates.subscribe(&listener).await?;
/// updates.notify("refresh", vec![json!("all")]);
/// updates.unsubscribe(subscription).await?;
/// # system.free().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Topic {
    id: ActorId,
    actor: ActorRef,
}

impl Topic {
    /// Get (or create) the topic named `name`, registered at
    /// `topics/<name>`.
    pub async fn of(system: &ActorSystem, name: &str) -> Result<Self, SystemError> {
        let id = ActorId::topic(name);
        let actor = system.resolve_or_new(id.clone(), TopicActor::default).await?;
        Ok(Self { id, actor })
    }

    /// The topic actor's id (`topics/<name>`).
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Register `subscriber` with the topic; returns the id that
    /// unsubscribes it.
    pub async fn subscribe(&self, subscriber: &ActorRef) -> Result<SubscriptionId, ActorError> {
        self.actor
            .call_as("subscribe", vec![json!(subscriber.id())])
            .await
    }

    /// Remove a subscription. Unknown ids are a no-op.
    pub async fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), ActorError> {
        self.actor
            .call("unsubscribe", vec![json!(subscription)])
            .await
            .map(|_| ())
    }

    /// Fire-and-forget unsubscribe, for teardown paths with nothing to
    /// await on.
    pub(crate) fn unsubscribe_detached(&self, subscription: SubscriptionId) {
        self.actor.tell("unsubscribe", vec![json!(subscription)]);
    }

    /// Invoke `method(args…)` on every subscriber, fire-and-forget.
    ///
    /// No result is awaited or aggregated; subscribers receive the call in
    /// map iteration order, with no ordering promised.
    pub fn notify(&self, method: &str, args: Vec<Value>) {
        self.actor
            .tell("notify", vec![json!(method), Value::Array(args)]);
    }
}

/// The actor backing a topic: a subscriber map plus the
/// subscribe/unsubscribe/notify method table.
#[derive(Default)]
struct TopicActor {
    subscribers: HashMap<SubscriptionId, ActorRef>,
}

/// Decode positional argument `index` of `method`.
fn arg<T: DeserializeOwned>(method: &str, args: &[Value], index: usize) -> Result<T, ActorError> {
    let value = args.get(index).cloned().ok_or_else(|| {
        ActorError::invalid_arguments(method, format!("missing argument {index}"))
    })?;
    serde_json::from_value(value)
        .map_err(|e| ActorError::invalid_arguments(method, e.to_string()))
}

#[async_trait]
impl Actor for TopicActor {
    async fn handle_call(
        &mut self,
        method: &str,
        args: &[Value],
        ctx: &ActorContext,
    ) -> Result<Value, ActorError> {
        match method {
            "subscribe" => {
                let target: ActorId = arg(method, args, 0)?;
                let system = ctx
                    .system()
                    .map_err(|e| ActorError::failure(e.to_string()))?;
                let subscription = SubscriptionId::new();
                self.subscribers
                    .insert(subscription, system.actor_ref(target));
                Ok(json!(subscription))
            }
            "unsubscribe" => {
                let subscription: SubscriptionId = arg(method, args, 0)?;
                self.subscribers.remove(&subscription);
                Ok(Value::Null)
            }
            "notify" => {
                let target_method: String = arg(method, args, 0)?;
                let fan_args: Vec<Value> = arg(method, args, 1)?;
                for subscriber in self.subscribers.values() {
                    subscriber.tell(&target_method, fan_args.clone());
                }
                Ok(Value::Null)
            }
            other => Err(ActorError::method_not_found(other)),
        }
    }
}
