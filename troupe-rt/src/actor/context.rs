//! Per-dispatch view of the runtime handed to actor code.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde_json::Value;
use tracing::warn;

// Layer 3: Internal module imports
use super::cell::ActorCell;
use super::traits::Actor;
use crate::proxy::ActorRef;
use crate::supervisor::Supervisor;
use crate::system::{ActorSystem, SystemError};
use crate::topic::Topic;
use crate::util::{ActorId, ScheduleId};

/// Capabilities available to an actor while it handles a call (and inside
/// its `initialized` hook): scheduling, child creation, and topic
/// membership.
///
/// Deferred operations (`subscribe_to_topic`, the first firing of a
/// schedule) run on fresh tasks, after the call that installed them has
/// returned to the executor.
pub struct ActorContext {
    cell: Arc<ActorCell>,
}

impl ActorContext {
    pub(crate) fn new(cell: Arc<ActorCell>) -> Self {
        Self { cell }
    }

    /// Id of the actor being dispatched.
    pub fn id(&self) -> &ActorId {
        self.cell.id()
    }

    /// A proxy to this actor itself.
    pub fn self_ref(&self) -> ActorRef {
        self.cell.self_ref()
    }

    /// The owning actor system.
    ///
    /// Fails with [`SystemError::Freed`] once the system is gone.
    pub fn system(&self) -> Result<ActorSystem, SystemError> {
        self.cell.system()
    }

    /// Send `method(args…)` to this actor every `every`, starting one
    /// interval from now. Returns a cancellation token.
    pub fn schedule(&self, every: Duration, method: &str, args: Vec<Value>) -> ScheduleId {
        self.cell.schedule(every, method, args)
    }

    /// Send `method(args…)` to this actor once, `after` from now.
    pub fn schedule_once(&self, after: Duration, method: &str, args: Vec<Value>) -> ScheduleId {
        self.cell.schedule_once(after, method, args)
    }

    /// Cancel a scheduled send. Unknown ids are no-ops.
    pub fn cancel(&self, id: &ScheduleId) {
        self.cell.cancel(id);
    }

    /// Register a child actor whose failures consult this actor's
    /// supervision chain.
    pub async fn spawn_child<A: Actor>(
        &self,
        id: impl Into<ActorId>,
        actor: A,
    ) -> Result<ActorRef, SystemError> {
        let system = self.system()?;
        system
            .register(id.into(), Box::new(actor), self.cell.supervisor_handle())
            .await
    }

    /// Register a child actor with an explicit supervision policy,
    /// intercepting failures before they reach this actor's chain.
    pub async fn spawn_child_supervised<A: Actor>(
        &self,
        id: impl Into<ActorId>,
        actor: A,
        supervisor: Arc<dyn Supervisor>,
    ) -> Result<ActorRef, SystemError> {
        let system = self.system()?;
        system.register(id.into(), Box::new(actor), supervisor).await
    }

    /// Subscribe this actor to `topic`.
    ///
    /// The subscribe runs deferred, once registration has settled. A second
    /// subscribe to the same topic overwrites the stored subscription id and
    /// orphans the previous one; unsubscribe first if that matters.
    pub fn subscribe_to_topic(&self, topic: &Topic) {
        let topic = topic.clone();
        let cell = Arc::clone(&self.cell);
        let me = self.self_ref();
        tokio::spawn(async move {
            match topic.subscribe(&me).await {
                Ok(subscription) => {
                    if let Some(previous) =
                        cell.record_topic_subscription(topic.id().clone(), subscription)
                    {
                        warn!(
                            topic = %topic.id(),
                            orphaned = %previous,
                            "subscribed again to topic; previous subscription orphaned"
                        );
                    }
                }
                Err(error) => {
                    warn!(topic = %topic.id(), error = %error, "topic subscribe failed");
                }
            }
        });
    }

    /// Drop this actor's subscription on `topic`. A no-op when the actor
    /// is not subscribed.
    pub fn unsubscribe_from_topic(&self, topic: &Topic) {
        if let Some(subscription) = self.cell.take_topic_subscription(topic.id()) {
            topic.unsubscribe_detached(subscription);
        }
    }
}
