//! The actor harness: serialized dispatch, materializer fan-out,
//! supervision, and per-actor bookkeeping.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio::time::sleep;

// Layer 3: Internal module imports
use super::context::ActorContext;
use super::traits::Actor;
use crate::mailbox::{Mailbox, Subscriber};
use crate::materializer::Materializer;
use crate::message::{Envelope, Invocation};
use crate::proxy::ActorRef;
use crate::supervisor::{Directive, Supervisor};
use crate::system::actor_system::SystemInner;
use crate::system::{ActorSystem, SystemError};
use crate::util::{ActorId, Partition, ScheduleId, SubscriptionId};

/// Runtime harness wrapping one application actor.
///
/// The cell adapts the actor into a mailbox [`Subscriber`] with serialized
/// dispatch: the `busy` flag admits at most one invocation at a time, and a
/// delivery arriving while the flag is set is refused so the mailbox keeps
/// it queued for the next poll. The cell also owns the actor's scheduled
/// sends and topic subscription bookkeeping, both cleared on release.
pub struct ActorCell {
    id: ActorId,
    partitions: Vec<Partition>,
    busy: AtomicBool,
    state: tokio::sync::Mutex<Box<dyn Actor>>,
    supervisor: Arc<dyn Supervisor>,
    materializers: Vec<Arc<dyn Materializer>>,
    schedules: Mutex<HashMap<ScheduleId, JoinHandle<()>>>,
    topic_subscriptions: Mutex<HashMap<ActorId, SubscriptionId>>,
    mailbox: Mailbox<Invocation>,
    system: Weak<SystemInner>,
    weak_self: Weak<ActorCell>,
}

impl ActorCell {
    pub(crate) fn new(
        id: ActorId,
        partitions: Vec<Partition>,
        actor: Box<dyn Actor>,
        supervisor: Arc<dyn Supervisor>,
        materializers: Vec<Arc<dyn Materializer>>,
        mailbox: Mailbox<Invocation>,
        system: Weak<SystemInner>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            id,
            partitions,
            busy: AtomicBool::new(false),
            state: tokio::sync::Mutex::new(actor),
            supervisor,
            materializers,
            schedules: Mutex::new(HashMap::new()),
            topic_subscriptions: Mutex::new(HashMap::new()),
            mailbox,
            system,
            weak_self: weak_self.clone(),
        })
    }

    /// Id of the wrapped actor.
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Whether a handler is currently executing.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub(crate) fn self_ref(&self) -> ActorRef {
        ActorRef::new(self.id.clone(), self.mailbox.clone())
    }

    pub(crate) fn supervisor_handle(&self) -> Arc<dyn Supervisor> {
        Arc::clone(&self.supervisor)
    }

    pub(crate) fn system(&self) -> Result<ActorSystem, SystemError> {
        self.system
            .upgrade()
            .map(ActorSystem::from_inner)
            .ok_or(SystemError::Freed)
    }

    /// Fan out `on_initialize` and run the actor's `initialized` hook.
    pub(crate) async fn initialize(self: &Arc<Self>) {
        for materializer in &self.materializers {
            materializer.on_initialize(&self.id);
        }
        let ctx = ActorContext::new(Arc::clone(self));
        self.state.lock().await.initialized(&ctx).await;
    }

    /// Install a periodic self-send of `method(args…)` every `every`.
    ///
    /// The first send happens one interval after a zero-delay deferral, so
    /// the actor is fully registered before anything fires.
    pub(crate) fn schedule(&self, every: Duration, method: &str, args: Vec<Value>) -> ScheduleId {
        let id = ScheduleId::new();
        let target = self.self_ref();
        let method = method.to_owned();

        // Holding the map lock while spawning orders the insert before any
        // self-removal the task could attempt.
        let mut schedules = self.schedules.lock();
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            loop {
                sleep(every).await;
                target.tell(&method, args.clone());
            }
        });
        schedules.insert(id, handle);
        id
    }

    /// Install a one-shot self-send after `after`; the map entry is removed
    /// once it fires.
    pub(crate) fn schedule_once(&self, after: Duration, method: &str, args: Vec<Value>) -> ScheduleId {
        let id = ScheduleId::new();
        let target = self.self_ref();
        let method = method.to_owned();
        let weak = self.weak_self.clone();

        let mut schedules = self.schedules.lock();
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            sleep(after).await;
            target.tell(&method, args);
            if let Some(cell) = weak.upgrade() {
                cell.schedules.lock().remove(&id);
            }
        });
        schedules.insert(id, handle);
        id
    }

    /// Cancel a scheduled send. Unknown ids are no-ops.
    pub(crate) fn cancel(&self, id: &ScheduleId) {
        if let Some(handle) = self.schedules.lock().remove(id) {
            handle.abort();
        }
    }

    /// Number of live scheduled sends.
    pub fn scheduled_count(&self) -> usize {
        self.schedules.lock().len()
    }

    pub(crate) fn record_topic_subscription(
        &self,
        topic: ActorId,
        subscription: SubscriptionId,
    ) -> Option<SubscriptionId> {
        self.topic_subscriptions.lock().insert(topic, subscription)
    }

    pub(crate) fn take_topic_subscription(&self, topic: &ActorId) -> Option<SubscriptionId> {
        self.topic_subscriptions.lock().remove(topic)
    }

    /// Tear down per-actor state: abort schedules and detach from topics.
    pub(crate) fn release(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut schedules = self.schedules.lock();
            schedules.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            handle.abort();
        }

        let subscriptions: Vec<(ActorId, SubscriptionId)> = {
            let mut topics = self.topic_subscriptions.lock();
            topics.drain().collect()
        };
        for (topic, subscription) in subscriptions {
            // Best-effort detach so the topic stops fanning out to us.
            ActorRef::new(topic, self.mailbox.clone())
                .tell("unsubscribe", vec![json!(subscription)]);
        }
    }

    fn fan_out_after(&self, invocation: &Invocation) {
        for materializer in &self.materializers {
            materializer.on_after_message(&self.id, invocation);
        }
    }
}

#[async_trait]
impl Subscriber<Invocation> for ActorCell {
    fn partitions(&self) -> Vec<Partition> {
        self.partitions.clone()
    }

    async fn on_receive(&self, envelope: &Envelope<Invocation>) -> bool {
        // A set busy flag means a handler is in flight; refuse the delivery
        // so the mailbox keeps the head for the next poll.
        if self.busy.swap(true, Ordering::AcqRel) {
            return false;
        }

        let invocation = &envelope.content;
        for materializer in &self.materializers {
            materializer.on_before_message(&self.id, invocation);
        }

        let Some(cell) = self.weak_self.upgrade() else {
            // Mid-teardown; nothing can settle this call anymore.
            self.busy.store(false, Ordering::Release);
            return true;
        };

        let outcome = {
            let ctx = ActorContext::new(cell);
            let mut state = self.state.lock().await;
            state
                .handle_call(invocation.method(), invocation.args(), &ctx)
                .await
        };

        match outcome {
            Ok(value) => {
                invocation.resolve(value);
                self.busy.store(false, Ordering::Release);
                self.fan_out_after(invocation);
                true
            }
            Err(error) => {
                for materializer in &self.materializers {
                    materializer.on_error(&self.id, invocation, &error);
                }
                match self
                    .supervisor
                    .supervise(&self.id, &error, invocation)
                    .await
                {
                    Directive::RetryMessage => {
                        // The caller stays pending and the head stays queued.
                        self.busy.store(false, Ordering::Release);
                        self.fan_out_after(invocation);
                        false
                    }
                    Directive::DropMessage | Directive::Escalate => {
                        invocation.reject(error);
                        self.busy.store(false, Ordering::Release);
                        self.fan_out_after(invocation);
                        true
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::ActorError;
    use crate::supervisor::{DropSupervisor, EscalateSupervisor, RetrySupervisor};
    use std::sync::atomic::AtomicUsize;

    struct Flaky {
        attempts: Arc<AtomicUsize>,
        fail_first: usize,
    }

    #[async_trait]
    impl Actor for Flaky {
        async fn handle_call(
            &mut self,
            method: &str,
            _args: &[Value],
            _ctx: &ActorContext,
        ) -> Result<Value, ActorError> {
            match method {
                "work" => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt <= self.fail_first {
                        Err(ActorError::failure("not yet"))
                    } else {
                        Ok(json!(attempt))
                    }
                }
                other => Err(ActorError::method_not_found(other)),
            }
        }
    }

    fn harness(
        actor: impl Actor,
        supervisor: Arc<dyn Supervisor>,
    ) -> (Arc<ActorCell>, Mailbox<Invocation>, SubscriptionId) {
        let mailbox: Mailbox<Invocation> = Mailbox::new();
        let id = ActorId::new("cell");
        let cell = ActorCell::new(
            id.clone(),
            vec![Partition::from(&id)],
            Box::new(actor),
            supervisor,
            Vec::new(),
            mailbox.clone(),
            Weak::new(),
        );
        let subscription = mailbox.add_subscriber(cell.clone());
        (cell, mailbox, subscription)
    }

    fn call(mailbox: &Mailbox<Invocation>, method: &str) -> crate::message::PendingReply {
        crate::proxy::send_and_return(mailbox, &ActorId::new("cell"), method, vec![])
    }

    #[tokio::test]
    async fn test_success_resolves_and_consumes() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (_cell, mailbox, sid) = harness(
            Flaky {
                attempts: Arc::clone(&attempts),
                fail_first: 0,
            },
            Arc::new(EscalateSupervisor),
        );

        let reply = call(&mailbox, "work");
        mailbox.poll(&sid).await;
        assert_eq!(reply.await_reply().await.unwrap(), json!(1));
        assert_eq!(mailbox.queued(&sid), 0);
    }

    #[tokio::test]
    async fn test_escalate_rejects_caller() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (_cell, mailbox, sid) = harness(
            Flaky {
                attempts,
                fail_first: usize::MAX,
            },
            Arc::new(EscalateSupervisor),
        );

        let reply = call(&mailbox, "work");
        mailbox.poll(&sid).await;
        assert_eq!(
            reply.await_reply().await.unwrap_err(),
            ActorError::failure("not yet")
        );
        assert_eq!(mailbox.queued(&sid), 0);
    }

    #[tokio::test]
    async fn test_drop_rejects_caller_and_consumes() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (_cell, mailbox, sid) = harness(
            Flaky {
                attempts,
                fail_first: usize::MAX,
            },
            Arc::new(DropSupervisor),
        );

        let reply = call(&mailbox, "work");
        mailbox.poll(&sid).await;
        assert!(reply.await_reply().await.is_err());
        assert_eq!(mailbox.queued(&sid), 0);
    }

    #[tokio::test]
    async fn test_retry_keeps_head_and_eventually_resolves() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (_cell, mailbox, sid) = harness(
            Flaky {
                attempts: Arc::clone(&attempts),
                fail_first: 2,
            },
            Arc::new(RetrySupervisor),
        );

        let reply = call(&mailbox, "work");
        mailbox.poll(&sid).await; // attempt 1, fails, head kept
        assert_eq!(mailbox.queued(&sid), 1);
        mailbox.poll(&sid).await; // attempt 2, fails, head kept
        assert_eq!(mailbox.queued(&sid), 1);
        mailbox.poll(&sid).await; // attempt 3, succeeds

        // The original caller's reply resolves with the successful attempt.
        assert_eq!(reply.await_reply().await.unwrap(), json!(3));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(mailbox.queued(&sid), 0);
    }

    #[tokio::test]
    async fn test_unknown_method_rejects_with_documented_text() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (_cell, mailbox, sid) = harness(
            Flaky {
                attempts,
                fail_first: 0,
            },
            Arc::new(EscalateSupervisor),
        );

        let reply = call(&mailbox, "missing");
        mailbox.poll(&sid).await;
        let error = reply.await_reply().await.unwrap_err();
        assert_eq!(error.to_string(), "Method missing not found");
    }

    #[tokio::test]
    async fn test_busy_cell_refuses_delivery() {
        struct Slow;

        #[async_trait]
        impl Actor for Slow {
            async fn handle_call(
                &mut self,
                _method: &str,
                _args: &[Value],
                _ctx: &ActorContext,
            ) -> Result<Value, ActorError> {
                sleep(Duration::from_millis(30)).await;
                Ok(Value::Null)
            }
        }

        let (cell, mailbox, sid) = harness(Slow, Arc::new(EscalateSupervisor));

        let first = call(&mailbox, "work");
        let second = call(&mailbox, "work");

        let poller = {
            let mailbox = mailbox.clone();
            tokio::spawn(async move { mailbox.poll(&sid).await })
        };
        sleep(Duration::from_millis(5)).await;
        assert!(cell.is_busy());
        // A concurrent poll during the in-flight handler consumes nothing.
        mailbox.poll(&sid).await;
        assert_eq!(mailbox.queued(&sid), 2);

        poller.await.unwrap();
        assert_eq!(mailbox.queued(&sid), 1);
        mailbox.poll(&sid).await;
        assert!(first.await_reply().await.is_ok());
        assert!(second.await_reply().await.is_ok());
    }

    #[tokio::test]
    async fn test_schedule_once_fires_and_cleans_entry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (cell, mailbox, sid) = harness(
            Flaky {
                attempts: Arc::clone(&attempts),
                fail_first: 0,
            },
            Arc::new(EscalateSupervisor),
        );

        cell.schedule_once(Duration::from_millis(5), "work", vec![]);
        assert_eq!(cell.scheduled_count(), 1);

        sleep(Duration::from_millis(30)).await;
        mailbox.poll(&sid).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(cell.scheduled_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_stops_periodic_schedule() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (cell, mailbox, sid) = harness(
            Flaky {
                attempts: Arc::clone(&attempts),
                fail_first: 0,
            },
            Arc::new(EscalateSupervisor),
        );

        let schedule = cell.schedule(Duration::from_millis(5), "work", vec![]);
        sleep(Duration::from_millis(12)).await;
        cell.cancel(&schedule);
        assert_eq!(cell.scheduled_count(), 0);

        // Drain whatever fired before the cancel.
        for _ in 0..10 {
            mailbox.poll(&sid).await;
        }
        let fired = attempts.load(Ordering::SeqCst);

        sleep(Duration::from_millis(20)).await;
        for _ in 0..10 {
            mailbox.poll(&sid).await;
        }
        assert_eq!(attempts.load(Ordering::SeqCst), fired);
    }

    #[tokio::test]
    async fn test_cancel_unknown_schedule_is_noop() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (cell, _mailbox, _sid) = harness(
            Flaky {
                attempts,
                fail_first: 0,
            },
            Arc::new(EscalateSupervisor),
        );
        cell.cancel(&ScheduleId::new());
    }

    #[tokio::test]
    async fn test_release_clears_schedules() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (cell, _mailbox, _sid) = harness(
            Flaky {
                attempts,
                fail_first: 0,
            },
            Arc::new(EscalateSupervisor),
        );

        cell.schedule(Duration::from_secs(10), "work", vec![]);
        cell.schedule_once(Duration::from_secs(10), "work", vec![]);
        assert_eq!(cell.scheduled_count(), 2);

        cell.release();
        assert_eq!(cell.scheduled_count(), 0);
    }
}
