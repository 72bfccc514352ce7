//! The actor system: registry, lifecycle, resolver chain, processor tick.

// Layer 1: Standard library imports
use std::sync::{Arc, Weak};

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::config::SystemConfig;
use super::errors::SystemError;
use super::SystemBuilder;
use crate::actor::{Actor, ActorCell};
use crate::fiber::interval::DEFAULT_RESOURCE;
use crate::fiber::{Fiber, FiberConfig, Processor};
use crate::mailbox::{Mailbox, Subscriber};
use crate::materializer::Materializer;
use crate::message::Invocation;
use crate::proxy::ActorRef;
use crate::resolver::Resolver;
use crate::supervisor::Supervisor;
use crate::util::{ActorId, SubscriptionId};

pub(crate) struct SystemInner {
    mailbox: Mailbox<Invocation>,
    fiber: Fiber,
    actors: DashMap<ActorId, Arc<ActorCell>>,
    subscriptions: DashMap<ActorId, SubscriptionId>,
    materializers: Vec<Arc<dyn Materializer>>,
    resolvers: Vec<Arc<dyn Resolver>>,
    supervisor: Arc<dyn Supervisor>,
}

/// Owns the mailbox and fiber, registers actors, and resolves ids.
///
/// Cheap to clone; all clones share one runtime. Each fiber tick launches a
/// mailbox poll per registered actor — the per-cell busy flag keeps every
/// actor single-in-flight even though pollers run concurrently.
///
/// # Example
/// ```rust,no_run
/// use serde_json::{json, Value};
/// use troupe_rt::prelude::*;
/// # use async_trait::async_trait;
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
///             other => Err(ActorError::method_not_found(other)),
///         }
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let system = ActorSystem::builder().build();
/// let counter = system.actor_of("counter", Counter { count: 0 }).await?;
/// assert_eq!(counter.call("increment", vec![]).await?, json!(1));
/// system.free().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

impl ActorSystem {
    /// Start building a system.
    pub fn builder() -> SystemBuilder {
        SystemBuilder::new()
    }

    /// Build a system from plain configuration, defaults elsewhere.
    ///
    /// Must be called within a Tokio runtime.
    pub fn with(config: SystemConfig) -> Self {
        Self::builder().with_config(config).build()
    }

    pub(crate) fn assemble(
        config: SystemConfig,
        mailbox: Mailbox<Invocation>,
        materializers: Vec<Arc<dyn Materializer>>,
        resolvers: Vec<Arc<dyn Resolver>>,
        supervisor: Arc<dyn Supervisor>,
    ) -> Self {
        let fiber = Fiber::with(FiberConfig {
            resources: config.resources,
            tick_interval: config.tick_interval,
        });
        let inner = Arc::new(SystemInner {
            mailbox,
            fiber,
            actors: DashMap::new(),
            subscriptions: DashMap::new(),
            materializers,
            resolvers,
            supervisor,
        });

        let accepted = inner.fiber.acquire(Arc::new(SystemProcessor {
            system: Arc::downgrade(&inner),
        }));
        if !accepted {
            warn!("fiber rejected the system processor; mailboxes will not drain without the \"default\" resource");
        }

        Self { inner }
    }

    pub(crate) fn from_inner(inner: Arc<SystemInner>) -> Self {
        Self { inner }
    }

    /// Register `actor` under `id` and hand back its proxy.
    ///
    /// Registration subscribes the actor's harness to the mailbox, records
    /// it in the registry, fans out `on_initialize`, and runs the actor's
    /// `initialized` hook.
    pub async fn actor_of<A: Actor>(
        &self,
        id: impl Into<ActorId>,
        actor: A,
    ) -> Result<ActorRef, SystemError> {
        self.register(
            id.into(),
            Box::new(actor),
            Arc::clone(&self.inner.supervisor),
        )
        .await
    }

    pub(crate) async fn register(
        &self,
        id: ActorId,
        actor: Box<dyn Actor>,
        supervisor: Arc<dyn Supervisor>,
    ) -> Result<ActorRef, SystemError> {
        let partitions = actor.partitions(&id);
        let cell = ActorCell::new(
            id.clone(),
            partitions,
            actor,
            supervisor,
            self.inner.materializers.clone(),
            self.inner.mailbox.clone(),
            Arc::downgrade(&self.inner),
        );

        match self.inner.actors.entry(id.clone()) {
            Entry::Occupied(_) => return Err(SystemError::AlreadyRegistered { id }),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::clone(&cell));
            }
        }

        let subscriber: Arc<dyn Subscriber<Invocation>> = cell.clone();
        let subscription = self.inner.mailbox.add_subscriber(subscriber);
        self.inner.subscriptions.insert(id.clone(), subscription);

        cell.initialize().await;
        Ok(ActorRef::new(id, self.inner.mailbox.clone()))
    }

    /// Locate an actor by id.
    ///
    /// A locally registered id yields a fresh proxy immediately. Otherwise
    /// the resolver chain is walked in registration order; the first
    /// resolver that produces an instance has it installed like a local
    /// actor. When every resolver fails, the error reads
    /// `unable to resolve actor <id>`.
    pub async fn actor_for(&self, id: impl Into<ActorId>) -> Result<ActorRef, SystemError> {
        let id = id.into();
        if self.inner.actors.contains_key(&id) {
            return Ok(ActorRef::new(id, self.inner.mailbox.clone()));
        }

        for resolver in &self.inner.resolvers {
            match resolver.resolve_actor_by_id(&id).await {
                Ok(actor) => {
                    return match self
                        .register(id.clone(), actor, Arc::clone(&self.inner.supervisor))
                        .await
                    {
                        Ok(proxy) => Ok(proxy),
                        // Lost an install race; the actor exists now.
                        Err(SystemError::AlreadyRegistered { .. }) => {
                            Ok(ActorRef::new(id, self.inner.mailbox.clone()))
                        }
                        Err(other) => Err(other),
                    };
                }
                Err(error) => {
                    debug!(actor = %id, error = %error, "resolver failed, trying next");
                }
            }
        }

        Err(SystemError::UnableToResolve { id })
    }

    /// `actor_for`, falling back to registering a fresh instance when
    /// nothing resolves.
    pub async fn resolve_or_new<A, F>(
        &self,
        id: impl Into<ActorId>,
        actor: F,
    ) -> Result<ActorRef, SystemError>
    where
        A: Actor,
        F: FnOnce() -> A,
    {
        let id = id.into();
        match self.actor_for(id.clone()).await {
            Ok(proxy) => Ok(proxy),
            Err(_) => self.actor_of(id, actor()).await,
        }
    }

    /// Build a proxy for `id` without consulting the registry.
    ///
    /// The ref is valid regardless of registration; calls to an id nobody
    /// subscribes settle as abandoned.
    pub fn actor_ref(&self, id: impl Into<ActorId>) -> ActorRef {
        ActorRef::new(id.into(), self.inner.mailbox.clone())
    }

    /// Number of registered actors.
    pub fn actor_count(&self) -> usize {
        self.inner.actors.len()
    }

    /// Whether `id` is registered locally.
    pub fn is_registered(&self, id: &ActorId) -> bool {
        self.inner.actors.contains_key(id)
    }

    /// Unregister one actor: its mailbox subscription is removed, its
    /// schedules are aborted, and its topic subscriptions are dropped.
    pub fn stop(&self, id: &ActorId) {
        if let Some((_, subscription)) = self.inner.subscriptions.remove(id) {
            self.inner.mailbox.remove_subscription(&subscription);
        }
        if let Some((_, cell)) = self.inner.actors.remove(id) {
            cell.release();
        }
    }

    /// Shut the system down: stop the fiber and release every actor.
    ///
    /// Runs after a zero-delay deferral so in-flight deferred setups
    /// (topic subscribes, first schedule installs) settle first.
    pub async fn free(&self) {
        tokio::task::yield_now().await;
        self.inner.fiber.free();

        for entry in self.inner.actors.iter() {
            entry.value().release();
        }
        self.inner.actors.clear();

        let subscriptions: Vec<SubscriptionId> = self
            .inner
            .subscriptions
            .iter()
            .map(|entry| *entry.value())
            .collect();
        for subscription in subscriptions {
            self.inner.mailbox.remove_subscription(&subscription);
        }
        self.inner.subscriptions.clear();
    }
}

/// The fiber-driven tick: one mailbox poll per registered actor.
struct SystemProcessor {
    system: Weak<SystemInner>,
}

#[async_trait]
impl Processor for SystemProcessor {
    fn requirements(&self) -> Vec<String> {
        vec![DEFAULT_RESOURCE.to_owned()]
    }

    async fn process(&self) {
        let Some(inner) = self.system.upgrade() else {
            return;
        };
        let subscriptions: Vec<SubscriptionId> = inner
            .subscriptions
            .iter()
            .map(|entry| *entry.value())
            .collect();
        for subscription in subscriptions {
            let mailbox = inner.mailbox.clone();
            tokio::spawn(async move {
                mailbox.poll(&subscription).await;
            });
        }
    }
}
