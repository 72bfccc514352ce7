//! # troupe-rt - In-Process Actor Runtime
//!
//! Stateful actors communicating only through asynchronous, serialized
//! method invocations and publish/subscribe topics — no shared state, no
//! locks in application code, no networking.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use serde_json::{json, Value};
//! use troupe_rt::prelude::*;
//!
//! // 1. Define your actor state
//! struct Greeter {
//!     greeted: u64,
//! }
//!
//! // 2. Implement the Actor trait with a string method table
//! #[async_trait]
//! impl Actor for Greeter {
//!     async fn handle_call(
//!         &mut self,
//!         method: &str,
//!         args: &[Value],
//!         _ctx: &ActorContext,
//!     ) -> Result<Value, ActorError> {
//!         match method {
//!             "greet" => {
//!                 self.greeted += 1;
//!                 let name = args.first().and_then(Value::as_str).unwrap_or("world");
//!                 Ok(json!(format!("hello, {name}")))
//!             }
//!             other => Err(ActorError::method_not_found(other)),
//!         }
//!     }
//! }
//!
//! // 3. Register it and call through the proxy
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = ActorSystem::builder().build();
//!     let greeter = system.actor_of("greeter", Greeter { greeted: 0 }).await?;
//!
//!     let reply = greeter.call("greet", vec![json!("troupe")]).await?;
//!     assert_eq!(reply, json!("hello, troupe"));
//!
//!     system.free().await;
//!     Ok(())
//! }
//! ```
//!
//! # How It Fits Together
//!
//! A method call on an [`proxy::ActorRef`] becomes an
//! [`message::Invocation`] (method name, JSON arguments, and a completion
//! settled exactly once), wrapped in an [`message::Envelope`] keyed by the
//! target's mailbox partition. The [`mailbox::Mailbox`] queues it per
//! subscription; every tick of the [`fiber::Fiber`] the
//! [`system::ActorSystem`] polls each registered actor's subscription. A
//! poll delivers at most one message to the [`actor::ActorCell`] harness,
//! which runs the handler under a busy flag (at most one in-flight call per
//! actor), fans out [`materializer::Materializer`] hooks, and settles the
//! caller's reply. Failures consult the [`supervisor::Supervisor`], which
//! picks retry, drop, or escalate. A [`topic::Topic`] is just an actor whose
//! state is a subscriber map and whose `notify` forwards a call to every
//! subscriber proxy.
//!
//! # Guarantees
//!
//! - Per actor, messages on a partition are processed FIFO in push order;
//!   no ordering holds across distinct actors.
//! - No two handlers of the same actor ever overlap.
//! - Every invocation settles exactly once — resolved, rejected, or
//!   abandoned when its queue is dropped — unless a supervisor retries it
//!   indefinitely.
//!
//! # Module Organization
//!
//! ## Core
//! - [`actor`] - Actor contract, harness, and per-dispatch context
//! - [`message`] - Invocations, completions, and envelopes
//! - [`mailbox`] - Partition-indexed queues and the subscriber registry
//! - [`proxy`] - Caller-facing actor handles
//! - [`system`] - Registry, lifecycle, resolver chain, processor tick
//! - [`topic`] - Pub/sub fan-out built on the actor primitives
//!
//! ## Extension Points
//! - [`supervisor`] - Retry/drop/escalate policies
//! - [`materializer`] - Observation hooks around message processing
//! - [`resolver`] - By-id actor lookup chain
//!
//! ## Infrastructure
//! - [`fiber`] - The periodic driver draining mailboxes
//! - [`util`] - Identifier newtypes

pub mod actor;
pub mod fiber;
pub mod mailbox;
pub mod materializer;
pub mod message;
pub mod prelude;
pub mod proxy;
pub mod resolver;
pub mod supervisor;
pub mod system;
pub mod topic;
pub mod util;

// Re-export commonly used types
pub use actor::{Actor, ActorCell, ActorContext};
pub use fiber::{Fiber, FiberConfig, Processor};
pub use mailbox::{Mailbox, Subscriber};
pub use materializer::{Materializer, TraceMaterializer};
pub use message::{ActorError, Envelope, Invocation, PendingReply};
pub use proxy::ActorRef;
pub use resolver::{ResolveError, Resolver};
pub use supervisor::{
    Directive, DropSupervisor, EscalateSupervisor, RetrySupervisor, Supervisor,
};
pub use system::{ActorSystem, SystemBuilder, SystemConfig, SystemError};
pub use topic::Topic;
pub use util::{ActorId, MessageId, Partition, ScheduleId, SubscriptionId};
