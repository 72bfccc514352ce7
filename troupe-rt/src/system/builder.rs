//! Fluent, order-independent construction of an actor system.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::actor_system::ActorSystem;
use super::config::SystemConfig;
use crate::mailbox::Mailbox;
use crate::materializer::Materializer;
use crate::message::Invocation;
use crate::resolver::Resolver;
use crate::supervisor::{EscalateSupervisor, Supervisor};

/// Builder assembling an [`ActorSystem`].
///
/// Every knob has a default: empty mailbox, `["default"]` resources, a 1ms
/// tick, no materializers, no resolvers, and the terminal escalating
/// supervisor. Setters can be called in any order.
///
/// # Example
/// ```rust,no_run
/// use std::time::Duration;
/// use troupe_rt::materializer::TraceMaterializer;
/// use troupe_rt::system::ActorSystem;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let system = ActorSystem::builder()
///     .with_tick_interval(Duration::from_millis(2))
///     .with_materializer(TraceMaterializer)
///     .build();
/// # system.free().await;
/// # }
/// ```
pub struct SystemBuilder {
    config: SystemConfig,
    mailbox: Option<Mailbox<Invocation>>,
    materializers: Vec<Arc<dyn Materializer>>,
    resolvers: Vec<Arc<dyn Resolver>>,
    supervisor: Arc<dyn Supervisor>,
}

impl Default for SystemBuilder {
    fn default() -> Self {
        Self {
            config: SystemConfig::default(),
            mailbox: None,
            materializers: Vec::new(),
            resolvers: Vec::new(),
            supervisor: Arc::new(EscalateSupervisor),
        }
    }
}

impl SystemBuilder {
    /// Start from defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the plain configuration knobs wholesale.
    pub fn with_config(mut self, config: SystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Resource tags the system's fiber offers.
    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.config.resources = resources;
        self
    }

    /// How often the fiber drains mailboxes.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.config.tick_interval = tick_interval;
        self
    }

    /// Use an existing (possibly shared) mailbox instead of a fresh one.
    pub fn with_mailbox(mut self, mailbox: Mailbox<Invocation>) -> Self {
        self.mailbox = Some(mailbox);
        self
    }

    /// Add one materializer to the fan-out set.
    pub fn with_materializer(mut self, materializer: impl Materializer) -> Self {
        self.materializers.push(Arc::new(materializer));
        self
    }

    /// Append a resolver to the lookup chain (consulted in insertion order).
    pub fn with_resolver(mut self, resolver: impl Resolver) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Replace the root supervision policy.
    pub fn with_supervisor(mut self, supervisor: impl Supervisor) -> Self {
        self.supervisor = Arc::new(supervisor);
        self
    }

    /// Assemble the system and start its fiber.
    ///
    /// Must be called within a Tokio runtime.
    pub fn build(self) -> ActorSystem {
        ActorSystem::assemble(
            self.config,
            self.mailbox.unwrap_or_default(),
            self.materializers,
            self.resolvers,
            self.supervisor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_defaults() {
        let system = SystemBuilder::new().build();
        assert_eq!(system.actor_count(), 0);
        system.free().await;
    }

    #[tokio::test]
    async fn test_builder_order_independent() {
        let system = SystemBuilder::new()
            .with_tick_interval(Duration::from_millis(3))
            .with_resources(vec!["default".to_owned(), "io".to_owned()])
            .build();
        system.free().await;

        let system = SystemBuilder::new()
            .with_resources(vec!["default".to_owned(), "io".to_owned()])
            .with_tick_interval(Duration::from_millis(3))
            .build();
        system.free().await;
    }
}
