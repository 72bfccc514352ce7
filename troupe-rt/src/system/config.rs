//! System configuration with sensible defaults.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::fiber::interval::{DEFAULT_RESOURCE, DEFAULT_TICK_INTERVAL};

/// Plain configuration knobs for an actor system's fiber.
///
/// The trait-object configuration (mailbox, materializers, resolvers,
/// supervisor) lives on [`SystemBuilder`](super::SystemBuilder); this struct
/// carries only the data the fiber needs.
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use troupe_rt::system::SystemConfig;
///
/// let config = SystemConfig::default();
/// assert_eq!(config.resources, vec!["default".to_owned()]);
/// assert_eq!(config.tick_interval, Duration::from_millis(1));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Resource tags the system's fiber offers.
    pub resources: Vec<String>,

    /// How often the fiber drains mailboxes.
    pub tick_interval: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            resources: vec![DEFAULT_RESOURCE.to_owned()],
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl SystemConfig {
    /// Validate configuration values.
    ///
    /// Returns `Err` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.resources.is_empty() {
            return Err("resources must not be empty".to_owned());
        }
        if self.tick_interval.is_zero() {
            return Err("tick_interval must be > 0".to_owned());
        }
        Ok(())
    }
}
