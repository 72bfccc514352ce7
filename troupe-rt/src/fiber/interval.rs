//! Periodic driver for registered processors.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

// Layer 3: Internal module imports
use super::traits::Processor;

/// Default tick interval: one millisecond.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Default resource tag granted by a fiber.
pub const DEFAULT_RESOURCE: &str = "default";

/// Construction parameters for a [`Fiber`].
#[derive(Debug, Clone)]
pub struct FiberConfig {
    /// Resource tags this fiber offers to processors.
    pub resources: Vec<String>,

    /// How often the fiber fires its processors.
    pub tick_interval: Duration,
}

impl Default for FiberConfig {
    fn default() -> Self {
        Self {
            resources: vec![DEFAULT_RESOURCE.to_owned()],
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

struct FiberInner {
    resources: Vec<String>,
    processors: RwLock<Vec<Arc<dyn Processor>>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// Interval-driven runner firing every registered processor each tick.
///
/// Processors fire in insertion order; each `process()` is launched as a
/// detached task, so a slow processor never delays the next tick.
///
/// # Runtime requirement
///
/// `Fiber::with` spawns the ticker task and therefore must run inside a
/// Tokio runtime.
///
/// # Example
/// ```rust,no_run
/// use troupe_rt::fiber::{Fiber, FiberConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fiber = Fiber::with(FiberConfig::default());
/// // ... acquire processors ...
/// fiber.free();
/// # }
/// ```
pub struct Fiber {
    inner: Arc<FiberInner>,
}

impl Fiber {
    /// Start a fiber with the given resources and tick interval.
    ///
    /// A zero interval falls back to [`DEFAULT_TICK_INTERVAL`].
    pub fn with(config: FiberConfig) -> Self {
        let tick_interval = if config.tick_interval.is_zero() {
            DEFAULT_TICK_INTERVAL
        } else {
            config.tick_interval
        };
        let inner = Arc::new(FiberInner {
            resources: config.resources,
            processors: RwLock::new(Vec::new()),
            ticker: Mutex::new(None),
        });

        let handle = Self::spawn_ticker(Arc::clone(&inner), tick_interval);
        *inner.ticker.lock() = Some(handle);

        Self { inner }
    }

    fn spawn_ticker(inner: Arc<FiberInner>, tick_interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_interval);
            loop {
                ticker.tick().await;
                let processors: Vec<Arc<dyn Processor>> = inner.processors.read().clone();
                for processor in processors {
                    tokio::spawn(async move {
                        processor.process().await;
                    });
                }
            }
        })
    }

    /// Admit a processor if the fiber covers all its requirements.
    ///
    /// Returns `false`, without side effect, when a required resource tag is
    /// missing from this fiber.
    pub fn acquire(&self, processor: Arc<dyn Processor>) -> bool {
        let satisfied = processor
            .requirements()
            .iter()
            .all(|requirement| self.inner.resources.contains(requirement));
        if !satisfied {
            debug!("fiber rejected processor with unsatisfied requirements");
            return false;
        }

        self.inner.processors.write().push(processor);
        true
    }

    /// Stop the ticker. Safe to call more than once.
    pub fn free(&self) {
        if let Some(handle) = self.inner.ticker.lock().take() {
            handle.abort();
        }
    }

    /// Resource tags offered by this fiber.
    pub fn resources(&self) -> &[String] {
        &self.inner.resources
    }

    /// Number of admitted processors.
    pub fn processor_count(&self) -> usize {
        self.inner.processors.read().len()
    }
}

impl Drop for Fiber {
    fn drop(&mut self) {
        self.free();
    }
}
