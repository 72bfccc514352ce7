//! Processor contract driven by the fiber.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
// (none)

/// A unit of periodic work driven by a [`Fiber`](super::Fiber) tick.
///
/// A fiber only accepts a processor when every resource tag the processor
/// requires is present in the fiber's resource set.
#[async_trait]
pub trait Processor: Send + Sync + 'static {
    /// Resource tags this processor needs from the fiber.
    fn requirements(&self) -> Vec<String>;

    /// Run one round of work. Launched detached; ticks never wait on it.
    async fn process(&self);
}
