//! Subscriber contract consumed by the mailbox.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::message::Envelope;
use crate::util::Partition;

/// A consumer of mailbox deliveries.
///
/// The mailbox delivers the head of a subscription's queue by reference and
/// interprets the returned flag: `true` consumes the head, `false` keeps it
/// at the front to be retried on the next poll. The actor harness is the
/// production implementation; tests provide recording subscribers.
#[async_trait]
pub trait Subscriber<T>: Send + Sync + 'static {
    /// The partitions this subscriber wants to receive.
    fn partitions(&self) -> Vec<Partition>;

    /// Handle one delivered envelope.
    ///
    /// Returning `false` signals the message was not consumed (for example
    /// the subscriber is busy) and must stay at the queue front.
    async fn on_receive(&self, envelope: &Envelope<T>) -> bool;
}
