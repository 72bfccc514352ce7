//! Partition-indexed message queues and the subscriber registry.

pub mod queue;
pub mod traits;

pub use queue::Mailbox;
pub use traits::Subscriber;
