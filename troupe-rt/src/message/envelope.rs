//! Partition-keyed transport envelope.

// Layer 1: Standard library imports
use std::fmt::Debug;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use crate::util::{MessageId, Partition};

/// Immutable wrapper routing a piece of content to a mailbox partition.
///
/// The envelope id lets the mailbox recognize whether a delivered head is
/// still at the front of its queue when consuming it; the timestamp records
/// enqueue time for diagnostics.
///
/// # Example
/// ```rust
/// use troupe_rt::message::Envelope;
/// use troupe_rt::util::Partition;
///
/// let envelope = Envelope::new(Partition::new("billing"), "pay".to_owned());
/// assert_eq!(envelope.partition.as_str(), "billing");
/// assert_eq!(envelope.content, "pay");
/// ```
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    /// Unique id of this message instance.
    pub id: MessageId,

    /// Partition the mailbox routes this envelope to.
    pub partition: Partition,

    /// The transported payload.
    pub content: T,

    /// When the envelope was constructed.
    pub enqueued_at: DateTime<Utc>,
}

impl<T> Envelope<T> {
    /// Create a new envelope; all fields are fixed at construction.
    pub fn new(partition: Partition, content: T) -> Self {
        Self {
            id: MessageId::new(),
            partition,
            content,
            enqueued_at: Utc::now(),
        }
    }
}
