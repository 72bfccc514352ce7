// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Reserved id prefix for topic actors.
pub(crate) const TOPIC_PREFIX: &str = "topics/";

/// User-assigned identifier for actors in the system.
///
/// Unlike generated ids, actor ids are chosen by the application (a topic
/// actor is always registered at `topics/<name>`). An actor's default
/// mailbox partition equals its id.
///
/// # Example
/// ```rust
/// use troupe_rt::util::ActorId;
///
/// let id = ActorId::new("billing");
/// assert_eq!(id.as_str(), "billing");
/// assert!(!id.is_topic());
///
/// let topic = ActorId::topic("orders");
/// assert_eq!(topic.as_str(), "topics/orders");
/// assert!(topic.is_topic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Create an actor id from a user-chosen string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create the id of the topic actor for `name`.
    pub fn topic(name: impl AsRef<str>) -> Self {
        Self(format!("{TOPIC_PREFIX}{}", name.as_ref()))
    }

    /// Whether this id lives in the reserved topic namespace.
    pub fn is_topic(&self) -> bool {
        self.0.starts_with(TOPIC_PREFIX)
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque routing key used by the mailbox.
///
/// Every actor subscribes at least to the partition that equals its own id;
/// actors may declare additional partitions to receive broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition(String);

impl Partition {
    /// Create a partition from an arbitrary routing key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the partition key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&ActorId> for Partition {
    /// An actor's default partition is its own id.
    fn from(id: &ActorId) -> Self {
        Self(id.as_str().to_owned())
    }
}

impl From<&str> for Partition {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for mailbox and topic subscriptions.
///
/// # Example
/// ```rust
/// use troupe_rt::util::SubscriptionId;
///
/// let id1 = SubscriptionId::new();
/// let id2 = SubscriptionId::new();
/// assert_ne!(id1, id2); // Globally unique
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Generate a new random SubscriptionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create SubscriptionId from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cancellation token for a scheduled send installed via the actor context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleId(Uuid);

impl ScheduleId {
    /// Generate a new random ScheduleId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ScheduleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for messages in flight.
///
/// Used by the mailbox to recognize whether a delivered head is still at the
/// front of its queue when consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random MessageId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_roundtrip() {
        let id = ActorId::new("worker-1");
        assert_eq!(id.as_str(), "worker-1");
        assert_eq!(format!("{id}"), "worker-1");
    }

    #[test]
    fn test_actor_id_topic_namespace() {
        let id = ActorId::topic("metrics");
        assert_eq!(id.as_str(), "topics/metrics");
        assert!(id.is_topic());
        assert!(!ActorId::new("metrics").is_topic());
    }

    #[test]
    fn test_default_partition_equals_actor_id() {
        let id = ActorId::new("worker-1");
        let partition = Partition::from(&id);
        assert_eq!(partition.as_str(), "worker-1");
    }

    #[test]
    fn test_subscription_id_unique() {
        let id1 = SubscriptionId::new();
        let id2 = SubscriptionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_subscription_id_serde_roundtrip() {
        let id = SubscriptionId::new();
        let json = serde_json::to_value(id).unwrap();
        let back: SubscriptionId = serde_json::from_value(json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_schedule_id_unique() {
        assert_ne!(ScheduleId::new(), ScheduleId::new());
    }

    #[test]
    fn test_message_id_display() {
        let id = MessageId::new();
        let display = format!("{id}");
        assert!(display.contains('-')); // UUID format
    }
}
