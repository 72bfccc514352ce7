//! Shared utilities: identifier newtypes used across the runtime.

pub mod ids;

pub use ids::{ActorId, MessageId, Partition, ScheduleId, SubscriptionId};
