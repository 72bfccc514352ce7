//! Named pub/sub topics built on the actor primitives.

pub mod broadcast;

pub use broadcast::Topic;
