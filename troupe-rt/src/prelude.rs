//! Convenience re-exports for the common case.
//!
//! ```rust
//! use troupe_rt::prelude::*;
//! ```

pub use crate::actor::{Actor, ActorContext};
pub use crate::message::ActorError;
pub use crate::proxy::ActorRef;
pub use crate::supervisor::{Directive, Supervisor};
pub use crate::system::{ActorSystem, SystemConfig, SystemError};
pub use crate::topic::Topic;
pub use crate::util::{ActorId, Partition, ScheduleId, SubscriptionId};
