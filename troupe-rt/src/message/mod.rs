//! Message transport envelopes and the invocation/completion pair.

pub mod call;
pub mod envelope;
pub mod error;

pub use call::{Invocation, PendingReply};
pub use envelope::Envelope;
pub use error::ActorError;
