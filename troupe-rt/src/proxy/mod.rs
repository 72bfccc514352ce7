//! Caller-facing actor handles that turn method calls into messages.

pub mod actor_ref;

pub use actor_ref::{send_and_return, ActorRef};
