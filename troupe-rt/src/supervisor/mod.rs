//! Failure policies consulted by the actor harness.

pub mod policy;
pub mod traits;

pub use policy::{DropSupervisor, EscalateSupervisor, RetrySupervisor};
pub use traits::{Directive, Supervisor};
