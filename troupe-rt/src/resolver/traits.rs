//! Resolver contract.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use thiserror::Error;

// Layer 3: Internal module imports
use crate::actor::Actor;
use crate::util::ActorId;

/// Why a resolver could not produce an actor.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// This resolver does not know the id.
    #[error("no actor registered under {id}")]
    NotFound {
        /// The id that was looked up.
        id: ActorId,
    },

    /// The resolver failed while looking the actor up.
    #[error("{0}")]
    Failed(String),
}

impl ResolveError {
    /// The id is unknown to this resolver.
    pub fn not_found(id: &ActorId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    /// Lookup failed with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Produces actor instances for ids the system does not hold locally.
///
/// The system walks its resolvers in registration order; the first success
/// supplies the instance, which is then installed into the local registry
/// like any other actor. Failures are absorbed and the next resolver is
/// tried.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Produce the actor registered under `id`, if this resolver knows it.
    async fn resolve_actor_by_id(&self, id: &ActorId) -> Result<Box<dyn Actor>, ResolveError>;
}
