//! Identity provider boundary.
//!
//! Request authentication is external to the catalog. The API layer only
//! needs a bearer token resolved to an opaque actor id.

use async_trait::async_trait;
use atelier_common::AppResult;
use atelier_db::repositories::ActorRepository;

/// Resolves bearer tokens to actor ids.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Return the actor id for a token, or `None` when the token is unknown.
    async fn resolve(&self, token: &str) -> AppResult<Option<String>>;
}

/// Identity provider backed by the `actor` table.
#[derive(Clone)]
pub struct ActorIdentityProvider {
    actor_repo: ActorRepository,
}

impl ActorIdentityProvider {
    /// Create a new actor-backed identity provider.
    #[must_use]
    pub const fn new(actor_repo: ActorRepository) -> Self {
        Self { actor_repo }
    }
}

#[async_trait]
impl IdentityProvider for ActorIdentityProvider {
    async fn resolve(&self, token: &str) -> AppResult<Option<String>> {
        Ok(self.actor_repo.find_by_token(token).await?.map(|a| a.id))
    }
}
