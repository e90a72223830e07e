//! Actor repository.

use std::sync::Arc;

use crate::db_error;
use crate::entities::{Actor, actor};
use atelier_common::AppResult;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Actor repository for database operations.
#[derive(Clone)]
pub struct ActorRepository {
    db: Arc<DatabaseConnection>,
}

impl ActorRepository {
    /// Create a new actor repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an actor by access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<actor::Model>> {
        Actor::find()
            .filter(actor::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

}
