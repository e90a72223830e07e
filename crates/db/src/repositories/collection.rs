//! Collection repository.

use std::sync::Arc;

use crate::db_error;
use crate::entities::{Collection, collection};
use atelier_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

/// Collection repository for database operations.
///
/// Collections are inserted together with their variants through
/// [`VariantRepository::commit_unit`](super::VariantRepository::commit_unit).
#[derive(Clone)]
pub struct CollectionRepository {
    db: Arc<DatabaseConnection>,
}

impl CollectionRepository {
    /// Create a new collection repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a collection by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<collection::Model>> {
        Collection::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Get a collection by ID, returning a not-found error when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<collection::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection not found: {id}")))
    }

    /// Flip the activity flag. Collections are never hard deleted.
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<collection::Model> {
        let mut active = self.get_by_id(id).await?.into_active_model();
        active.is_active = Set(is_active);
        active.updated_at = Set(Some(Utc::now().into()));

        active.update(self.db.as_ref()).await.map_err(db_error)
    }
}
