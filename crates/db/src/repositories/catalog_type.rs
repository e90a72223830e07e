//! Catalog type repository.

use std::sync::Arc;

use crate::db_error;
use crate::entities::{CatalogType, catalog_type};
use atelier_common::AppResult;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// Catalog type repository. Acts as the registry collections validate
/// their parent type against.
#[derive(Clone)]
pub struct CatalogTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl CatalogTypeRepository {
    /// Create a new catalog type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether an active catalog type exists.
    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        let count = CatalogType::find()
            .filter(catalog_type::Column::Id.eq(id))
            .filter(catalog_type::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(count > 0)
    }
}
