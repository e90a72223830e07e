//! Subject repository.

use std::sync::Arc;

use crate::db_error;
use crate::entities::{Subject, subject};
use atelier_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Subject repository for database operations.
#[derive(Clone)]
pub struct SubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SubjectRepository {
    /// Create a new subject repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether a subject exists.
    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        let count = Subject::find()
            .filter(subject::Column::Id.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(count > 0)
    }

    /// Ensure a subject exists.
    pub async fn ensure_exists(&self, id: &str) -> AppResult<()> {
        if self.exists(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Subject not found: {id}")))
        }
    }

    /// Active subjects for the feed, newest first within sort order.
    pub async fn find_active(
        &self,
        collection_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<subject::Model>> {
        let mut query = Subject::find().filter(subject::Column::IsActive.eq(true));

        if let Some(cid) = collection_id {
            query = query.filter(subject::Column::CollectionId.eq(cid));
        }

        query
            .order_by_asc(subject::Column::SortOrder)
            .order_by_desc(subject::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new subject.
    pub async fn create(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }
}
