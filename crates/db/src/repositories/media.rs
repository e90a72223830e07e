//! Variant media repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::db_error;
use crate::entities::{VariantMedia, variant_media};
use atelier_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Variant media repository for database operations.
#[derive(Clone)]
pub struct VariantMediaRepository {
    db: Arc<DatabaseConnection>,
}

impl VariantMediaRepository {
    /// Create a new variant media repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Media of one variant, cover first.
    pub async fn find_by_variant(&self, variant_id: &str) -> AppResult<Vec<variant_media::Model>> {
        VariantMedia::find()
            .filter(variant_media::Column::VariantId.eq(variant_id))
            .order_by_asc(variant_media::Column::Position)
            .order_by_asc(variant_media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Lowest-position media URL for each of the given variants.
    ///
    /// Variants without media are absent from the returned map.
    pub async fn find_covers(&self, variant_ids: &[String]) -> AppResult<HashMap<String, String>> {
        if variant_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = VariantMedia::find()
            .filter(variant_media::Column::VariantId.is_in(variant_ids.to_vec()))
            .order_by_asc(variant_media::Column::Position)
            .order_by_asc(variant_media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)?;

        let mut covers = HashMap::new();
        for row in rows {
            covers.entry(row.variant_id).or_insert(row.url);
        }
        Ok(covers)
    }

    /// Position the next appended media row should take.
    pub async fn next_position(&self, variant_id: &str) -> AppResult<i32> {
        #[derive(FromQueryResult)]
        struct MaxResult {
            max_position: Option<i32>,
        }

        let result = VariantMedia::find()
            .filter(variant_media::Column::VariantId.eq(variant_id))
            .select_only()
            .column_as(variant_media::Column::Position.max(), "max_position")
            .into_model::<MaxResult>()
            .one(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result
            .and_then(|r| r.max_position)
            .map_or(0, |max| max + 1))
    }

    /// Insert a media row.
    pub async fn create(
        &self,
        model: variant_media::ActiveModel,
    ) -> AppResult<variant_media::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_media(id: &str, variant_id: &str, position: i32) -> variant_media::Model {
        variant_media::Model {
            id: id.to_string(),
            variant_id: variant_id.to_string(),
            url: format!("/files/{variant_id}/{id}.jpg"),
            position,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_covers_keeps_first_position() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_media("m1", "v1", 0),
                    create_test_media("m3", "v2", 0),
                    create_test_media("m2", "v1", 1),
                ]])
                .into_connection(),
        );

        let repo = VariantMediaRepository::new(db);
        let covers = repo
            .find_covers(&["v1".to_string(), "v2".to_string(), "v3".to_string()])
            .await
            .unwrap();

        assert_eq!(covers.len(), 2);
        assert_eq!(covers["v1"], "/files/v1/m1.jpg");
        assert_eq!(covers["v2"], "/files/v2/m3.jpg");
        assert!(!covers.contains_key("v3"));
    }

    #[tokio::test]
    async fn test_find_covers_without_position_zero() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_media("m5", "v1", 2),
                    create_test_media("m4", "v1", 3),
                ]])
                .into_connection(),
        );

        let repo = VariantMediaRepository::new(Arc::clone(&db));
        let covers = repo.find_covers(&["v1".to_string()]).await.unwrap();
        assert_eq!(covers["v1"], "/files/v1/m5.jpg");

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("position"));
    }

    #[tokio::test]
    async fn test_next_position_after_existing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "max_position" => sea_orm::Value::Int(Some(2))
                }]])
                .into_connection(),
        );

        let repo = VariantMediaRepository::new(db);
        assert_eq!(repo.next_position("v1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_next_position_without_media() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "max_position" => sea_orm::Value::Int(None)
                }]])
                .into_connection(),
        );

        let repo = VariantMediaRepository::new(db);
        assert_eq!(repo.next_position("v1").await.unwrap(), 0);
    }
}
