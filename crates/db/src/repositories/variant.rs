//! Variant repository.

use std::sync::Arc;

use crate::db_error;
use crate::entities::{Variant, collection, variant};
use atelier_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tracing::{debug, warn};

/// Rows that must be written together or not at all.
///
/// `collection` is `None` when variants are added to an existing collection.
#[derive(Debug, Default)]
pub struct AtomicUnit {
    /// New collection row, inserted first.
    pub collection: Option<collection::ActiveModel>,
    /// Mandatory variant rows.
    pub variants: Vec<variant::ActiveModel>,
}

/// Rows persisted by a committed [`AtomicUnit`].
#[derive(Debug, Clone)]
pub struct CommittedUnit {
    /// The inserted collection, if the unit carried one.
    pub collection: Option<collection::Model>,
    /// Inserted variants in input order.
    pub variants: Vec<variant::Model>,
}

/// Variant repository for database operations.
#[derive(Clone)]
pub struct VariantRepository {
    db: Arc<DatabaseConnection>,
}

impl VariantRepository {
    /// Create a new variant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a variant by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<variant::Model>> {
        Variant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Get a variant by ID, returning a not-found error when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<variant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Variant not found: {id}")))
    }

    /// List variants, optionally restricted to one collection.
    pub async fn find_all(&self, collection_id: Option<&str>) -> AppResult<Vec<variant::Model>> {
        let mut query = Variant::find();

        if let Some(cid) = collection_id {
            query = query.filter(variant::Column::CollectionId.eq(cid));
        }

        query
            .order_by_asc(variant::Column::SortOrder)
            .order_by_asc(variant::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Active variants of several collections, for feed assembly.
    pub async fn find_active_by_collections(
        &self,
        collection_ids: &[String],
    ) -> AppResult<Vec<variant::Model>> {
        if collection_ids.is_empty() {
            return Ok(vec![]);
        }

        Variant::find()
            .filter(variant::Column::CollectionId.is_in(collection_ids.to_vec()))
            .filter(variant::Column::IsActive.eq(true))
            .order_by_asc(variant::Column::SortOrder)
            .order_by_asc(variant::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Write an atomic unit inside one transaction.
    ///
    /// Any failing insert drops the transaction, which rolls back every row
    /// written so far, and surfaces as [`AppError::Transaction`].
    pub async fn commit_unit(&self, unit: AtomicUnit) -> AppResult<CommittedUnit> {
        let txn = self.db.begin().await.map_err(transaction_error)?;

        let collection = match unit.collection {
            Some(model) => Some(model.insert(&txn).await.map_err(transaction_error)?),
            None => None,
        };

        let mut variants = Vec::with_capacity(unit.variants.len());
        for (index, model) in unit.variants.into_iter().enumerate() {
            let created = model.insert(&txn).await.map_err(|e| {
                warn!(index, error = %e, "Variant insert failed, rolling back");
                transaction_error(e)
            })?;
            variants.push(created);
        }

        txn.commit().await.map_err(transaction_error)?;

        debug!(
            collection_id = collection.as_ref().map(|c| c.id.as_str()),
            variants = variants.len(),
            "Committed atomic unit"
        );

        Ok(CommittedUnit {
            collection,
            variants,
        })
    }
}

fn transaction_error(err: DbErr) -> AppError {
    AppError::Transaction(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, RuntimeErr, Set};

    fn create_test_collection(id: &str) -> collection::Model {
        collection::Model {
            id: id.to_string(),
            type_id: "melhaf".to_string(),
            name: "Azur".to_string(),
            name_ar: None,
            description: None,
            is_active: true,
            sort_order: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_variant(id: &str, collection_id: &str, name: &str) -> variant::Model {
        variant::Model {
            id: id.to_string(),
            collection_id: collection_id.to_string(),
            name: name.to_string(),
            name_ar: None,
            color_code: Some("#1E90FF".to_string()),
            price: Decimal::new(2500, 2),
            discount: None,
            code: "4006381333931".to_string(),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn to_active(model: &collection::Model) -> collection::ActiveModel {
        collection::ActiveModel {
            id: Set(model.id.clone()),
            type_id: Set(model.type_id.clone()),
            name: Set(model.name.clone()),
            name_ar: Set(model.name_ar.clone()),
            description: Set(model.description.clone()),
            is_active: Set(model.is_active),
            sort_order: Set(model.sort_order),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }

    fn variant_active(model: &variant::Model) -> variant::ActiveModel {
        variant::ActiveModel {
            id: Set(model.id.clone()),
            collection_id: Set(model.collection_id.clone()),
            name: Set(model.name.clone()),
            name_ar: Set(model.name_ar.clone()),
            color_code: Set(model.color_code.clone()),
            price: Set(model.price),
            discount: Set(model.discount),
            code: Set(model.code.clone()),
            is_active: Set(model.is_active),
            sort_order: Set(model.sort_order),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }

    #[tokio::test]
    async fn test_commit_unit_with_collection() {
        let collection = create_test_collection("c1");
        let sky = create_test_variant("v1", "c1", "Sky");
        let sea = create_test_variant("v2", "c1", "Sea");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[collection.clone()]])
                .append_query_results([[sky.clone()]])
                .append_query_results([[sea.clone()]])
                .into_connection(),
        );

        let repo = VariantRepository::new(db);
        let committed = repo
            .commit_unit(AtomicUnit {
                collection: Some(to_active(&collection)),
                variants: vec![variant_active(&sky), variant_active(&sea)],
            })
            .await
            .unwrap();

        assert_eq!(committed.collection.unwrap().id, "c1");
        assert_eq!(committed.variants.len(), 2);
        assert_eq!(committed.variants[1].name, "Sea");
    }

    #[tokio::test]
    async fn test_commit_unit_failure_on_second_variant() {
        let collection = create_test_collection("c1");
        let sky = create_test_variant("v1", "c1", "Sky");
        let sea = create_test_variant("v2", "c1", "Sea");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[collection.clone()]])
                .append_query_results([[sky.clone()]])
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "duplicate key value violates unique constraint".to_string(),
                ))])
                .into_connection(),
        );

        let repo = VariantRepository::new(db);
        let result = repo
            .commit_unit(AtomicUnit {
                collection: Some(to_active(&collection)),
                variants: vec![variant_active(&sky), variant_active(&sea)],
            })
            .await;

        assert!(matches!(result, Err(AppError::Transaction(_))));
    }

    #[tokio::test]
    async fn test_commit_unit_into_existing_collection() {
        let sky = create_test_variant("v1", "c1", "Sky");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[sky.clone()]])
                .into_connection(),
        );

        let repo = VariantRepository::new(db);
        let committed = repo
            .commit_unit(AtomicUnit {
                collection: None,
                variants: vec![variant_active(&sky)],
            })
            .await
            .unwrap();

        assert!(committed.collection.is_none());
        assert_eq!(committed.variants[0].id, "v1");
    }

    #[tokio::test]
    async fn test_find_active_by_collections_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = VariantRepository::new(db);
        assert!(repo.find_active_by_collections(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<variant::Model>::new()])
                .into_connection(),
        );

        let repo = VariantRepository::new(db);
        assert!(matches!(
            repo.get_by_id("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
