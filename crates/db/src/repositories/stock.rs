//! Stock record repository.

use std::sync::Arc;

use crate::db_error;
use crate::entities::{StockRecord, stock_record};
use atelier_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::OnConflict,
};

/// Stock record repository for database operations.
#[derive(Clone)]
pub struct StockRepository {
    db: Arc<DatabaseConnection>,
}

impl StockRepository {
    /// Create a new stock repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the stock record of a variant.
    pub async fn find_by_variant(&self, variant_id: &str) -> AppResult<Option<stock_record::Model>> {
        StockRecord::find()
            .filter(stock_record::Column::VariantId.eq(variant_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Insert a stock record.
    pub async fn create(&self, model: stock_record::ActiveModel) -> AppResult<stock_record::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Insert or overwrite the counters of a variant in one statement.
    ///
    /// Last writer wins. Counters are stored as given.
    pub async fn upsert(&self, model: stock_record::ActiveModel) -> AppResult<()> {
        StockRecord::insert(model)
            .on_conflict(
                OnConflict::column(stock_record::Column::VariantId)
                    .update_columns([
                        stock_record::Column::Available,
                        stock_record::Column::Reserved,
                        stock_record::Column::ReorderPoint,
                        stock_record::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
