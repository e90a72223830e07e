//! Variant provisioning service.
//!
//! Creating a collection is split into an [`AtomicUnit`] (the collection row
//! and every variant row, written in one transaction) and a list of
//! [`SideWrite`]s (stock records and media rows) applied one by one after the
//! commit. A failed side write is logged as a dependency error and skipped;
//! the operation still succeeds.

use std::sync::Arc;

use atelier_common::{
    AppError, AppResult, IdGenerator, MediaStore, generate_media_key, product_code,
};
use atelier_db::entities::{collection, stock_record, variant, variant_media};
use atelier_db::repositories::{
    AtomicUnit, CatalogTypeRepository, CollectionRepository, CommittedUnit, StockRepository,
    VariantMediaRepository, VariantRepository,
};
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Stock counters. Also used as the optional stock block of a variant input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevels {
    #[serde(default)]
    pub available: i32,
    #[serde(default)]
    pub reserved: i32,
    #[serde(default)]
    pub reorder_point: i32,
}

impl From<&stock_record::Model> for StockLevels {
    fn from(record: &stock_record::Model) -> Self {
        Self {
            available: record.available,
            reserved: record.reserved,
            reorder_point: record.reorder_point,
        }
    }
}

/// Input for one variant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(max = 256))]
    pub name_ar: Option<String>,
    #[validate(length(max = 32))]
    pub color_code: Option<String>,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub sort_order: i32,
    /// Initial counters; all zero when omitted.
    pub stock: Option<StockLevels>,
    #[serde(default)]
    #[validate(length(max = 16))]
    pub media_urls: Vec<String>,
}

/// Input for creating a collection together with its variants.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionInput {
    #[validate(length(min = 1, max = 32))]
    pub type_id: String,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(max = 256))]
    pub name_ar: Option<String>,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[validate(length(min = 1, max = 100), nested)]
    pub variants: Vec<VariantInput>,
}

/// Input for adding a variant to an existing collection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantInput {
    #[validate(length(min = 1, max = 32))]
    pub collection_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub variant: VariantInput,
}

/// Input for overwriting stock counters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockInput {
    pub variant_id: String,
    #[serde(flatten)]
    pub levels: StockLevels,
}

/// A variant as reported back by the create operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVariant {
    pub id: String,
    pub name: String,
    pub code: String,
}

impl From<&variant::Model> for CreatedVariant {
    fn from(model: &variant::Model) -> Self {
        Self {
            id: model.id.clone(),
            name: model.name.clone(),
            code: model.code.clone(),
        }
    }
}

/// Result of creating a collection with its variants.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCollection {
    pub collection_id: String,
    pub variants: Vec<CreatedVariant>,
}

/// A variant with its stock counters and ordered media URLs.
#[derive(Debug, Clone)]
pub struct VariantDetail {
    pub variant: variant::Model,
    pub stock: StockLevels,
    pub media: Vec<String>,
}

/// A best-effort write applied after the atomic unit commits.
#[derive(Debug)]
pub enum SideWrite {
    Stock {
        variant_id: String,
        record: stock_record::ActiveModel,
    },
    Media {
        variant_id: String,
        row: variant_media::ActiveModel,
    },
}

impl SideWrite {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Stock { .. } => "stock",
            Self::Media { .. } => "media",
        }
    }

    fn variant_id(&self) -> &str {
        match self {
            Self::Stock { variant_id, .. } | Self::Media { variant_id, .. } => variant_id,
        }
    }
}

/// Everything a provisioning call will write.
#[derive(Debug)]
pub struct ProvisioningPlan {
    pub unit: AtomicUnit,
    pub side_writes: Vec<SideWrite>,
}

/// What a provisioning call actually wrote.
#[derive(Debug)]
pub struct ProvisionOutcome {
    pub committed: CommittedUnit,
    /// Side writes that failed and were skipped.
    pub skipped: usize,
}

/// Service for provisioning collections, variants and their stock.
#[derive(Clone)]
pub struct VariantService {
    catalog_type_repo: CatalogTypeRepository,
    collection_repo: CollectionRepository,
    variant_repo: VariantRepository,
    stock_repo: StockRepository,
    media_repo: VariantMediaRepository,
    media_store: Arc<dyn MediaStore>,
    id_gen: IdGenerator,
}

impl VariantService {
    /// Create a new variant service.
    #[must_use]
    pub fn new(
        catalog_type_repo: CatalogTypeRepository,
        collection_repo: CollectionRepository,
        variant_repo: VariantRepository,
        stock_repo: StockRepository,
        media_repo: VariantMediaRepository,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            catalog_type_repo,
            collection_repo,
            variant_repo,
            stock_repo,
            media_repo,
            media_store,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a collection and all of its variants.
    ///
    /// The collection and variant rows are all-or-nothing. Stock records and
    /// media rows are side writes.
    pub async fn create_collection_with_variants(
        &self,
        input: CreateCollectionInput,
    ) -> AppResult<CreatedCollection> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        for variant in &input.variants {
            validate_pricing(variant)?;
        }

        if !self.catalog_type_repo.exists(&input.type_id).await? {
            return Err(AppError::NotFound(format!(
                "Catalog type not found: {}",
                input.type_id
            )));
        }

        let plan = self.plan_collection(input);
        let outcome = self.execute(plan).await?;

        let collection_id = outcome
            .committed
            .collection
            .as_ref()
            .map(|c| c.id.clone())
            .ok_or_else(|| AppError::Internal("Committed unit lost its collection".to_string()))?;

        info!(
            collection_id = %collection_id,
            variants = outcome.committed.variants.len(),
            skipped_side_writes = outcome.skipped,
            "Created collection"
        );

        Ok(CreatedCollection {
            collection_id,
            variants: outcome.committed.variants.iter().map(CreatedVariant::from).collect(),
        })
    }

    /// Add one variant to an existing collection.
    pub async fn create_variant(&self, input: CreateVariantInput) -> AppResult<CreatedVariant> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_pricing(&input.variant)?;

        let collection = self.collection_repo.get_by_id(&input.collection_id).await?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let mut side_writes = Vec::new();
        let row = self.plan_variant(
            &collection.id,
            &collection.name,
            input.variant,
            now,
            &mut side_writes,
        );

        let outcome = self
            .execute(ProvisioningPlan {
                unit: AtomicUnit {
                    collection: None,
                    variants: vec![row],
                },
                side_writes,
            })
            .await?;

        outcome
            .committed
            .variants
            .first()
            .map(CreatedVariant::from)
            .ok_or_else(|| AppError::Internal("Committed unit lost its variant".to_string()))
    }

    /// Overwrite the stock counters of a variant, creating the record if it
    /// is missing. Counters are not range checked.
    pub async fn update_stock(&self, input: UpdateStockInput) -> AppResult<StockLevels> {
        self.variant_repo.get_by_id(&input.variant_id).await?;

        let record = self.stock_row(&input.variant_id, input.levels, Utc::now().into());
        self.stock_repo.upsert(record).await?;

        Ok(input.levels)
    }

    /// List variants, optionally for one collection.
    pub async fn list_variants(
        &self,
        collection_id: Option<&str>,
    ) -> AppResult<Vec<variant::Model>> {
        self.variant_repo.find_all(collection_id).await
    }

    /// Get a variant with its stock and media.
    pub async fn get_variant(&self, id: &str) -> AppResult<VariantDetail> {
        let variant = self.variant_repo.get_by_id(id).await?;

        let stock = self
            .stock_repo
            .find_by_variant(id)
            .await?
            .as_ref()
            .map(StockLevels::from)
            .unwrap_or_default();

        let media = self
            .media_repo
            .find_by_variant(id)
            .await?
            .into_iter()
            .map(|m| m.url)
            .collect();

        Ok(VariantDetail {
            variant,
            stock,
            media,
        })
    }

    /// Upload a file through the media store and append it to the variant.
    pub async fn attach_media(
        &self,
        variant_id: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<variant_media::Model> {
        self.variant_repo.get_by_id(variant_id).await?;

        let key = generate_media_key(variant_id, file_name);
        let stored = self.media_store.put(&key, data, content_type).await?;
        let position = self.media_repo.next_position(variant_id).await?;

        let row = variant_media::ActiveModel {
            id: Set(self.id_gen.generate()),
            variant_id: Set(variant_id.to_string()),
            url: Set(stored.url),
            position: Set(position),
            created_at: Set(Utc::now().into()),
        };

        match self.media_repo.create(row).await {
            Ok(media) => Ok(media),
            Err(e) => {
                if let Err(cleanup) = self.media_store.remove(&stored.key).await {
                    warn!(key = %stored.key, error = %cleanup, "Failed to remove orphaned media");
                }
                Err(e)
            }
        }
    }

    /// Activate or deactivate a collection.
    pub async fn set_collection_active(
        &self,
        collection_id: &str,
        is_active: bool,
    ) -> AppResult<collection::Model> {
        self.collection_repo.set_active(collection_id, is_active).await
    }

    /// Build the rows for a new collection. No I/O.
    #[must_use]
    pub fn plan_collection(&self, input: CreateCollectionInput) -> ProvisioningPlan {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let collection_id = self.id_gen.generate();

        let mut side_writes = Vec::new();
        let variants = input
            .variants
            .into_iter()
            .map(|v| self.plan_variant(&collection_id, &input.name, v, now, &mut side_writes))
            .collect();

        let collection = collection::ActiveModel {
            id: Set(collection_id),
            type_id: Set(input.type_id),
            name: Set(input.name),
            name_ar: Set(input.name_ar),
            description: Set(input.description),
            is_active: Set(true),
            sort_order: Set(input.sort_order),
            created_at: Set(now),
            updated_at: Set(None),
        };

        ProvisioningPlan {
            unit: AtomicUnit {
                collection: Some(collection),
                variants,
            },
            side_writes,
        }
    }

    fn plan_variant(
        &self,
        collection_id: &str,
        collection_name: &str,
        input: VariantInput,
        now: DateTime<FixedOffset>,
        side_writes: &mut Vec<SideWrite>,
    ) -> variant::ActiveModel {
        let variant_id = self.id_gen.generate();
        let code = product_code::generate(collection_name, &input.name);

        side_writes.push(SideWrite::Stock {
            variant_id: variant_id.clone(),
            record: self.stock_row(&variant_id, input.stock.unwrap_or_default(), now),
        });

        for (position, url) in input.media_urls.into_iter().enumerate() {
            side_writes.push(SideWrite::Media {
                variant_id: variant_id.clone(),
                row: variant_media::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    variant_id: Set(variant_id.clone()),
                    url: Set(url),
                    position: Set(position as i32),
                    created_at: Set(now),
                },
            });
        }

        variant::ActiveModel {
            id: Set(variant_id),
            collection_id: Set(collection_id.to_string()),
            name: Set(input.name),
            name_ar: Set(input.name_ar),
            color_code: Set(input.color_code),
            price: Set(input.price),
            discount: Set(input.discount),
            code: Set(code),
            is_active: Set(true),
            sort_order: Set(input.sort_order),
            created_at: Set(now),
            updated_at: Set(None),
        }
    }

    fn stock_row(
        &self,
        variant_id: &str,
        levels: StockLevels,
        now: DateTime<FixedOffset>,
    ) -> stock_record::ActiveModel {
        stock_record::ActiveModel {
            id: Set(self.id_gen.generate()),
            variant_id: Set(variant_id.to_string()),
            available: Set(levels.available),
            reserved: Set(levels.reserved),
            reorder_point: Set(levels.reorder_point),
            updated_at: Set(now),
        }
    }

    /// Commit the atomic unit, then apply each side write independently.
    pub async fn execute(&self, plan: ProvisioningPlan) -> AppResult<ProvisionOutcome> {
        let committed = self.variant_repo.commit_unit(plan.unit).await?;

        let mut skipped = 0;
        for write in plan.side_writes {
            let kind = write.kind();
            let variant_id = write.variant_id().to_string();

            if let Err(e) = self.apply_side_write(write).await {
                skipped += 1;
                warn!(
                    code = e.error_code(),
                    kind,
                    variant_id = %variant_id,
                    error = %e,
                    "Side write failed, skipping"
                );
            }
        }

        Ok(ProvisionOutcome { committed, skipped })
    }

    async fn apply_side_write(&self, write: SideWrite) -> AppResult<()> {
        let result = match write {
            SideWrite::Stock { record, .. } => self.stock_repo.create(record).await.map(|_| ()),
            SideWrite::Media { row, .. } => self.media_repo.create(row).await.map(|_| ()),
        };
        result.map_err(|e| AppError::Dependency(e.to_string()))
    }
}

fn validate_pricing(variant: &VariantInput) -> AppResult<()> {
    if variant.price <= Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "Price of variant '{}' must be positive",
            variant.name
        )));
    }

    if let Some(discount) = variant.discount {
        if discount < Decimal::ZERO || discount > variant.price {
            return Err(AppError::Validation(format!(
                "Discount of variant '{}' must be between 0 and the price",
                variant.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_common::StoredMedia;
    use sea_orm::{
        ActiveValue, DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, RuntimeErr,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        keys: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl MediaStore for MemoryStore {
        async fn put(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredMedia> {
            self.keys.lock().unwrap().push(key.to_string());
            Ok(StoredMedia {
                key: key.to_string(),
                url: self.public_url(key),
                size: data.len() as u64,
                content_type: content_type.to_string(),
            })
        }

        async fn remove(&self, key: &str) -> AppResult<()> {
            self.keys.lock().unwrap().retain(|k| k != key);
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("mem://{key}")
        }
    }

    struct Mocks {
        types: MockDatabase,
        collections: MockDatabase,
        variants: MockDatabase,
        stock: MockDatabase,
        media: MockDatabase,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                types: MockDatabase::new(DatabaseBackend::Postgres),
                collections: MockDatabase::new(DatabaseBackend::Postgres),
                variants: MockDatabase::new(DatabaseBackend::Postgres),
                stock: MockDatabase::new(DatabaseBackend::Postgres),
                media: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn type_exists(mut self, exists: bool) -> Self {
            self.types = self.types.append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(i64::from(exists)))
            }]]);
            self
        }

        fn into_service(self) -> (VariantService, Arc<DatabaseConnection>) {
            let stock_conn = Arc::new(self.stock.into_connection());
            let service = VariantService::new(
                CatalogTypeRepository::new(Arc::new(self.types.into_connection())),
                CollectionRepository::new(Arc::new(self.collections.into_connection())),
                VariantRepository::new(Arc::new(self.variants.into_connection())),
                StockRepository::new(Arc::clone(&stock_conn)),
                VariantMediaRepository::new(Arc::new(self.media.into_connection())),
                Arc::new(MemoryStore::default()),
            );
            (service, stock_conn)
        }
    }

    fn create_test_collection(id: &str, name: &str) -> collection::Model {
        collection::Model {
            id: id.to_string(),
            type_id: "melhaf".to_string(),
            name: name.to_string(),
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
            color_code: None,
            price: Decimal::new(2500, 2),
            discount: None,
            code: product_code::generate("Azur", name),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_stock(variant_id: &str) -> stock_record::Model {
        stock_record::Model {
            id: format!("stock_{variant_id}"),
            variant_id: variant_id.to_string(),
            available: 0,
            reserved: 0,
            reorder_point: 0,
            updated_at: Utc::now().into(),
        }
    }

    fn variant_input(name: &str, price: Decimal) -> VariantInput {
        VariantInput {
            name: name.to_string(),
            name_ar: None,
            color_code: None,
            price,
            discount: None,
            sort_order: 0,
            stock: None,
            media_urls: vec![],
        }
    }

    fn azur_input(variants: Vec<VariantInput>) -> CreateCollectionInput {
        CreateCollectionInput {
            type_id: "melhaf".to_string(),
            name: "Azur".to_string(),
            name_ar: None,
            description: None,
            sort_order: 0,
            variants,
        }
    }

    fn query_error() -> DbErr {
        DbErr::Query(RuntimeErr::Internal("insert failed".to_string()))
    }

    #[test]
    fn test_plan_collection_defaults_stock_to_zero() {
        let (service, _) = Mocks::new().into_service();
        let plan = service.plan_collection(azur_input(vec![variant_input(
            "Sky",
            Decimal::new(2500, 2),
        )]));

        let collection = plan.unit.collection.unwrap();
        assert_eq!(plan.unit.variants.len(), 1);

        let variant = &plan.unit.variants[0];
        assert_eq!(variant.collection_id, collection.id);
        let code = variant.code.clone().unwrap();
        assert_eq!(code.len(), 13);
        assert!(product_code::is_valid(&code));

        assert_eq!(plan.side_writes.len(), 1);
        match &plan.side_writes[0] {
            SideWrite::Stock { record, .. } => {
                assert_eq!(record.available, ActiveValue::Set(0));
                assert_eq!(record.reserved, ActiveValue::Set(0));
                assert_eq!(record.reorder_point, ActiveValue::Set(0));
                assert_eq!(record.variant_id, variant.id);
            }
            SideWrite::Media { .. } => panic!("expected a stock side write"),
        }
    }

    #[test]
    fn test_plan_collection_media_positions() {
        let (service, _) = Mocks::new().into_service();
        let mut sky = variant_input("Sky", Decimal::new(2500, 2));
        sky.stock = Some(StockLevels {
            available: 7,
            reserved: 1,
            reorder_point: 2,
        });
        sky.media_urls = vec!["/a.jpg".to_string(), "/b.jpg".to_string()];

        let plan = service.plan_collection(azur_input(vec![sky]));
        let positions: Vec<_> = plan
            .side_writes
            .iter()
            .filter_map(|w| match w {
                SideWrite::Media { row, .. } => Some(row.position.clone().unwrap()),
                SideWrite::Stock { record, .. } => {
                    assert_eq!(record.available, ActiveValue::Set(7));
                    None
                }
            })
            .collect();

        assert_eq!(positions, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_create_azur_sky() {
        let mut mocks = Mocks::new().type_exists(true);
        mocks.variants = mocks
            .variants
            .append_query_results([[create_test_collection("c1", "Azur")]])
            .append_query_results([[create_test_variant("v1", "c1", "Sky")]]);
        mocks.stock = mocks
            .stock
            .append_query_results([[create_test_stock("v1")]]);
        let (service, _) = mocks.into_service();

        let created = service
            .create_collection_with_variants(azur_input(vec![variant_input(
                "Sky",
                Decimal::new(2500, 2),
            )]))
            .await
            .unwrap();

        assert_eq!(created.collection_id, "c1");
        assert_eq!(created.variants.len(), 1);
        assert_eq!(created.variants[0].id, "v1");
        assert!(product_code::is_valid(&created.variants[0].code));
    }

    #[tokio::test]
    async fn test_stock_failure_does_not_fail_creation() {
        let mut mocks = Mocks::new().type_exists(true);
        mocks.variants = mocks
            .variants
            .append_query_results([[create_test_collection("c1", "Azur")]])
            .append_query_results([[create_test_variant("v1", "c1", "Sky")]]);
        mocks.stock = mocks.stock.append_query_errors([query_error()]);
        let (service, _) = mocks.into_service();

        let created = service
            .create_collection_with_variants(azur_input(vec![variant_input(
                "Sky",
                Decimal::new(2500, 2),
            )]))
            .await
            .unwrap();

        assert_eq!(created.variants.len(), 1);
    }

    #[tokio::test]
    async fn test_variant_failure_writes_no_stock() {
        let mut mocks = Mocks::new().type_exists(true);
        mocks.variants = mocks
            .variants
            .append_query_results([[create_test_collection("c1", "Azur")]])
            .append_query_results([[create_test_variant("v1", "c1", "Sky")]])
            .append_query_errors([query_error()]);
        let (service, stock_conn) = mocks.into_service();

        let result = service
            .create_collection_with_variants(azur_input(vec![
                variant_input("Sky", Decimal::new(2500, 2)),
                variant_input("Sea", Decimal::new(3000, 2)),
            ]))
            .await;

        assert!(matches!(result, Err(AppError::Transaction(_))));

        drop(service);
        let log = Arc::try_unwrap(stock_conn).unwrap().into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_variants() {
        let (service, _) = Mocks::new().into_service();

        let result = service
            .create_collection_with_variants(azur_input(vec![]))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_price() {
        let (service, _) = Mocks::new().into_service();

        let result = service
            .create_collection_with_variants(azur_input(vec![
                variant_input("Sky", Decimal::new(2500, 2)),
                variant_input("Free", Decimal::ZERO),
            ]))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_discount_above_price() {
        let (service, _) = Mocks::new().into_service();
        let mut sky = variant_input("Sky", Decimal::new(2500, 2));
        sky.discount = Some(Decimal::new(3000, 2));

        let result = service
            .create_collection_with_variants(azur_input(vec![sky]))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_type() {
        let (service, _) = Mocks::new().type_exists(false).into_service();

        let result = service
            .create_collection_with_variants(azur_input(vec![variant_input(
                "Sky",
                Decimal::new(2500, 2),
            )]))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_variant_unknown_collection() {
        let mut mocks = Mocks::new();
        mocks.collections = mocks
            .collections
            .append_query_results([Vec::<collection::Model>::new()]);
        let (service, _) = mocks.into_service();

        let result = service
            .create_variant(CreateVariantInput {
                collection_id: "missing".to_string(),
                variant: variant_input("Sky", Decimal::new(2500, 2)),
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_variant_into_existing_collection() {
        let mut mocks = Mocks::new();
        mocks.collections = mocks
            .collections
            .append_query_results([[create_test_collection("c1", "Azur")]]);
        mocks.variants = mocks
            .variants
            .append_query_results([[create_test_variant("v9", "c1", "Dune")]]);
        mocks.stock = mocks
            .stock
            .append_query_results([[create_test_stock("v9")]]);
        let (service, _) = mocks.into_service();

        let created = service
            .create_variant(CreateVariantInput {
                collection_id: "c1".to_string(),
                variant: variant_input("Dune", Decimal::new(4200, 2)),
            })
            .await
            .unwrap();

        assert_eq!(created.id, "v9");
        assert_eq!(created.name, "Dune");
    }

    #[tokio::test]
    async fn test_get_variant_without_stock_reads_zero() {
        let mut mocks = Mocks::new();
        mocks.variants = mocks
            .variants
            .append_query_results([[create_test_variant("v1", "c1", "Sky")]]);
        mocks.stock = mocks
            .stock
            .append_query_results([Vec::<stock_record::Model>::new()]);
        mocks.media = mocks
            .media
            .append_query_results([Vec::<variant_media::Model>::new()]);
        let (service, _) = mocks.into_service();

        let detail = service.get_variant("v1").await.unwrap();

        assert_eq!(detail.variant.id, "v1");
        assert_eq!(detail.stock, StockLevels::default());
        assert!(detail.media.is_empty());
    }

    #[tokio::test]
    async fn test_update_stock_unknown_variant() {
        let mut mocks = Mocks::new();
        mocks.variants = mocks
            .variants
            .append_query_results([Vec::<variant::Model>::new()]);
        let (service, stock_conn) = mocks.into_service();

        let result = service
            .update_stock(UpdateStockInput {
                variant_id: "missing".to_string(),
                levels: StockLevels::default(),
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));

        drop(service);
        assert!(Arc::try_unwrap(stock_conn).unwrap().into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_update_stock_last_writer_wins() {
        // Two sequential admins overwrite each other; no version check exists.
        let exec = || sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };
        let mut mocks = Mocks::new();
        mocks.variants = mocks.variants.append_query_results([
            [create_test_variant("v1", "c1", "Sky")],
            [create_test_variant("v1", "c1", "Sky")],
        ]);
        mocks.stock = mocks.stock.append_exec_results([exec(), exec()]);
        let (service, _) = mocks.into_service();

        for available in [10, 3] {
            let levels = service
                .update_stock(UpdateStockInput {
                    variant_id: "v1".to_string(),
                    levels: StockLevels {
                        available,
                        reserved: 0,
                        reorder_point: 0,
                    },
                })
                .await
                .unwrap();
            assert_eq!(levels.available, available);
        }
    }

    #[tokio::test]
    async fn test_attach_media_appends_at_next_position() {
        let mut mocks = Mocks::new();
        mocks.variants = mocks
            .variants
            .append_query_results([[create_test_variant("v1", "c1", "Sky")]]);
        mocks.media = mocks
            .media
            .append_query_results([[maplit::btreemap! {
                "max_position" => sea_orm::Value::Int(Some(0))
            }]])
            .append_query_results([[variant_media::Model {
                id: "m2".to_string(),
                variant_id: "v1".to_string(),
                url: "mem://photo.jpg".to_string(),
                position: 1,
                created_at: Utc::now().into(),
            }]]);
        let (service, _) = mocks.into_service();

        let media = service
            .attach_media("v1", "photo.jpg", "image/jpeg", b"jpeg")
            .await
            .unwrap();

        assert_eq!(media.position, 1);
    }
}
