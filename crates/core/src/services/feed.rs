//! Feed assembly.
//!
//! A page is built with a fixed number of queries regardless of its size:
//! subjects, then variants of all their collections, media covers of all
//! those variants, grouped counts, and the viewer's own edges. Results are
//! joined in memory.

use std::collections::HashMap;

use atelier_common::AppResult;
use atelier_common::config::CatalogConfig;
use atelier_db::entities::{subject, variant};
use atelier_db::repositories::{
    EngagementRepository, SubjectRepository, VariantMediaRepository, VariantRepository,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engagement::Engagement;

/// Feed query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub collection_id: Option<String>,
    pub limit: Option<u64>,
}

/// A variant as shown inside a feed item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedVariant {
    pub id: String,
    pub name: String,
    pub name_ar: Option<String>,
    pub color_code: Option<String>,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub cover_url: Option<String>,
}

/// One subject with its collection's variants and engagement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub collection_id: String,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub variants: Vec<FeedVariant>,
    pub engagement: Engagement,
}

/// Service assembling the public subject feed.
#[derive(Clone)]
pub struct FeedService {
    subject_repo: SubjectRepository,
    variant_repo: VariantRepository,
    media_repo: VariantMediaRepository,
    engagement_repo: EngagementRepository,
    limits: CatalogConfig,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        subject_repo: SubjectRepository,
        variant_repo: VariantRepository,
        media_repo: VariantMediaRepository,
        engagement_repo: EngagementRepository,
        limits: CatalogConfig,
    ) -> Self {
        Self {
            subject_repo,
            variant_repo,
            media_repo,
            engagement_repo,
            limits,
        }
    }

    /// Page size actually used for a requested limit.
    #[must_use]
    pub fn effective_limit(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.limits.default_feed_limit)
            .clamp(1, self.limits.feed_limit_ceiling.max(1))
    }

    /// List active subjects with variants and engagement.
    pub async fn list_subjects(
        &self,
        query: FeedQuery,
        viewer_id: Option<&str>,
    ) -> AppResult<Vec<FeedItem>> {
        let limit = self.effective_limit(query.limit);
        let subjects = self
            .subject_repo
            .find_active(query.collection_id.as_deref(), limit)
            .await?;

        if subjects.is_empty() {
            return Ok(vec![]);
        }

        let subject_ids: Vec<String> = subjects.iter().map(|s| s.id.clone()).collect();
        let mut collection_ids: Vec<String> =
            subjects.iter().map(|s| s.collection_id.clone()).collect();
        collection_ids.sort_unstable();
        collection_ids.dedup();

        let variants = self
            .variant_repo
            .find_active_by_collections(&collection_ids)
            .await?;
        let variant_ids: Vec<String> = variants.iter().map(|v| v.id.clone()).collect();
        let mut covers = self.media_repo.find_covers(&variant_ids).await?;

        let mut variants_by_collection: HashMap<String, Vec<FeedVariant>> = HashMap::new();
        for v in variants {
            let cover_url = covers.remove(&v.id);
            variants_by_collection
                .entry(v.collection_id.clone())
                .or_default()
                .push(feed_variant(v, cover_url));
        }

        let mut counts = self.engagement_repo.counts_for(&subject_ids).await?;
        let (liked, mut symbols) = match viewer_id {
            Some(actor_id) => (
                self.engagement_repo
                    .liked_subjects(&subject_ids, actor_id)
                    .await?,
                self.engagement_repo
                    .actor_symbols_for(&subject_ids, actor_id)
                    .await?,
            ),
            None => Default::default(),
        };

        debug!(
            subjects = subjects.len(),
            collections = collection_ids.len(),
            limit,
            "Assembled feed"
        );

        Ok(subjects
            .into_iter()
            .map(|s| {
                let c = counts.remove(&s.id).unwrap_or_default();
                let engagement = Engagement {
                    like_count: c.like_count,
                    counts_by_symbol: c.counts_by_symbol,
                    viewer_liked: liked.contains(&s.id),
                    viewer_symbols: symbols.remove(&s.id).unwrap_or_default(),
                };
                let variants = variants_by_collection
                    .get(&s.collection_id)
                    .cloned()
                    .unwrap_or_default();
                feed_item(s, variants, engagement)
            })
            .collect())
    }
}

fn feed_variant(v: variant::Model, cover_url: Option<String>) -> FeedVariant {
    FeedVariant {
        id: v.id,
        name: v.name,
        name_ar: v.name_ar,
        color_code: v.color_code,
        price: v.price,
        discount: v.discount,
        cover_url,
    }
}

fn feed_item(s: subject::Model, variants: Vec<FeedVariant>, engagement: Engagement) -> FeedItem {
    FeedItem {
        id: s.id,
        collection_id: s.collection_id,
        title: s.title,
        description: s.description,
        video_url: s.video_url,
        created_at: s.created_at,
        variants,
        engagement,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_db::entities::{subject_like, subject_reaction, variant_media};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
    use std::sync::Arc;

    fn create_test_subject(id: &str, collection_id: &str) -> subject::Model {
        subject::Model {
            id: id.to_string(),
            collection_id: collection_id.to_string(),
            title: format!("Subject {id}"),
            description: None,
            video_url: None,
            is_active: true,
            sort_order: 0,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_variant(id: &str, collection_id: &str) -> variant::Model {
        variant::Model {
            id: id.to_string(),
            collection_id: collection_id.to_string(),
            name: format!("Variant {id}"),
            name_ar: None,
            color_code: Some("#000000".to_string()),
            price: Decimal::new(1999, 2),
            discount: None,
            code: "4006381333931".to_string(),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_media(variant_id: &str, position: i32) -> variant_media::Model {
        variant_media::Model {
            id: format!("m_{variant_id}_{position}"),
            variant_id: variant_id.to_string(),
            url: format!("/files/{variant_id}/{position}.jpg"),
            position,
            created_at: Utc::now().into(),
        }
    }

    struct Mocks {
        subjects: MockDatabase,
        variants: MockDatabase,
        media: MockDatabase,
        engagement: MockDatabase,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                subjects: MockDatabase::new(DatabaseBackend::Postgres),
                variants: MockDatabase::new(DatabaseBackend::Postgres),
                media: MockDatabase::new(DatabaseBackend::Postgres),
                engagement: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn into_service(self, limits: CatalogConfig) -> (FeedService, Arc<DatabaseConnection>) {
            let subjects = Arc::new(self.subjects.into_connection());
            let service = FeedService::new(
                SubjectRepository::new(Arc::clone(&subjects)),
                VariantRepository::new(Arc::new(self.variants.into_connection())),
                VariantMediaRepository::new(Arc::new(self.media.into_connection())),
                EngagementRepository::new(Arc::new(self.engagement.into_connection())),
                limits,
            );
            (service, subjects)
        }
    }

    #[test]
    fn test_effective_limit() {
        let (service, _) = Mocks::new().into_service(CatalogConfig::default());

        assert_eq!(service.effective_limit(None), 20);
        assert_eq!(service.effective_limit(Some(10)), 10);
        assert_eq!(service.effective_limit(Some(1000)), 50);
        assert_eq!(service.effective_limit(Some(0)), 1);
    }

    #[tokio::test]
    async fn test_limit_is_clamped_to_ceiling() {
        let mut mocks = Mocks::new();
        mocks.subjects = mocks
            .subjects
            .append_query_results([Vec::<subject::Model>::new()]);
        let (service, subjects) = mocks.into_service(CatalogConfig::default());

        let items = service
            .list_subjects(
                FeedQuery {
                    collection_id: None,
                    limit: Some(1000),
                },
                None,
            )
            .await
            .unwrap();
        assert!(items.is_empty());

        drop(service);
        let log = Arc::try_unwrap(subjects).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("LIMIT"), "{sql}");
        assert!(sql.contains("BigUnsigned(Some(50))"), "{sql}");
    }

    #[tokio::test]
    async fn test_list_subjects_groups_in_memory() {
        let mut mocks = Mocks::new();
        mocks.subjects = mocks.subjects.append_query_results([[
            create_test_subject("s1", "c1"),
            create_test_subject("s2", "c2"),
            create_test_subject("s3", "c1"),
        ]]);
        mocks.variants = mocks.variants.append_query_results([[
            create_test_variant("v1", "c1"),
            create_test_variant("v2", "c1"),
            create_test_variant("v3", "c2"),
        ]]);
        mocks.media = mocks.media.append_query_results([[
            create_test_media("v1", 0),
            create_test_media("v1", 1),
            create_test_media("v3", 0),
        ]]);
        mocks.engagement = mocks
            .engagement
            .append_query_results([[maplit::btreemap! {
                "subject_id" => Value::from("s1"),
                "count" => Value::BigInt(Some(2)),
            }]])
            .append_query_results([[maplit::btreemap! {
                "subject_id" => Value::from("s2"),
                "symbol" => Value::from("🔥"),
                "count" => Value::BigInt(Some(1)),
            }]])
            .append_query_results([[subject_like::Model {
                id: "l1".to_string(),
                subject_id: "s1".to_string(),
                actor_id: "a1".to_string(),
                created_at: Utc::now().into(),
            }]])
            .append_query_results([[subject_reaction::Model {
                id: "r1".to_string(),
                subject_id: "s2".to_string(),
                actor_id: "a1".to_string(),
                symbol: "🔥".to_string(),
                created_at: Utc::now().into(),
            }]]);
        let (service, _) = mocks.into_service(CatalogConfig::default());

        let items = service
            .list_subjects(FeedQuery::default(), Some("a1"))
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "s1");
        assert_eq!(items[0].variants.len(), 2);
        assert_eq!(
            items[0].variants[0].cover_url.as_deref(),
            Some("/files/v1/0.jpg")
        );
        assert!(items[0].variants[1].cover_url.is_none());
        assert_eq!(items[0].engagement.like_count, 2);
        assert!(items[0].engagement.viewer_liked);

        assert_eq!(items[1].variants.len(), 1);
        assert_eq!(items[1].engagement.counts_by_symbol["🔥"], 1);
        assert_eq!(items[1].engagement.viewer_symbols, vec!["🔥"]);
        assert!(!items[1].engagement.viewer_liked);

        // Subjects sharing a collection share its variants.
        assert_eq!(items[2].variants.len(), 2);
        assert_eq!(items[2].engagement, Engagement::default());
    }

    #[tokio::test]
    async fn test_anonymous_feed_skips_viewer_queries() {
        let mut mocks = Mocks::new();
        mocks.subjects = mocks
            .subjects
            .append_query_results([[create_test_subject("s1", "c1")]]);
        mocks.variants = mocks
            .variants
            .append_query_results([Vec::<variant::Model>::new()]);
        mocks.engagement = mocks
            .engagement
            .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
            .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()]);
        let (service, _) = mocks.into_service(CatalogConfig::default());

        let items = service
            .list_subjects(FeedQuery::default(), None)
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert!(items[0].variants.is_empty());
        assert!(!items[0].engagement.viewer_liked);
        assert!(items[0].engagement.viewer_symbols.is_empty());
    }
}
