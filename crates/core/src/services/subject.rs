//! Subject service.

use atelier_common::{AppError, AppResult, IdGenerator};
use atelier_db::entities::subject;
use atelier_db::repositories::{CollectionRepository, SubjectRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a subject.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectInput {
    #[validate(length(min = 1, max = 32))]
    pub collection_id: String,
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[validate(length(max = 1024))]
    pub video_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Service for engagement-bearing subjects.
#[derive(Clone)]
pub struct SubjectService {
    subject_repo: SubjectRepository,
    collection_repo: CollectionRepository,
    id_gen: IdGenerator,
}

impl SubjectService {
    /// Create a new subject service.
    #[must_use]
    pub const fn new(subject_repo: SubjectRepository, collection_repo: CollectionRepository) -> Self {
        Self {
            subject_repo,
            collection_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a subject under an existing collection.
    pub async fn create(&self, input: CreateSubjectInput) -> AppResult<subject::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.collection_repo.get_by_id(&input.collection_id).await?;

        let model = subject::ActiveModel {
            id: Set(self.id_gen.generate()),
            collection_id: Set(input.collection_id),
            title: Set(input.title),
            description: Set(input.description),
            video_url: Set(input.video_url),
            is_active: Set(true),
            sort_order: Set(input.sort_order),
            created_at: Set(Utc::now().into()),
        };

        self.subject_repo.create(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use atelier_db::entities::collection;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn input(collection_id: &str, title: &str) -> CreateSubjectInput {
        CreateSubjectInput {
            collection_id: collection_id.to_string(),
            title: title.to_string(),
            description: None,
            video_url: Some("/files/spring.mp4".to_string()),
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_create_subject() {
        let collection = collection::Model {
            id: "c1".to_string(),
            type_id: "perfume".to_string(),
            name: "Oud".to_string(),
            name_ar: None,
            description: None,
            is_active: true,
            sort_order: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let created = subject::Model {
            id: "s1".to_string(),
            collection_id: "c1".to_string(),
            title: "Spring".to_string(),
            description: None,
            video_url: Some("/files/spring.mp4".to_string()),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now().into(),
        };

        let service = SubjectService::new(
            SubjectRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[created]])
                    .into_connection(),
            )),
            CollectionRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[collection]])
                    .into_connection(),
            )),
        );

        let subject = service.create(input("c1", "Spring")).await.unwrap();
        assert_eq!(subject.collection_id, "c1");
    }

    #[tokio::test]
    async fn test_create_subject_empty_title() {
        let service = SubjectService::new(
            SubjectRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
            CollectionRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        );

        let result = service.create(input("c1", "")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
