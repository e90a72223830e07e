//! Collection endpoints.

use atelier_common::AppResult;
use atelier_core::{CreateCollectionInput, CreatedCollection};
use atelier_db::entities::collection;
use axum::{Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthActor, ValidJson},
    middleware::AppState,
    response::ApiResponse,
};

/// Collection response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    pub id: String,
    pub type_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<collection::Model> for CollectionResponse {
    fn from(c: collection::Model) -> Self {
        Self {
            id: c.id,
            type_id: c.type_id,
            name: c.name,
            name_ar: c.name_ar,
            description: c.description,
            is_active: c.is_active,
            sort_order: c.sort_order,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create a collection together with its initial variants.
async fn create(
    AuthActor(actor_id): AuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateCollectionInput>,
) -> AppResult<ApiResponse<CreatedCollection>> {
    tracing::debug!(actor_id = %actor_id, name = %req.name, "Creating collection");
    let created = state
        .variant_service
        .create_collection_with_variants(req)
        .await?;
    Ok(ApiResponse::ok(created))
}

/// Set-active request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub collection_id: String,
    pub is_active: bool,
}

/// Activate or deactivate a collection.
async fn set_active(
    AuthActor(_actor_id): AuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SetActiveRequest>,
) -> AppResult<ApiResponse<CollectionResponse>> {
    let collection = state
        .variant_service
        .set_collection_active(&req.collection_id, req.is_active)
        .await?;
    Ok(ApiResponse::ok(collection.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/set-active", post(set_active))
}
