//! Variant endpoints.

use atelier_common::{AppError, AppResult};
use atelier_core::{CreateVariantInput, CreatedVariant, StockLevels, UpdateStockInput, VariantDetail};
use atelier_db::entities::{variant, variant_media};
use axum::{
    Router,
    extract::{Multipart, State},
    routing::post,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthActor, ValidJson},
    middleware::AppState,
    response::ApiResponse,
};

/// Variant response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantResponse {
    pub id: String,
    pub collection_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    pub code: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: String,
}

impl From<variant::Model> for VariantResponse {
    fn from(v: variant::Model) -> Self {
        Self {
            id: v.id,
            collection_id: v.collection_id,
            name: v.name,
            name_ar: v.name_ar,
            color_code: v.color_code,
            price: v.price,
            discount: v.discount,
            code: v.code,
            is_active: v.is_active,
            sort_order: v.sort_order,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

/// Variant with stock counters and media URLs.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDetailResponse {
    #[serde(flatten)]
    pub variant: VariantResponse,
    pub stock: StockLevels,
    pub media: Vec<String>,
}

impl From<VariantDetail> for VariantDetailResponse {
    fn from(detail: VariantDetail) -> Self {
        Self {
            variant: detail.variant.into(),
            stock: detail.stock,
            media: detail.media,
        }
    }
}

/// Stored media response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: String,
    pub variant_id: String,
    pub url: String,
    pub position: i32,
}

impl From<variant_media::Model> for MediaResponse {
    fn from(m: variant_media::Model) -> Self {
        Self {
            id: m.id,
            variant_id: m.variant_id,
            url: m.url,
            position: m.position,
        }
    }
}

/// Create a variant under an existing collection.
async fn create(
    AuthActor(_actor_id): AuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateVariantInput>,
) -> AppResult<ApiResponse<CreatedVariant>> {
    let created = state.variant_service.create_variant(req).await?;
    Ok(ApiResponse::ok(created))
}

/// Show variant request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowVariantRequest {
    pub variant_id: String,
}

/// Get a variant with its stock and media.
async fn show(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ShowVariantRequest>,
) -> AppResult<ApiResponse<VariantDetailResponse>> {
    let detail = state.variant_service.get_variant(&req.variant_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// List variants request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVariantsRequest {
    pub collection_id: Option<String>,
}

/// List variants, optionally for one collection.
async fn list(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ListVariantsRequest>,
) -> AppResult<ApiResponse<Vec<VariantResponse>>> {
    let variants = state
        .variant_service
        .list_variants(req.collection_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(
        variants.into_iter().map(VariantResponse::from).collect(),
    ))
}

/// Overwrite the stock counters of a variant.
async fn update_stock(
    AuthActor(_actor_id): AuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<UpdateStockInput>,
) -> AppResult<ApiResponse<StockLevels>> {
    let levels = state.variant_service.update_stock(req).await?;
    Ok(ApiResponse::ok(levels))
}

/// Upload a media file for a variant via multipart form.
///
/// Fields: `variantId` (text) and `file`.
async fn attach_media(
    AuthActor(_actor_id): AuthActor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<MediaResponse>> {
    let mut variant_id: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(std::string::ToString::to_string);
                content_type = field.content_type().map(std::string::ToString::to_string);
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?
                        .to_vec(),
                );
            }
            "variantId" => {
                variant_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let variant_id = variant_id.ok_or_else(|| AppError::BadRequest("Missing variantId".to_string()))?;
    let data = file_data.ok_or_else(|| AppError::BadRequest("Missing file".to_string()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("File is empty".to_string()));
    }

    let media = state
        .variant_service
        .attach_media(
            &variant_id,
            file_name.as_deref().unwrap_or("upload"),
            content_type.as_deref().unwrap_or("application/octet-stream"),
            &data,
        )
        .await?;

    Ok(ApiResponse::ok(media.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/list", post(list))
        .route("/update-stock", post(update_stock))
        .route("/media", post(attach_media))
}
