//! Subject endpoints: creation, engagement toggles and the feed.

use atelier_common::AppResult;
use atelier_core::{
    CreateSubjectInput, Engagement, FeedItem, FeedQuery, LikeToggled, ReactionToggled,
    ToggleLikeInput, ToggleReactionInput,
};
use atelier_db::entities::subject;
use axum::{Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthActor, MaybeAuthActor, ValidJson},
    middleware::AppState,
    response::ApiResponse,
};

/// Subject response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: String,
    pub collection_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<subject::Model> for SubjectResponse {
    fn from(s: subject::Model) -> Self {
        Self {
            id: s.id,
            collection_id: s.collection_id,
            title: s.title,
            description: s.description,
            video_url: s.video_url,
            is_active: s.is_active,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

async fn create(
    AuthActor(_actor_id): AuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateSubjectInput>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    let subject = state.subject_service.create(req).await?;
    Ok(ApiResponse::ok(subject.into()))
}

/// Toggle the actor's like on a subject.
async fn like(
    AuthActor(actor_id): AuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ToggleLikeInput>,
) -> AppResult<ApiResponse<LikeToggled>> {
    let toggled = state
        .engagement_service
        .toggle_like(&req.subject_id, &actor_id)
        .await?;
    Ok(ApiResponse::ok(toggled))
}

/// Toggle one reaction symbol of the actor on a subject.
async fn react(
    AuthActor(actor_id): AuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ToggleReactionInput>,
) -> AppResult<ApiResponse<ReactionToggled>> {
    let toggled = state
        .engagement_service
        .toggle_reaction(&req.subject_id, &actor_id, &req.symbol)
        .await?;
    Ok(ApiResponse::ok(toggled))
}

/// Engagement request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRequest {
    pub subject_id: String,
}

async fn engagement(
    MaybeAuthActor(viewer): MaybeAuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<EngagementRequest>,
) -> AppResult<ApiResponse<Engagement>> {
    let engagement = state
        .engagement_service
        .get_engagement(&req.subject_id, viewer.as_deref())
        .await?;
    Ok(ApiResponse::ok(engagement))
}

/// Active subjects with their variants and engagement.
async fn feed(
    MaybeAuthActor(viewer): MaybeAuthActor,
    State(state): State<AppState>,
    ValidJson(req): ValidJson<FeedQuery>,
) -> AppResult<ApiResponse<Vec<FeedItem>>> {
    let items = state
        .feed_service
        .list_subjects(req, viewer.as_deref())
        .await?;
    Ok(ApiResponse::ok(items))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/like", post(like))
        .route("/react", post(react))
        .route("/engagement", post(engagement))
        .route("/feed", post(feed))
}
