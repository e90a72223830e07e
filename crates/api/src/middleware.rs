//! API middleware.

use std::sync::Arc;

use atelier_core::{EngagementService, FeedService, IdentityProvider, SubjectService, VariantService};
use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::extractors::ActorId;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Collection and variant provisioning.
    pub variant_service: VariantService,
    /// Subject creation.
    pub subject_service: SubjectService,
    /// Like and reaction toggles.
    pub engagement_service: EngagementService,
    /// Subject feed assembly.
    pub feed_service: FeedService,
    /// Bearer token resolution.
    pub identity: Arc<dyn IdentityProvider>,
}

/// Authentication middleware.
///
/// Requests without a resolvable token continue anonymously; endpoints that
/// need an actor reject them through [`crate::extractors::AuthActor`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.identity.resolve(token.trim()).await {
            Ok(Some(actor_id)) => {
                req.extensions_mut().insert(ActorId(actor_id));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to resolve bearer token"),
        }
    }

    next.run(req).await
}
