//! API endpoints.

mod collections;
mod subjects;
mod variants;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/collections", collections::router())
        .nest("/variants", variants::router())
        .nest("/subjects", subjects::router())
}
