//! HTTP API layer for atelier.
//!
//! - **Endpoints**: POST + JSON routes for collections, variants and subjects
//! - **Extractors**: actor identity resolved by the auth middleware
//! - **Middleware**: application state and bearer token resolution
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;

use axum::Router;

/// Build the API router with the auth middleware applied and state attached.
#[must_use]
pub fn app(state: AppState) -> Router {
    router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .with_state(state)
}
