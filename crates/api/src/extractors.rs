//! Request extractors.

use atelier_common::AppError;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

/// JSON body extractor whose rejections render as `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);

/// Actor id resolved from the bearer token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct ActorId(pub String);

/// Authenticated actor extractor.
#[derive(Debug, Clone)]
pub struct AuthActor(pub String);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActorId>()
            .map(|actor| Self(actor.0.clone()))
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional actor extractor; anonymous requests yield `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthActor(pub Option<String>);

impl<S> FromRequestParts<S> for MaybeAuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts.extensions.get::<ActorId>().map(|actor| actor.0.clone()),
        ))
    }
}
