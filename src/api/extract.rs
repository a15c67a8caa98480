//! Request extractors that reject malformed input with a validation error
//! (422) before a handler runs.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::observability::Logger;
use crate::store::ItemId;

use super::errors::ApiError;

fn rejected(err: ApiError) -> ApiError {
    Logger::warn("REQUEST_REJECTED", &[("reason", &err.to_string())]);
    err
}

/// JSON body extractor
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| rejected(e.into()))?;
        Ok(Self(value))
    }
}

/// `{id}` path segment extractor
pub struct ItemIdPath(pub ItemId);

#[async_trait]
impl<S> FromRequestParts<S> for ItemIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<ItemId>::from_request_parts(parts, state)
            .await
            .map_err(|e| rejected(e.into()))?;
        Ok(Self(id))
    }
}
