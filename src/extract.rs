//! Custom extractors that keep rejection handling inside the error taxonomy
//! instead of axum's default bodies.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `axum::Json` with the pipeline's rejection contract: any body that fails
/// to parse into the request shape answers 400 "Invalid JSON".
#[derive(Debug)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(_) => Err(ApiError::InvalidJson),
        }
    }
}

/// Advertisement id from the path. A non-numeric segment is 404, matching a
/// route pattern that only ever admitted digits.
#[derive(Debug, Clone, Copy)]
pub struct AdId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AdId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found("advertisement not found"))?;
        raw.parse::<i64>()
            .map(AdId)
            .map_err(|_| ApiError::not_found("advertisement not found"))
    }
}
