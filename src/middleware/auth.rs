use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, TokenError};
use crate::error::ApiError;

/// Caller identity resolved from the bearer token, attached to every request
/// as an extension. `None` is the anonymous caller; read endpoints use it
/// only to compute `is_owner`, never to filter results.
#[derive(Clone, Copy, Debug, Default)]
pub struct Caller(pub Option<i64>);

impl Caller {
    pub fn user_id(&self) -> Option<i64> {
        self.0
    }

    /// Mutating operations need a resolved caller; anonymity is a hard 401.
    pub fn require(&self) -> Result<i64, ApiError> {
        self.0
            .ok_or_else(|| ApiError::unauthorized("Authorization required"))
    }
}

/// Resolve the caller for every request. An absent Authorization header or a
/// non-Bearer scheme is the anonymous outcome, not an error. A token that is
/// present but fails verification short-circuits with 401; expired and
/// malformed tokens get distinct log lines but the same status.
pub async fn resolve_caller(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = match extract_bearer_from_headers(&headers) {
        None => Caller::default(),
        Some(token) => match auth::verify_token(token) {
            Ok(claims) => Caller(Some(claims.user_id)),
            Err(err @ TokenError::Expired) => {
                tracing::warn!("rejected expired bearer token");
                return Err(err.into());
            }
            Err(err) => {
                tracing::warn!("rejected invalid bearer token");
                return Err(err.into());
            }
        },
    };

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// Gate for mutating routes: runs after `resolve_caller` and turns an
/// anonymous caller into 401 before the request body is even read.
pub async fn require_caller(request: Request, next: Next) -> Result<Response, ApiError> {
    let caller = request
        .extensions()
        .get::<Caller>()
        .copied()
        .unwrap_or_default();
    caller.require()?;
    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header, if any.
fn extract_bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_or_malformed_header_is_anonymous() {
        assert!(extract_bearer_from_headers(&HeaderMap::new()).is_none());
        assert!(extract_bearer_from_headers(&headers_with("Basic abc")).is_none());
        assert!(extract_bearer_from_headers(&headers_with("Bearer ")).is_none());
        assert!(extract_bearer_from_headers(&headers_with("token-without-scheme")).is_none());
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(
            extract_bearer_from_headers(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn require_rejects_anonymous_callers() {
        let err = Caller::default().require().unwrap_err();
        assert_eq!(err.message(), "Authorization required");
        assert_eq!(Caller(Some(3)).require().unwrap(), 3);
    }
}
