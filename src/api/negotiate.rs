//! Response-format negotiation: an explicit `format=html` query parameter
//! wins; otherwise a `text/html` Accept header that does not also ask for
//! `application/json` selects HTML; everything else is JSON. Error bodies
//! are always JSON regardless.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Json,
    Html,
}

impl RenderFormat {
    pub fn negotiate(format_param: Option<&str>, accept: Option<&str>) -> Self {
        if let Some(format) = format_param {
            if format.eq_ignore_ascii_case("html") {
                return RenderFormat::Html;
            }
            // Any other explicit format, including "json", pins JSON
            return RenderFormat::Json;
        }

        if let Some(accept) = accept {
            let accept = accept.to_ascii_lowercase();
            if accept.contains("text/html") && !accept.contains("application/json") {
                return RenderFormat::Html;
            }
        }

        RenderFormat::Json
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RenderFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let format_param = parts
            .uri
            .query()
            .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("format=")));
        let accept = parts
            .headers
            .get(axum::http::header::ACCEPT)
            .and_then(|v| v.to_str().ok());

        Ok(RenderFormat::negotiate(format_param, accept))
    }
}
