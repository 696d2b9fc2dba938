use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::api::format::{views, AdvertisementView, ListingPage, SearchResults};
use crate::api::html;
use crate::api::negotiate::RenderFormat;
use crate::api::requests::{CreateAdvertisement, UpdateAdvertisement};
use crate::app::AppState;
use crate::database::advertisements::{self, ListParams};
use crate::database::models::Advertisement;
use crate::database::Session;
use crate::error::ApiError;
use crate::extract::{self, AdId};
use crate::middleware::Caller;

/// Raw query parameters for GET /advertisements; parsing failures carry the
/// exact messages of the wire contract, so everything arrives as strings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn parse_list_query(query: ListQuery) -> Result<ListParams, ApiError> {
    let page = match query.page {
        None => 1,
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ApiError::bad_request("page and per_page must be integers"))?,
    };
    let per_page = match query.per_page {
        None => 10,
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| ApiError::bad_request("page and per_page must be integers"))?,
    };
    let user_id = match query.user_id {
        None => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::bad_request("user_id must be an integer"))?,
        ),
    };

    Ok(ListParams {
        page: page.max(1),
        per_page: per_page.max(1),
        user_id,
    })
}

/// GET /advertisements - paginated listing, optionally filtered by owner.
/// The caller, if any, only drives the `is_owner` flag.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    format: RenderFormat,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let params = parse_list_query(query)?;

    let mut session = Session::begin(&state.pool).await?;
    let (ads, total) = advertisements::list(session.conn(), &params).await?;
    session.commit().await?;

    let page = ListingPage::new(
        views(&ads, caller.user_id()),
        total,
        params.page,
        params.per_page,
    );

    Ok(match format {
        RenderFormat::Json => Json(page).into_response(),
        RenderFormat::Html => Html(html::listing_page(&page)).into_response(),
    })
}

/// GET /advertisements/{id}
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    format: RenderFormat,
    AdId(id): AdId,
) -> Result<Response, ApiError> {
    let mut session = Session::begin(&state.pool).await?;
    let ad = fetch_advertisement(&mut session, id).await?;
    session.commit().await?;

    let view = AdvertisementView::new(&ad, caller.user_id());
    Ok(match format {
        RenderFormat::Json => Json(view).into_response(),
        RenderFormat::Html => Html(html::advertisement_page(&view)).into_response(),
    })
}

/// POST /advertisements - authenticated callers only; the caller becomes the
/// owner, permanently.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    extract::Json(body): extract::Json<CreateAdvertisement>,
) -> Result<Response, ApiError> {
    let user_id = caller.require()?;
    let ad = body.validate()?;

    let mut session = Session::begin(&state.pool).await?;
    let created =
        advertisements::insert(session.conn(), &ad.title, &ad.description, user_id).await?;
    session.commit().await?;

    tracing::info!(advertisement_id = created.id, user_id, "created advertisement");
    Ok((StatusCode::CREATED, Json(json!({ "id": created.id }))).into_response())
}

/// PATCH /advertisements/{id} - owner only; existence is checked before
/// ownership, ownership before any mutation.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    AdId(id): AdId,
    extract::Json(body): extract::Json<UpdateAdvertisement>,
) -> Result<Response, ApiError> {
    let user_id = caller.require()?;
    let changes = body.validate()?;

    let mut session = Session::begin(&state.pool).await?;
    let ad = fetch_advertisement(&mut session, id).await?;
    if ad.user_id != user_id {
        return Err(ApiError::forbidden(
            "You can only edit your own advertisements",
        ));
    }

    if !changes.is_empty() {
        advertisements::update(
            session.conn(),
            id,
            changes.title.as_deref(),
            changes.description.as_deref(),
        )
        .await?;
    }
    session.commit().await?;

    Ok(Json(json!({ "id": id })).into_response())
}

/// DELETE /advertisements/{id} - owner only, 204 on success
pub async fn destroy(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    AdId(id): AdId,
) -> Result<Response, ApiError> {
    let user_id = caller.require()?;

    let mut session = Session::begin(&state.pool).await?;
    let ad = fetch_advertisement(&mut session, id).await?;
    if ad.user_id != user_id {
        return Err(ApiError::forbidden(
            "You can only delete your own advertisements",
        ));
    }

    advertisements::delete(session.conn(), id).await?;
    session.commit().await?;

    tracing::info!(advertisement_id = id, user_id, "deleted advertisement");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /advertisements/search?q= - case-insensitive substring match over
/// title and description, full match set with a count.
pub async fn search(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    format: RenderFormat,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let query_text = query
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("search query is required"))?;

    let mut session = Session::begin(&state.pool).await?;
    let ads = advertisements::search(session.conn(), &query_text).await?;
    session.commit().await?;

    let results = SearchResults::new(query_text, views(&ads, caller.user_id()));
    Ok(match format {
        RenderFormat::Json => Json(results).into_response(),
        RenderFormat::Html => Html(html::search_page(&results)).into_response(),
    })
}

async fn fetch_advertisement(session: &mut Session, id: i64) -> Result<Advertisement, ApiError> {
    advertisements::get(session.conn(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("advertisement not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let params = parse_list_query(ListQuery::default()).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 10);
        assert!(params.user_id.is_none());
    }

    #[test]
    fn list_query_parses_explicit_values() {
        let params = parse_list_query(ListQuery {
            page: Some("2".to_string()),
            per_page: Some("1".to_string()),
            user_id: Some("7".to_string()),
        })
        .unwrap();
        assert_eq!(params.page, 2);
        assert_eq!(params.per_page, 1);
        assert_eq!(params.user_id, Some(7));
    }

    #[test]
    fn list_query_rejects_non_integers() {
        let err = parse_list_query(ListQuery {
            page: Some("two".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message(), "page and per_page must be integers");

        let err = parse_list_query(ListQuery {
            per_page: Some("1.5".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message(), "page and per_page must be integers");

        let err = parse_list_query(ListQuery {
            user_id: Some("abc".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message(), "user_id must be an integer");
    }

    #[test]
    fn list_query_clamps_to_the_first_page() {
        let params = parse_list_query(ListQuery {
            page: Some("0".to_string()),
            per_page: Some("-5".to_string()),
            user_id: None,
        })
        .unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 1);
    }
}
