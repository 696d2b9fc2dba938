//! JSON wire shapes: one view per advertisement plus the envelopes for
//! collection and search responses. The same views feed the HTML renderer,
//! so both formats always carry structurally equivalent information.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::Advertisement;

/// Public projection of an advertisement. `is_owner` is computed against the
/// per-request caller and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AdvertisementView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub is_owner: bool,
}

impl AdvertisementView {
    pub fn new(ad: &Advertisement, caller: Option<i64>) -> Self {
        Self {
            id: ad.id,
            title: ad.title.clone(),
            description: ad.description.clone(),
            created_at: ad.created_at,
            user_id: ad.user_id,
            is_owner: caller == Some(ad.user_id),
        }
    }
}

pub fn views(ads: &[Advertisement], caller: Option<i64>) -> Vec<AdvertisementView> {
    ads.iter().map(|ad| AdvertisementView::new(ad, caller)).collect()
}

/// Collection envelope for GET /advertisements
#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub advertisements: Vec<AdvertisementView>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

impl ListingPage {
    pub fn new(advertisements: Vec<AdvertisementView>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            advertisements,
            total,
            page,
            per_page,
            pages: page_count(total, per_page),
        }
    }
}

/// Envelope for GET /advertisements/search
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<AdvertisementView>,
    pub count: usize,
}

impl SearchResults {
    pub fn new(query: String, results: Vec<AdvertisementView>) -> Self {
        let count = results.len();
        Self { query, results, count }
    }
}

/// ceil(total / per_page); zero items means zero pages.
pub fn page_count(total: i64, per_page: i64) -> i64 {
    (total + per_page - 1) / per_page
}
