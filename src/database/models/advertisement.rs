use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Listing-store row. `user_id` is the owning user, set at creation and
/// never transferable; `created_at` is server-assigned and immutable.
#[derive(Debug, Clone, FromRow)]
pub struct Advertisement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
