use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Credential-store row. Deliberately not `Serialize`: the password hash
/// must never reach a wire body, so user rows never serialize wholesale.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
