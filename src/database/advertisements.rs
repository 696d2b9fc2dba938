use sqlx::PgConnection;

use crate::database::models::Advertisement;

const COLUMNS: &str = "id, title, description, user_id, created_at";

/// Sort order shared by listing and search: newest first, with the id as a
/// tie-break so the order stays total and pages never drift for rows created
/// in the same instant.
const ORDERING: &str = "ORDER BY created_at DESC, id DESC";

/// Normalized listing-query parameters (already validated by the pipeline).
#[derive(Debug, Clone, Copy)]
pub struct ListParams {
    pub page: i64,
    pub per_page: i64,
    pub user_id: Option<i64>,
}

pub async fn insert(
    conn: &mut PgConnection,
    title: &str,
    description: &str,
    user_id: i64,
) -> Result<Advertisement, sqlx::Error> {
    sqlx::query_as::<_, Advertisement>(&format!(
        "INSERT INTO advertisements (title, description, user_id)
         VALUES ($1, $2, $3) RETURNING {COLUMNS}"
    ))
    .bind(title)
    .bind(description)
    .bind(user_id)
    .fetch_one(conn)
    .await
}

pub async fn get(conn: &mut PgConnection, id: i64) -> Result<Option<Advertisement>, sqlx::Error> {
    sqlx::query_as::<_, Advertisement>(&format!(
        "SELECT {COLUMNS} FROM advertisements WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Apply the owner's changes. `None` fields keep their stored value;
/// `created_at` is never touched.
pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Advertisement, sqlx::Error> {
    sqlx::query_as::<_, Advertisement>(&format!(
        "UPDATE advertisements
         SET title = COALESCE($2, title), description = COALESCE($3, description)
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(title)
    .bind(description)
    .fetch_one(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM advertisements WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// One page of the filtered listing set plus the total count of that set.
/// The window is computed over the whole filtered set, so out-of-range pages
/// come back empty rather than erroring.
pub async fn list(
    conn: &mut PgConnection,
    params: &ListParams,
) -> Result<(Vec<Advertisement>, i64), sqlx::Error> {
    let offset = window_offset(params.page, params.per_page);

    let (total, items) = match params.user_id {
        Some(owner) => {
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM advertisements WHERE user_id = $1")
                    .bind(owner)
                    .fetch_one(&mut *conn)
                    .await?;
            let items = sqlx::query_as::<_, Advertisement>(&format!(
                "SELECT {COLUMNS} FROM advertisements WHERE user_id = $1
                 {ORDERING} LIMIT $2 OFFSET $3"
            ))
            .bind(owner)
            .bind(params.per_page)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
            (total, items)
        }
        None => {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM advertisements")
                .fetch_one(&mut *conn)
                .await?;
            let items = sqlx::query_as::<_, Advertisement>(&format!(
                "SELECT {COLUMNS} FROM advertisements {ORDERING} LIMIT $1 OFFSET $2"
            ))
            .bind(params.per_page)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
            (total, items)
        }
    };

    Ok((items, total))
}

/// Case-insensitive substring match against title OR description, full match
/// set in listing order. Search carries no pagination.
pub async fn search(
    conn: &mut PgConnection,
    query_text: &str,
) -> Result<Vec<Advertisement>, sqlx::Error> {
    let pattern = like_pattern(query_text);
    sqlx::query_as::<_, Advertisement>(&format!(
        "SELECT {COLUMNS} FROM advertisements
         WHERE title ILIKE $1 ESCAPE '\\' OR description ILIKE $1 ESCAPE '\\'
         {ORDERING}"
    ))
    .bind(pattern)
    .fetch_all(conn)
    .await
}

fn window_offset(page: i64, per_page: i64) -> i64 {
    (page - 1).saturating_mul(per_page)
}

/// Wrap the needle in wildcards, escaping LIKE metacharacters so the user's
/// query matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
