use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::api::requests::{LoginRequest, RegisterRequest};
use crate::app::AppState;
use crate::auth::{self, password, Claims};
use crate::database::{users, Session};
use crate::error::ApiError;
use crate::extract;

/// POST /register - create an account and hand back a bearer token
pub async fn register(
    State(state): State<AppState>,
    extract::Json(body): extract::Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let credentials = body.validate()?;

    let mut session = Session::begin(&state.pool).await?;

    if users::find_by_email(session.conn(), &credentials.email)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = password::hash(&credentials.password)?;
    let user = users::insert(session.conn(), &credentials.email, &password_hash).await?;
    session.commit().await?;

    tracing::info!(user_id = user.id, "registered new user");

    let token = auth::generate_token(Claims::new(user.id))?;
    Ok(Json(json!({ "token": token, "user_id": user.id })))
}

/// POST /login - verify credentials and hand back a bearer token
pub async fn login(
    State(state): State<AppState>,
    extract::Json(body): extract::Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let credentials = body.validate()?;

    let mut session = Session::begin(&state.pool).await?;
    let user = users::find_by_email(session.conn(), &credentials.email).await?;
    session.commit().await?;

    // One failure path for unknown email and wrong password alike
    let user = user
        .filter(|u| password::verify(&credentials.password, &u.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let token = auth::generate_token(Claims::new(user.id))?;
    Ok(Json(json!({ "token": token, "user_id": user.id })))
}
