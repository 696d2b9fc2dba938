use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{advertisements, auth};
use crate::middleware::{require_caller, resolve_caller};

/// Immutable per-process state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

pub fn router(pool: PgPool) -> Router {
    let state = AppState { pool };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(read_routes())
        .merge(write_routes())
        // Global middleware; caller resolution runs before the per-route gates
        .layer(middleware::from_fn(resolve_caller))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/advertisements", get(advertisements::list))
        // Static segment; must be registered so it wins over /:id
        .route("/advertisements/search", get(advertisements::search))
        .route("/advertisements/:id", get(advertisements::show))
}

fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/advertisements", post(advertisements::create))
        .route(
            "/advertisements/:id",
            patch(advertisements::update).delete(advertisements::destroy),
        )
        // Mutations require a resolved caller before the body is read
        .route_layer(middleware::from_fn(require_caller))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Advertisements API (Rust)",
        "version": version,
        "description": "Classifieds listing REST API built with Rust (Axum)",
        "endpoints": {
            "register": "POST /register (public)",
            "login": "POST /login (public - token acquisition)",
            "list": "GET /advertisements?page=&per_page=&user_id= (public)",
            "show": "GET /advertisements/:id (public)",
            "search": "GET /advertisements/search?q= (public)",
            "create": "POST /advertisements (bearer token required)",
            "update": "PATCH /advertisements/:id (owner only)",
            "delete": "DELETE /advertisements/:id (owner only)",
        },
        "formats": "JSON by default; ?format=html or Accept: text/html for HTML",
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::pool::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "error": "database unavailable",
                "database_error": e.to_string()
            })),
        ),
    }
}
