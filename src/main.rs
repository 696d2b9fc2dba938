use advert_api_rust::{app, config, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advert_api_rust=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Advertisements API in {:?} mode", config.environment);

    let pool = database::pool::connect().await?;
    database::pool::init_schema(&pool).await?;

    let app = app::router(pool);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("🚀 Advertisements API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
