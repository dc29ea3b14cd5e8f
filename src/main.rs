use sqlx::postgres::PgPoolOptions;
use tracing::info;

use grocery_service::{build_router, config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,grocery_service=debug"))?,
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    info!(max_connections = config.max_connections, "Database connection pool established.");

    info!("Applying schema...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Schema ready.");

    let app = build_router(AppState { db: pool });

    let addr = config.bind_addr();
    info!("Grocery service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
