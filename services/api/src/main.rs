use std::sync::Arc;

use anyhow::Result;
use api::{AppState, config::Settings, create_router};
use common::{
    database::{DatabaseConfig, health_check, init_pool},
    store::PgDocumentStore,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting trainer site service");

    let settings = Settings::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let store = PgDocumentStore::new(pool);
    store.ensure_schema().await?;

    let app_state = AppState::from_settings(Arc::new(store), &settings)?;
    info!(
        "Trainer site initialized ({} notification channels)",
        app_state.notifications.len()
    );

    // Start the web server
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Trainer site listening on {}", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
