use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use api::{AppState, config::AppConfig, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting taskdeck API service");

    // Configuration and state wiring; any failure here is fatal, the
    // process must not serve with a broken store
    let config = AppConfig::from_env()?;
    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => anyhow::bail!("Failed to initialize application state: {}", e),
    };

    info!("Taskdeck API service initialized successfully");

    // Start the web server
    let app = routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Taskdeck API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
