use anyhow::Context;
use tracing_subscriber::EnvFilter;

use datapulse_api::api::{create_router, AppState};
use datapulse_api::data::load_context;
use datapulse_api::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("datapulse_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Reference tables and the model are loaded once and shared read-only
    let context = load_context(&config)
        .with_context(|| format!("Failed to load data from {}", config.data_dir.display()))?;
    let state = AppState::new(context);

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
