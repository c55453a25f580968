use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use harmony_api::{
    api::{create_router, AppState},
    config::Config,
    db::SqliteCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("harmony_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = SqliteCatalog::connect(&config.database_url).await?;
    if config.seed_sample_data {
        catalog.seed_sample_data().await?;
    }

    let state = AppState::new(Arc::new(catalog), config.similarity_weights()).await?;
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
