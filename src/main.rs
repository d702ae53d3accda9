use std::sync::Arc;
use tracing::info;
use video_upload_backend::{config::Config, models::AppState, router, storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_upload_backend=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();

    // Ensure the storage directory exists before the first upload
    storage::ensure_ready(&config.upload_dir).await?;

    let state = Arc::new(AppState::new(config.clone()));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Server running on http://localhost:{}", config.port);
    info!("   Upload dir: {}", config.upload_dir.display());
    info!(
        "   Max file size: {}MB",
        config.max_file_size / 1024 / 1024
    );

    axum::serve(listener, app).await?;

    Ok(())
}
