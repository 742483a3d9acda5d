/// API сервер для моделей риска

use std::sync::Arc;

use anyhow::Context;

use cardio_risk::{service, Config, PredictionContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cardio_risk::init_logging();

    let config = Config::from_env()?;

    // Без всех четырех артефактов сервер не стартует
    let context = PredictionContext::load(&config.artifacts_dir).with_context(|| {
        format!("Failed to load artifacts from {}", config.artifacts_dir.display())
    })?;

    let app = service::router(Arc::new(context));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Server listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
