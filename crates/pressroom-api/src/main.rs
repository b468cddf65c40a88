use std::env;

use tracing_subscriber::EnvFilter;

use pressroom_api::app;
use pressroom_api::state::AppState;
use pressroom_core::settings::Settings;
use pressroom_export::PdfGenerator;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let settings = Settings::from_env()?;
    let addr = env::var("PRESSROOM_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let generator = PdfGenerator::from_settings(&settings);
    tracing::info!(
        environment = ?settings.environment,
        template_dir = %settings.template_dir.display(),
        temp_dir = %generator.temp_dir().display(),
        "starting pressroom"
    );

    let state = AppState::new(settings, generator);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
