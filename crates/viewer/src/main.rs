use common::TelemetryGuard;
use std::sync::Arc;
use viewer::{AppState, SidecarDetector, ViewerConfig, logging::setup_logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::from_env();

    // The guard installs its own subscriber with the OTLP layer attached.
    let _telemetry = match config.otel_endpoint.as_ref() {
        Some(endpoint) => Some(TelemetryGuard::init("viewer", endpoint, config.environment)?),
        None => {
            setup_logging(&config)?;
            None
        }
    };

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    let detector = Arc::new(SidecarDetector::new(config.detections_suffix.clone()));
    let state = AppState::new(config, detector);

    server::run_server(state).await
}
