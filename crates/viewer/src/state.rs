use crate::config::ViewerConfig;
use crate::detector::Detector;
use crate::errors::ViewerError;
use crate::metrics::ViewerMetrics;
use overlay::{OverlaySession, Primitive, Size2D, format_threshold};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Shared handler state. The overlay session (detection cache and label
/// colors) sits behind a single lock.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<OverlaySession>>,
    pub detector: Arc<dyn Detector>,
    pub config: Arc<ViewerConfig>,
    pub metrics: ViewerMetrics,
}

impl AppState {
    pub fn new(config: ViewerConfig, detector: Arc<dyn Detector>) -> Self {
        Self {
            session: Arc::new(Mutex::new(config.overlay_session())),
            detector,
            config: Arc::new(config),
            metrics: ViewerMetrics::new("viewer"),
        }
    }

    /// Renders the cached detections for one threshold and container size.
    pub async fn render_overlay(
        &self,
        request: OverlayRequest,
        source: &'static str,
    ) -> Result<OverlayResponse, ViewerError> {
        let threshold = request.threshold.unwrap_or(self.config.default_threshold);
        let container = request.container();

        let started = Instant::now();
        let primitives = self.session.lock().await.render(container, threshold)?;
        self.metrics
            .record_render(source, primitives.len(), started.elapsed());

        Ok(OverlayResponse {
            threshold,
            threshold_label: format_threshold(threshold),
            primitives,
        })
    }
}

/// Threshold and display area for one render. Missing container dimensions
/// mean the display is not laid out yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlayRequest {
    pub threshold: Option<f32>,
    pub container_width: Option<f64>,
    pub container_height: Option<f64>,
}

impl OverlayRequest {
    pub fn container(&self) -> Size2D {
        Size2D::new(
            self.container_width.unwrap_or(0.0),
            self.container_height.unwrap_or(0.0),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayResponse {
    pub threshold: f32,
    pub threshold_label: String,
    pub primitives: Vec<Primitive>,
}
