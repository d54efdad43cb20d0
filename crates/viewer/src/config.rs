use common::env_or;
use overlay::{
    ColorBand, CoordinateNormalizer, LabelColorTable, OverlayRenderer, OverlaySession,
    OverlayStyle,
};
use std::env;

pub use common::Environment;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub environment: Environment,
    pub listen_addr: String,
    pub default_threshold: f32,
    pub normalized_tolerance: f64,
    pub color_band_min: u8,
    pub color_band_max: u8,
    pub label_offset: f64,
    pub detections_suffix: String,
    pub otel_endpoint: Option<String>,
}

impl ViewerConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let style = OverlayStyle::default();

        Self {
            environment: Environment::from_env(),
            listen_addr: env::var("VIEWER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            default_threshold: env_or("VIEWER_DEFAULT_THRESHOLD", 0.3),
            normalized_tolerance: env_or(
                "VIEWER_NORMALIZED_TOLERANCE",
                CoordinateNormalizer::default().tolerance(),
            ),
            color_band_min: env_or("VIEWER_COLOR_BAND_MIN", ColorBand::default().min()),
            color_band_max: env_or("VIEWER_COLOR_BAND_MAX", ColorBand::default().max()),
            label_offset: env_or("VIEWER_LABEL_OFFSET", style.label_offset),
            detections_suffix: env::var("VIEWER_DETECTIONS_SUFFIX")
                .unwrap_or_else(|_| ".detections.json".to_string()),
            otel_endpoint: env::var("VIEWER_OTEL_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }

    /// Fresh overlay session tuned by this configuration.
    pub fn overlay_session(&self) -> OverlaySession {
        let style = OverlayStyle {
            label_offset: self.label_offset,
            ..OverlayStyle::default()
        };
        let renderer = OverlayRenderer::new(
            CoordinateNormalizer::with_tolerance(self.normalized_tolerance),
            style,
        );
        let colors = LabelColorTable::new(ColorBand::new(self.color_band_min, self.color_band_max));
        OverlaySession::new(renderer, colors)
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            listen_addr: "127.0.0.1:0".to_string(),
            default_threshold: 0.3,
            normalized_tolerance: 1.01,
            color_band_min: 64,
            color_band_max: 224,
            label_offset: 18.0,
            detections_suffix: ".detections.json".to_string(),
            otel_endpoint: None,
        }
    }
}
