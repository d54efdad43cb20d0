use anyhow::Context;
use overlay::RawDetectionSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Produces raw detections for an image. Called once per image load, off
/// the request path.
pub trait Detector: Send + Sync {
    fn detect(&self, image_path: &Path) -> anyhow::Result<RawDetectionSet>;
}

/// Reads detections a model already wrote next to the image, as JSON
/// `{"boxes": [...], "scores": [...], "labels": [...]}` in
/// `<image file name><suffix>`.
#[derive(Debug, Clone)]
pub struct SidecarDetector {
    suffix: String,
}

impl SidecarDetector {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn sidecar_path(&self, image_path: &Path) -> PathBuf {
        let mut name: OsString = image_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(&self.suffix);
        image_path.with_file_name(name)
    }
}

impl Detector for SidecarDetector {
    fn detect(&self, image_path: &Path) -> anyhow::Result<RawDetectionSet> {
        let sidecar = self.sidecar_path(image_path);
        let content = fs::read_to_string(&sidecar)
            .with_context(|| format!("Failed to read detections from {}", sidecar.display()))?;
        let detections: RawDetectionSet = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse detections in {}", sidecar.display()))?;

        tracing::debug!(
            sidecar = %sidecar.display(),
            count = detections.len(),
            "Read sidecar detections"
        );
        Ok(detections)
    }
}
