use crate::types::{RawDetectionSet, Size2D};

/// The latest successful detection together with the size it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedDetections {
    pub detections: RawDetectionSet,
    pub natural_size: Size2D,
}

/// Holds at most one detection result so threshold changes can re-render
/// without running the detector again.
///
/// Not synchronized; callers sharing it across threads must wrap it.
#[derive(Debug, Default)]
pub struct DetectionCache {
    entry: Option<CachedDetections>,
}

impl DetectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous content.
    pub fn store(&mut self, detections: RawDetectionSet, natural_size: Size2D) {
        self.entry = Some(CachedDetections {
            detections,
            natural_size,
        });
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn current(&self) -> Option<&CachedDetections> {
        self.entry.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
