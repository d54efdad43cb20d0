use crate::normalize::CoordinateNormalizer;
use crate::types::{PixelBox, RawDetectionSet, Size2D};

/// One detection that passed the threshold, borrowed from its set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection<'a> {
    /// Position in the raw arrays.
    pub index: usize,
    pub raw_box: [f32; 4],
    pub score: f32,
    pub label: &'a str,
}

impl Detection<'_> {
    pub fn pixel_box(&self, natural: Size2D, normalizer: &CoordinateNormalizer) -> PixelBox {
        normalizer.to_pixels(self.raw_box, natural)
    }
}

/// Detections scoring at or above `threshold`, in original index order.
pub fn filter_detections(set: &RawDetectionSet, threshold: f32) -> Vec<Detection<'_>> {
    set.boxes()
        .chunks_exact(4)
        .zip(set.scores())
        .enumerate()
        .filter(|(_, (_, score))| **score >= threshold)
        .map(|(index, (coords, score))| Detection {
            index,
            raw_box: [coords[0], coords[1], coords[2], coords[3]],
            score: *score,
            label: set.label(index),
        })
        .collect()
}
