use crate::errors::OverlayError;
use serde::{Deserialize, Serialize};

/// Reference DPI for device-independent display units.
pub const DEFAULT_DPI: f64 = 96.0;

/// Width/height pair in display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Builds a natural image size, rejecting empty or non-finite dimensions.
    pub fn image(width: f64, height: f64) -> Result<Self, OverlayError> {
        let size = Self::new(width, height);
        size.ensure_image()?;
        Ok(size)
    }

    /// Converts pixel dimensions to display units using the image's DPI.
    pub fn from_pixels(pixel_width: u32, pixel_height: u32, dpi: Dpi) -> Result<Self, OverlayError> {
        Self::image(
            pixel_width as f64 * dpi.x_factor(),
            pixel_height as f64 * dpi.y_factor(),
        )
    }

    pub fn ensure_image(&self) -> Result<(), OverlayError> {
        if self.has_area() {
            Ok(())
        } else {
            Err(OverlayError::InvalidImageSize {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Horizontal and vertical resolution of an image, in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

impl Default for Dpi {
    fn default() -> Self {
        Self {
            x: DEFAULT_DPI,
            y: DEFAULT_DPI,
        }
    }
}

impl Dpi {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x_factor(&self) -> f64 {
        dpi_factor(self.x)
    }

    pub fn y_factor(&self) -> f64 {
        dpi_factor(self.y)
    }
}

// Missing or nonsensical DPI metadata is read as the reference DPI.
#[inline]
fn dpi_factor(dpi: f64) -> f64 {
    if dpi.is_finite() && dpi > 0.0 {
        DEFAULT_DPI / dpi
    } else {
        1.0
    }
}

/// Box in absolute pixel coordinates of the natural image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Raw detector output: `boxes` holds four values per detection
/// (`x0, y0, x1, y1`), `scores` one value per detection and `labels`
/// at most one entry per detection.
///
/// The invariants are checked on construction, so a value of this type is
/// always well-formed. Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedDetectionSet")]
pub struct RawDetectionSet {
    boxes: Vec<f32>,
    scores: Vec<f32>,
    labels: Vec<String>,
}

#[derive(Deserialize)]
struct UncheckedDetectionSet {
    boxes: Vec<f32>,
    scores: Vec<f32>,
    #[serde(default)]
    labels: Vec<Option<String>>,
}

impl TryFrom<UncheckedDetectionSet> for RawDetectionSet {
    type Error = OverlayError;

    fn try_from(raw: UncheckedDetectionSet) -> Result<Self, Self::Error> {
        let labels = raw
            .labels
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        Self::new(raw.boxes, raw.scores, labels)
    }
}

impl RawDetectionSet {
    pub fn new(
        boxes: Vec<f32>,
        scores: Vec<f32>,
        labels: Vec<String>,
    ) -> Result<Self, OverlayError> {
        if boxes.len() % 4 != 0 {
            return Err(OverlayError::MalformedDetectionSet(format!(
                "{} box values is not a multiple of 4",
                boxes.len()
            )));
        }
        let count = boxes.len() / 4;
        if scores.len() != count {
            return Err(OverlayError::MalformedDetectionSet(format!(
                "{} scores for {} boxes",
                scores.len(),
                count
            )));
        }
        if labels.len() > count {
            return Err(OverlayError::MalformedDetectionSet(format!(
                "{} labels for {} boxes",
                labels.len(),
                count
            )));
        }

        Ok(Self {
            boxes,
            scores,
            labels,
        })
    }

    pub fn empty() -> Self {
        Self {
            boxes: Vec::new(),
            scores: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Number of detections.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn boxes(&self) -> &[f32] {
        &self.boxes
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Raw box `index` as `[x0, y0, x1, y1]`.
    pub fn raw_box(&self, index: usize) -> Option<[f32; 4]> {
        let base = index.checked_mul(4)?;
        let values = self.boxes.get(base..base + 4)?;
        Some([values[0], values[1], values[2], values[3]])
    }

    /// Label of detection `index`; missing entries read as empty.
    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_rejects_empty_dimensions() {
        assert!(Size2D::image(640.0, 480.0).is_ok());
        assert_eq!(
            Size2D::image(0.0, 480.0),
            Err(OverlayError::InvalidImageSize {
                width: 0.0,
                height: 480.0
            })
        );
        assert!(Size2D::image(640.0, -1.0).is_err());
        assert!(Size2D::image(f64::NAN, 480.0).is_err());
    }

    #[test]
    fn test_from_pixels_applies_dpi() {
        let size = Size2D::from_pixels(300, 200, Dpi::new(192.0, 96.0)).unwrap();
        assert_eq!(size, Size2D::new(150.0, 200.0));

        let size = Size2D::from_pixels(300, 200, Dpi::new(72.0, 72.0)).unwrap();
        assert!((size.width - 400.0).abs() < 1e-9);
        assert!((size.height - 266.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_from_pixels_ignores_missing_dpi() {
        let size = Size2D::from_pixels(300, 200, Dpi::new(0.0, f64::NAN)).unwrap();
        assert_eq!(size, Size2D::new(300.0, 200.0));
    }

    #[test]
    fn test_from_pixels_rejects_zero_pixels() {
        assert!(matches!(
            Size2D::from_pixels(0, 200, Dpi::default()),
            Err(OverlayError::InvalidImageSize { .. })
        ));
    }

    #[test]
    fn test_detection_set_accepts_short_labels() {
        let set = RawDetectionSet::new(
            vec![0.0, 0.0, 1.0, 1.0, 10.0, 10.0, 20.0, 20.0],
            vec![0.9, 0.4],
            vec!["cat".to_string()],
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.label(0), "cat");
        assert_eq!(set.label(1), "", "Missing label should read as empty");
        assert_eq!(set.raw_box(1), Some([10.0, 10.0, 20.0, 20.0]));
        assert_eq!(set.raw_box(2), None);
    }

    #[test]
    fn test_detection_set_rejects_partial_box() {
        let err = RawDetectionSet::new(vec![0.0; 7], vec![0.5], vec![]).unwrap_err();
        assert!(matches!(err, OverlayError::MalformedDetectionSet(_)));
    }

    #[test]
    fn test_detection_set_rejects_score_mismatch() {
        let err = RawDetectionSet::new(vec![0.0; 8], vec![0.5], vec![]).unwrap_err();
        assert_eq!(
            err,
            OverlayError::MalformedDetectionSet("1 scores for 2 boxes".to_string())
        );
    }

    #[test]
    fn test_detection_set_rejects_extra_labels() {
        let err = RawDetectionSet::new(
            vec![0.0; 4],
            vec![0.5],
            vec!["a".to_string(), "b".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, OverlayError::MalformedDetectionSet(_)));
    }

    #[test]
    fn test_deserialize_validates_and_fills_null_labels() {
        let json = r#"{"boxes":[0,0,1,1,2,2,3,3],"scores":[0.5,0.6],"labels":[null,"dog"]}"#;
        let set: RawDetectionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.label(0), "");
        assert_eq!(set.label(1), "dog");

        let json = r#"{"boxes":[0,0,1,1],"scores":[0.5]}"#;
        let set: RawDetectionSet = serde_json::from_str(json).unwrap();
        assert!(set.labels().is_empty(), "Labels are optional on the wire");

        let json = r#"{"boxes":[0,0,1],"scores":[0.5]}"#;
        let result: Result<RawDetectionSet, _> = serde_json::from_str(json);
        assert!(result.is_err(), "Malformed payload must not deserialize");
    }
}
