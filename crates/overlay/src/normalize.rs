use crate::types::{PixelBox, Size2D};

/// Largest coordinate magnitude still read as a fraction of the image size.
pub const DEFAULT_NORMALIZED_TOLERANCE: f64 = 1.01;

/// Coordinate convention of a single raw box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSpace {
    /// Fractions of the natural image size, nominally `[0, 1]`.
    Normalized,
    /// Pixels of the natural image.
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateNormalizer {
    tolerance: f64,
}

impl Default for CoordinateNormalizer {
    fn default() -> Self {
        Self::with_tolerance(DEFAULT_NORMALIZED_TOLERANCE)
    }
}

impl CoordinateNormalizer {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// A box is normalized when every coordinate magnitude is within the
    /// tolerance. Each box is classified on its own.
    pub fn classify(&self, raw: [f32; 4]) -> CoordinateSpace {
        if raw
            .iter()
            .all(|v| (*v as f64).abs() <= self.tolerance)
        {
            CoordinateSpace::Normalized
        } else {
            CoordinateSpace::Absolute
        }
    }

    /// Converts a raw `[x0, y0, x1, y1]` box to natural-image pixels.
    /// Corner order is kept as given.
    pub fn to_pixels(&self, raw: [f32; 4], natural: Size2D) -> PixelBox {
        let [x0, y0, x1, y1] = raw.map(f64::from);
        match self.classify(raw) {
            CoordinateSpace::Normalized => PixelBox {
                left: x0 * natural.width,
                top: y0 * natural.height,
                right: x1 * natural.width,
                bottom: y1 * natural.height,
            },
            CoordinateSpace::Absolute => PixelBox {
                left: x0,
                top: y0,
                right: x1,
                bottom: y1,
            },
        }
    }
}
