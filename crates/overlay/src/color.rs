use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// 8-bit RGB color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Half-open channel range `[min, max)` for generated label colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBand {
    min: u8,
    max: u8,
}

impl Default for ColorBand {
    fn default() -> Self {
        Self { min: 64, max: 224 }
    }
}

impl ColorBand {
    /// Builds a band, swapping the bounds if given in reverse.
    pub fn new(min: u8, max: u8) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    fn sample(&self, rng: &mut fastrand::Rng) -> u8 {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if low == high { low } else { rng.u8(low..high) }
    }
}

/// Label to color assignments for one viewing session.
///
/// Colors are derived from a stable hash of the label and memoized, so a
/// label keeps its color until [`LabelColorTable::reset`].
#[derive(Debug, Clone)]
pub struct LabelColorTable {
    band: ColorBand,
    unlabeled: Rgb,
    colors: HashMap<String, Rgb>,
}

impl Default for LabelColorTable {
    fn default() -> Self {
        Self::new(ColorBand::default())
    }
}

impl LabelColorTable {
    pub fn new(band: ColorBand) -> Self {
        Self {
            band,
            unlabeled: Rgb::RED,
            colors: HashMap::new(),
        }
    }

    /// Color for detections without a label.
    pub fn unlabeled(&self) -> Rgb {
        self.unlabeled
    }

    pub fn color_for(&mut self, label: &str) -> Rgb {
        if label.is_empty() {
            return self.unlabeled;
        }
        if let Some(color) = self.colors.get(label) {
            return *color;
        }

        let mut rng = fastrand::Rng::with_seed(label_seed(label));
        let color = Rgb::new(
            self.band.sample(&mut rng),
            self.band.sample(&mut rng),
            self.band.sample(&mut rng),
        );
        tracing::debug!(label, color = %color, "Assigned label color");
        self.colors.insert(label.to_string(), color);
        color
    }

    /// Number of labels colored so far.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn reset(&mut self) {
        self.colors.clear();
    }
}

/// 64-bit FNV-1a of the label bytes.
fn label_seed(label: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    label.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(PRIME)
    })
}
