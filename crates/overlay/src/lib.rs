pub mod cache;
pub mod color;
pub mod errors;
pub mod filter;
pub mod geometry;
pub mod normalize;
pub mod render;
pub mod session;
pub mod summary;
pub mod types;

pub use cache::{CachedDetections, DetectionCache};
pub use color::{ColorBand, LabelColorTable, Rgb};
pub use errors::OverlayError;
pub use filter::{Detection, filter_detections};
pub use geometry::{ViewGeometry, resolve, resolve_or_identity};
pub use normalize::{CoordinateNormalizer, CoordinateSpace};
pub use render::{OverlayRenderer, OverlayStyle, Primitive, RectPrimitive, TextPrimitive};
pub use session::{ImageTicket, OverlaySession};
pub use summary::{PredictionLine, PredictionSummary, format_threshold};
pub use types::{Dpi, PixelBox, RawDetectionSet, Size2D};
