use crate::errors::OverlayError;
use crate::types::{PixelBox, Size2D};
use serde::Serialize;

/// Placement of an image drawn with uniform "fit and center" scaling
/// inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewGeometry {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub container_width: f64,
    pub container_height: f64,
}

impl ViewGeometry {
    /// Geometry of an image shown at its natural size.
    pub fn identity(natural: Size2D) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            container_width: natural.width,
            container_height: natural.height,
        }
    }

    pub fn render_width(&self) -> f64 {
        self.container_width - 2.0 * self.offset_x
    }

    pub fn render_height(&self) -> f64 {
        self.container_height - 2.0 * self.offset_y
    }

    /// Maps a natural-image box to `(left, top, width, height)` on screen.
    /// Width and height are not clamped here.
    #[inline]
    pub fn project(&self, pixel_box: &PixelBox) -> (f64, f64, f64, f64) {
        (
            self.offset_x + pixel_box.left * self.scale,
            self.offset_y + pixel_box.top * self.scale,
            pixel_box.width() * self.scale,
            pixel_box.height() * self.scale,
        )
    }
}

/// Computes the uniform scale and centering offsets for `natural` inside
/// `container`.
pub fn resolve(natural: Size2D, container: Size2D) -> Result<ViewGeometry, OverlayError> {
    natural.ensure_image()?;
    if !container.has_area() {
        return Err(OverlayError::GeometryUnavailable {
            width: container.width,
            height: container.height,
        });
    }

    let scale = (container.width / natural.width).min(container.height / natural.height);
    let render_width = natural.width * scale;
    let render_height = natural.height * scale;

    Ok(ViewGeometry {
        scale,
        offset_x: (container.width - render_width) / 2.0,
        offset_y: (container.height - render_height) / 2.0,
        container_width: container.width,
        container_height: container.height,
    })
}

/// Like [`resolve`], but uses the natural size as the container while the
/// display has not been laid out yet.
pub fn resolve_or_identity(natural: Size2D, container: Size2D) -> Result<ViewGeometry, OverlayError> {
    match resolve(natural, container) {
        Err(OverlayError::GeometryUnavailable { width, height }) => {
            tracing::debug!(
                container_width = width,
                container_height = height,
                "Container not laid out, using natural image size"
            );
            Ok(ViewGeometry::identity(natural))
        }
        other => other,
    }
}
