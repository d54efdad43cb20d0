use crate::errors::ViewerError;
use overlay::{Dpi, Size2D};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extensions offered when browsing for images.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Size in display units after DPI conversion.
    pub natural_size: Size2D,
}

/// Reads the image header and returns its natural size. Pixel data is not
/// decoded.
pub fn probe_image(path: &Path, dpi: Dpi) -> Result<LoadedImage, ViewerError> {
    let (pixel_width, pixel_height) = image::ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    let natural_size = Size2D::from_pixels(pixel_width, pixel_height, dpi)?;

    tracing::debug!(
        path = %path.display(),
        pixel_width,
        pixel_height,
        "Probed image"
    );

    Ok(LoadedImage {
        path: path.to_path_buf(),
        pixel_width,
        pixel_height,
        natural_size,
    })
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
