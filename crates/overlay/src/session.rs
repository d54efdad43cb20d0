use crate::cache::{CachedDetections, DetectionCache};
use crate::color::LabelColorTable;
use crate::errors::OverlayError;
use crate::render::{OverlayRenderer, Primitive};
use crate::summary::PredictionSummary;
use crate::types::{RawDetectionSet, Size2D};

/// Identifies one image load. Detection results are only accepted for the
/// ticket of the image currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTicket(u64);

impl ImageTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Overlay state for one viewing session: the detection cache, the label
/// color table and the renderer.
///
/// Every operation takes `&mut self`; a host sharing a session between
/// threads serializes access to both the cache and the color table by
/// wrapping the whole session in one lock.
#[derive(Debug, Default)]
pub struct OverlaySession {
    renderer: OverlayRenderer,
    colors: LabelColorTable,
    cache: DetectionCache,
    image: Option<(ImageTicket, Size2D)>,
    loads: u64,
}

impl OverlaySession {
    pub fn new(renderer: OverlayRenderer, colors: LabelColorTable) -> Self {
        Self {
            renderer,
            colors,
            cache: DetectionCache::new(),
            image: None,
            loads: 0,
        }
    }

    /// Starts a new image. The previous overlay is dropped before the size
    /// is checked, so a failed load never leaves stale boxes behind.
    pub fn on_image_loaded(&mut self, natural: Size2D) -> Result<ImageTicket, OverlayError> {
        self.cache.clear();
        self.image = None;
        natural.ensure_image()?;

        self.loads += 1;
        let ticket = ImageTicket(self.loads);
        self.image = Some((ticket, natural));
        tracing::info!(
            image = ticket.id(),
            width = natural.width,
            height = natural.height,
            "Image loaded"
        );
        Ok(ticket)
    }

    /// Caches the detector output for the image identified by `ticket`.
    /// Returns the number of detections stored.
    pub fn on_detection_complete(
        &mut self,
        ticket: ImageTicket,
        detections: RawDetectionSet,
    ) -> Result<usize, OverlayError> {
        let (current, natural) = self.image.ok_or(OverlayError::NoImageLoaded)?;
        if ticket != current {
            tracing::warn!(
                ticket = ticket.id(),
                current = current.id(),
                "Dropping detections for an image no longer shown"
            );
            return Err(OverlayError::StaleDetection {
                ticket: ticket.id(),
                current: current.id(),
            });
        }

        let count = detections.len();
        self.cache.store(detections, natural);
        tracing::info!(image = ticket.id(), count, "Detections cached");
        Ok(count)
    }

    /// Renders the cached detections. Nothing cached renders nothing.
    pub fn render(&mut self, container: Size2D, threshold: f32) -> Result<Vec<Primitive>, OverlayError> {
        let Some(cached) = self.cache.current() else {
            return Ok(Vec::new());
        };
        self.renderer.render(
            &mut self.colors,
            &cached.detections,
            cached.natural_size,
            container,
            threshold,
        )
    }

    /// Renders an explicit detection set with this session's colors.
    pub fn render_set(
        &mut self,
        detections: &RawDetectionSet,
        natural: Size2D,
        container: Size2D,
        threshold: f32,
    ) -> Result<Vec<Primitive>, OverlayError> {
        self.renderer
            .render(&mut self.colors, detections, natural, container, threshold)
    }

    pub fn summary(&self) -> Option<PredictionSummary> {
        self.cache
            .current()
            .map(|cached| PredictionSummary::from_set(&cached.detections))
    }

    pub fn current_ticket(&self) -> Option<ImageTicket> {
        self.image.map(|(ticket, _)| ticket)
    }

    pub fn natural_size(&self) -> Option<Size2D> {
        self.image.map(|(_, size)| size)
    }

    pub fn cached(&self) -> Option<&CachedDetections> {
        self.cache.current()
    }

    pub fn colors(&self) -> &LabelColorTable {
        &self.colors
    }

    /// Forgets the image, its detections and every label color.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.colors.reset();
        self.image = None;
        tracing::info!("Overlay session reset");
    }
}
