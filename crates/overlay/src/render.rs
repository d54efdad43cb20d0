use crate::color::{LabelColorTable, Rgb};
use crate::errors::OverlayError;
use crate::filter::{Detection, filter_detections};
use crate::geometry::{ViewGeometry, resolve_or_identity};
use crate::normalize::CoordinateNormalizer;
use crate::types::{RawDetectionSet, Size2D};
use serde::Serialize;

/// Drawing parameters shared by every primitive of an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub stroke_thickness: f64,
    pub corner_radius: f64,
    pub font_size: f64,
    pub label_padding: f64,
    /// Distance the label is lifted above its box.
    pub label_offset: f64,
    pub label_foreground: Rgb,
    /// Smallest width or height a drawn box may have.
    pub min_extent: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_thickness: 2.0,
            corner_radius: 4.0,
            font_size: 12.0,
            label_padding: 2.0,
            label_offset: 18.0,
            label_foreground: Rgb::YELLOW,
            min_extent: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectPrimitive {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub stroke: Rgb,
    pub stroke_thickness: f64,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPrimitive {
    pub left: f64,
    pub top: f64,
    pub text: String,
    pub background: Rgb,
    pub foreground: Rgb,
    pub font_size: f64,
    pub padding: f64,
}

/// Screen-space drawing instruction handed to a display surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Rect(RectPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    pub fn as_rect(&self) -> Option<&RectPrimitive> {
        match self {
            Primitive::Rect(rect) => Some(rect),
            Primitive::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextPrimitive> {
        match self {
            Primitive::Text(text) => Some(text),
            Primitive::Rect(_) => None,
        }
    }
}

/// Turns raw detections into screen-space primitives for an image shown
/// with uniform fit scaling.
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    normalizer: CoordinateNormalizer,
    style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(normalizer: CoordinateNormalizer, style: OverlayStyle) -> Self {
        Self { normalizer, style }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Renders every detection of `set` scoring at least `threshold`.
    ///
    /// Each surviving detection yields a rectangle followed by its label, in
    /// the order of the raw arrays. The output depends only on the arguments
    /// and on colors already memoized in `colors`.
    #[tracing::instrument(level = "debug", skip(self, colors, set), fields(detections = set.len()))]
    pub fn render(
        &self,
        colors: &mut LabelColorTable,
        set: &RawDetectionSet,
        natural: Size2D,
        container: Size2D,
        threshold: f32,
    ) -> Result<Vec<Primitive>, OverlayError> {
        let geometry = resolve_or_identity(natural, container)?;
        let kept = filter_detections(set, threshold);

        let mut primitives = Vec::with_capacity(kept.len() * 2);
        for detection in &kept {
            let (rect, text) = self.draw(colors, detection, natural, &geometry);
            primitives.push(Primitive::Rect(rect));
            primitives.push(Primitive::Text(text));
        }

        tracing::debug!(
            kept = kept.len(),
            scale = geometry.scale,
            "Rendered overlay"
        );
        Ok(primitives)
    }

    fn draw(
        &self,
        colors: &mut LabelColorTable,
        detection: &Detection<'_>,
        natural: Size2D,
        geometry: &ViewGeometry,
    ) -> (RectPrimitive, TextPrimitive) {
        let pixel_box = detection.pixel_box(natural, &self.normalizer);
        let (left, top, width, height) = geometry.project(&pixel_box);
        let color = colors.color_for(detection.label);

        let rect = RectPrimitive {
            left,
            top,
            width: width.max(self.style.min_extent),
            height: height.max(self.style.min_extent),
            stroke: color,
            stroke_thickness: self.style.stroke_thickness,
            corner_radius: self.style.corner_radius,
        };

        let text = TextPrimitive {
            left,
            top: (top - self.style.label_offset).max(0.0),
            text: label_text(detection.label, detection.score),
            background: color,
            foreground: self.style.label_foreground,
            font_size: self.style.font_size,
            padding: self.style.label_padding,
        };

        (rect, text)
    }
}

/// Score as a percentage rounded to one decimal, ties away from zero.
pub(crate) fn score_percent(score: f32) -> f64 {
    (score as f64 * 1000.0).round() / 10.0
}

/// `"dog 80.0%"`, or just `"80.0%"` for unlabeled detections.
pub fn label_text(label: &str, score: f32) -> String {
    let percent = score_percent(score);
    if label.is_empty() {
        format!("{:.1}%", percent)
    } else {
        format!("{} {:.1}%", label, percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_one(raw: [f32; 4], natural: Size2D, container: Size2D) -> Vec<Primitive> {
        let set = RawDetectionSet::new(raw.to_vec(), vec![0.8], vec!["dog".to_string()]).unwrap();
        OverlayRenderer::default()
            .render(
                &mut LabelColorTable::default(),
                &set,
                natural,
                container,
                0.3,
            )
            .unwrap()
    }

    #[test]
    fn test_label_text() {
        assert_eq!(label_text("dog", 0.8), "dog 80.0%");
        assert_eq!(label_text("", 0.8), "80.0%");
        assert_eq!(label_text("car", 0.456), "car 45.6%");
        assert_eq!(label_text("", 1.0), "100.0%");
    }

    #[test]
    fn test_label_text_rounds_ties_away_from_zero() {
        assert_eq!(label_text("", 0.0625), "6.3%");
        assert_eq!(label_text("", 0.3125), "31.3%");
        assert_eq!(label_text("cat", 0.5625), "cat 56.3%");
        assert_eq!(label_text("", 0.1875), "18.8%");
        assert_eq!(label_text("", 0.35), "35.0%");
    }

    #[test]
    fn test_rect_then_text_per_detection() {
        let primitives = render_one(
            [0.0, 0.0, 0.5, 0.5],
            Size2D::new(400.0, 300.0),
            Size2D::new(200.0, 150.0),
        );

        assert_eq!(primitives.len(), 2);
        let rect = primitives[0].as_rect().expect("first primitive is the box");
        let text = primitives[1].as_text().expect("second primitive is the label");

        assert_eq!((rect.left, rect.top), (0.0, 0.0));
        assert!((rect.width - 100.0).abs() < 1e-9);
        assert!((rect.height - 75.0).abs() < 1e-9);
        assert_eq!(text.text, "dog 80.0%");
        assert_eq!(text.background, rect.stroke);
        assert_eq!(text.foreground, Rgb::YELLOW);
        assert_eq!(rect.stroke_thickness, 2.0);
        assert_eq!(rect.corner_radius, 4.0);
    }

    #[test]
    fn test_label_sits_above_box() {
        // 100x100 image in a 100x100 container, box top at 50
        let primitives = render_one(
            [10.0, 50.0, 60.0, 90.0],
            Size2D::new(100.0, 100.0),
            Size2D::new(100.0, 100.0),
        );
        let text = primitives[1].as_text().unwrap();
        assert_eq!(text.left, 10.0);
        assert_eq!(text.top, 32.0);
    }

    #[test]
    fn test_label_clamped_to_top_edge() {
        let primitives = render_one(
            [10.0, 5.0, 60.0, 90.0],
            Size2D::new(100.0, 100.0),
            Size2D::new(100.0, 100.0),
        );
        assert_eq!(primitives[1].as_text().unwrap().top, 0.0);
    }

    #[test]
    fn test_degenerate_box_has_minimum_extent() {
        let primitives = render_one(
            [30.0, 30.0, 30.0, 20.0],
            Size2D::new(100.0, 100.0),
            Size2D::new(100.0, 100.0),
        );
        let rect = primitives[0].as_rect().unwrap();
        assert_eq!(rect.width, 1.0, "Zero width clamps to 1");
        assert_eq!(rect.height, 1.0, "Inverted height clamps to 1");
    }

    #[test]
    fn test_offsets_applied_when_letterboxed() {
        // 200x100 image in 100x100 container: scale 0.5, offset_y 25
        let primitives = render_one(
            [20.0, 20.0, 100.0, 60.0],
            Size2D::new(200.0, 100.0),
            Size2D::new(100.0, 100.0),
        );
        let rect = primitives[0].as_rect().unwrap();
        assert!((rect.left - 10.0).abs() < 1e-9);
        assert!((rect.top - 35.0).abs() < 1e-9);
        assert!((rect.width - 40.0).abs() < 1e-9);
        assert!((rect.height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_unlaid_container_renders_at_natural_size() {
        let primitives = render_one(
            [0.25, 0.25, 0.5, 0.5],
            Size2D::new(200.0, 100.0),
            Size2D::new(0.0, 0.0),
        );
        let rect = primitives[0].as_rect().unwrap();
        assert!((rect.left - 50.0).abs() < 1e-6);
        assert!((rect.top - 25.0).abs() < 1e-6);
        assert!((rect.width - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_natural_size_is_reported() {
        let set = RawDetectionSet::new(vec![0.0, 0.0, 1.0, 1.0], vec![0.9], vec![]).unwrap();
        let result = OverlayRenderer::default().render(
            &mut LabelColorTable::default(),
            &set,
            Size2D::new(0.0, 100.0),
            Size2D::new(100.0, 100.0),
            0.0,
        );
        assert!(matches!(result, Err(OverlayError::InvalidImageSize { .. })));
    }

    #[test]
    fn test_custom_style() {
        let style = OverlayStyle {
            label_offset: 4.0,
            min_extent: 3.0,
            ..OverlayStyle::default()
        };
        let renderer = OverlayRenderer::new(CoordinateNormalizer::default(), style);
        let set = RawDetectionSet::new(vec![10.0, 10.0, 10.0, 10.0], vec![0.9], vec![]).unwrap();
        let primitives = renderer
            .render(
                &mut LabelColorTable::default(),
                &set,
                Size2D::new(100.0, 100.0),
                Size2D::new(100.0, 100.0),
                0.5,
            )
            .unwrap();

        assert_eq!(renderer.style().label_offset, 4.0);
        assert_eq!(primitives[0].as_rect().unwrap().width, 3.0);
        assert_eq!(primitives[1].as_text().unwrap().top, 6.0);
        assert_eq!(primitives[1].as_text().unwrap().background, Rgb::RED);
    }

    #[test]
    fn test_primitive_json_shape() {
        let primitives = render_one(
            [0.0, 0.0, 0.5, 0.5],
            Size2D::new(400.0, 300.0),
            Size2D::new(200.0, 150.0),
        );
        let json = serde_json::to_value(&primitives).unwrap();

        assert_eq!(json[0]["kind"], "rect");
        assert_eq!(json[1]["kind"], "text");
        assert_eq!(json[1]["text"], "dog 80.0%");
        assert_eq!(json[1]["foreground"], "#FFFF00");
    }
}
