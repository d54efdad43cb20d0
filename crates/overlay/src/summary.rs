use crate::render::score_percent;
use crate::types::RawDetectionSet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionLine {
    pub index: usize,
    pub label: String,
    pub score: f32,
    pub text: String,
}

/// Text listing of every raw detection, independent of the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub total: usize,
    pub headline: String,
    pub lines: Vec<PredictionLine>,
}

impl PredictionSummary {
    pub fn from_set(set: &RawDetectionSet) -> Self {
        let lines = set
            .scores()
            .iter()
            .enumerate()
            .map(|(index, score)| {
                let label = set.label(index);
                PredictionLine {
                    index,
                    label: label.to_string(),
                    score: *score,
                    text: format!(
                        "Accuracy: {:.1}% | {} | Box #{}",
                        score_percent(*score),
                        label,
                        index
                    ),
                }
            })
            .collect();

        Self {
            total: set.len(),
            headline: format!("Detections found: {}", set.len()),
            lines,
        }
    }
}

/// Threshold as shown next to the slider, e.g. `"0.30"`.
pub fn format_threshold(threshold: f32) -> String {
    format!("{:.2}", threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_follow_raw_order() {
        let set = RawDetectionSet::new(
            vec![0.0; 8],
            vec![0.25, 0.8],
            vec!["".to_string(), "dog".to_string()],
        )
        .unwrap();
        let summary = PredictionSummary::from_set(&set);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.headline, "Detections found: 2");
        assert_eq!(summary.lines[0].text, "Accuracy: 25.0% |  | Box #0");
        assert_eq!(summary.lines[1].text, "Accuracy: 80.0% | dog | Box #1");
        assert_eq!(summary.lines[1].label, "dog");
    }

    #[test]
    fn test_accuracy_rounds_like_box_labels() {
        let set = RawDetectionSet::new(vec![0.0; 4], vec![0.0625], vec!["cat".to_string()])
            .unwrap();
        let summary = PredictionSummary::from_set(&set);

        assert_eq!(summary.lines[0].text, "Accuracy: 6.3% | cat | Box #0");
    }

    #[test]
    fn test_empty_summary() {
        let summary = PredictionSummary::from_set(&RawDetectionSet::empty());
        assert_eq!(summary.total, 0);
        assert!(summary.lines.is_empty());
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(0.3), "0.30");
        assert_eq!(format_threshold(1.0), "1.00");
        assert_eq!(format_threshold(0.05), "0.05");
    }
}
