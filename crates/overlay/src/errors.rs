use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: f64, height: f64 },

    #[error("Container not laid out yet: {width}x{height}")]
    GeometryUnavailable { width: f64, height: f64 },

    #[error("Malformed detection set: {0}")]
    MalformedDetectionSet(String),

    #[error("Stale detection for image #{ticket} (current image is #{current})")]
    StaleDetection { ticket: u64, current: u64 },

    #[error("No image loaded")]
    NoImageLoaded,
}

impl OverlayError {
    /// Whether the caller can carry on rendering after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OverlayError::GeometryUnavailable { .. } | OverlayError::StaleDetection { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        let err = OverlayError::InvalidImageSize {
            width: 0.0,
            height: 300.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid image size: 0x300",
            "InvalidImageSize should display both dimensions"
        );

        let err = OverlayError::GeometryUnavailable {
            width: 0.0,
            height: 0.0,
        };
        assert_eq!(err.to_string(), "Container not laid out yet: 0x0");

        let err = OverlayError::MalformedDetectionSet("7 box values".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed detection set: 7 box values",
            "MalformedDetectionSet should carry the reason"
        );

        let err = OverlayError::StaleDetection {
            ticket: 1,
            current: 2,
        };
        assert_eq!(
            err.to_string(),
            "Stale detection for image #1 (current image is #2)"
        );

        assert_eq!(OverlayError::NoImageLoaded.to_string(), "No image loaded");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(
            OverlayError::GeometryUnavailable {
                width: 0.0,
                height: 10.0
            }
            .is_recoverable()
        );
        assert!(
            OverlayError::StaleDetection {
                ticket: 3,
                current: 4
            }
            .is_recoverable()
        );
        assert!(
            !OverlayError::InvalidImageSize {
                width: 0.0,
                height: 0.0
            }
            .is_recoverable()
        );
        assert!(!OverlayError::MalformedDetectionSet(String::new()).is_recoverable());
    }
}
