use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use overlay::OverlayError;
use serde_json::json;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Detector failed: {0:#}")]
    Detector(anyhow::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ViewerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ViewerError::Overlay(
                OverlayError::StaleDetection { .. } | OverlayError::NoImageLoaded,
            ) => StatusCode::CONFLICT,
            ViewerError::Overlay(_) | ViewerError::ImageDecode(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ViewerError::Io(e) if e.kind() == io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ViewerError::Detector(_) => StatusCode::BAD_GATEWAY,
            ViewerError::Io(_) | ViewerError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Overlay errors the session shrugs off, such as a result arriving for
    /// an image the user already navigated away from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ViewerError::Overlay(e) if e.is_recoverable())
    }
}

impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if self.is_recoverable() {
            tracing::debug!(status = status.as_u16(), error = %message, "Request ignored");
        } else if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
