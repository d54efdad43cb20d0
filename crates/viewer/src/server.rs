use crate::errors::ViewerError;
use crate::image_loader::{has_image_extension, probe_image};
use crate::state::{AppState, OverlayRequest, OverlayResponse};
use crate::ws::ws_handler;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use overlay::types::DEFAULT_DPI;
use overlay::{Dpi, OverlayError, PredictionSummary, RawDetectionSet, Size2D};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/images", post(open_image))
        .route("/detections", post(push_detections))
        .route("/overlay", get(get_overlay))
        .route("/predictions", get(get_predictions))
        .route("/session/reset", post(reset_session))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.listen_addr.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Viewer listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct OpenImageRequest {
    pub path: PathBuf,
    pub dpi_x: Option<f64>,
    pub dpi_y: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct OpenImageResponse {
    pub image: u64,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub natural_size: Size2D,
    pub detections: usize,
}

/// Opens an image, clears the previous overlay and runs the detector.
async fn open_image(
    State(state): State<AppState>,
    Json(request): Json<OpenImageRequest>,
) -> Result<Json<OpenImageResponse>, ViewerError> {
    let dpi = Dpi::new(
        request.dpi_x.unwrap_or(DEFAULT_DPI),
        request.dpi_y.unwrap_or(DEFAULT_DPI),
    );
    if !has_image_extension(&request.path) {
        tracing::warn!(path = %request.path.display(), "Unrecognized image extension, probing content");
    }

    let path = request.path.clone();
    let loaded = tokio::task::spawn_blocking(move || probe_image(&path, dpi)).await??;

    let ticket = state
        .session
        .lock()
        .await
        .on_image_loaded(loaded.natural_size)?;

    let detector = Arc::clone(&state.detector);
    let path = loaded.path.clone();
    let detections = tokio::task::spawn_blocking(move || detector.detect(&path))
        .await?
        .map_err(ViewerError::Detector)?;

    let count = state
        .session
        .lock()
        .await
        .on_detection_complete(ticket, detections)?;
    state.metrics.record_detections(count);

    Ok(Json(OpenImageResponse {
        image: ticket.id(),
        pixel_width: loaded.pixel_width,
        pixel_height: loaded.pixel_height,
        natural_size: loaded.natural_size,
        detections: count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PushDetectionsQuery {
    /// Image the detections were computed for; defaults to the current one.
    pub image: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PushDetectionsResponse {
    pub image: u64,
    pub detections: usize,
}

/// Accepts a result from an external detector for the current image.
async fn push_detections(
    State(state): State<AppState>,
    Query(query): Query<PushDetectionsQuery>,
    Json(detections): Json<RawDetectionSet>,
) -> Result<Json<PushDetectionsResponse>, ViewerError> {
    let mut session = state.session.lock().await;
    let current = session
        .current_ticket()
        .ok_or(OverlayError::NoImageLoaded)?;

    if let Some(image) = query.image {
        if image != current.id() {
            return Err(OverlayError::StaleDetection {
                ticket: image,
                current: current.id(),
            }
            .into());
        }
    }

    let count = session.on_detection_complete(current, detections)?;
    drop(session);
    state.metrics.record_detections(count);

    Ok(Json(PushDetectionsResponse {
        image: current.id(),
        detections: count,
    }))
}

async fn get_overlay(
    State(state): State<AppState>,
    Query(request): Query<OverlayRequest>,
) -> Result<Json<OverlayResponse>, ViewerError> {
    Ok(Json(state.render_overlay(request, "http").await?))
}

async fn get_predictions(State(state): State<AppState>) -> Json<PredictionSummary> {
    let summary = state
        .session
        .lock()
        .await
        .summary()
        .unwrap_or_else(|| PredictionSummary::from_set(&RawDetectionSet::empty()));
    Json(summary)
}

async fn reset_session(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.reset();
    StatusCode::NO_CONTENT
}
