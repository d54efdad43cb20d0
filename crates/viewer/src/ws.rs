use crate::state::{AppState, OverlayRequest};
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use serde_json::json;

/// Threshold channel: every text frame carries an [`OverlayRequest`] and is
/// answered with the re-rendered overlay.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    tracing::info!("Threshold channel connected");

    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket receive failed");
                break;
            }
        };

        let reply = match message {
            Message::Text(text) => respond(&state, &text).await,
            Message::Close(_) => break,
            _ => continue,
        };

        if socket.send(Message::Text(reply)).await.is_err() {
            break;
        }
    }

    tracing::info!("Threshold channel disconnected");
}

pub(crate) async fn respond(state: &AppState, text: &str) -> String {
    let request = match serde_json::from_str::<OverlayRequest>(text) {
        Ok(request) => request,
        Err(e) => return error_frame(format!("Invalid overlay request: {}", e)),
    };

    match state.render_overlay(request, "ws").await {
        Ok(response) => serde_json::to_string(&response)
            .unwrap_or_else(|e| error_frame(format!("JSON serialization error: {}", e))),
        Err(e) => error_frame(e.to_string()),
    }
}

fn error_frame(message: String) -> String {
    json!({ "error": message }).to_string()
}
