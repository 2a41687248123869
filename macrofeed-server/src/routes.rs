// File: macrofeed-server/src/routes.rs

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use macrofeed_common::models::{Ack, HealthStatus, UpdateRecord, WebhookPayload};

use crate::store::UpdateStore;

pub const UNKNOWN_MACRO: &str = "Unknown";

/// Shared state for the Axum routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UpdateStore>,
    pub macros: Arc<Vec<String>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/macro", post(receive_webhook))
        .route("/api/macros", get(list_macros))
        .route("/api/updates/{macro_name}", get(list_updates))
        .route("/api/updates/{macro_name}/{update_id}", get(get_update))
        .route("/api/clear/{macro_name}", post(clear_macro))
        .route("/api/clear-all", post(clear_all))
        .route("/health", get(health))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Ack>) {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            warn!("Webhook error: {}", e);
            return (StatusCode::BAD_REQUEST, Json(Ack::failed(e.to_string())));
        }
    };

    let macro_name = payload.macro_name.unwrap_or_else(|| UNKNOWN_MACRO.to_string());
    let content = payload.content.unwrap_or_default();
    let author = payload.author.and_then(|a| a.name);

    let summary = if content.is_empty() { "Embed message".to_string() } else { content.clone() };
    state
        .store
        .record(&macro_name, content, payload.embeds.unwrap_or_default(), author)
        .await;
    info!("[{}] Received update: {}", macro_name, summary);

    (StatusCode::OK, Json(Ack::ok("Macro update received")))
}

async fn list_macros(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.macros.as_ref().clone())
}

async fn list_updates(
    State(state): State<AppState>,
    Path(macro_name): Path<String>,
) -> Json<Vec<UpdateRecord>> {
    Json(state.store.list(&macro_name).await)
}

async fn get_update(
    State(state): State<AppState>,
    Path((macro_name, update_id)): Path<(String, i64)>,
) -> Result<Json<UpdateRecord>, (StatusCode, Json<Ack>)> {
    state
        .store
        .get(&macro_name, update_id)
        .await
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(Ack::failed("Update not found"))))
}

async fn clear_macro(State(state): State<AppState>, Path(macro_name): Path<String>) -> Json<Ack> {
    state.store.clear(&macro_name).await;
    info!("Cleared updates for {}", macro_name);
    Json(Ack::ok(format!("Updates cleared for {}", macro_name)))
}

async fn clear_all(State(state): State<AppState>) -> Json<Ack> {
    state.store.clear_all().await;
    info!("Cleared updates for all macros");
    Json(Ack::ok("All updates cleared"))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok".to_string() })
}
