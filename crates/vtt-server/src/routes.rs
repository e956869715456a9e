//! The HTTP surface: one router over a shared [`SessionGateway`].

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use vtt_core::{Session, SessionId};
use vtt_session::{ActionEnvelope, CreateSession, SessionError, SessionGateway};

use crate::error::ApiError;

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gateway every request goes through.
    pub gateway: Arc<SessionGateway>,
}

impl AppState {
    /// Wrap a gateway.
    pub fn new(gateway: SessionGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Build the router with all routes and CORS.
///
/// An empty `cors_origins` allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", post(create_session))
        .route(
            "/session/{id}",
            get(read_session).post(submit_action).delete(delete_session),
        )
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}

fn parse_id(raw: &str) -> Result<SessionId, ApiError> {
    SessionId::parse(raw).map_err(|e| ApiError::Session(SessionError::from(e)))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /session/{id}
async fn read_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.gateway.read_session(&id).await?))
}

/// POST /session/{id}: apply one action.
async fn submit_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ActionEnvelope>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let id = parse_id(&id)?;
    let Json(envelope) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(state.gateway.submit_envelope(&id, envelope).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteParams {
    #[serde(default)]
    requester_id: String,
}

/// DELETE /session/{id}?requesterId=...
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state
        .gateway
        .delete_session(&id, &params.requester_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /session: provision a new session.
async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<CreateSession>, JsonRejection>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let session = state.gateway.create_session(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}
