//! HTTP API routes
//!
//! Exposes picker sessions over REST: a page opens a session, streams search
//! input, map clicks and field edits into it, and finally confirms or
//! cancels it.

use crate::error::Error;
use crate::geo::GeoBackend;
use crate::location::{Location, LocationPatch};
use crate::picker::PickerSnapshot;
use crate::server::state::{AppState, SessionEntry};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::debug;
use uuid::Uuid;

/// Create the API router
pub fn create_router<B: GeoBackend>(state: Arc<AppState<B>>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler::<B>))
        .route("/api/sessions", post(create_session_handler::<B>))
        .route(
            "/api/sessions/:id",
            get(session_handler::<B>).delete(delete_session_handler::<B>),
        )
        .route("/api/sessions/:id/query", put(query_handler::<B>))
        .route("/api/sessions/:id/select", post(select_handler::<B>))
        .route("/api/sessions/:id/point", post(point_handler::<B>))
        .route("/api/sessions/:id/pincode", post(pincode_handler::<B>))
        .route("/api/sessions/:id/location", patch(edit_handler::<B>))
        .route("/api/sessions/:id/confirm", post(confirm_handler::<B>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "SESSION_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_STATE" => StatusCode::CONFLICT,
            "NETWORK_ERROR" | "MALFORMED_RESPONSE" => StatusCode::BAD_GATEWAY,
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidSelection(_) => "INVALID_SELECTION",
            Error::InvalidPincode(_) => "INVALID_PINCODE",
            Error::InvalidState(_) => "INVALID_STATE",
            Error::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Error::Network(_) => "NETWORK_ERROR",
            Error::MalformedResponse(_) => "MALFORMED_RESPONSE",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Session view returned by every session endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: PickerSnapshot,
}

async fn session_response<B: GeoBackend>(id: Uuid, entry: &SessionEntry<B>) -> SessionResponse {
    SessionResponse {
        id,
        created_at: entry.created_at,
        snapshot: entry.session.snapshot().await,
    }
}

/// Wait for a background resolution if the client asked to
async fn maybe_wait(handle: JoinHandle<()>, wait: bool) {
    if !wait {
        return;
    }
    // A superseded lookup is cancelled; the snapshot shows whatever won.
    if let Err(e) = handle.await {
        debug!(error = %e, "Resolution did not complete");
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub geocoder: String,
    pub sessions: usize,
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<B: GeoBackend>(State(state): State<Arc<AppState<B>>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: state.config.geocoder.url.clone(),
        sessions: state.session_count().await,
        uptime_secs: state.uptime_secs(),
    })
}

/// Create session request body
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Previously confirmed location to reopen the picker on
    #[serde(default)]
    pub initial: Option<Location>,
}

/// Open a picker session
///
/// POST /api/sessions
async fn create_session_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let (id, entry) = state.open_session(req.initial).await?;
    Ok((StatusCode::CREATED, Json(session_response(id, &entry).await)))
}

/// Current session snapshot
///
/// GET /api/sessions/:id
async fn session_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let entry = state.session(id).await?;
    Ok(Json(session_response(id, &entry).await))
}

/// Cancel and discard a session
///
/// DELETE /api/sessions/:id
async fn delete_session_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.close_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search box update
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
}

/// Feed search box text
///
/// PUT /api/sessions/:id/query
async fn query_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let entry = state.session(id).await?;
    entry.session.set_query(&req.text).await?;
    Ok(Json(session_response(id, &entry).await))
}

/// Search result selection
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// Choose a search result
///
/// POST /api/sessions/:id/select
async fn select_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let entry = state.session(id).await?;
    entry.session.select_result(req.index).await?;
    Ok(Json(session_response(id, &entry).await))
}

/// Map click
#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub lat: f64,
    pub lng: f64,
    /// Respond only after reverse geocoding finishes
    #[serde(default)]
    pub wait: bool,
}

/// Select a point on the map
///
/// POST /api/sessions/:id/point
async fn point_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
    Json(req): Json<PointRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let entry = state.session(id).await?;
    let handle = entry.session.select_point(req.lat, req.lng).await?;
    maybe_wait(handle, req.wait).await;
    Ok(Json(session_response(id, &entry).await))
}

/// Pincode entry
#[derive(Debug, Deserialize)]
pub struct PincodeRequest {
    pub pincode: String,
    /// Respond only after the lookup finishes
    #[serde(default)]
    pub wait: bool,
}

/// Look up a pincode
///
/// POST /api/sessions/:id/pincode
async fn pincode_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
    Json(req): Json<PincodeRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let entry = state.session(id).await?;
    let handle = entry.session.lookup_pincode(&req.pincode).await?;
    maybe_wait(handle, req.wait).await;
    Ok(Json(session_response(id, &entry).await))
}

/// Manual field edits
///
/// PATCH /api/sessions/:id/location
async fn edit_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<LocationPatch>,
) -> Result<Json<SessionResponse>, ApiError> {
    let entry = state.session(id).await?;
    if !patch.is_empty() {
        entry.session.edit(patch).await?;
    }
    Ok(Json(session_response(id, &entry).await))
}

/// Confirm the selection and close the session
///
/// POST /api/sessions/:id/confirm
async fn confirm_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Location>, ApiError> {
    let location = state.confirm_session(id).await?;
    Ok(Json(location))
}
