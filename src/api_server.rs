// Axum API Server Module
//
// Purpose: REST API over the in-memory vehicle table
// Endpoints: /health, /segments, /compare

#[cfg(feature = "api")]
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use std::path::Path;

#[cfg(feature = "api")]
use crate::comparison::{compare, ComparisonError, ComparisonRequest, ComparisonResponse};

#[cfg(feature = "api")]
use crate::data::VehicleTable;

// ============================================================================
// Application State
// ============================================================================

/// Shared, read-only state handed to every handler
#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<VehicleTable>,
}

#[cfg(feature = "api")]
impl AppState {
    /// Load the dataset at `dataset_path`. A missing file starts the server
    /// with an empty table.
    pub fn new(dataset_path: &Path) -> anyhow::Result<Self> {
        tracing::info!("Loading vehicle table...");
        let vehicles = VehicleTable::load(dataset_path)?;
        Ok(Self::from_table(vehicles))
    }

    pub fn from_table(vehicles: VehicleTable) -> Self {
        Self {
            vehicles: Arc::new(vehicles),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/segments", get(get_segments))
        .route("/compare", post(compare_vehicles))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Any origin
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "dataset_loaded": state.vehicles.is_loaded(),
        "total_vehicles": state.vehicles.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn get_segments(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.vehicles.is_loaded() {
        return Err(AppError::DatasetUnavailable);
    }

    let segments = state.vehicles.segments();
    tracing::debug!("Serving {} segments", segments.len());

    Ok(Json(serde_json::json!({ "segments": segments })))
}

#[cfg(feature = "api")]
async fn compare_vehicles(
    State(state): State<AppState>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    tracing::debug!(
        "Compare request: segment='{}' daily_mileage={} ownership_years={}",
        request.vehicle_segment,
        request.daily_mileage,
        request.ownership_years
    );

    let response = compare(&state.vehicles, &request)?;
    Ok(Json(response))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    DatasetUnavailable,
}

#[cfg(feature = "api")]
impl From<ComparisonError> for AppError {
    fn from(err: ComparisonError) -> Self {
        match err {
            ComparisonError::DatasetUnavailable => AppError::DatasetUnavailable,
            ComparisonError::NonPositiveMileage
            | ComparisonError::NonPositiveOwnership
            | ComparisonError::MissingSegment => AppError::BadRequest(err.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatasetUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ComparisonError::DatasetUnavailable.to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!("{}", message);
        }

        // `detail` mirrors `error` for browser clients that read it
        let body = Json(serde_json::json!({
            "error": message,
            "detail": message
        }));

        (status, body).into_response()
    }
}
