//! HTTP API for grid calibration.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::RequestDefaults;
use crate::grid::GridBuilder;
use crate::models::{CountryTable, Grid};
use crate::source::GeometrySource;

/// Application state shared across handlers
pub struct AppState {
    pub source: Arc<dyn GeometrySource>,
    pub countries: CountryTable,
    pub defaults: RequestDefaults,
}

impl AppState {
    pub fn new(
        source: Arc<dyn GeometrySource>,
        countries: CountryTable,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            source,
            countries,
            defaults,
        }
    }
}

/// Build the service router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/calibrator/calibrate", post(calibrate_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalibrateRequest {
    /// Country code, e.g. "US" or "FR"
    pub country: Option<String>,
    /// Cell side length in dataset units (degrees)
    pub cell_size: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Build the calibration grid for a country
async fn calibrate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalibrateRequest>,
) -> Result<(StatusCode, Json<Grid>), ApiError> {
    let code = request
        .country
        .unwrap_or_else(|| state.defaults.country.clone());
    let cell_size = request.cell_size.unwrap_or(state.defaults.cell_size);

    if state.countries.lookup(&code).is_none() {
        warn!(
            "Unknown country code '{}', falling back to {}",
            code,
            state.countries.default_name()
        );
    }
    let country_name = state.countries.resolve(&code).to_string();

    let builder = GridBuilder::new(cell_size).map_err(|e| {
        warn!("Rejected calibrate request for {}: {}", code, e);
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let country = state.source.resolve(&country_name);
    let max_cells = state.defaults.max_cells;
    match builder.candidate_count(&country.geometry) {
        Some(count) if count <= max_cells => {}
        count => {
            let message = format!(
                "Cell size {} is too small for {}: {} candidate cells (limit {})",
                builder.cell_size(),
                country_name,
                count.map_or_else(|| "too many".to_string(), |c| c.to_string()),
                max_cells
            );
            warn!("Rejected calibrate request for {}: {}", code, message);
            return Err(api_error(StatusCode::BAD_REQUEST, message));
        }
    }

    let grid = tokio::task::spawn_blocking(move || builder.build(&country.geometry))
        .await
        .map_err(|e| {
            error!("Grid generation task failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "grid generation failed")
        })?;

    info!(
        "Calibrated {} ({}) at cell size {}: {} cells",
        code,
        country_name,
        cell_size,
        grid.len()
    );

    Ok((StatusCode::CREATED, Json(grid)))
}
