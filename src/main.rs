use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;
mod error;
mod estimator;
mod models;

#[cfg(test)]
mod tests;

use config::Config;
use error::{ApiError, EstimationError};
use estimator::{IntensityLevel, CATALOG};
use models::{display_value, CalorieResponse, CatalogResponse, IntensityEntry, WorkoutRequest};

const DEFAULT_LOG_FILTER: &str = "calorie_estimator_api=info,tower_http=info";

/// Stateless calorie estimation API.
/// The catalog is static; state only carries process metadata.
#[derive(Clone)]
struct AppState {
    started_at: DateTime<Utc>,
}

impl AppState {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    let app = build_router(AppState::new(), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "calorie estimator listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/calculate-calories", post(calculate_calories))
        .route("/api/exercises", get(list_exercises))
        .layer(config.cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    concat!("Calorie Estimator API v", env!("CARGO_PKG_VERSION"))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let now = Utc::now();
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": now.to_rfc3339(),
        "uptime_seconds": (now - state.started_at).num_seconds(),
    }))
}

/// Estimate calories for one workout.
/// Only missing fields or an unreadable body are rejected; anything that
/// goes wrong after validation degrades to a flat-rate estimate.
async fn calculate_calories(
    body: Result<Json<WorkoutRequest>, JsonRejection>,
) -> Result<Json<CalorieResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    if !request.has_required_fields() {
        warn!("rejected workout with missing fields");
        return Err(ApiError::MissingFields);
    }

    let request_id = Uuid::new_v4();
    let date = request.date.as_ref().map(display_value);
    let span = info_span!("estimate", %request_id, date = date.as_deref());

    let response = span.in_scope(|| match estimate_workout(&request) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "estimate failed, using flat-rate fallback");
            fallback_response(&request)
        }
    });

    Ok(Json(response))
}

fn estimate_workout(request: &WorkoutRequest) -> Result<CalorieResponse, EstimationError> {
    let exercise = request.exercise_text()?;
    let duration = request.duration_minutes()?;
    let intensity = request.intensity_label();

    let estimate = estimator::calculate(exercise, duration, &intensity);
    let explanation = estimator::explain(&estimate, &request.duration_text(), &intensity);

    info!(
        exercise = estimate.resolved_name,
        duration,
        intensity = %intensity,
        calories = estimate.calories,
        "estimated workout"
    );

    Ok(CalorieResponse {
        calories: estimate.calories,
        explanation,
    })
}

/// Conservative per-minute estimate built from the already-parsed request
fn fallback_response(request: &WorkoutRequest) -> CalorieResponse {
    let calories = estimator::fallback_calories(request.duration_minutes().ok());

    let explanation = format!(
        "Due to a technical issue, I'm providing a basic estimate: approximately {} calories burned \
         during {} minutes of {} at {} intensity. This is a conservative estimate based on general \
         fitness guidelines.",
        calories,
        request.duration_text(),
        display_value(&request.exercise),
        request.intensity_label(),
    );

    CalorieResponse {
        calories,
        explanation,
    }
}

/// Known exercises in match order, plus intensity multipliers
async fn list_exercises() -> Json<CatalogResponse> {
    let intensities = IntensityLevel::ALL
        .iter()
        .map(|level| IntensityEntry {
            label: level.label(),
            multiplier: level.multiplier(),
        })
        .collect();

    Json(CatalogResponse {
        exercises: CATALOG,
        intensities,
    })
}
