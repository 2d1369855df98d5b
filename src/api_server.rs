// Axum API Server Module
//
// Purpose: Hand the daily view to external renderers as JSON
// Every endpoint answers with renderable data; catalog outages surface as
// placeholder views, not HTTP errors.

#[cfg(feature = "api")]
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
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
use crate::clock::{Clock, LocalClock};
#[cfg(feature = "api")]
use crate::config::Config;
#[cfg(feature = "api")]
use crate::error::ZenError;
#[cfg(feature = "api")]
use crate::fetcher::{Fetcher, HttpFetcher};
#[cfg(feature = "api")]
use crate::service::{DailyView, ZenService};

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ZenService>,
}

#[cfg(feature = "api")]
impl AppState {
    /// Production state: HTTP fetcher + local wall clock
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
        let clock: Arc<dyn Clock> = Arc::new(LocalClock);
        Ok(Self::with_service(ZenService::new(config, fetcher, clock)))
    }

    pub fn with_service(service: ZenService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Daily view (date-derived selection)
        .route("/api/today", get(get_today))

        // Debug navigation: explicit catalog position, wrapped into range
        .route("/api/entries/:index", get(get_entry))

        // Active solar term only
        .route("/api/sekki", get(get_sekki))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn get_today(State(state): State<AppState>) -> Json<DailyView> {
    Json(state.service.today().await)
}

#[cfg(feature = "api")]
async fn get_entry(
    State(state): State<AppState>,
    Path(index): Path<i64>,
) -> Json<DailyView> {
    Json(state.service.at_index(index).await)
}

#[cfg(feature = "api")]
async fn get_sekki(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let def = state.service.current_sekki().await?;
    Ok(Json(serde_json::json!({
        "date": state.service.today_date(),
        "name": def.name,
        "reading": def.reading_annotation,
        "month": def.month,
        "day": def.day,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    Unavailable(String),
    NotFound(String),
    BadRequest(String),
}

#[cfg(feature = "api")]
impl From<ZenError> for AppError {
    fn from(err: ZenError) -> Self {
        match err {
            ZenError::FetchFailure { .. } | ZenError::InvalidConfig(_) => {
                AppError::Unavailable(err.to_string())
            }
            ZenError::NoData(_) => AppError::NotFound(err.to_string()),
            ZenError::InvalidArgument(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
