//! HTTP surface: health checks, translation, recommendations and metrics.

use crate::catalog::{self, Recommendation};
use crate::error::{CatalogError, TranslationError};
use crate::metrics::MetricsReport;
use crate::security::{api_key_authorized, API_KEY_HEADER};
use crate::translation::{Orchestrator, TranslationOutput};
use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub started_at: DateTime<Utc>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, api_key: Option<String>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            started_at: Utc::now(),
            api_key: api_key.map(Arc::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: Value,
    #[serde(alias = "from_ln")]
    pub from: String,
    #[serde(alias = "to_ln")]
    pub to: String,
    #[serde(default, alias = "excludedKeys")]
    pub excluded_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: TranslationOutput,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub payload: Value,
    #[serde(alias = "type")]
    pub domain: String,
}

/// A failed request: status plus `{"error": <tag>, "message": <text>}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    tag: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({"error": self.tag, "message": self.message}));
        (self.status, body).into_response()
    }
}

impl From<TranslationError> for ApiError {
    fn from(err: TranslationError) -> Self {
        let status = match err {
            TranslationError::UnsupportedLanguage { .. }
            | TranslationError::UnsupportedPair { .. }
            | TranslationError::InputTooLarge { .. }
            | TranslationError::UnsupportedInputShape(_) => StatusCode::BAD_REQUEST,
            TranslationError::ProvisioningFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TranslationError::Backend(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            tag: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            tag: err.code(),
            message: err.to_string(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let guarded = Router::new()
        .route("/translate", post(translate))
        .route("/recommend", post(recommend))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/datecheck", get(datecheck))
        .route("/metrics", get(metrics))
        .merge(guarded)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !api_key_authorized(state.api_key.as_deref(), provided) {
        warn!("Rejected request to {} with missing or wrong API key", request.uri().path());
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        )
            .into_response();
    }
    next.run(request).await
}

async fn healthcheck() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn datecheck(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"date": state.started_at.to_rfc3339()}))
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.orchestrator.metrics().report())
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let translated_text = state
        .orchestrator
        .translate(
            request.text,
            &request.from,
            &request.to,
            &request.excluded_keys,
        )
        .await?;
    Ok(Json(TranslateResponse { translated_text }))
}

async fn recommend(Json(request): Json<RecommendRequest>) -> Result<Json<Recommendation>, ApiError> {
    Ok(Json(catalog::recommend(&request.payload, &request.domain)?))
}
