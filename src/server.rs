//! JSON HTTP API server.
//!
//! Exposes the assistant over a small JSON-over-HTTP surface suitable for
//! the browser front-end and other clients.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/chat` | Process a chat message |
//! | `GET`  | `/api/schemes` | List or search schemes (`query`, `category`, `state`) |
//! | `GET`  | `/api/schemes/{id}` | Fetch one scheme by id |
//! | `GET`  | `/api/detect` | Detect the language of a text (`text`) |
//! | `GET`  | `/health` | Health check (status + timestamp) |
//!
//! # Error Contract
//!
//! Errors carry a stable machine-readable code; see [`crate::error`].
//! Collaborator failures never surface raw causes, only a localized
//! apology with code `PROCESSING_ERROR`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support the
//! browser-based voice client.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::assistant::{GeminiModel, LanguageModel};
use crate::chat;
use crate::config::Config;
use crate::detect::{self, DetectionResult};
use crate::error::ApiError;
use crate::models::{
    ChatRequest, ChatResponse, SchemeListResponse, SchemeQuery, SchemeResponse,
};
use crate::{db, store};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    pool: SqlitePool,
    model: Arc<dyn LanguageModel>,
}

/// Starts the HTTP server with the production Gemini model.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let model: Arc<dyn LanguageModel> = Arc::new(GeminiModel::new(&config.assistant)?);
    run_server_with_model(config, model).await
}

/// Starts the HTTP server with a caller-provided model implementation.
pub async fn run_server_with_model(
    config: &Config,
    model: Arc<dyn LanguageModel>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pool = db::connect(&config.db).await?;
    crate::migrate::apply(&pool).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        pool,
        model,
    };

    let app = router(state);

    tracing::info!("API server listening on http://{}", bind_addr);
    println!("API server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the route table. Separated from [`run_server`] so tests can
/// drive the router without binding a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/api/schemes", get(handle_list_schemes))
        .route("/api/schemes/{id}", get(handle_get_scheme))
        .route("/api/detect", get(handle_detect))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ POST /api/chat ============

/// Handler for `POST /api/chat`.
async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = chat::process_message(
        &state.pool,
        state.model.as_ref(),
        &state.config.assistant,
        request,
    )
    .await?;

    Ok(Json(response))
}

// ============ GET /api/schemes ============

/// Handler for `GET /api/schemes`.
///
/// With no parameters, returns every active scheme. Any of `query`,
/// `category`, `state` switches to search mode (capped at 10 results).
async fn handle_list_schemes(
    State(state): State<AppState>,
    Query(params): Query<SchemeQuery>,
) -> Result<Json<SchemeListResponse>, ApiError> {
    let schemes = if params.is_empty() {
        store::all_active(&state.pool).await
    } else {
        store::search(&state.pool, &params).await
    }
    .map_err(|e| ApiError::dependency(crate::language::LanguageCode::En, e))?;

    Ok(Json(SchemeListResponse {
        success: true,
        count: schemes.len(),
        data: schemes,
    }))
}

// ============ GET /api/schemes/{id} ============

/// Handler for `GET /api/schemes/{id}`.
async fn handle_get_scheme(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SchemeResponse>, ApiError> {
    let scheme = store::by_id(&state.pool, &id)
        .await
        .map_err(|e| ApiError::dependency(crate::language::LanguageCode::En, e))?
        .ok_or_else(|| ApiError::not_found("Scheme not found"))?;

    Ok(Json(SchemeResponse {
        success: true,
        data: scheme,
    }))
}

// ============ GET /api/detect ============

#[derive(Deserialize)]
struct DetectParams {
    #[serde(default)]
    text: String,
}

/// Handler for `GET /api/detect`.
///
/// Runs the heuristic detector over `text`. Never fails; empty input
/// returns the default language with confidence 0.
async fn handle_detect(Query(params): Query<DetectParams>) -> Json<DetectionResult> {
    Json(detect::detect(&params.text))
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"OK"` when the server is running.
    status: String,
    /// Current server time, RFC 3339.
    timestamp: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
