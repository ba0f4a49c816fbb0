//! HTTP upload endpoint
//!
//! `POST /analyze` accepts a multipart form with an `audio` file field,
//! stores it through the [`UploadStore`], runs the analysis on tokio's
//! blocking pool and returns the outcome as JSON. Analysis failures are
//! returned as a `200` error record; only malformed requests get a `4xx`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::analysis::result::AnalysisOutcome;
use crate::config::AnalysisConfig;
use crate::upload::UploadStore;

/// Largest accepted request body
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Port used when neither an address nor `PORT` is given
const DEFAULT_PORT: u16 = 5000;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct ServerState {
    uploads: Arc<UploadStore>,
    config: Arc<AnalysisConfig>,
}

impl ServerState {
    /// Bundle the upload store and analysis configuration
    pub fn new(uploads: UploadStore, config: AnalysisConfig) -> Self {
        Self {
            uploads: Arc::new(uploads),
            config: Arc::new(config),
        }
    }
}

/// HTTP error variants mapped to JSON responses.
#[derive(Debug)]
pub enum HttpServerError {
    /// Client sent an unusable request
    BadRequest(&'static str),
    /// Multipart body could not be parsed
    Multipart(String),
    /// Server-side failure outside the analysis itself
    Internal(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            Self::Multipart(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Build the Axum router with all handlers.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Run the HTTP server loop.
pub async fn run_server(state: ServerState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {}", addr))?;
    log::info!("Listening on http://{}", addr);
    let router = build_router(state);
    axum::serve(listener, router)
        .await
        .context("serving HTTP router")?;
    Ok(())
}

/// Pick the bind address: explicit value, else `0.0.0.0:$PORT`, else port 5000
pub fn resolve_bind_addr(explicit: Option<SocketAddr>) -> anyhow::Result<SocketAddr> {
    if let Some(addr) = explicit {
        return Ok(addr);
    }
    let port = match std::env::var("PORT") {
        Ok(value) => value
            .parse::<u16>()
            .with_context(|| format!("parsing PORT={:?}", value))?,
        Err(_) => DEFAULT_PORT,
    };
    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn analyze(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, HttpServerError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| HttpServerError::Multipart(err.body_text()))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| HttpServerError::Multipart(err.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or(HttpServerError::BadRequest("No audio file uploaded"))?;
    if file_name.is_empty() {
        return Err(HttpServerError::BadRequest("No selected file"));
    }

    log::info!("Received upload {:?} ({} bytes)", file_name, bytes.len());

    let outcome = tokio::task::spawn_blocking(move || {
        let stored = state.uploads.persist(&bytes)?;
        // `stored` is dropped at the end of this closure, deleting the file
        Ok::<_, crate::error::AnalysisError>(crate::analyze_voice(stored.path(), &state.config))
    })
    .await
    .map_err(|err| HttpServerError::Internal(format!("analysis task failed: {}", err)))?
    .map_err(|err| HttpServerError::Internal(err.to_string()))?;

    Ok(Json(outcome))
}
