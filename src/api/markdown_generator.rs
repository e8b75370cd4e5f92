//! Markdown Generator Routes
//!
//! Generates markdown documents and serves them back for a limited time.
//!
//! Generated files are stored under a random id and are only reachable
//! through the returned download URL until the retention window elapses.
//!
//! Routes:
//! - POST /markdown-generator/generate - Render and store a document
//! - GET /markdown-generator/downloads/:artifact_id - Download a stored document

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::models::{GenerateRequest, GenerateResponse, ServiceResponse};
use crate::{AppState, Error, Result};

const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Build markdown generator routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_markdown))
        .route("/downloads/:artifact_id", get(download_markdown))
}

// ============================================================================
// Handlers
// ============================================================================

/// Generate a markdown file.
///
/// POST /markdown-generator/generate
///
/// Malformed bodies are reported as validation errors (400) rather than
/// axum's default rejection statuses.
#[axum::debug_handler]
async fn generate_markdown(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<ServiceResponse<GenerateResponse>> {
    let Json(request) = payload.map_err(|rejection| Error::Validation(rejection.body_text()))?;

    let response = state.generator.generate(request).await?;

    Ok(ServiceResponse::success(
        "Markdown file generated successfully",
        response,
    ))
}

/// Download a generated file.
///
/// GET /markdown-generator/downloads/:artifact_id
#[axum::debug_handler]
async fn download_markdown(
    State(state): State<AppState>,
    Path(artifact_id): Path<String>,
) -> Result<Response> {
    let artifact = state.store.read(&artifact_id).await?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.record.display_name),
        )
        .header(header::CONTENT_LENGTH, artifact.content.len())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(artifact.content))
        .map_err(|e| Error::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
