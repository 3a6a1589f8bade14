//! Route handlers for the HTTP front end

use super::state::AppState;
use crate::error::{ApiError, Error};
use crate::types::{DownloadOutcome, Identifier};
use crate::utils;
use axum::{
    Form, Json,
    extract::{Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use utoipa::ToSchema;

/// Form body for POST /download
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DownloadForm {
    /// Patent identifier, e.g. "US1234567"
    #[serde(rename = "patentNumber")]
    pub patent_number: String,
}

/// Response body for a successful POST /download
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DownloadResponse {
    /// Always true
    pub success: bool,
    /// Identifier that was resolved
    pub identifier: Identifier,
    /// Page the link was resolved from
    pub initial_url: String,
    /// File name under the results directory (serve it via GET /pdf/{filename})
    pub filename: String,
    /// Downloaded or already present
    pub outcome: DownloadOutcome,
}

/// POST /download - Resolve and download one identifier
#[utoipa::path(
    post,
    path = "/download",
    tag = "download",
    request_body(content = DownloadForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Document downloaded or already present", body = DownloadResponse),
        (status = 400, description = "Invalid identifier", body = ApiError),
        (status = 404, description = "No download link on the page", body = ApiError),
        (status = 502, description = "Page retrieval or transfer failed", body = ApiError),
        (status = 500, description = "Destination could not be written", body = ApiError)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Form(form): Form<DownloadForm>,
) -> Result<Json<DownloadResponse>, Error> {
    let identifier = Identifier::parse(&form.patent_number)?;
    identifier.ensure_file_safe()?;
    let initial_url = state.downloader.page_url(&identifier);

    let outcome = state.downloader.try_acquire(&identifier).await?;
    let path = match &outcome {
        DownloadOutcome::Downloaded { path, .. } | DownloadOutcome::SkippedExisting { path } => {
            path.clone()
        }
        DownloadOutcome::NotFound => {
            return Err(Error::NotFound(format!(
                "no PDF link found for {}",
                identifier
            )));
        }
        DownloadOutcome::Failed { reason } => return Err(Error::Other(reason.clone())),
    };

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(DownloadResponse {
        success: true,
        identifier,
        initial_url,
        filename,
        outcome,
    }))
}

/// GET /pdf/:filename - Serve a downloaded file
#[utoipa::path(
    get,
    path = "/pdf/{filename}",
    tag = "download",
    params(("filename" = String, Path, description = "File name under the results directory")),
    responses(
        (status = 200, description = "File contents", content_type = "application/pdf"),
        (status = 400, description = "File name contains a path separator", body = ApiError),
        (status = 404, description = "No such file", body = ApiError)
    )
)]
pub async fn serve_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    request: Request,
) -> Response {
    if !utils::is_plain_file_name(&filename) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation(format!(
                "invalid file name: {:?}",
                filename
            ))),
        )
            .into_response();
    }

    let path = state.config.download.results_dir.join(&filename);
    if !path.is_file() {
        return Error::NotFound(format!("PDF {}", filename)).into_response();
    }

    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(infallible) => match infallible {},
    }
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /openapi.json - OpenAPI specification
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in JSON format")
    )
)]
pub async fn openapi_spec() -> impl IntoResponse {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;

    Json(ApiDoc::openapi())
}
