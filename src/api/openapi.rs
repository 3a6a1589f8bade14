//! OpenAPI documentation generated at compile time with utoipa

use utoipa::OpenApi;

/// OpenAPI documentation for the patent-dl HTTP front end
///
/// Served as JSON from `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "patent-dl HTTP API",
        version = "0.1.0",
        description = "Resolve patent identifiers to PDF documents and serve downloaded files",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::api::routes::download,
        crate::api::routes::serve_pdf,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::Identifier,
        crate::types::DownloadOutcome,
        crate::api::routes::DownloadForm,
        crate::api::routes::DownloadResponse,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "download", description = "Single-identifier download and file serving"),
        (name = "system", description = "Health and API documentation")
    )
)]
pub struct ApiDoc;
