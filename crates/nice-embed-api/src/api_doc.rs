//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::handlers::health::HealthResponse;
use crate::handlers::upload::UploadResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "nice-embed",
        version = "0.1.0",
        description = "Upload files for sharing in chat. Video uploads get an HTML page with player metadata so Discord shows an inline preview."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::index::index,
        handlers::health::health_check,
    ),
    components(schemas(UploadResponse, ErrorResponse, HealthResponse)),
    tags(
        (name = "uploads", description = "File uploads and embed pages"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
