//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers;
use filegate_infra::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filegate API",
        version = "0.1.0",
        description = "Streams multipart uploads into object storage and issues time-limited signed download URLs."
    ),
    paths(
        handlers::files::upload_file,
        handlers::files::get_file_url,
        handlers::files::upload_video,
        handlers::files::get_video_url,
        handlers::signed::download_signed,
        handlers::health::liveness_check,
    ),
    components(schemas(
        ErrorResponse,
        handlers::files::SignedUrlResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "files", description = "Generic file uploads"),
        (name = "videos", description = "Video uploads"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let spec = get_openapi_spec();
        for path in [
            "/files",
            "/files/{file_name}",
            "/videos",
            "/videos/{file_name}",
            "/signed/{object_key}",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
