//! Route configuration and setup

use crate::error::error_status_middleware;
use crate::handlers::{files, health, signed};
use crate::middleware::request_timeout_middleware;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use filegate_core::Config;
use filegate_infra::{request_id_middleware, request_logging_middleware};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let mut service_routes = Router::new()
        .route("/health", get(health::liveness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        );

    if state.url_signer.is_some() {
        service_routes = service_routes.route("/signed/{object_key}", get(signed::download_signed));
    }

    let app = Router::new()
        .merge(upload_routes(config))
        .merge(with_request_timeout(service_routes, config))
        .with_state(state);

    Ok(app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_logging_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware)))
}

/// `/files` and `/videos`, with the configured error status mapping.
///
/// The status mapping wraps the timeout so timed out uploads are mapped too.
fn upload_routes(config: &Config) -> Router<Arc<AppState>> {
    let routes = Router::new()
        .route("/files", post(files::upload_file))
        .route("/files/{file_name}", get(files::get_file_url))
        .route("/videos", post(files::upload_video))
        .route("/videos/{file_name}", get(files::get_video_url));

    with_request_timeout(routes, config).route_layer(axum::middleware::from_fn_with_state(
        config.error_status_mode(),
        error_status_middleware,
    ))
}

/// Apply `REQUEST_TIMEOUT_SECS` when it is set.
fn with_request_timeout(
    routes: Router<Arc<AppState>>,
    config: &Config,
) -> Router<Arc<AppState>> {
    match config.request_timeout() {
        Some(deadline) => routes.route_layer(axum::middleware::from_fn_with_state(
            deadline,
            request_timeout_middleware,
        )),
        None => routes,
    }
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
