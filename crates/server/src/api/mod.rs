pub mod files;
pub mod health;
pub mod schemas;

use axum::Router;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, Request, header};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use filehub_core::UploadPolicy;
use filehub_service::FileService;

/// Header carrying the uploading user's id, set by an upstream auth layer.
pub const OWNER_ID_HEADER: &str = "x-owner-id";

/// Multipart overhead allowed on top of twice the upload ceiling.
const MULTIPART_SLACK_BYTES: usize = 64 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The file service instance.
    pub service: FileService,
}

/// Request body limit for a given upload policy.
///
/// Set above the policy ceiling so that a slightly oversized file reaches
/// the service and is rejected as an invalid payload, not cut off mid-stream.
pub fn body_limit(policy: &UploadPolicy) -> usize {
    usize::try_from(policy.max_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_mul(2)
        .saturating_add(MULTIPART_SLACK_BYTES)
}

/// Build the Axum router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let limit = body_limit(&state.service.config().policy);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let http = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetResponseHeaderLayer::overriding(
            header::SERVER,
            HeaderValue::from_static("filehub"),
        ))
        .layer(cors);

    Router::new()
        .route("/health", get(health::health))
        .route("/v1/file", post(files::upload_file))
        .route("/v1/file/{id}", get(files::get_file))
        .layer(DefaultBodyLimit::max(limit))
        .layer(http)
        .with_state(state)
}
