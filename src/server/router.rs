use axum::extract::{MatchedPath, Request};
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info_span, Span};

use crate::app_state::AppState;
use crate::server::constants::UNLOCK_FORM_LIMIT_BYTES;
use crate::server::handlers;

/// Construct the HTTP router with the unlock route and its middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/share-download/:download_id",
            post(handlers::share_download::share_unlock_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(RequestBodyLimitLayer::new(UNLOCK_FORM_LIMIT_BYTES)),
        )
        .with_state(state)
}

/// Span for one HTTP request. Records the route template rather than the URI,
/// which carries the share identifier.
fn request_span(request: &Request) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str);

    info_span!(
        "http_request",
        method = %request.method(),
        matched_path,
    )
}
