//! steward-api — the HTTP surface of the control plane.
//!
//! JSON over HTTP/1.1. Resource operations address a service by path
//! (`PUT /<service>`, `GET /<service>`, `DELETE /<service>`); everything
//! else is a query-string operation (`POST /?CreateMongoDB`,
//! `GET /?CheckServiceInit`, …). Every response echoes a per-request
//! UUID in `x-requestid` and names the system in `server`.

pub mod handlers;

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tracing::Instrument;
use uuid::Uuid;

use steward_core::SYSTEM_NAME;
use steward_manage::CatalogService;

/// Response header carrying the request UUID.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-requestid");

/// Shared state for the handlers.
#[derive(Clone)]
pub struct ApiState {
    pub svc: Arc<CatalogService>,
}

/// Build the complete router.
pub fn build_router(svc: Arc<CatalogService>) -> Router {
    let state = ApiState { svc };
    Router::new()
        .route("/", any(handlers::root_op))
        .route("/{service_name}", any(handlers::service_op))
        .layer(middleware::from_fn(request_meta))
        .with_state(state)
}

/// Generate the request UUID, run the handler inside a span carrying it,
/// and stamp the response headers.
async fn request_meta(req: Request, next: Next) -> Response {
    let requuid = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        %requuid,
    );
    let mut resp = next.run(req).instrument(span).await;

    let headers = resp.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&requuid) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    headers.insert(header::SERVER, HeaderValue::from_static(SYSTEM_NAME));
    resp
}
