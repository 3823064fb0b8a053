//! HTTP route handlers for the JSON API.
//!
//! Every response carries `Cache-Control: no-store` since the counter changes on
//! each call. Request tracing is enabled via middleware that generates a unique
//! request ID for each incoming request.

pub mod health;
pub mod message;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_API;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with the API routes.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/message", get(message::message))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_API),
        ));

    Router::new()
        .merge(api_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
