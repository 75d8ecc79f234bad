//! HTTP routes of the demo application.

use axum::{Json, Router, routing::get};
use pushdeploy_common::FirstNames;
use tower_http::trace::TraceLayer;

/// Body returned by `GET /`.
pub const INDEX_BODY: &str = "Flask is running!";

async fn index() -> &'static str {
    INDEX_BODY
}

async fn names() -> Json<FirstNames> {
    Json(FirstNames::demo())
}

/// Build the application router.
pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/data", get(names))
        .layer(TraceLayer::new_for_http())
}
