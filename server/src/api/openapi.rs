//! OpenAPI document

use axum::http::header;
use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::extractors::FlowParams;
use crate::api::routes::{dashboard, flow, health};
use crate::api::types::{DetailedErrorBody, ErrorBody};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flowdash API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Chatbot flow dashboard backend"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "dashboard", description = "Dashboard layout"),
        (name = "flow", description = "Aggregated flow records")
    ),
    paths(
        health::health,
        dashboard::dashboard_data,
        flow::flow,
    ),
    components(schemas(
        health::HealthResponse,
        FlowParams,
        flow::FlowResponse,
        ErrorBody,
        DetailedErrorBody,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON document
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}
