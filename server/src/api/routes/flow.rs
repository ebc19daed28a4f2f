//! Raw flow aggregation endpoint

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use super::FlowApiState;
use crate::api::extractors::FlowParams;
use crate::api::types::{ApiError, ErrorBody, MSG_INTERNAL};
use crate::domain::Aggregates;

/// Request parameters echoed back with the aggregated records
#[derive(Debug, Serialize, ToSchema)]
pub struct FlowResponse {
    #[serde(flatten)]
    pub params: FlowParams,
    #[schema(value_type = Object)]
    pub data: Aggregates,
}

/// Step counts and value details for a bot flow
#[utoipa::path(
    get,
    path = "/api/flow",
    tag = "flow",
    params(FlowParams),
    responses(
        (status = 200, description = "Aggregated flow records", body = FlowResponse),
        (status = 400, description = "Missing parameter or bad date format", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub async fn flow(
    State(state): State<FlowApiState>,
    params: FlowParams,
) -> Result<impl IntoResponse, ApiError> {
    params.check_dates()?;
    let query = params.to_query()?;

    let payload = state.flows.fetch(&query).await.map_err(|e| {
        tracing::error!(error = %e, bot_id = query.bot_id, "Failed to fetch flow data");
        ApiError::internal(MSG_INTERNAL)
    })?;

    let data = state.dashboard.aggregate(&payload);
    Ok(Json(FlowResponse { params, data }))
}
