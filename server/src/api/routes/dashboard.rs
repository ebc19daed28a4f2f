//! Dashboard layout endpoint

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::FlowApiState;
use crate::api::extractors::FlowParams;
use crate::api::types::{ApiError, DetailedErrorBody, ErrorBody, MSG_DASHBOARD_FAILED};

/// Build the dashboard layout for a bot flow and date window
#[utoipa::path(
    get,
    path = "/api/dashboard-data",
    tag = "dashboard",
    params(FlowParams),
    responses(
        (status = 200, description = "Dashboard cards and sections"),
        (status = 400, description = "Missing or invalid parameter", body = ErrorBody),
        (status = 500, description = "Upstream or fallback failure", body = DetailedErrorBody)
    )
)]
pub async fn dashboard_data(
    State(state): State<FlowApiState>,
    params: FlowParams,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.to_query()?;

    let payload = state.flows.fetch(&query).await.map_err(|e| {
        tracing::error!(
            error = %e,
            bot_id = query.bot_id,
            flow_name = %query.flow_name,
            "Failed to fetch dashboard data"
        );
        ApiError::upstream(MSG_DASHBOARD_FAILED, e)
    })?;

    Ok(Json(state.dashboard.build(&payload)))
}
