//! API route handlers

pub mod dashboard;
pub mod flow;
pub mod health;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::data::FlowDataService;
use crate::domain::DashboardService;

#[derive(Clone)]
pub struct FlowApiState {
    pub dashboard: Arc<DashboardService>,
    pub flows: Arc<FlowDataService>,
}

/// Routes that fetch flow data
pub fn routes(dashboard: Arc<DashboardService>, flows: Arc<FlowDataService>) -> Router<()> {
    let state = FlowApiState { dashboard, flows };

    Router::new()
        .route("/api/dashboard-data", get(dashboard::dashboard_data))
        .route("/api/dashboard-data/", get(dashboard::dashboard_data))
        .route("/api/flow", get(flow::flow))
        .with_state(state)
}
