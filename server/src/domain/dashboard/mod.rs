//! Dashboard pipeline: records → aggregates → metrics → layout

pub mod aggregate;
pub mod metrics;
pub mod present;
pub mod tables;
pub mod types;

use std::sync::Arc;

use serde_json::Value;

pub use aggregate::{Aggregates, Detail, Record, StepCount, aggregate_payload};
pub use metrics::{DEFAULT_COMPLAINTS_TOP_N, DashboardMetrics};
pub use present::{PresentationOptions, assemble};
pub use tables::ReferenceTables;
pub use types::Dashboard;

use crate::core::config::DashboardConfig;

/// Stateless over requests; holds only the read-only reference tables
#[derive(Debug, Clone)]
pub struct DashboardService {
    tables: Arc<ReferenceTables>,
    complaints_top_n: usize,
    options: PresentationOptions,
}

impl DashboardService {
    pub fn new(config: &DashboardConfig) -> Self {
        let tables = match &config.tables {
            Some(overrides) => ReferenceTables::from_config(overrides),
            None => ReferenceTables::default(),
        };
        Self {
            tables: Arc::new(tables),
            complaints_top_n: config.complaints_top_n,
            options: PresentationOptions {
                show_unavailable: config.show_unavailable,
            },
        }
    }

    /// Aggregation only, as served by `/api/flow`
    pub fn aggregate(&self, payload: &Value) -> Aggregates {
        aggregate_payload(payload)
    }

    /// Full pipeline for `/dashboard-data`
    pub fn build(&self, payload: &Value) -> Dashboard {
        let aggregates = aggregate_payload(payload);
        tracing::debug!(
            steps = aggregates.jornadas.len(),
            details = aggregates.details.len(),
            "Aggregated upstream records"
        );
        let metrics = DashboardMetrics::derive(&aggregates, &self.tables, self.complaints_top_n);
        assemble(&metrics, self.options)
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}
