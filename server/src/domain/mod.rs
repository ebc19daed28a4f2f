//! Domain logic for the flow dashboard
//!
//! - `dashboard` - record aggregation, metric derivation and layout assembly

pub mod dashboard;

pub use dashboard::{Aggregates, Dashboard, DashboardService};
