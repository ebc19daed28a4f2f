//! Upstream flow record sources
//!
//! - `inbot` - HTTP client for the InBot admin API
//! - `error` - shared error type

mod error;
mod inbot;

pub use error::UpstreamError;
pub use inbot::InBotClient;

use async_trait::async_trait;
use serde_json::Value;

/// Validated request window for one bot flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowQuery {
    pub start_date: String,
    pub end_date: String,
    pub bot_id: i64,
    pub flow_name: String,
    /// InBot database server type (`db_user_bot_server_type`)
    pub server: String,
}

/// Source of raw flow records
///
/// Returns the upstream JSON as is. `Value::Null` means the source had
/// nothing to say and callers may fall back to local data.
#[async_trait]
pub trait FlowSource: Send + Sync + std::fmt::Debug {
    async fn fetch(&self, query: &FlowQuery) -> Result<Value, UpstreamError>;

    /// Human-readable source name
    fn name(&self) -> &'static str;
}
