//! Data access layer
//!
//! - `upstream` - `FlowSource` trait and the InBot HTTP client
//! - `fallback` - local data file used when the upstream returns `null`

pub mod fallback;
pub mod upstream;

pub use fallback::FallbackSource;
pub use upstream::{FlowQuery, FlowSource, InBotClient, UpstreamError};

use std::sync::Arc;

use serde_json::Value;

use crate::core::config::AppConfig;

/// Fetches flow records, substituting the fallback file for a `null` reply
#[derive(Debug, Clone)]
pub struct FlowDataService {
    source: Arc<dyn FlowSource>,
    fallback: FallbackSource,
}

impl FlowDataService {
    pub fn new(source: Arc<dyn FlowSource>, fallback: FallbackSource) -> Self {
        Self { source, fallback }
    }

    /// Build the InBot-backed service from configuration
    pub fn init(config: &AppConfig) -> Result<Self, UpstreamError> {
        let client = InBotClient::new(&config.upstream)?;
        Ok(Self::new(
            Arc::new(client),
            FallbackSource::new(&config.fallback.path),
        ))
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn fetch(&self, query: &FlowQuery) -> Result<Value, UpstreamError> {
        let payload = self.source.fetch(query).await?;
        if !is_empty_reply(&payload) {
            return Ok(payload);
        }

        tracing::info!(
            source = self.source.name(),
            path = %self.fallback.path().display(),
            "Upstream returned no data, using fallback file"
        );
        self.fallback.load().await
    }
}

/// `null`, `false`, `0` and `""` carry no records. Empty arrays and objects
/// are real replies and go through aggregation as is.
fn is_empty_reply(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
