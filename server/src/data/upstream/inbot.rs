use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use super::error::UpstreamError;
use super::{FlowQuery, FlowSource};
use crate::core::config::UpstreamConfig;
use crate::core::constants::{UPSTREAM_ACTION, UPSTREAM_TOKEN_HEADER};

/// Request body expected by the admin endpoint
#[derive(Debug, Serialize)]
struct UserVariablesRequest<'a> {
    action: &'static str,
    bot_id: i64,
    db_user_bot_server_type: &'a str,
    date1: &'a str,
    date2: &'a str,
    flow_name: &'a str,
    is_ajax: u8,
}

impl<'a> From<&'a FlowQuery> for UserVariablesRequest<'a> {
    fn from(query: &'a FlowQuery) -> Self {
        Self {
            action: UPSTREAM_ACTION,
            bot_id: query.bot_id,
            db_user_bot_server_type: &query.server,
            date1: &query.start_date,
            date2: &query.end_date,
            flow_name: &query.flow_name,
            is_ajax: 1,
        }
    }
}

#[derive(Debug)]
pub struct InBotClient {
    client: reqwest::Client,
    url: String,
}

impl InBotClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            headers.insert(
                UPSTREAM_TOKEN_HEADER,
                HeaderValue::from_str(token)
                    .map_err(|e| UpstreamError::Config(format!("invalid upstream token: {}", e)))?,
            );
        } else {
            tracing::warn!("No upstream token configured, requests will be unauthenticated");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| UpstreamError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(url = %config.url, timeout_secs = config.timeout_secs, "InBot client initialized");
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl FlowSource for InBotClient {
    async fn fetch(&self, query: &FlowQuery) -> Result<Value, UpstreamError> {
        tracing::debug!(
            bot_id = query.bot_id,
            flow = %query.flow_name,
            start = %query.start_date,
            end = %query.end_date,
            "Fetching flow records"
        );

        let resp = self
            .client
            .post(&self.url)
            .json(&UserVariablesRequest::from(query))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(UpstreamError::status(resp.status(), &self.url));
        }

        // An empty 200 reply means "no data", same as a JSON null
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!("Upstream returned an empty body");
            return Ok(Value::Null);
        }

        let body: Value = serde_json::from_slice(&bytes)?;
        if let Some(records) = body.as_array() {
            tracing::debug!(records = records.len(), "Flow records received");
        }
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "inbot"
    }
}
