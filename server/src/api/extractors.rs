//! Query extractors for the flow endpoints
//!
//! Both endpoints take the same five parameters. Presence is checked by the
//! extractor itself so a handler never runs with a missing value; the date
//! format and `botId` checks are applied per endpoint.

use std::sync::OnceLock;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::types::{ApiError, MSG_INVALID_BOT_ID, MSG_INVALID_DATE, MSG_MISSING_PARAMS};
use crate::data::FlowQuery;

fn date_pattern() -> &'static Regex {
    static RE_DATE: OnceLock<Regex> = OnceLock::new();
    RE_DATE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex"))
}

/// Validator function for `YYYY-MM-DD` dates (shape only, no calendar check)
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if date_pattern().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("date_format").with_message(MSG_INVALID_DATE.into()))
    }
}

/// Raw query, every field optional so absence is reported uniformly
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowParamsRaw {
    start_date: Option<String>,
    end_date: Option<String>,
    bot_id: Option<String>,
    flow_name: Option<String>,
    server: Option<String>,
}

/// The five required flow parameters, all present and non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FlowParams {
    /// First day of the window (`YYYY-MM-DD`)
    #[validate(custom(function = "validate_date"))]
    pub start_date: String,
    /// Last day of the window (`YYYY-MM-DD`)
    #[validate(custom(function = "validate_date"))]
    pub end_date: String,
    /// Numeric bot identifier
    pub bot_id: String,
    pub flow_name: String,
    /// InBot database server type
    pub server: String,
}

fn required(value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(MSG_MISSING_PARAMS))
}

impl FlowParams {
    /// Reject dates that are not `YYYY-MM-DD`
    pub fn check_dates(&self) -> Result<(), ApiError> {
        self.validate()
            .map_err(|_| ApiError::bad_request(MSG_INVALID_DATE))
    }

    /// Upstream query; `botId` must be an integer
    pub fn to_query(&self) -> Result<FlowQuery, ApiError> {
        let bot_id = self
            .bot_id
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::bad_request(MSG_INVALID_BOT_ID))?;

        Ok(FlowQuery {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            bot_id,
            flow_name: self.flow_name.clone(),
            server: self.server.clone(),
        })
    }
}

impl<S> FromRequestParts<S> for FlowParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<FlowParamsRaw>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Unparseable query string");
                ApiError::bad_request(MSG_MISSING_PARAMS)
            })?;

        Ok(Self {
            start_date: required(raw.start_date)?,
            end_date: required(raw.end_date)?,
            bot_id: required(raw.bot_id)?,
            flow_name: required(raw.flow_name)?,
            server: required(raw.server)?,
        })
    }
}
