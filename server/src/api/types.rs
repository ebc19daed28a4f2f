//! Shared API types
//!
//! Error bodies keep the field names the dashboard front-end reads:
//! `{"error": ...}` for validation and plain failures, `{"message", "error"}`
//! when an upstream failure is reported with its cause.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Missing or empty query parameter
pub const MSG_MISSING_PARAMS: &str =
    "Todos os parâmetros são obrigatórios: startDate, endDate, botId, flowName e server";

/// `startDate`/`endDate` not `YYYY-MM-DD`
pub const MSG_INVALID_DATE: &str = "Formato de data inválido. Use YYYY-MM-DD";

/// `botId` not an integer
pub const MSG_INVALID_BOT_ID: &str = "O parâmetro botId deve ser um número inteiro";

/// Upstream failure while building the dashboard
pub const MSG_DASHBOARD_FAILED: &str = "Erro interno do servidor ao buscar dados do dashboard.";

/// Generic server failure
pub const MSG_INTERNAL: &str = "Erro interno do servidor";

/// `{"error": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"message": "...", "error": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailedErrorBody {
    pub message: String,
    pub error: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String },
    /// Failure reported together with its cause
    Upstream { message: String, detail: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>, detail: impl ToString) -> Self {
        Self::Upstream {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message })).into_response()
            }
            Self::Upstream { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DetailedErrorBody {
                    message,
                    error: detail,
                }),
            )
                .into_response(),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
        }
    }
}
