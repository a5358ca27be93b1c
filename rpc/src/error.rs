//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use verity_verification::{ErrorKind, VerificationError};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    Verification(#[from] VerificationError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("metrics are disabled")]
    MetricsDisabled,

    #[error("metrics encoding failed: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::Verification(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::MetricsDisabled => StatusCode::NOT_FOUND,
            RpcError::Metrics(_) | RpcError::Server(_) | RpcError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
