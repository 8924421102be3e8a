use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum FinancaApiError {
    /// The server answered with its `{"success": false, "error": ...}` envelope.
    Server(StatusCode, String),
    Internal(ApiError),
}

impl From<ApiError> for FinancaApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                // Non-envelope bodies (proxies, HTML error pages) fall back to the raw text.
                let message = serde_json::from_str::<ErrorResponse>(&detail)
                    .map(|r| r.error)
                    .unwrap_or(detail);
                FinancaApiError::Server(status, message)
            }
            e => FinancaApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for FinancaApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinancaApiError::Internal(e) => write!(f, "Internal error: {}", e),
            FinancaApiError::Server(status, message) => write!(f, "({}) {}", status, message),
        }
    }
}

impl std::error::Error for FinancaApiError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
