use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum QuoteError {
    /// Provider answered with a non-success status or the request failed
    Upstream { provider: &'static str, message: String },
    UpstreamTimeout { provider: &'static str },
    MalformedResponse { provider: &'static str, message: String },
    DatabaseError(String),
    InternalError(String),
}

impl QuoteError {
    pub fn upstream(provider: &'static str, message: impl Into<String>) -> Self {
        QuoteError::Upstream {
            provider,
            message: message.into(),
        }
    }

    pub fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        QuoteError::MalformedResponse {
            provider,
            message: message.into(),
        }
    }

    /// Machine readable error kind returned to API clients
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::Upstream { .. } => "upstream_error",
            QuoteError::UpstreamTimeout { .. } => "upstream_timeout",
            QuoteError::MalformedResponse { .. } => "malformed_response",
            QuoteError::DatabaseError(_) => "database_error",
            QuoteError::InternalError(_) => "internal_error",
        }
    }
}

impl std::fmt::Display for QuoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteError::Upstream { provider, message } => {
                write!(f, "Upstream error from {}: {}", provider, message)
            }
            QuoteError::UpstreamTimeout { provider } => {
                write!(f, "Upstream request to {} timed out", provider)
            }
            QuoteError::MalformedResponse { provider, message } => {
                write!(f, "Malformed response from {}: {}", provider, message)
            }
            QuoteError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            QuoteError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for QuoteError {}

impl From<sqlx::Error> for QuoteError {
    fn from(e: sqlx::Error) -> Self {
        QuoteError::DatabaseError(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for QuoteError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        QuoteError::DatabaseError(e.to_string())
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            QuoteError::Upstream { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            QuoteError::UpstreamTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            QuoteError::MalformedResponse { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            QuoteError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            QuoteError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            ),
        };

        if status.is_server_error() {
            log::error!("{}", self);
        }

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(QuoteError::upstream("ripio", "boom").kind(), "upstream_error");
        assert_eq!(
            QuoteError::UpstreamTimeout { provider: "ripio" }.kind(),
            "upstream_timeout"
        );
        assert_eq!(
            QuoteError::malformed("ripio", "bad json").kind(),
            "malformed_response"
        );
        assert_eq!(
            QuoteError::DatabaseError("locked".to_string()).kind(),
            "database_error"
        );
    }

    #[test]
    fn test_status_codes() {
        let response = QuoteError::upstream("bluelytics", "503").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = QuoteError::UpstreamTimeout {
            provider: "bluelytics",
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let response = QuoteError::DatabaseError("disk I/O error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
