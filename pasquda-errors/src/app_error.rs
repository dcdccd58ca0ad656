use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("rate limited")]
    RateLimited,

    #[error("screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    #[error("AI generation failed: {0}")]
    GenerationFailed(String),

    #[error("storage error: {0}")]
    StorageFailed(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Themed message safe to show to the user. Raw dependency errors
    /// never leave the server.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::RateLimited => {
                "Slow down! Even Pasquda needs a break between roasts. Try again in a bit."
                    .to_string()
            }
            Self::ScreenshotFailed(_) => {
                "This website is so broken, even our AI gave up. That's almost impressive."
                    .to_string()
            }
            Self::GenerationFailed(_) => {
                "The AI is taking a breather. Try again in a minute.".to_string()
            }
            Self::StorageFailed(_) | Self::Database(_) | Self::Internal(_) => {
                "Something went wrong. Even Pasquda has bad days.".to_string()
            }
            Self::Unauthorized => "Invalid credentials.".to_string(),
            Self::NotFound => {
                "This roast doesn't exist. Maybe the website was so bad we deleted the evidence."
                    .to_string()
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ScreenshotFailed(_) | Self::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::StorageFailed(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_never_leak_internals() {
        let err = AppError::Database("connection refused at 10.0.0.3:5432".to_string());
        assert!(!err.user_message().contains("10.0.0.3"));
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
