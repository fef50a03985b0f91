use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,

    /// Absent, expired and already consumed all look the same.
    #[error("secret not found or already viewed")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("payload too large")]
    PayloadTooLarge,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "SECRET_NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_body_shape() {
        let resp = AppError::BadRequest("'expiration' out of range".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({"error": {"code": "BAD_REQUEST", "message": "'expiration' out of range"}})
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound.status_and_code(),
            (StatusCode::NOT_FOUND, "SECRET_NOT_FOUND")
        );
        assert_eq!(
            AppError::Unauthorized.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::PayloadTooLarge.status_and_code().0,
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
