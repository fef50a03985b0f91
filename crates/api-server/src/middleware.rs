use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::routes::AppState;

/// Bearer token authentication middleware.
///
/// A no-op when no API key is configured. Otherwise extracts the
/// `Authorization: Bearer <token>` header and compares it against the key,
/// returning 401 Unauthorized on mismatch.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok());

    match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) if tokens_match(token.as_bytes(), expected.as_bytes()) => {
            Ok(next.run(request).await)
        }
        _ => Err(AppError::Unauthorized),
    }
}

/// Compares in time independent of where the first differing byte is. Only the
/// length can leak.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match(b"letmein", b"letmein"));
        assert!(tokens_match(b"", b""));
        assert!(!tokens_match(b"letmein", b"letmeio"));
        assert!(!tokens_match(b"Letmein", b"letmein"));
        assert!(!tokens_match(b"letmei", b"letmein"));
        assert!(!tokens_match(b"letmein2", b"letmein"));
    }
}
