use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{api_state::ApiState, error::ApiError};

/// Compares the request's bearer credential against the configured token.
/// Runs before any parsing or document work; the expected value is never
/// echoed back.
pub async fn api_auth(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request).ok_or_else(|| {
        warn!("Rejected request without Authorization header");
        ApiError::Unauthorized("Missing Authorization header".to_string())
    })?;

    if token != state.config.api_auth_token {
        warn!("Rejected request with invalid bearer token");
        return Err(ApiError::Unauthorized("Invalid bearer token".to_string()));
    }

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(str::trim))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn request_with_header(value: Option<&str>) -> Request {
        let builder = HttpRequest::builder().uri("/api/v1/run");
        let builder = match value {
            Some(value) => builder.header("Authorization", value),
            None => builder,
        };
        builder.body(Body::empty()).expect("build request")
    }

    #[test]
    fn test_extracts_bearer_token() {
        let request = request_with_header(Some("Bearer secret-token"));
        assert_eq!(
            extract_bearer_token(&request).as_deref(),
            Some("secret-token")
        );
    }

    #[test]
    fn test_trims_whitespace_around_token() {
        let request = request_with_header(Some("Bearer  spaced "));
        assert_eq!(extract_bearer_token(&request).as_deref(), Some("spaced"));
    }

    #[test]
    fn test_missing_header_and_wrong_scheme_yield_nothing() {
        assert!(extract_bearer_token(&request_with_header(None)).is_none());
        assert!(extract_bearer_token(&request_with_header(Some("Basic abc"))).is_none());
    }
}
