//! Request and error payloads for the comment endpoints.
//!
//! Responses reuse the domain `Comment` serialization directly, so the
//! REST history and the live stream emit identical JSON.

use serde::{Deserialize, Serialize};

/// POST /v1/comments request body.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub video_id: String,
    pub message: String,
}

/// Uniform error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_snake_case_body() {
        let request: CreateCommentRequest =
            serde_json::from_str(r#"{"video_id":"v1","message":"hi"}"#).unwrap();
        assert_eq!(request.video_id, "v1");
        assert_eq!(request.message, "hi");
    }

    #[test]
    fn error_response_has_error_key() {
        let json = serde_json::to_string(&ErrorResponse::new("missing vid")).unwrap();
        assert_eq!(json, r#"{"error":"missing vid"}"#);
    }
}
