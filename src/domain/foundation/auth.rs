//! Authenticated identity as seen by the domain.
//!
//! Populated by whichever `SessionValidator` adapter verified the
//! caller's token; nothing here knows about Firebase or JWTs.

use thiserror::Error;

use super::UserId;

/// The verified caller of a request or WebSocket session.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Provider-issued user ID (the token's subject).
    pub id: UserId,

    /// Email from the token claims. May be empty for anonymous-provider
    /// accounts.
    pub email: String,

    /// Display name, when the provider has one.
    pub display_name: Option<String>,

    /// Whether the provider has verified the email.
    pub email_verified: bool,
}

impl AuthenticatedUser {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            email_verified,
        }
    }
}

/// Token validation failures.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Malformed token, bad signature, or wrong issuer/audience.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token was valid once but its `exp` has passed.
    #[error("Token expired")]
    TokenExpired,

    /// The token verified but no such user exists anymore.
    #[error("User not found")]
    UserNotFound,

    /// Key fetch or provider outage; retrying may succeed.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_token_identity() {
        let user = AuthenticatedUser::new(
            UserId::new("uid-9").unwrap(),
            "carol@example.com",
            Some("Carol".to_string()),
            true,
        );

        assert_eq!(user.id.as_str(), "uid-9");
        assert_eq!(user.email, "carol@example.com");
        assert!(user.email_verified);
    }

    #[test]
    fn errors_render_for_logs() {
        assert_eq!(
            AuthError::InvalidToken.to_string(),
            "Invalid or expired token"
        );
        assert!(AuthError::ServiceUnavailable("timeout".to_string())
            .to_string()
            .contains("timeout"));
    }
}
