//! Authentication configuration (Firebase)

use serde::Deserialize;

use super::error::ValidationError;

/// Firebase authentication configuration.
///
/// ID tokens are validated against the issuer
/// `https://securetoken.google.com/<project-id>` with the project ID as
/// the expected audience.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Firebase project ID (issuer suffix and expected audience)
    pub firebase_project_id: String,

    /// How long to cache the Google signing keys, in seconds
    #[serde(default = "default_jwks_cache_secs")]
    pub jwks_cache_secs: u64,
}

impl AuthConfig {
    /// The expected `iss` claim for ID tokens of this project.
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.firebase_project_id)
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.firebase_project_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("auth.firebase_project_id"));
        }
        Ok(())
    }
}

fn default_jwks_cache_secs() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_includes_project_id() {
        let config = AuthConfig {
            firebase_project_id: "minitube-prod".to_string(),
            jwks_cache_secs: default_jwks_cache_secs(),
        };
        assert_eq!(
            config.issuer(),
            "https://securetoken.google.com/minitube-prod"
        );
    }

    #[test]
    fn test_empty_project_id_rejected() {
        let config = AuthConfig {
            firebase_project_id: "  ".to_string(),
            jwks_cache_secs: default_jwks_cache_secs(),
        };
        assert!(config.validate().is_err());
    }
}
