//! Firebase Auth adapter for ID-token validation.
//!
//! Implements the `SessionValidator` port against Firebase Authentication.
//! Validation steps:
//!
//! 1. Fetch Google's secure-token JWKS (cached)
//! 2. Verify the RS256 signature against the key named by `kid`
//! 3. Verify issuer, audience, and expiry claims
//! 4. Map claims to the domain `AuthenticatedUser` type
//!
//! Firebase ID tokens carry the project ID as their audience and
//! `https://securetoken.google.com/<project-id>` as their issuer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, TokenData, Validation,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Google's published JWKS for Firebase secure tokens.
const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Configuration for the Firebase adapter.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Firebase project ID. Doubles as the expected audience claim.
    pub project_id: String,

    /// How long to cache the JWKS before refetching. Defaults to 1 hour.
    pub jwks_cache_duration: Option<Duration>,
}

impl FirebaseConfig {
    /// Create a configuration for the given project.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_cache_duration: None,
        }
    }

    /// Set a custom JWKS cache duration.
    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = Some(duration);
        self
    }

    /// The issuer Firebase stamps into ID tokens for this project.
    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

/// Claims carried by a Firebase ID token.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    /// Subject, the Firebase user ID.
    sub: String,

    /// Issuer URL.
    iss: String,

    /// Audience, the project ID.
    aud: String,

    /// Expiry timestamp (Unix epoch seconds).
    #[allow(dead_code)]
    exp: i64,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    email_verified: Option<bool>,

    #[serde(default)]
    name: Option<String>,
}

/// Cached JWKS with expiry tracking.
struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    cache_duration: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, cache_duration: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            cache_duration,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.cache_duration
    }
}

/// Firebase session validator.
///
/// Verifies ID tokens against Google's JWKS and extracts user identity.
/// This is the production implementation of `SessionValidator`.
pub struct FirebaseSessionValidator {
    config: FirebaseConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl FirebaseSessionValidator {
    /// Create a new Firebase validator.
    ///
    /// Does NOT fetch the JWKS immediately; keys are fetched lazily on
    /// the first validation so startup never blocks on Google.
    pub fn new(config: FirebaseConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AuthError::ServiceUnavailable(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!("fetching Firebase JWKS from {}", JWKS_URL);

        let response = self.http_client.get(JWKS_URL).send().await.map_err(|e| {
            tracing::error!("failed to fetch JWKS: {}", e);
            AuthError::ServiceUnavailable(format!("failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("JWKS endpoint returned {}", status);
            return Err(AuthError::ServiceUnavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!("failed to parse JWKS: {}", e);
            AuthError::ServiceUnavailable(format!("failed to parse JWKS: {}", e))
        })?;

        tracing::debug!("fetched {} keys from JWKS", jwks.keys.len());

        Ok(jwks)
    }

    /// Get the JWKS, using the cache while it is fresh.
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;

        {
            let mut cache = self.jwks_cache.write().await;
            let duration = self
                .config
                .jwks_cache_duration
                .unwrap_or(Duration::from_secs(3600));
            *cache = Some(JwksCache::new(jwks.clone(), duration));
        }

        Ok(jwks)
    }

    /// Find the decoding key named by the token header.
    fn find_decoding_key(
        &self,
        header: &jsonwebtoken::Header,
        jwks: &JwkSet,
    ) -> Result<DecodingKey, AuthError> {
        let kid = header.kid.as_ref().ok_or_else(|| {
            tracing::warn!("ID token missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!("no matching key found for kid: {}", kid);
            AuthError::InvalidToken
        })?;

        DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!("failed to create decoding key: {}", e);
            AuthError::InvalidToken
        })
    }

    /// Verify signature and claims, returning the decoded token.
    fn validate_token(
        &self,
        token: &str,
        decoding_key: &DecodingKey,
    ) -> Result<TokenData<FirebaseClaims>, AuthError> {
        // Firebase signs ID tokens with RS256 only.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_audience(&[&self.config.project_id]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<FirebaseClaims>(token, decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("ID token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("invalid issuer in ID token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("invalid audience in ID token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("ID token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })
    }
}

#[async_trait]
impl SessionValidator for FirebaseSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("failed to decode ID token header: {}", e);
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks().await?;
        let decoding_key = self.find_decoding_key(&header, &jwks)?;
        let token_data = self.validate_token(token, &decoding_key)?;
        let claims = token_data.claims;

        // Defense in depth: re-check issuer and audience after decode.
        if claims.iss != self.config.issuer() {
            tracing::warn!(
                "issuer mismatch after validation: expected '{}', got '{}'",
                self.config.issuer(),
                claims.iss
            );
            return Err(AuthError::InvalidToken);
        }
        if claims.aud != self.config.project_id {
            tracing::warn!(
                "audience mismatch after validation: expected '{}', got '{}'",
                self.config.project_id,
                claims.aud
            );
            return Err(AuthError::InvalidToken);
        }

        let user_id = UserId::new(claims.sub.clone()).map_err(|_| {
            tracing::warn!("invalid user ID in ID token: {}", claims.sub);
            AuthError::InvalidToken
        })?;

        let email = claims.email.unwrap_or_default();

        Ok(AuthenticatedUser::new(
            user_id,
            email,
            claims.name,
            claims.email_verified.unwrap_or(false),
        ))
    }
}

impl std::fmt::Debug for FirebaseSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseSessionValidator")
            .field("project_id", &self.config.project_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builds_correct_issuer() {
        let config = FirebaseConfig::new("minitube-prod");
        assert_eq!(
            config.issuer(),
            "https://securetoken.google.com/minitube-prod"
        );
    }

    #[test]
    fn config_with_custom_cache_duration() {
        let config =
            FirebaseConfig::new("minitube-prod").with_cache_duration(Duration::from_secs(300));
        assert_eq!(config.jwks_cache_duration, Some(Duration::from_secs(300)));
    }

    #[test]
    fn jwks_cache_not_expired_initially() {
        let jwks = JwkSet { keys: vec![] };
        let cache = JwksCache::new(jwks, Duration::from_secs(3600));
        assert!(!cache.is_expired());
    }

    #[test]
    fn jwks_cache_expires_after_duration() {
        let jwks = JwkSet { keys: vec![] };
        let cache = JwksCache::new(jwks, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.is_expired());
    }

    #[test]
    fn garbage_token_is_rejected_without_network() {
        let validator =
            FirebaseSessionValidator::new(FirebaseConfig::new("minitube-prod")).unwrap();

        // A malformed token fails at header decode, before any JWKS fetch.
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let result = rt.block_on(validator.validate("not-a-jwt"));
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn firebase_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FirebaseSessionValidator>();
    }

    #[tokio::test]
    #[ignore = "requires network access to Google"]
    async fn integration_test_fetch_jwks() {
        let validator =
            FirebaseSessionValidator::new(FirebaseConfig::new("minitube-prod")).unwrap();

        let jwks = validator.fetch_jwks().await.expect("JWKS fetch failed");
        assert!(!jwks.keys.is_empty());
    }
}
