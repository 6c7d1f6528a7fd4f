//! Firebase ID token adapter.
//!
//! Implements the `SessionValidator` port for tokens minted by Firebase
//! Authentication:
//!
//! 1. Fetch Google's published signing keys (JWKS), cached with a TTL
//! 2. Verify the RS256 signature against the key named by `kid`
//! 3. Verify `iss`, `aud` and `exp` for the configured project
//! 4. Map the claims to `AuthenticatedUser`
//!
//! Google rotates the signing keys every few hours, so an unknown `kid`
//! triggers one forced refetch before the token is rejected.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Header, TokenData, Validation,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Configuration for the Firebase adapter.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Firebase project id; expected as `aud` and inside `iss`.
    pub project_id: String,

    /// Where the signing keys are published.
    pub jwks_url: String,

    /// How long fetched keys are trusted before refetching.
    pub jwks_cache_duration: Duration,
}

impl FirebaseConfig {
    pub fn new(project_id: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: jwks_url.into(),
            jwks_cache_duration: Duration::from_secs(3600),
        }
    }

    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            project_id: config.firebase_project_id.clone(),
            jwks_url: config.jwks_url.clone(),
            jwks_cache_duration: config.jwks_cache_ttl(),
        }
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = duration;
        self
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

/// Claims carried by a Firebase ID token.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    /// Firebase uid.
    sub: String,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    email_verified: Option<bool>,
}

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
}

impl JwksCache {
    fn new(jwks: JwkSet) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() > ttl
    }
}

/// Validates Firebase ID tokens.
pub struct FirebaseSessionValidator {
    config: FirebaseConfig,
    issuer: String,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl FirebaseSessionValidator {
    /// Keys are fetched lazily on the first validation.
    pub fn new(config: FirebaseConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("http client: {}", e)))?;

        Ok(Self {
            issuer: config.issuer(),
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.config.jwks_url, "Fetching JWKS");

        let response = self
            .http_client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch JWKS: {}", e);
                AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("JWKS endpoint returned {}", status);
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse JWKS: {}", e);
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!("Fetched {} keys from JWKS", jwks.keys.len());
        Ok(jwks)
    }

    /// Cached keys unless expired or `force_refresh` is set.
    async fn get_jwks(&self, force_refresh: bool) -> Result<JwkSet, AuthError> {
        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired(self.config.jwks_cache_duration) {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        *self.jwks_cache.write().await = Some(JwksCache::new(jwks.clone()));
        Ok(jwks)
    }

    async fn decoding_key(&self, header: &Header) -> Result<DecodingKey, AuthError> {
        let kid = header.kid.as_deref().ok_or_else(|| {
            tracing::warn!("JWT missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let mut jwks = self.get_jwks(false).await?;
        if jwks.find(kid).is_none() {
            tracing::debug!(kid, "Unknown signing key, refreshing JWKS");
            jwks = self.get_jwks(true).await?;
        }

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!("No matching key found for kid: {}", kid);
            AuthError::InvalidToken
        })?;

        DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!("Failed to create decoding key: {}", e);
            AuthError::InvalidToken
        })
    }

    fn decode_claims(
        &self,
        token: &str,
        key: &DecodingKey,
    ) -> Result<TokenData<FirebaseClaims>, AuthError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<FirebaseClaims>(token, key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    tracing::warn!("Token issued for another project: {}", e);
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
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
            tracing::debug!("Failed to decode JWT header: {}", e);
            AuthError::InvalidToken
        })?;
        if header.alg != Algorithm::RS256 {
            tracing::warn!("Unexpected token algorithm: {:?}", header.alg);
            return Err(AuthError::InvalidToken);
        }

        let key = self.decoding_key(&header).await?;
        let claims = self.decode_claims(token, &key)?.claims;

        let email = claims
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(AuthError::MissingEmail)?;

        let user_id = UserId::new(claims.sub).map_err(|_| {
            tracing::warn!("Token has an empty subject");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            user_id,
            email,
            claims.email_verified.unwrap_or(false),
        ))
    }
}

impl std::fmt::Debug for FirebaseSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseSessionValidator")
            .field("project_id", &self.config.project_id)
            .field("jwks_url", &self.config.jwks_url)
            .finish_non_exhaustive()
    }
}
