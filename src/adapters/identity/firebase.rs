//! Firebase identity provider adapter.
//!
//! Implements `IdentityProvider` against Firebase Auth:
//!
//! 1. ID tokens are RS256 JWTs; they are validated against the public JWKS
//!    published for the `securetoken` service account, with issuer,
//!    audience, and expiry checks.
//! 2. Identity creation and deletion go through the Identity Toolkit REST
//!    API.
//!
//! JWKS fetches are cached with an expiry so token verification is not a
//! network round trip per request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::foundation::SubjectId;
use crate::ports::{IdentityError, IdentityProvider, NewIdentity};

/// JWKS endpoint for Firebase ID token signing keys.
const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Identity Toolkit REST endpoint.
const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Configuration for the Firebase identity adapter.
#[derive(Clone)]
pub struct FirebaseIdentityConfig {
    /// The Firebase project id; doubles as the expected token audience.
    pub project_id: String,

    /// Web API key for Identity Toolkit account creation.
    pub api_key: SecretString,

    /// OAuth bearer token for privileged Identity Toolkit calls
    /// (account deletion).
    pub admin_token: SecretString,

    /// How long to cache the signing keys before refetching.
    pub jwks_cache_duration: Duration,

    /// Base URL override for the Identity Toolkit API (for testing).
    pub toolkit_base_url: String,

    /// JWKS URL override (for testing).
    pub jwks_url: String,
}

impl FirebaseIdentityConfig {
    pub fn new(
        project_id: impl Into<String>,
        api_key: SecretString,
        admin_token: SecretString,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            api_key,
            admin_token,
            jwks_cache_duration: Duration::from_secs(3600),
            toolkit_base_url: IDENTITY_TOOLKIT_URL.to_string(),
            jwks_url: SECURETOKEN_JWKS_URL.to_string(),
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

/// Claims validated in a Firebase ID token.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
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

/// Firebase-backed identity provider.
pub struct FirebaseIdentityProvider {
    config: FirebaseIdentityConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl FirebaseIdentityProvider {
    /// Create a new provider. JWKS keys are fetched lazily on first
    /// verification, not at startup.
    pub fn new(config: FirebaseIdentityConfig) -> Result<Self, IdentityError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IdentityError::unavailable(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, IdentityError> {
        tracing::debug!(url = %self.config.jwks_url, "fetching identity signing keys");

        let response = self
            .http_client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| IdentityError::unavailable(format!("JWKS fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(IdentityError::unavailable(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::unavailable(format!("JWKS parse failed: {}", e)))
    }

    async fn get_jwks(&self) -> Result<JwkSet, IdentityError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = &*cache {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        {
            let mut cache = self.jwks_cache.write().await;
            *cache = Some(JwksCache::new(
                jwks.clone(),
                self.config.jwks_cache_duration,
            ));
        }
        Ok(jwks)
    }

    fn decoding_key(
        header: &jsonwebtoken::Header,
        jwks: &JwkSet,
    ) -> Result<DecodingKey, IdentityError> {
        let kid = header
            .kid
            .as_deref()
            .ok_or(IdentityError::InvalidCredential)?;
        let jwk = jwks.find(kid).ok_or(IdentityError::InvalidCredential)?;
        DecodingKey::from_jwk(jwk).map_err(|_| IdentityError::InvalidCredential)
    }

    fn toolkit_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.toolkit_base_url, path)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<SubjectId, IdentityError> {
        let header = decode_header(token).map_err(|_| IdentityError::InvalidCredential)?;
        let jwks = self.get_jwks().await?;
        let key = Self::decoding_key(&header, &jwks)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_audience(&[&self.config.project_id]);

        let data = decode::<IdTokenClaims>(token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "token verification failed");
            IdentityError::InvalidCredential
        })?;

        SubjectId::new(data.claims.sub).map_err(|_| IdentityError::InvalidCredential)
    }

    async fn create_user(&self, identity: NewIdentity) -> Result<SubjectId, IdentityError> {
        let url = self.toolkit_url("accounts:signUp");
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&json!({
                "email": identity.email,
                "password": identity.password,
                "displayName": identity.display_name,
                "returnSecureToken": false,
            }))
            .send()
            .await
            .map_err(|e| IdentityError::unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::other(format!(
                "account creation failed ({}): {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct SignUpResponse {
            local_id: String,
        }

        let body: SignUpResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::other(format!("malformed signUp response: {}", e)))?;
        SubjectId::new(body.local_id)
            .map_err(|_| IdentityError::other("empty subject id in signUp response"))
    }

    async fn delete_user(&self, subject_id: &SubjectId) -> Result<(), IdentityError> {
        let url = self.toolkit_url(&format!(
            "projects/{}/accounts:delete",
            self.config.project_id
        ));
        let response = self
            .http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.admin_token.expose_secret()),
            )
            .json(&json!({"localId": subject_id.as_str()}))
            .send()
            .await
            .map_err(|e| IdentityError::unavailable(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if body.contains("USER_NOT_FOUND") {
            return Err(IdentityError::NotFound);
        }
        Err(IdentityError::other(format!(
            "account deletion failed ({}): {}",
            status, body
        )))
    }
}
