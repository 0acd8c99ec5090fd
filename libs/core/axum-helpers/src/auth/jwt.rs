use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// How long an issued token stays valid
pub const TOKEN_TTL_SECONDS: i64 = 604_800; // 7 days

/// Why a bearer token was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No token provided. Please login.")]
    MissingToken,

    #[error("Token has expired. Please login again.")]
    Expired,

    #[error("Invalid token. Please login again.")]
    Invalid,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // Subject (identity ID)
    pub email: String, // Account email
    pub name: String,  // Account display name
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
}

impl JwtClaims {
    /// Parse the subject back into the identity's UUID.
    pub fn subject_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Stateless JWT authentication.
///
/// Tokens are HS256-signed and self-contained: verification needs only the
/// shared secret, no token registry. There is no revocation before expiry.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    /// Create a new JWT auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtAuth, JwtConfig};
    /// use core_config::FromEnv;
    ///
    /// let config = JwtConfig::from_env()?;
    /// let jwt = JwtAuth::new(&config);
    /// ```
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Issue a token for a logged-in identity (7 day TTL).
    pub fn issue_token(&self, identity_id: Uuid, email: &str, name: &str) -> eyre::Result<String> {
        self.issue_token_with_ttl(identity_id, email, name, TOKEN_TTL_SECONDS)
    }

    /// Issue a token with an explicit TTL in seconds.
    ///
    /// Negative TTLs produce already-expired tokens, which the expiry
    /// handling tests rely on.
    pub fn issue_token_with_ttl(
        &self,
        identity_id: Uuid,
        email: &str,
        name: &str,
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: identity_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify token signature and expiry, returning the decoded claims.
    ///
    /// Expiry is reported separately from every other failure so the
    /// middleware can tell clients to re-login rather than retry.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid,
        })
    }
}
