use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::MIN_SIGNING_KEY_LEN;

#[derive(Debug, thiserror::Error)]
pub enum AuthTokenError {
    #[error("session signing key is too short (min {MIN_SIGNING_KEY_LEN} bytes)")]
    SecretTooShort,

    #[error("session token signature is invalid")]
    InvalidSignature,

    #[error("session token is expired")]
    Expired,

    #[error("session token is malformed: {0}")]
    Malformed(String),

    #[error("failed to sign session token: {0}")]
    Signing(String),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AuthTokenError> {
        if secret.len() < MIN_SIGNING_KEY_LEN {
            return Err(AuthTokenError::SecretTooShort);
        }

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthTokenError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthTokenError::Signing(e.to_string()))?;
        let expires_at = issued_at + ttl;

        let claims = SessionClaims {
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthTokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthTokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthTokenError::Expired,
                ErrorKind::InvalidSignature => AuthTokenError::InvalidSignature,
                _ => AuthTokenError::Malformed(err.to_string()),
            },
        )?;

        Ok(data.claims)
    }
}
