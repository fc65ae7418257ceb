//! Session authentication: operator credentials and signed session tokens.

pub mod credentials;
pub mod token;

pub use credentials::CredentialStore;
pub use token::{AuthTokenError, IssuedToken, SessionClaims, TokenService};

use chrono::Utc;

use crate::config::AppConfig;
use crate::error::{ApiError, Result};

/// Header carrying the session token. Header names are case-insensitive,
/// so `token` and `TOKEN` address the same header.
pub const TOKEN_HEADER: &str = "Token";

/// Cookie set at login, accepted when the header is absent.
pub const TOKEN_COOKIE: &str = "token";

/// Validates credentials at login and session tokens on every request.
#[derive(Clone)]
pub struct Authenticator {
    credentials: CredentialStore,
    tokens: TokenService,
}

impl Authenticator {
    pub fn new(credentials: CredentialStore, tokens: TokenService) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    pub fn from_config(config: &AppConfig, bcrypt_cost: u32) -> Result<Self> {
        let credentials = CredentialStore::new([config.operator_credentials()], bcrypt_cost)?;
        let tokens = TokenService::new(config.jwt_key.as_bytes(), config.session_lifetime())
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self::new(credentials, tokens))
    }

    pub fn session_lifetime(&self) -> std::time::Duration {
        self.tokens.ttl()
    }

    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken> {
        if !self.credentials.verify(username, password)? {
            return Err(ApiError::InvalidCredentials);
        }

        self.tokens
            .issue(username, Utc::now())
            .map_err(ApiError::TokenIssue)
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionClaims> {
        self.tokens.verify(token).map_err(|err| {
            log::warn!("Rejected session token: {}", err);
            ApiError::InvalidToken(err)
        })
    }
}
