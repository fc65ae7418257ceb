use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::auth::AuthTokenError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Failed to issue session token: {0}")]
    TokenIssue(AuthTokenError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session token required")]
    MissingToken,

    // The diagnostic stays in the source; clients only see the generic text.
    #[error("Invalid or expired session token")]
    InvalidToken(#[source] AuthTokenError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("type of company {0} not valid")]
    InvalidCompanyType(String),

    #[error("Invalid company: {0}")]
    InvalidCompany(String),

    #[error("company {0} already exists")]
    CompanyExists(String),

    #[error("company {0} not found")]
    CompanyNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::MissingToken => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCompanyType(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCompany(_) => StatusCode::BAD_REQUEST,
            ApiError::CompanyExists(_) => StatusCode::BAD_REQUEST,
            ApiError::CompanyNotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = if status.is_server_error() {
            log::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let error_response = ErrorResponse {
            success: false,
            error: message,
        };

        HttpResponse::build(status).json(error_response)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
