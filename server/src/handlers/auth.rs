use actix_web::{cookie::Cookie, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{Authenticator, TOKEN_COOKIE},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[post("/companies/login")]
pub async fn login(
    req: web::Json<LoginRequest>,
    authenticator: web::Data<Authenticator>,
) -> Result<HttpResponse> {
    log::info!("Login attempt for user: {}", req.username);

    let issued = authenticator.login(&req.username, &req.password).map_err(|err| {
        log::warn!("Failed login attempt for user: {}", req.username);
        err
    })?;

    log::info!(
        "Successful login for user: {} (expires: {})",
        req.username,
        issued.expires_at
    );

    let max_age = i64::try_from(authenticator.session_lifetime().as_secs()).unwrap_or(i64::MAX);
    let cookie = Cookie::build(TOKEN_COOKIE, issued.token.clone())
        .path("/")
        .http_only(true)
        .same_site(actix_web::cookie::SameSite::Strict)
        .max_age(actix_web::cookie::time::Duration::seconds(max_age))
        .finish();

    let response = LoginResponse {
        success: true,
        token: issued.token,
        expires_at: issued.expires_at,
    };

    Ok(HttpResponse::Ok().cookie(cookie).json(response))
}
