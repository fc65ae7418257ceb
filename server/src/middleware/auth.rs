use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, HttpMessage,
};

use crate::auth::{Authenticator, SessionClaims, TOKEN_COOKIE, TOKEN_HEADER};
use crate::error::ApiError;

/// Reads the session token from the `Token` header, falling back to the
/// login cookie.
pub fn extract_token(req: &ServiceRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        req.cookie(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|value| !value.is_empty())
    })
}

fn authenticate(req: &ServiceRequest) -> Result<SessionClaims, ApiError> {
    let token = extract_token(req).ok_or(ApiError::MissingToken)?;

    // Get Authenticator from app data
    let authenticator = req
        .app_data::<web::Data<Authenticator>>()
        .ok_or_else(|| ApiError::Internal("Authenticator not available".to_string()))?;

    authenticator.verify_token(&token)
}

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    match authenticate(&req) {
        Ok(claims) => {
            // Make the session available to handlers via ReqData
            req.extensions_mut().insert(claims);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(err) => Ok(req.error_response(err).map_into_right_body()),
    }
}
