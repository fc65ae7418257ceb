pub mod auth;
pub mod companies;
pub mod health;

pub use auth::login;
pub use companies::{create_company, delete_company, get_company, update_company};
pub use health::health_check;

use actix_web::{middleware::from_fn, web};

use crate::error::ApiError;
use crate::middleware::auth_middleware;

/// Body decoding failures surface as `InvalidBody` (400).
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidBody(err.to_string()).into())
}

/// Registers every route. Shared state (`Authenticator`, the company store)
/// is attached by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Public routes (no authentication required)
        .service(health_check)
        .service(login)
        // Protected routes (session token required)
        .service(
            web::scope("/companies")
                .wrap(from_fn(auth_middleware))
                .service(create_company)
                .service(update_company)
                .service(get_company)
                .service(delete_company),
        );
}
