use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{db::CompanyStore, error::Result};

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: &'static str,
}

#[get("/health")]
pub async fn health_check(store: web::Data<dyn CompanyStore>) -> Result<HttpResponse> {
    store.ping().await?;

    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        storage: store.backend(),
    };

    Ok(HttpResponse::Ok().json(response))
}
