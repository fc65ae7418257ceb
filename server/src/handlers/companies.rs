use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    auth::SessionClaims,
    db::{Company, CompanyStore, CompanyType},
    error::{ApiError, Result},
};

/// Request body for create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount_of_employers: u32,
    #[serde(default)]
    pub registered: bool,
    #[serde(rename = "type", default)]
    pub company_type: String,
}

impl TryFrom<CompanyPayload> for Company {
    type Error = ApiError;

    fn try_from(payload: CompanyPayload) -> Result<Self> {
        let company_type: CompanyType = payload.company_type.parse()?;

        if payload.name.trim().is_empty() {
            return Err(ApiError::InvalidCompany("name must not be empty".to_string()));
        }

        Ok(Company {
            id: None,
            name: payload.name,
            description: payload.description,
            amount_of_employers: payload.amount_of_employers,
            registered: payload.registered,
            company_type,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub amount_of_employers: u32,
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.map(|id| id.to_hex()),
            name: company.name,
            description: company.description,
            amount_of_employers: company.amount_of_employers,
            registered: company.registered,
            company_type: company.company_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub modified: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: u64,
}

#[post("")]
pub async fn create_company(
    payload: web::Json<CompanyPayload>,
    store: web::Data<dyn CompanyStore>,
    session: web::ReqData<SessionClaims>,
) -> Result<HttpResponse> {
    let company = Company::try_from(payload.into_inner())?;

    log::info!("User {} creating company {}", session.username, company.name);

    let created = store.create(company).await?;

    Ok(HttpResponse::Created().json(CompanyResponse::from(created)))
}

#[get("/{name}")]
pub async fn get_company(
    name: web::Path<String>,
    store: web::Data<dyn CompanyStore>,
) -> Result<HttpResponse> {
    let company = store.read(&name).await?;

    Ok(HttpResponse::Ok().json(CompanyResponse::from(company)))
}

#[patch("")]
pub async fn update_company(
    payload: web::Json<CompanyPayload>,
    store: web::Data<dyn CompanyStore>,
    session: web::ReqData<SessionClaims>,
) -> Result<HttpResponse> {
    let company = Company::try_from(payload.into_inner())?;

    log::info!("User {} updating company {}", session.username, company.name);

    let modified = store.update(company).await?;

    Ok(HttpResponse::Ok().json(UpdateResponse {
        success: true,
        modified,
    }))
}

#[delete("/{name}")]
pub async fn delete_company(
    name: web::Path<String>,
    store: web::Data<dyn CompanyStore>,
    session: web::ReqData<SessionClaims>,
) -> Result<HttpResponse> {
    log::info!("User {} deleting company {}", session.username, name);

    let deleted = store.delete(&name).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        deleted,
    }))
}
