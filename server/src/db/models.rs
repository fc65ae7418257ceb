use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyType {
    #[serde(rename = "Corporations")]
    Corporation,
    #[serde(rename = "NonProfit")]
    NonProfit,
    #[serde(rename = "Cooperative")]
    Cooperative,
    #[serde(rename = "Sole Proprietorship")]
    SoleProprietorship,
}

impl CompanyType {
    pub const ALL: [CompanyType; 4] = [
        CompanyType::Corporation,
        CompanyType::NonProfit,
        CompanyType::Cooperative,
        CompanyType::SoleProprietorship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Corporation => "Corporations",
            CompanyType::NonProfit => "NonProfit",
            CompanyType::Cooperative => "Cooperative",
            CompanyType::SoleProprietorship => "Sole Proprietorship",
        }
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyType {
    type Err = ApiError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Corporations" | "Corporation" => Ok(CompanyType::Corporation),
            "NonProfit" => Ok(CompanyType::NonProfit),
            "Cooperative" => Ok(CompanyType::Cooperative),
            "Sole Proprietorship" => Ok(CompanyType::SoleProprietorship),
            other => Err(ApiError::InvalidCompanyType(other.to_string())),
        }
    }
}

/// A company document as stored in the `companies` collection.
///
/// Stored keys are the lowercased field names already present in existing
/// collections (`amountofemployers`, not `amount_of_employers`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "amountofemployers")]
    pub amount_of_employers: u32,
    pub registered: bool,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

impl Company {
    pub fn new(name: impl Into<String>, company_type: CompanyType) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            amount_of_employers: 0,
            registered: false,
            company_type,
        }
    }

    /// True when every field except the identifier matches.
    pub fn same_content(&self, other: &Company) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.amount_of_employers == other.amount_of_employers
            && self.registered == other.registered
            && self.company_type == other.company_type
    }
}
