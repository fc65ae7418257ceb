use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use super::models::Company;
use super::CompanyStore;
use crate::error::{ApiError, Result};

/// Process-local store keyed by company name.
#[derive(Clone, Default)]
pub struct MemoryCompanyStore {
    companies: Arc<DashMap<String, Company>>,
}

impl MemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn create(&self, mut company: Company) -> Result<Company> {
        match self.companies.entry(company.name.clone()) {
            Entry::Occupied(_) => {
                log::warn!("Company {} already exists", company.name);
                Err(ApiError::CompanyExists(company.name))
            }
            Entry::Vacant(slot) => {
                company.id = Some(ObjectId::new());
                slot.insert(company.clone());
                log::info!("Created company {}", company.name);
                Ok(company)
            }
        }
    }

    async fn read(&self, name: &str) -> Result<Company> {
        self.companies
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ApiError::CompanyNotFound(name.to_string()))
    }

    async fn update(&self, company: Company) -> Result<u64> {
        let Some(mut stored) = self.companies.get_mut(&company.name) else {
            return Ok(0);
        };

        if stored.same_content(&company) {
            return Ok(0);
        }

        let id = stored.id;
        *stored = Company { id, ..company };
        Ok(1)
    }

    async fn delete(&self, name: &str) -> Result<u64> {
        Ok(self.companies.remove(name).map_or(0, |_| 1))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CompanyType;

    fn acme() -> Company {
        let mut company = Company::new("Acme", CompanyType::Corporation);
        company.amount_of_employers = 5;
        company.registered = true;
        company
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let store = MemoryCompanyStore::new();
        let created = store.create(acme()).await.unwrap();

        assert!(created.id.is_some());
        assert_eq!(store.read("Acme").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_duplicate_name_keeps_original() {
        let store = MemoryCompanyStore::new();
        let original = store.create(acme()).await.unwrap();

        let mut impostor = acme();
        impostor.description = "impostor".to_string();
        let err = store.create(impostor).await.unwrap_err();

        assert!(matches!(err, ApiError::CompanyExists(ref name) if name == "Acme"));
        assert_eq!(store.read("Acme").await.unwrap(), original);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_names_unique() {
        let store = MemoryCompanyStore::new();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.create(acme()).await }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_read_missing() {
        let store = MemoryCompanyStore::new();
        assert!(matches!(
            store.read("Nobody").await,
            Err(ApiError::CompanyNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_and_keeps_id() {
        let store = MemoryCompanyStore::new();
        let created = store.create(acme()).await.unwrap();

        let mut changed = acme();
        changed.description = "anvils".to_string();
        changed.company_type = CompanyType::Cooperative;
        assert_eq!(store.update(changed).await.unwrap(), 1);

        let stored = store.read("Acme").await.unwrap();
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.description, "anvils");
        assert_eq!(stored.company_type, CompanyType::Cooperative);
    }

    #[tokio::test]
    async fn test_update_unchanged_or_missing_reports_zero() {
        let store = MemoryCompanyStore::new();
        assert_eq!(store.update(acme()).await.unwrap(), 0);

        store.create(acme()).await.unwrap();
        assert_eq!(store.update(acme()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryCompanyStore::new();
        store.create(acme()).await.unwrap();

        assert_eq!(store.delete("Acme").await.unwrap(), 1);
        assert_eq!(store.delete("Acme").await.unwrap(), 0);
        assert!(store.is_empty());
    }
}
