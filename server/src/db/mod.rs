pub mod memory;
pub mod models;
pub mod repository;

pub use memory::MemoryCompanyStore;
pub use models::{Company, CompanyType};
pub use repository::MongoCompanyStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, StorageBackend};
use crate::error::Result;

/// Persistence for company records, keyed by the unique company name.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Inserts a new company and returns it with its identifier populated.
    ///
    /// Fails with `CompanyExists` if the name is taken; the stored record is
    /// left untouched.
    async fn create(&self, company: Company) -> Result<Company>;

    async fn read(&self, name: &str) -> Result<Company>;

    /// Replaces the company with the same name. Returns the number of
    /// modified documents, 0 when the name is absent.
    async fn update(&self, company: Company) -> Result<u64>;

    async fn delete(&self, name: &str) -> Result<u64>;

    async fn ping(&self) -> Result<()>;

    fn backend(&self) -> &'static str;
}

/// Opens the backend selected by the configuration.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn CompanyStore>> {
    match config.storage {
        StorageBackend::MongoDb => {
            let store = MongoCompanyStore::connect(config).await?;
            store.init_indexes().await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory company store, records are lost on restart");
            Ok(Arc::new(MemoryCompanyStore::new()))
        }
    }
}
