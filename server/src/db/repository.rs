use async_trait::async_trait;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, Credential, IndexOptions},
    Client, Collection, Database, IndexModel,
};

use super::models::Company;
use super::CompanyStore;
use crate::config::AppConfig;
use crate::error::{ApiError, Result};

pub const COMPANIES_COLLECTION: &str = "companies";

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoCompanyStore {
    db: Database,
    collection: Collection<Company>,
}

impl MongoCompanyStore {
    pub fn new(client: Client, database_name: &str) -> Self {
        let db = client.database(database_name);
        Self {
            collection: db.collection(COMPANIES_COLLECTION),
            db,
        }
    }

    /// Connects using the configured URI and credentials, then pings the
    /// server so an unreachable database is reported at startup.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.dburi).await?;
        if !config.db_user.is_empty() {
            options.credential = Some(
                Credential::builder()
                    .username(config.db_user.clone())
                    .password(config.db_passwd.clone())
                    .build(),
            );
        }

        let client = Client::with_options(options)?;
        let store = Self::new(client, &config.database);
        store.ping().await?;

        log::info!("Connected to MongoDB database '{}'", config.database);
        Ok(store)
    }

    pub async fn init_indexes(&self) -> Result<()> {
        // Create unique index on company name
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(name_index).await?;

        log::info!("Database indexes created successfully");
        Ok(())
    }

    /// Inserts without the pre-insert lookup; the unique index alone
    /// rejects a taken name.
    pub async fn insert(&self, mut company: Company) -> Result<Company> {
        company.id = None;
        let inserted = match self.collection.insert_one(&company).await {
            Ok(inserted) => inserted,
            Err(err) if is_duplicate_key(&err) => {
                log::warn!("Company {} already exists", company.name);
                return Err(ApiError::CompanyExists(company.name));
            }
            Err(err) => return Err(err.into()),
        };

        company.id = inserted.inserted_id.as_object_id();
        log::info!("Created company {}", company.name);
        Ok(company)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Company>> {
        let company = self.collection.find_one(doc! { "name": name }).await?;
        Ok(company)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl CompanyStore for MongoCompanyStore {
    async fn create(&self, company: Company) -> Result<Company> {
        if self.find_by_name(&company.name).await?.is_some() {
            log::warn!("Company {} already exists", company.name);
            return Err(ApiError::CompanyExists(company.name));
        }

        // The unique index closes the window between the lookup and the insert.
        self.insert(company).await
    }

    async fn read(&self, name: &str) -> Result<Company> {
        self.find_by_name(name)
            .await?
            .ok_or_else(|| ApiError::CompanyNotFound(name.to_string()))
    }

    async fn update(&self, mut company: Company) -> Result<u64> {
        company.id = None;
        let result = self
            .collection
            .replace_one(doc! { "name": company.name.as_str() }, &company)
            .await?;

        log::info!(
            "Updated company {} (matched: {}, modified: {})",
            company.name,
            result.matched_count,
            result.modified_count
        );
        Ok(result.modified_count)
    }

    async fn delete(&self, name: &str) -> Result<u64> {
        let result = self.collection.delete_one(doc! { "name": name }).await?;

        log::info!("Deleted {} company record(s) named {}", result.deleted_count, name);
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
