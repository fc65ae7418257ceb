use std::collections::HashMap;

use crate::error::Result;

// Verified when the username is unknown so both paths pay the bcrypt cost.
const DUMMY_PASSWORD: &str = "companies-unknown-operator";

/// Immutable username -> bcrypt hash mapping, fixed at startup.
#[derive(Clone)]
pub struct CredentialStore {
    hashes: HashMap<String, String>,
    dummy_hash: String,
}

impl CredentialStore {
    /// Hashes every plaintext password with the given bcrypt cost.
    pub fn new<I>(users: I, cost: u32) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut hashes = HashMap::new();
        for (username, password) in users {
            let hash = bcrypt::hash(&password, cost)?;
            hashes.insert(username, hash);
        }

        Ok(Self {
            hashes,
            dummy_hash: bcrypt::hash(DUMMY_PASSWORD, cost)?,
        })
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<bool> {
        match self.hashes.get(username) {
            Some(hash) => Ok(bcrypt::verify(password, hash)?),
            None => {
                bcrypt::verify(password, &self.dummy_hash)?;
                Ok(false)
            }
        }
    }
}
