use std::path::PathBuf;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::api::validation::sanitized_filename;
use crate::core::config::Settings;

#[derive(Debug, Clone)]
pub(crate) struct StorageService {
    root: PathBuf,
}

#[derive(Debug)]
pub(crate) struct StoredFile {
    pub(crate) key: String,
    pub(crate) size: i64,
    pub(crate) sha256: String,
}

impl StorageService {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        if !settings.storage().upload_enabled {
            return Ok(None);
        }

        let root = PathBuf::from(&settings.storage().upload_dir);
        tokio::fs::create_dir_all(&root).await?;

        Ok(Some(Self { root }))
    }

    pub(crate) async fn store(&self, filename: &str, bytes: Vec<u8>) -> anyhow::Result<StoredFile> {
        let size = bytes.len() as i64;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        // The generated prefix keeps concurrent uploads of the same filename apart.
        let key = format!("{}_{}", Uuid::new_v4(), sanitized_filename(filename));
        tokio::fs::write(self.root.join(&key), bytes).await?;

        Ok(StoredFile { key, size, sha256 })
    }

    pub(crate) fn root(&self) -> &std::path::Path {
        &self.root
    }
}
