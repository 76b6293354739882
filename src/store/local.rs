use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::{MediaStore, StoreError};
use crate::catalog::models::Category;

const STAGING_DIR: &str = ".staging";

/// Local filesystem store with one directory per category plus a staging
/// area. Staging and category roots share a filesystem, so `promote` is a
/// rename rather than a copy.
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(base_path.join(Category::Manuscript.storage_dir()))?;
        std::fs::create_dir_all(base_path.join(Category::Audio.storage_dir()))?;
        std::fs::create_dir_all(base_path.join(STAGING_DIR))?;
        Ok(Self { base_path })
    }

    fn staged_path(&self, name: &str) -> PathBuf {
        self.base_path.join(STAGING_DIR).join(name)
    }

    fn final_path(&self, category: Category, name: &str) -> PathBuf {
        self.base_path.join(category.storage_dir()).join(name)
    }
}

#[async_trait]
impl MediaStore for LocalStore {
    async fn stage(
        &self,
        _category: Category,
        name: &str,
        data: Bytes,
    ) -> Result<PathBuf, StoreError> {
        let path = self.staged_path(name);
        tokio::fs::write(&path, &data).await?;
        Ok(path)
    }

    async fn promote(&self, category: Category, name: &str) -> Result<(), StoreError> {
        let from = self.staged_path(name);
        let to = self.final_path(category, name);
        tokio::fs::rename(&from, &to).await?;
        Ok(())
    }

    async fn discard(&self, _category: Category, name: &str) -> Result<(), StoreError> {
        let path = self.staged_path(name);
        if path.exists() {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn read(&self, category: Category, name: &str) -> Result<Bytes, StoreError> {
        let path = self.final_path(category, name);
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let data = tokio::fs::read(&path).await?;
        Ok(Bytes::from(data))
    }

    async fn remove(&self, category: Category, name: &str) -> Result<(), StoreError> {
        let path = self.final_path(category, name);
        if path.exists() {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn exists(&self, category: Category, name: &str) -> Result<bool, StoreError> {
        Ok(self.final_path(category, name).exists())
    }
}
