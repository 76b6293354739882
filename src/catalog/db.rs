use redb::{Database as RedbDatabase, ReadTransaction, ReadableTable, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    Redb(Box<redb::Error>),
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
    #[error("A record already references stored filename '{0}'")]
    DuplicateFilename(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

impl From<redb::CommitError> for CatalogError {
    fn from(e: redb::CommitError) -> Self {
        CatalogError::Commit(Box::new(e))
    }
}

impl From<redb::DatabaseError> for CatalogError {
    fn from(e: redb::DatabaseError) -> Self {
        CatalogError::RedbDatabase(Box::new(e))
    }
}

impl From<redb::Error> for CatalogError {
    fn from(e: redb::Error) -> Self {
        CatalogError::Redb(Box::new(e))
    }
}

impl From<redb::StorageError> for CatalogError {
    fn from(e: redb::StorageError) -> Self {
        CatalogError::Storage(Box::new(e))
    }
}

impl From<redb::TableError> for CatalogError {
    fn from(e: redb::TableError) -> Self {
        CatalogError::Table(Box::new(e))
    }
}

impl From<redb::TransactionError> for CatalogError {
    fn from(e: redb::TransactionError) -> Self {
        CatalogError::Transaction(Box::new(e))
    }
}

/// Embedded catalog of manuscript/audio records, admin accounts, and sessions.
pub struct Catalog {
    db: Arc<RedbDatabase>,
}

impl Clone for Catalog {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

/// Statistics from a purge operation
#[derive(Debug, Default)]
pub struct PurgeStats {
    pub manuscripts: u64,
    pub audio: u64,
}

impl Catalog {
    /// Open or create the catalog database at the given path
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, CatalogError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("media-archive.redb");
        let db = Arc::new(RedbDatabase::create(db_path)?);

        // Initialize application tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MANUSCRIPTS)?;
            let _ = write_txn.open_table(AUDIO)?;
            let _ = write_txn.open_table(MANUSCRIPT_FILENAMES)?;
            let _ = write_txn.open_table(AUDIO_FILENAMES)?;
            let _ = write_txn.open_table(ADMINS)?;
            let _ = write_txn.open_table(SESSIONS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Begin a read transaction
    pub(super) fn begin_read(&self) -> Result<ReadTransaction, CatalogError> {
        Ok(self.db.begin_read()?)
    }

    /// Begin a write transaction
    pub(super) fn begin_write(&self) -> Result<WriteTransaction, CatalogError> {
        Ok(self.db.begin_write()?)
    }

    // ========================================================================
    // Admin operations
    // ========================================================================

    /// Purge all records - for testing only
    pub fn purge_records(&self) -> Result<PurgeStats, CatalogError> {
        let write_txn = self.begin_write()?;
        let mut stats = PurgeStats::default();

        stats.manuscripts = clear_bytes_table(&write_txn, MANUSCRIPTS)?;
        stats.audio = clear_bytes_table(&write_txn, AUDIO)?;
        clear_index_table(&write_txn, MANUSCRIPT_FILENAMES)?;
        clear_index_table(&write_txn, AUDIO_FILENAMES)?;

        write_txn.commit()?;
        Ok(stats)
    }
}

fn clear_bytes_table(
    txn: &WriteTransaction,
    def: redb::TableDefinition<'static, &'static str, &'static [u8]>,
) -> Result<u64, CatalogError> {
    let table = txn.open_table(def)?;
    let keys: Vec<String> = table
        .iter()?
        .map(|r| r.map(|(k, _)| k.value().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    drop(table);

    let mut table = txn.open_table(def)?;
    for key in &keys {
        table.remove(key.as_str())?;
    }
    Ok(keys.len() as u64)
}

fn clear_index_table(
    txn: &WriteTransaction,
    def: redb::TableDefinition<'static, &'static str, &'static str>,
) -> Result<(), CatalogError> {
    let table = txn.open_table(def)?;
    let keys: Vec<String> = table
        .iter()?
        .map(|r| r.map(|(k, _)| k.value().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    drop(table);

    let mut table = txn.open_table(def)?;
    for key in &keys {
        table.remove(key.as_str())?;
    }
    Ok(())
}
