use redb::ReadableTable;

use super::db::{Catalog, CatalogError};
use super::models::AudioRecord;
use super::tables::*;

impl Catalog {
    // ========================================================================
    // Audio operations
    // ========================================================================

    /// Insert an audio record and its stored-filename index entry in one
    /// transaction. Rejects a stored filename that is already referenced.
    pub fn insert_audio(&self, record: &AudioRecord) -> Result<(), CatalogError> {
        debug_assert!(!record.id.is_empty(), "audio id must not be empty");
        debug_assert!(
            !record.stored_filename.is_empty(),
            "stored filename must not be empty"
        );

        let write_txn = self.begin_write()?;
        {
            let mut filenames = write_txn.open_table(AUDIO_FILENAMES)?;
            if filenames.get(record.stored_filename.as_str())?.is_some() {
                return Err(CatalogError::DuplicateFilename(
                    record.stored_filename.clone(),
                ));
            }
            filenames.insert(record.stored_filename.as_str(), record.id.as_str())?;

            let mut table = write_txn.open_table(AUDIO)?;
            let data = rmp_serde::to_vec_named(record)?;
            table.insert(record.id.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get an audio record by its UUID
    pub fn get_audio(&self, id: &str) -> Result<Option<AudioRecord>, CatalogError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(AUDIO)?;

        match table.get(id)? {
            Some(data) => {
                let record: AudioRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// All audio records, newest upload first.
    pub fn list_audio(&self) -> Result<Vec<AudioRecord>, CatalogError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(AUDIO)?;

        let mut records = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let record: AudioRecord = rmp_serde::from_slice(value.value())?;
            records.push(record);
        }

        records.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(records)
    }

    pub fn count_audio(&self) -> Result<u64, CatalogError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(AUDIO)?;

        let mut count = 0u64;
        for result in table.iter()? {
            result?;
            count += 1;
        }
        Ok(count)
    }
}
