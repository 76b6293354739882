use chrono::Utc;
use redb::ReadableTable;

use super::db::{Catalog, CatalogError};
use super::models::{AdminUser, Session};
use super::tables::*;

impl Catalog {
    // ========================================================================
    // Admin account operations
    // ========================================================================

    pub fn put_admin(&self, admin: &AdminUser) -> Result<(), CatalogError> {
        debug_assert!(!admin.username.is_empty(), "username must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(ADMINS)?;
            let data = rmp_serde::to_vec_named(admin)?;
            table.insert(admin.username.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_admin(&self, username: &str) -> Result<Option<AdminUser>, CatalogError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ADMINS)?;

        match table.get(username)? {
            Some(data) => {
                let admin: AdminUser = rmp_serde::from_slice(data.value())?;
                Ok(Some(admin))
            }
            None => Ok(None),
        }
    }

    pub fn count_admins(&self) -> Result<u64, CatalogError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ADMINS)?;

        let mut count = 0u64;
        for result in table.iter()? {
            result?;
            count += 1;
        }
        Ok(count)
    }

    // ========================================================================
    // Session operations
    // ========================================================================

    pub fn put_session(&self, session: &Session) -> Result<(), CatalogError> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS)?;
            let data = rmp_serde::to_vec_named(session)?;
            table.insert(session.token.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a session, removing it when it has already expired.
    pub fn get_session(&self, token: &str) -> Result<Option<Session>, CatalogError> {
        let session = {
            let read_txn = self.begin_read()?;
            let table = read_txn.open_table(SESSIONS)?;
            match table.get(token)? {
                Some(data) => {
                    let session: Session = rmp_serde::from_slice(data.value())?;
                    Some(session)
                }
                None => None,
            }
        };

        match session {
            Some(s) if s.is_expired(Utc::now()) => {
                self.delete_session(token)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub fn delete_session(&self, token: &str) -> Result<bool, CatalogError> {
        let write_txn = self.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(SESSIONS)?;
            let removed = table.remove(token)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}
