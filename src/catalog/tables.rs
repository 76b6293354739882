use redb::TableDefinition;

/// Manuscript records: uuid -> ManuscriptRecord (msgpack)
pub const MANUSCRIPTS: TableDefinition<&str, &[u8]> = TableDefinition::new("manuscripts");

/// Audio records: uuid -> AudioRecord (msgpack)
pub const AUDIO: TableDefinition<&str, &[u8]> = TableDefinition::new("audio");

/// Stored-filename index per category: stored filename -> uuid.
/// Enforces the one-file-one-record invariant at insert time.
pub const MANUSCRIPT_FILENAMES: TableDefinition<&str, &str> =
    TableDefinition::new("manuscript_filenames");
pub const AUDIO_FILENAMES: TableDefinition<&str, &str> = TableDefinition::new("audio_filenames");

/// Admin accounts: username -> AdminUser (msgpack)
pub const ADMINS: TableDefinition<&str, &[u8]> = TableDefinition::new("admins");

/// Login sessions: token -> Session (msgpack)
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");
