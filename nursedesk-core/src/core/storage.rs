//! SQLite connection ownership and schema setup.

use crate::Result;
use rusqlite::Connection;
use std::fs;
use std::io;
use std::path::Path;

pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Creates (or re-initialises) a database at `path` and applies the schema.
    ///
    /// The schema is idempotent, so calling this on an existing database is safe.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self { conn })
    }

    /// Opens an existing database, rejecting files that lack the `nurses` table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Validate database structure
        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'nurses'",
            [],
            |row| row.get(0),
        )?;

        if table_count != 1 {
            return Err(crate::NursedeskError::InvalidDatabase(
                "Not a valid Nursedesk database".to_string(),
            ));
        }

        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self { conn })
    }

    /// Opens `path` if it holds a database, otherwise creates it.
    ///
    /// A zero-length file counts as empty, as SQLite itself treats it.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let has_content = match fs::metadata(path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if has_content {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// A private in-memory database, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn table_names(storage: &Storage) -> Vec<String> {
        storage
            .connection()
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_create_storage() {
        let temp = NamedTempFile::new().unwrap();
        let storage = Storage::create(temp.path()).unwrap();

        assert!(table_names(&storage).contains(&"nurses".to_string()));
    }

    #[test]
    fn test_open_existing_storage() {
        let temp = NamedTempFile::new().unwrap();

        // Create database first
        Storage::create(temp.path()).unwrap();

        let storage = Storage::open(temp.path()).unwrap();
        assert!(table_names(&storage).contains(&"nurses".to_string()));
    }

    #[test]
    fn test_open_invalid_database() {
        let temp = NamedTempFile::new().unwrap();

        // Create empty file (not a valid Nursedesk DB)
        std::fs::write(temp.path(), "not a database").unwrap();

        let result = Storage::open(temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_open_rejects_foreign_sqlite_file() {
        let temp = NamedTempFile::new().unwrap();
        {
            let conn = Connection::open(temp.path()).unwrap();
            conn.execute("CREATE TABLE notes (id INTEGER PRIMARY KEY)", [])
                .unwrap();
        }

        let result = Storage::open(temp.path());
        assert!(matches!(
            result,
            Err(crate::NursedeskError::InvalidDatabase(_))
        ));
    }

    #[test]
    fn test_open_or_create_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nurses.db");

        let storage = Storage::open_or_create(&path).unwrap();
        assert!(path.exists());
        assert!(table_names(&storage).contains(&"nurses".to_string()));
    }

    #[test]
    fn test_open_or_create_initialises_empty_file() {
        let temp = NamedTempFile::new().unwrap();
        assert_eq!(std::fs::metadata(temp.path()).unwrap().len(), 0);

        let storage = Storage::open_or_create(temp.path()).unwrap();
        assert!(table_names(&storage).contains(&"nurses".to_string()));
        drop(storage);

        // A second start finds the schema and opens normally.
        Storage::open(temp.path()).unwrap();
    }

    #[test]
    fn test_open_or_create_still_rejects_foreign_content() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "not a database").unwrap();

        assert!(Storage::open_or_create(temp.path()).is_err());
    }
}
