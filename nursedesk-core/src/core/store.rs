//! CRUD operations over the `nurses` table.

use crate::{NurseFields, NurseRecord, NursedeskError, Result, Storage};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use std::path::Path;

const SELECT_COLUMNS: &str =
    "SELECT id, name, license_number, dob, age, created_at, updated_at FROM nurses";

/// The durable record store for nurse entities.
///
/// Each write is a single statement that commits immediately; nothing is
/// batched and no transaction spans more than one record. License-number
/// uniqueness is enforced by the `UNIQUE` constraint in the schema and
/// surfaced as [`NursedeskError::DuplicateLicense`].
///
/// `NurseStore` is not `Sync`; the server wraps it in a `Mutex`.
pub struct NurseStore {
    storage: Storage,
}

impl NurseStore {
    /// Opens the database at `path`, creating and initialising it if missing or
    /// zero-length.
    ///
    /// # Errors
    ///
    /// Returns [`NursedeskError::InvalidDatabase`] if `path` exists but is not a
    /// Nursedesk database, or [`NursedeskError::Database`] for any SQLite failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::open_or_create(&path)?;
        log::info!("opened nurse store at {}", path.as_ref().display());
        Ok(Self { storage })
    }

    /// A store backed by a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            storage: Storage::open_in_memory()?,
        })
    }

    /// Wraps an already-initialised [`Storage`].
    pub fn from_storage(storage: Storage) -> Self {
        Self { storage }
    }

    /// Returns every record, newest id first.
    pub fn list(&self) -> Result<Vec<NurseRecord>> {
        let mut stmt = self
            .storage
            .connection()
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id DESC"))?;

        let records = stmt
            .query_map([], map_nurse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        log::debug!("listed {} nurses", records.len());
        Ok(records)
    }

    /// Fetches a single record by ID.
    ///
    /// # Errors
    ///
    /// Returns [`NursedeskError::NotFound`] if no row has `id`.
    pub fn get(&self, id: i64) -> Result<NurseRecord> {
        self.storage
            .connection()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                map_nurse_row,
            )
            .optional()?
            .ok_or(NursedeskError::NotFound(id))
    }

    /// Inserts a new record and returns it with its assigned id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`NursedeskError::DuplicateLicense`] if another record already
    /// holds `fields.license_number`; the table is left unchanged. License
    /// numbers are compared and stored without surrounding whitespace.
    pub fn insert(&mut self, fields: &NurseFields) -> Result<NurseRecord> {
        let now = Utc::now();
        let license_number = fields.license_number.trim();
        let conn = self.storage.connection();

        conn.execute(
            "INSERT INTO nurses (name, license_number, dob, age, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![fields.name, license_number, fields.dob, fields.age, now, now],
        )
        .map_err(|e| translate_write_error(e, license_number))?;

        let id = conn.last_insert_rowid();
        log::info!("created nurse {id} ({license_number})");
        self.get(id)
    }

    /// Replaces all four editable fields of `id` and refreshes `updated_at`.
    ///
    /// `created_at` and `id` are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`NursedeskError::NotFound`] if `id` does not exist, or
    /// [`NursedeskError::DuplicateLicense`] if the new license number belongs to
    /// a different record.
    pub fn update(&mut self, id: i64, fields: &NurseFields) -> Result<NurseRecord> {
        let now = Utc::now();
        let license_number = fields.license_number.trim();

        let changed = self
            .storage
            .connection()
            .execute(
                "UPDATE nurses
                 SET name = ?1, license_number = ?2, dob = ?3, age = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![fields.name, license_number, fields.dob, fields.age, now, id],
            )
            .map_err(|e| translate_write_error(e, license_number))?;

        // UPDATE on a missing row succeeds but touches nothing.
        if changed == 0 {
            return Err(NursedeskError::NotFound(id));
        }

        log::info!("updated nurse {id}");
        self.get(id)
    }

    /// Permanently removes `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NursedeskError::NotFound`] if `id` does not exist.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let changed = self
            .storage
            .connection()
            .execute("DELETE FROM nurses WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(NursedeskError::NotFound(id));
        }

        log::info!("deleted nurse {id}");
        Ok(())
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .storage
            .connection()
            .query_row("SELECT COUNT(*) FROM nurses", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn map_nurse_row(row: &Row<'_>) -> rusqlite::Result<NurseRecord> {
    Ok(NurseRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        license_number: row.get(2)?,
        dob: row.get(3)?,
        age: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Maps a UNIQUE violation on `license_number` to [`NursedeskError::DuplicateLicense`].
fn translate_write_error(err: rusqlite::Error, license_number: &str) -> NursedeskError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            log::warn!("rejected duplicate license number {license_number}");
            NursedeskError::DuplicateLicense(license_number.to_string())
        }
        _ => NursedeskError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    fn fields(name: &str, license: &str, dob: (i32, u32, u32), age: u32) -> NurseFields {
        NurseFields {
            name: name.to_string(),
            license_number: license.to_string(),
            dob: NaiveDate::from_ymd_opt(dob.0, dob.1, dob.2).unwrap(),
            age,
        }
    }

    fn ann() -> NurseFields {
        fields("Ann Lee", "RN-1", (1990, 1, 1), 34)
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let mut store = NurseStore::in_memory().unwrap();
        let created = store.insert(&ann()).unwrap();

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.fields(), ann());
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn test_insert_duplicate_license_leaves_count_unchanged() {
        let mut store = NurseStore::in_memory().unwrap();
        store.insert(&ann()).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        let result = store.insert(&fields("Bob Ray", "RN-1", (1985, 6, 30), 39));
        assert!(matches!(result, Err(NursedeskError::DuplicateLicense(ref l)) if l == "RN-1"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_padded_license_is_still_a_duplicate() {
        let mut store = NurseStore::in_memory().unwrap();
        store.insert(&ann()).unwrap();

        let result = store.insert(&fields("Bob Ray", " RN-1 ", (1985, 6, 30), 39));
        assert!(matches!(result, Err(NursedeskError::DuplicateLicense(ref l)) if l == "RN-1"));
        assert_eq!(store.count().unwrap(), 1);

        let bob = store
            .insert(&fields("Bob Ray", "RN-2", (1985, 6, 30), 39))
            .unwrap();
        let result = store.update(bob.id, &fields("Bob Ray", "RN-1\t", (1985, 6, 30), 39));
        assert!(matches!(result, Err(NursedeskError::DuplicateLicense(_))));
        assert_eq!(store.get(bob.id).unwrap().license_number, "RN-2");
    }

    #[test]
    fn test_list_is_newest_first() {
        let mut store = NurseStore::in_memory().unwrap();
        let a = store.insert(&ann()).unwrap();
        let b = store
            .insert(&fields("Bob Ray", "RN-2", (1985, 6, 30), 39))
            .unwrap();
        let c = store
            .insert(&fields("Cy Dunn", "RN-3", (2000, 12, 31), 23))
            .unwrap();

        let ids: Vec<i64> = store.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn test_update_replaces_fields_and_refreshes_updated_at() {
        let mut store = NurseStore::in_memory().unwrap();
        let created = store.insert(&ann()).unwrap();

        let new_fields = fields("Ann Lee-Park", "RN-1A", (1990, 2, 2), 35);
        let updated = store.update(created.id, &new_fields).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.fields(), new_fields);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_keeps_own_license_number() {
        let mut store = NurseStore::in_memory().unwrap();
        let created = store.insert(&ann()).unwrap();

        let renamed = fields("Ann B. Lee", "RN-1", (1990, 1, 1), 34);
        let updated = store.update(created.id, &renamed).unwrap();
        assert_eq!(updated.name, "Ann B. Lee");
    }

    #[test]
    fn test_update_not_found_leaves_store_unchanged() {
        let mut store = NurseStore::in_memory().unwrap();
        let created = store.insert(&ann()).unwrap();
        let before = store.list().unwrap();

        let result = store.update(created.id + 100, &fields("X", "RN-9", (1999, 9, 9), 25));
        assert!(matches!(result, Err(NursedeskError::NotFound(_))));
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn test_update_to_taken_license_is_duplicate() {
        let mut store = NurseStore::in_memory().unwrap();
        store.insert(&ann()).unwrap();
        let bob = store
            .insert(&fields("Bob Ray", "RN-2", (1985, 6, 30), 39))
            .unwrap();

        let result = store.update(bob.id, &fields("Bob Ray", "RN-1", (1985, 6, 30), 39));
        assert!(matches!(result, Err(NursedeskError::DuplicateLicense(_))));
        assert_eq!(store.get(bob.id).unwrap().license_number, "RN-2");
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let mut store = NurseStore::in_memory().unwrap();
        let created = store.insert(&ann()).unwrap();

        store.delete(created.id).unwrap();
        assert!(matches!(
            store.get(created.id),
            Err(NursedeskError::NotFound(id)) if id == created.id
        ));
        assert!(matches!(
            store.delete(created.id),
            Err(NursedeskError::NotFound(_))
        ));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut store = NurseStore::in_memory().unwrap();
        let first = store.insert(&ann()).unwrap();
        store.delete(first.id).unwrap();

        let second = store.insert(&ann()).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_age_is_stored_as_submitted() {
        let mut store = NurseStore::in_memory().unwrap();
        // dob says ~34, age says 50: allowed inconsistency.
        let created = store
            .insert(&fields("Ann Lee", "RN-1", (1990, 1, 1), 50))
            .unwrap();
        assert_eq!(store.get(created.id).unwrap().age, 50);
    }

    #[test]
    fn test_records_persist_across_open() {
        let temp = NamedTempFile::new().unwrap();
        let id = {
            let mut store = NurseStore::from_storage(Storage::create(temp.path()).unwrap());
            store.insert(&ann()).unwrap().id
        };

        let store = NurseStore::open(temp.path()).unwrap();
        assert_eq!(store.get(id).unwrap().license_number, "RN-1");
    }

    #[test]
    fn test_open_accepts_pre_created_empty_file() {
        let temp = NamedTempFile::new().unwrap();

        let mut store = NurseStore::open(temp.path()).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        store.insert(&ann()).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
