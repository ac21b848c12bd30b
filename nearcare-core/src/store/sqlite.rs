//! SQLite-backed store implementation for persisted providers.

use std::{
    fmt,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{GeoPoint, NewProvider, ProviderId, ProviderRecord, ValidationError};

use super::{RecordStore, StoreError};

const CREATE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS providers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    specialty TEXT NOT NULL,
    organization_name TEXT NOT NULL,
    address TEXT NOT NULL,
    longitude REAL NOT NULL,
    latitude REAL NOT NULL,
    phone TEXT,
    email TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT id, name, specialty, organization_name, address, \
     longitude, latitude, phone, email, created_at, updated_at FROM providers";

/// Durable [`RecordStore`] backed by a single SQLite table.
///
/// Identifiers come from an `AUTOINCREMENT` key, so they are never reused and
/// insertion order survives restarts. The connection sits behind a mutex,
/// which makes the store shareable between reader threads.
pub struct SqliteRecordStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRecordStore").finish_non_exhaustive()
    }
}

impl SqliteRecordStore {
    /// Open (or create) a store at `path`, initialising the schema if missing.
    pub fn open<P>(path: P) -> Result<Self, StoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|source| StoreError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(connection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| StoreError::OpenDatabase {
                path: ":memory:".into(),
                source,
            })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, StoreError> {
        connection
            .execute(CREATE_SCHEMA, [])
            .map_err(|source| StoreError::CreateSchema { source })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::Unavailable {
            reason: "SQLite connection lock poisoned",
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn insert(&mut self, draft: NewProvider) -> Result<ProviderRecord, StoreError> {
        let connection = self.lock()?;
        insert_row(&connection, draft, Utc::now())
    }

    fn insert_batch(&mut self, drafts: Vec<NewProvider>) -> Result<Vec<ProviderRecord>, StoreError> {
        let mut connection = self.lock()?;
        let transaction = connection.transaction()?;
        let created_at = Utc::now();
        let records = drafts
            .into_iter()
            .map(|draft| insert_row(&transaction, draft, created_at))
            .collect::<Result<Vec<_>, _>>()?;
        transaction.commit()?;
        Ok(records)
    }

    fn delete(&mut self, id: ProviderId) -> Result<bool, StoreError> {
        let Some(key) = to_sql_id(id) else {
            return Ok(false);
        };
        let connection = self.lock()?;
        let removed = connection.execute("DELETE FROM providers WHERE id = ?1", [key])?;
        Ok(removed > 0)
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let connection = self.lock()?;
        Ok(connection.execute("DELETE FROM providers", [])?)
    }

    fn get(&self, id: ProviderId) -> Result<ProviderRecord, StoreError> {
        let key = to_sql_id(id).ok_or(StoreError::NotFound { id })?;
        let connection = self.lock()?;
        let mut statement = connection.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
        let row = statement.query_row([key], RawRow::read).optional()?;
        row.ok_or(StoreError::NotFound { id })?.into_record()
    }

    fn get_all(&self) -> Result<Vec<ProviderRecord>, StoreError> {
        let connection = self.lock()?;
        let mut statement = connection.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = statement.query_map([], RawRow::read)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

fn insert_row(
    connection: &Connection,
    draft: NewProvider,
    created_at: DateTime<Utc>,
) -> Result<ProviderRecord, StoreError> {
    let location = draft.location();
    connection.execute(
        "INSERT INTO providers (
            name, specialty, organization_name, address, longitude, latitude,
            phone, email, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            draft.name(),
            draft.specialty(),
            draft.organization_name(),
            draft.address(),
            location.longitude(),
            location.latitude(),
            draft.phone(),
            draft.email(),
            created_at,
            created_at,
        ],
    )?;
    let rowid = connection.last_insert_rowid();
    let id = u64::try_from(rowid).map_err(|_| StoreError::IdsExhausted)?;
    Ok(draft.into_record(ProviderId::new(id), created_at))
}

/// Ids above `i64::MAX` cannot have been assigned by SQLite.
fn to_sql_id(id: ProviderId) -> Option<i64> {
    i64::try_from(id.get()).ok()
}

/// Column values as read from SQLite, before validation.
struct RawRow {
    id: i64,
    name: String,
    specialty: String,
    organization_name: String,
    address: String,
    longitude: f64,
    latitude: f64,
    phone: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            specialty: row.get(2)?,
            organization_name: row.get(3)?,
            address: row.get(4)?,
            longitude: row.get(5)?,
            latitude: row.get(6)?,
            phone: row.get(7)?,
            email: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_record(self) -> Result<ProviderRecord, StoreError> {
        let id = u64::try_from(self.id).map_err(|_| StoreError::IdOutOfRange {
            id: self.id.unsigned_abs(),
        })?;
        let corrupt = |source: ValidationError| StoreError::CorruptRecord { id, source };
        let location = GeoPoint::new(self.longitude, self.latitude)
            .map_err(|err| corrupt(ValidationError::from(err)))?;
        let record = ProviderRecord {
            id: ProviderId::new(id),
            name: self.name,
            specialty: self.specialty,
            organization_name: self.organization_name,
            address: self.address,
            location,
            phone: self.phone,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        record.revalidate().map_err(corrupt)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn draft(name: &str, address: &str, longitude: f64, latitude: f64) -> NewProvider {
        let location = GeoPoint::new(longitude, latitude).expect("valid location");
        NewProvider::new(name, "General", "Clinic", address, location).expect("valid draft")
    }

    #[fixture]
    fn temp_database() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("providers.db");
        (dir, path)
    }

    #[rstest]
    fn insert_then_get_round_trips() {
        let mut store = SqliteRecordStore::open_in_memory().expect("open store");
        let inserted = store
            .insert(draft("Dr. A", "1 Road", 77.6, 12.9).with_email("a@example.com"))
            .expect("insert");
        let fetched = store.get(inserted.id).expect("get");
        assert_eq!(fetched, inserted);
        assert_eq!(fetched.email.as_deref(), Some("a@example.com"));
        assert_eq!(fetched.phone, None);
    }

    #[rstest]
    fn records_survive_reopening(#[from(temp_database)] (_dir, path): (TempDir, PathBuf)) {
        let inserted = {
            let mut store = SqliteRecordStore::open(&path).expect("open store");
            vec![
                store.insert(draft("Dr. A", "1 Road", 77.6, 12.9)).expect("insert"),
                store.insert(draft("Dr. B", "2 Road", 77.5, 12.8)).expect("insert"),
            ]
        };

        let reopened = SqliteRecordStore::open(&path).expect("reopen store");
        assert_eq!(reopened.get_all().expect("list records"), inserted);
    }

    #[rstest]
    fn ids_are_not_reused_after_delete(#[from(temp_database)] (_dir, path): (TempDir, PathBuf)) {
        let mut store = SqliteRecordStore::open(&path).expect("open store");
        let first = store.insert(draft("Dr. A", "1 Road", 0.0, 0.0)).expect("insert");
        assert!(store.delete(first.id).expect("delete"));
        let second = store.insert(draft("Dr. B", "2 Road", 0.0, 0.0)).expect("insert");
        assert!(second.id > first.id);
    }

    #[rstest]
    fn delete_missing_id_returns_false() {
        let mut store = SqliteRecordStore::open_in_memory().expect("open store");
        assert!(!store.delete(ProviderId::new(9)).expect("delete"));
    }

    #[rstest]
    fn get_missing_id_reports_not_found() {
        let store = SqliteRecordStore::open_in_memory().expect("open store");
        let error = store.get(ProviderId::new(3)).expect_err("missing record");
        assert!(matches!(error, StoreError::NotFound { .. }));
    }

    #[rstest]
    fn ids_beyond_sqlite_range_are_missing() {
        let mut store = SqliteRecordStore::open_in_memory().expect("open store");
        store.insert(draft("Dr. A", "1 Road", 0.0, 0.0)).expect("insert");
        let oversized = ProviderId::new(u64::MAX);

        assert!(!store.delete(oversized).expect("delete"));
        let error = store.get(oversized).expect_err("id beyond i64 range");
        assert!(matches!(error, StoreError::NotFound { id } if id == oversized));
        assert_eq!(store.get_all().expect("list records").len(), 1);
    }

    #[rstest]
    fn insert_batch_is_atomic_and_ordered() {
        let mut store = SqliteRecordStore::open_in_memory().expect("open store");
        let records = store
            .insert_batch(vec![
                draft("Dr. A", "1 Road", 0.0, 0.0),
                draft("Dr. B", "2 Road", 1.0, 1.0),
            ])
            .expect("insert batch");
        assert_eq!(store.get_all().expect("list records"), records);
        assert_eq!(store.clear().expect("clear"), 2);
        assert!(store.get_all().expect("list records").is_empty());
    }

    #[rstest]
    fn rows_with_invalid_coordinates_are_reported(
        #[from(temp_database)] (_dir, path): (TempDir, PathBuf),
    ) {
        let mut store = SqliteRecordStore::open(&path).expect("open store");
        let record = store.insert(draft("Dr. A", "1 Road", 0.0, 0.0)).expect("insert");
        drop(store);

        let connection = Connection::open(&path).expect("open raw connection");
        connection
            .execute("UPDATE providers SET longitude = 200.0", [])
            .expect("corrupt row");
        drop(connection);

        let reopened = SqliteRecordStore::open(&path).expect("reopen store");
        let error = reopened.get(record.id).expect_err("corrupt row");
        assert!(matches!(
            error,
            StoreError::CorruptRecord {
                source: ValidationError::InvalidLocation(_),
                ..
            }
        ));
    }
}
