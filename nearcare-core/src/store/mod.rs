//! Durable storage of provider records.
//!
//! The [`RecordStore`] trait is the seam between the query engine and the
//! storage backend. Stores assign identifiers and timestamps; they never see
//! unvalidated input because inserts take a [`NewProvider`].

#[cfg(feature = "store-sqlite")]
use std::path::PathBuf;

use thiserror::Error;

use crate::{NewProvider, ProviderId, ProviderRecord, ValidationError};

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryRecordStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteRecordStore;

/// Errors raised by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live record carries the requested identifier.
    #[error("provider {id} not found")]
    NotFound {
        /// Identifier that was looked up.
        id: ProviderId,
    },
    /// The store cannot hand out further identifiers.
    #[error("provider id space exhausted")]
    IdsExhausted,
    /// A provider identifier could not be represented by the backend.
    #[error("provider id {id} exceeds the storage integer range")]
    IdOutOfRange {
        /// Identifier that failed the conversion.
        id: u64,
    },
    /// A persisted record no longer passes validation.
    #[error("stored provider {id} is invalid: {source}")]
    CorruptRecord {
        /// Identifier of the offending record.
        id: u64,
        /// Validation failure raised while decoding the record.
        #[source]
        source: ValidationError,
    },
    /// The backend is unusable, for example after a panic while holding its
    /// connection.
    #[error("record store unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause.
        reason: &'static str,
    },
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `providers` table failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to create providers schema: {source}")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error when reading or writing rows.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Keyed storage of [`ProviderRecord`] values.
///
/// Identifiers must be unique among live records and increase with every
/// insert, which lets callers treat id order as insertion order. Mutating
/// methods take `&mut self`; the query engine serialises them behind its
/// write lock.
///
/// # Examples
///
/// ```rust
/// use nearcare_core::{GeoPoint, MemoryRecordStore, NewProvider, RecordStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = MemoryRecordStore::default();
/// let draft = NewProvider::new(
///     "Dr. Priya Sharma",
///     "Dermatology",
///     "Skin Wellness Clinic",
///     "456 JP Nagar 7th Phase",
///     GeoPoint::new(77.5946, 12.9082)?,
/// )?;
/// let record = store.insert(draft)?;
///
/// assert_eq!(store.get(record.id)?, record);
/// assert!(store.delete(record.id)?);
/// assert!(!store.delete(record.id)?);
/// # Ok(())
/// # }
/// ```
pub trait RecordStore {
    /// Persist a validated draft, assigning a fresh identifier and timestamps.
    fn insert(&mut self, draft: NewProvider) -> Result<ProviderRecord, StoreError>;

    /// Persist several drafts as one unit: either every draft is stored or
    /// none is. Records are returned in input order.
    fn insert_batch(&mut self, drafts: Vec<NewProvider>) -> Result<Vec<ProviderRecord>, StoreError>;

    /// Remove the record with `id`, returning whether one was removed.
    ///
    /// Deleting an unknown identifier is not an error.
    fn delete(&mut self, id: ProviderId) -> Result<bool, StoreError>;

    /// Remove every record, returning how many were removed.
    fn clear(&mut self) -> Result<usize, StoreError>;

    /// Look up a record by identifier.
    fn get(&self, id: ProviderId) -> Result<ProviderRecord, StoreError>;

    /// Every live record in insertion order.
    fn get_all(&self) -> Result<Vec<ProviderRecord>, StoreError>;
}
