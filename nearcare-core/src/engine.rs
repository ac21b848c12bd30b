//! Proximity and address queries over a record store.
//!
//! [`QueryEngine`] owns a [`RecordStore`] together with the [`SpatialIndex`]
//! built over it. Both sit behind one reader/writer lock: mutations update
//! the store and then the index while holding the write lock, so a query
//! never sees a record that is stored but not indexed, or the reverse.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};
use thiserror::Error;

use crate::{
    CoordinateError, GeoPoint, NearbyProvider, NewProvider, ProviderId, ProviderRecord,
    RecordStore, SpatialIndex, StoreError, ValidationError,
};

/// Search radius applied when a proximity request omits one, in metres.
pub const DEFAULT_MAX_DISTANCE_METERS: f64 = 5_000.0;

/// Malformed query parameters.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvalidArgument {
    /// A required coordinate was not supplied.
    #[error("{field} is required")]
    MissingCoordinate {
        /// Wire name of the missing coordinate.
        field: &'static str,
    },
    /// The search centre is not a valid WGS84 coordinate.
    #[error("invalid search centre: {0}")]
    InvalidCentre(#[from] CoordinateError),
    /// The radius was negative or not a number.
    #[error("maximum distance must be a non-negative number of metres, got {0}")]
    InvalidDistance(f64),
    /// The address search term was empty or blank.
    #[error("search term must not be empty")]
    EmptySearchTerm,
}

/// Errors returned by [`QueryEngine`] operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A provider failed validation on create.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Query parameters were malformed.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    /// No provider carries the requested identifier.
    #[error("provider {id} not found")]
    NotFound {
        /// Identifier that was looked up.
        id: ProviderId,
    },
    /// The record store failed.
    #[error("record store failure: {0}")]
    Storage(#[source] StoreError),
    /// A thread panicked while holding the directory lock.
    #[error("provider directory unavailable after a failed writer")]
    Unavailable,
}

impl From<StoreError> for DirectoryError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { id } => Self::NotFound { id },
            other => Self::Storage(other),
        }
    }
}

struct DirectoryState<S> {
    store: S,
    index: SpatialIndex,
}

/// Thread-safe provider directory answering proximity and address queries.
///
/// The engine is `Sync` whenever its store is, so share it with `Arc` and
/// call it from any number of threads. Queries run concurrently with each
/// other; mutations are exclusive.
///
/// # Examples
///
/// ```
/// use nearcare_core::{GeoPoint, MemoryRecordStore, NewProvider, QueryEngine};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = QueryEngine::new(MemoryRecordStore::default())?;
/// let created = engine.create(NewProvider::new(
///     "Dr. Rajesh Kumar",
///     "Cardiology",
///     "Heart Care Center",
///     "123 MG Road, Bangalore",
///     GeoPoint::new(77.6033, 12.9716)?,
/// )?)?;
///
/// let centre = GeoPoint::new(77.5946, 12.9716)?;
/// let nearby = engine.find_near(centre, 10_000.0)?;
/// assert_eq!(nearby, vec![created.clone()]);
///
/// let by_area = engine.find_by_address_substring("mg road")?;
/// assert_eq!(by_area, vec![created]);
/// # Ok(())
/// # }
/// ```
pub struct QueryEngine<S> {
    state: RwLock<DirectoryState<S>>,
}

impl<S> std::fmt::Debug for QueryEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let indexed = self.state.read().map(|state| state.index.len()).ok();
        f.debug_struct("QueryEngine")
            .field("indexed", &indexed)
            .finish_non_exhaustive()
    }
}

impl<S: RecordStore> QueryEngine<S> {
    /// Build an engine over `store`, indexing every record it already holds.
    pub fn new(store: S) -> Result<Self, DirectoryError> {
        let records = store.get_all()?;
        let index = SpatialIndex::from_records(records);
        info!("indexed {} providers", index.len());
        Ok(Self {
            state: RwLock::new(DirectoryState { store, index }),
        })
    }

    /// Every provider in store order.
    pub fn list_all(&self) -> Result<Vec<ProviderRecord>, DirectoryError> {
        Ok(self.read()?.store.get_all()?)
    }

    /// Look up one provider.
    pub fn get(&self, id: ProviderId) -> Result<ProviderRecord, DirectoryError> {
        Ok(self.read()?.store.get(id)?)
    }

    /// Number of providers currently indexed.
    pub fn len(&self) -> Result<usize, DirectoryError> {
        Ok(self.read()?.index.len())
    }

    /// Whether the directory holds no providers.
    pub fn is_empty(&self) -> Result<bool, DirectoryError> {
        Ok(self.read()?.index.is_empty())
    }

    /// Store and index a validated provider.
    pub fn create(&self, draft: NewProvider) -> Result<ProviderRecord, DirectoryError> {
        let mut state = self.write()?;
        let record = state.store.insert(draft)?;
        state.index.insert(record.clone());
        info!("created provider {} ({})", record.id, record.name);
        Ok(record)
    }

    /// Store and index several providers as one unit.
    pub fn create_many(&self, drafts: Vec<NewProvider>) -> Result<Vec<ProviderRecord>, DirectoryError> {
        let mut state = self.write()?;
        let records = state.store.insert_batch(drafts)?;
        for record in &records {
            state.index.insert(record.clone());
        }
        info!("created {} providers", records.len());
        Ok(records)
    }

    /// Remove a provider from the store and the index.
    ///
    /// Returns whether a provider was removed; unknown ids are not an error.
    pub fn delete(&self, id: ProviderId) -> Result<bool, DirectoryError> {
        let mut state = self.write()?;
        let removed = state.store.delete(id)?;
        state.index.remove(id);
        if removed {
            info!("deleted provider {id}");
        } else {
            debug!("delete of unknown provider {id} ignored");
        }
        Ok(removed)
    }

    /// Remove every provider, returning how many were removed.
    pub fn clear(&self) -> Result<usize, DirectoryError> {
        let mut state = self.write()?;
        let removed = state.store.clear()?;
        state.index.clear();
        info!("cleared {removed} providers");
        Ok(removed)
    }

    /// Providers within `max_distance_meters` of `centre`, nearest first.
    pub fn find_near(
        &self,
        centre: GeoPoint,
        max_distance_meters: f64,
    ) -> Result<Vec<ProviderRecord>, DirectoryError> {
        Ok(self
            .find_near_with_distance(centre, max_distance_meters)?
            .into_iter()
            .map(|hit| hit.record)
            .collect())
    }

    /// [`find_near`](Self::find_near) with [`DEFAULT_MAX_DISTANCE_METERS`].
    pub fn find_near_default(&self, centre: GeoPoint) -> Result<Vec<ProviderRecord>, DirectoryError> {
        self.find_near(centre, DEFAULT_MAX_DISTANCE_METERS)
    }

    /// Providers within `max_distance_meters` of `centre` together with
    /// their haversine distance, nearest first. Ties keep insertion order.
    pub fn find_near_with_distance(
        &self,
        centre: GeoPoint,
        max_distance_meters: f64,
    ) -> Result<Vec<NearbyProvider>, DirectoryError> {
        if max_distance_meters.is_nan() || max_distance_meters < 0.0 {
            return Err(InvalidArgument::InvalidDistance(max_distance_meters).into());
        }
        let hits = self.read()?.index.within_distance(centre, max_distance_meters);
        debug!(
            "{} providers within {max_distance_meters} m of ({}, {})",
            hits.len(),
            centre.longitude(),
            centre.latitude()
        );
        Ok(hits)
    }

    /// Providers whose address contains `term`, ignoring case.
    ///
    /// The term is matched as given, whitespace included. A term that is
    /// empty or only whitespace is rejected. Results follow store order with
    /// no ranking.
    pub fn find_by_address_substring(&self, term: &str) -> Result<Vec<ProviderRecord>, DirectoryError> {
        if term.trim().is_empty() {
            return Err(InvalidArgument::EmptySearchTerm.into());
        }
        let needle = term.to_lowercase();
        let records = self.read()?.store.get_all()?;
        let matches: Vec<_> = records
            .into_iter()
            .filter(|record| record.address.to_lowercase().contains(&needle))
            .collect();
        debug!("{} providers with address matching {needle:?}", matches.len());
        Ok(matches)
    }

    /// Consume the engine and hand back its store.
    pub fn into_store(self) -> Result<S, DirectoryError> {
        self.state
            .into_inner()
            .map(|state| state.store)
            .map_err(|_| DirectoryError::Unavailable)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, DirectoryState<S>>, DirectoryError> {
        self.state.read().map_err(|_| DirectoryError::Unavailable)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, DirectoryState<S>>, DirectoryError> {
        self.state.write().map_err(|_| DirectoryError::Unavailable)
    }
}
