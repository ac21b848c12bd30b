//! Facade crate for the NearCare provider directory.
//!
//! This crate re-exports the core domain types and exposes the request
//! contract and the durable store behind feature flags.

#![forbid(unsafe_code)]

pub use nearcare_core::{
    CoordinateError, DEFAULT_MAX_DISTANCE_METERS, DirectoryError, EARTH_RADIUS_METERS, GeoPoint,
    InvalidArgument, MemoryRecordStore, NearbyProvider, NewProvider, ProviderId, ProviderRecord,
    QueryEngine, RecordStore, SpatialIndex, StoreError, ValidationError, haversine_distance,
};

#[cfg(feature = "serde")]
pub use nearcare_core::request::{
    AreaSearch, CreateProviderRequest, DeleteOutcome, ProximitySearch,
};

#[cfg(feature = "store-sqlite")]
pub use nearcare_core::SqliteRecordStore;
