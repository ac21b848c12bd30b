//! Core domain types for the NearCare provider directory.
//!
//! The crate keeps healthcare providers in a [`RecordStore`] and answers two
//! questions about them through a [`QueryEngine`]: who practises within a
//! given distance of a point, and whose address mentions a given area.
//! Locations are WGS84 points stored longitude first; constructors validate
//! their input and return `Result` so bad data never reaches the store.

#![forbid(unsafe_code)]

mod engine;
mod location;
mod provider;
#[cfg(feature = "serde")]
pub mod request;
mod spatial_index;
pub mod store;
#[doc(hidden)]
pub mod test_support;

pub use engine::{DEFAULT_MAX_DISTANCE_METERS, DirectoryError, InvalidArgument, QueryEngine};
pub use location::{
    CoordinateError, EARTH_RADIUS_METERS, GeoPoint, LATITUDE_RANGE, LONGITUDE_RANGE,
    haversine_distance,
};
pub use provider::{NewProvider, ProviderId, ProviderRecord, ValidationError};
pub use spatial_index::{NearbyProvider, SpatialIndex};
#[cfg(feature = "store-sqlite")]
pub use store::SqliteRecordStore;
pub use store::{MemoryRecordStore, RecordStore, StoreError};
