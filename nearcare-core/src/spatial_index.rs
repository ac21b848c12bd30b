//! R\*-tree over provider locations.
//!
//! The tree is keyed by `[longitude, latitude]` in degrees. Radius queries
//! prune with one or two lon/lat boxes that bound the spherical search cap,
//! then filter candidates by exact haversine distance. The pruning boxes are
//! conservative, so results always match a full scan.

use std::{
    collections::HashMap,
    f64::consts::{FRAC_PI_2, PI},
};

use rstar::{AABB, RTree, RTreeObject};

use crate::{EARTH_RADIUS_METERS, GeoPoint, ProviderId, ProviderRecord};

/// Degrees added around every pruning box to absorb floating-point rounding
/// between the box bounds and the haversine filter.
const ENVELOPE_PADDING_DEGREES: f64 = 1e-6;

/// Entry stored inside the R\*-tree.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedProvider {
    id: ProviderId,
    location: GeoPoint,
}

impl From<&ProviderRecord> for IndexedProvider {
    fn from(record: &ProviderRecord) -> Self {
        Self {
            id: record.id,
            location: record.location,
        }
    }
}

impl RTreeObject for IndexedProvider {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.longitude(), self.location.latitude()])
    }
}

/// A provider paired with its distance from a query centre.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct NearbyProvider {
    /// The matching record.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: ProviderRecord,
    /// Great-circle distance from the query centre in metres.
    pub distance_meters: f64,
}

/// In-memory spatial index of provider records.
///
/// Holds the records themselves alongside the tree so radius queries never
/// touch the backing store.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use nearcare_core::{GeoPoint, NewProvider, ProviderId, SpatialIndex};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let record = NewProvider::new(
///     "Dr. Amit Patel",
///     "Orthopedics",
///     "Bone & Joint Clinic",
///     "789 Koramangala 4th Block",
///     GeoPoint::new(77.6271, 12.9352)?,
/// )?
/// .into_record(ProviderId::new(1), Utc::now());
/// let index = SpatialIndex::from_records(vec![record]);
///
/// let centre = GeoPoint::new(77.6271, 12.9400)?;
/// let hits = index.within_distance(centre, 1_000.0);
/// assert_eq!(hits.len(), 1);
/// assert!(index.within_distance(centre, 100.0).is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<IndexedProvider>,
    records: HashMap<ProviderId, ProviderRecord>,
}

impl SpatialIndex {
    /// Bulk-load an index from existing records.
    #[must_use]
    pub fn from_records(records: Vec<ProviderRecord>) -> Self {
        let entries = records.iter().map(IndexedProvider::from).collect();
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            records,
        }
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record, replacing any previous entry with the same id.
    pub fn insert(&mut self, record: ProviderRecord) {
        self.remove(record.id);
        self.tree.insert(IndexedProvider::from(&record));
        self.records.insert(record.id, record);
    }

    /// Remove the record with `id`, returning it when present.
    pub fn remove(&mut self, id: ProviderId) -> Option<ProviderRecord> {
        let record = self.records.remove(&id)?;
        self.tree.remove(&IndexedProvider::from(&record));
        Some(record)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.records.clear();
    }

    /// Look up an indexed record.
    #[must_use]
    pub fn get(&self, id: ProviderId) -> Option<&ProviderRecord> {
        self.records.get(&id)
    }

    /// Records within `max_distance_meters` of `centre`, nearest first.
    ///
    /// Equal distances are ordered by id, which is insertion order. A
    /// negative or `NaN` radius matches nothing; callers validate it first.
    #[must_use]
    pub fn within_distance(&self, centre: GeoPoint, max_distance_meters: f64) -> Vec<NearbyProvider> {
        if max_distance_meters.is_nan() || max_distance_meters < 0.0 {
            return Vec::new();
        }

        let mut matches: Vec<(f64, &IndexedProvider)> = search_envelopes(centre, max_distance_meters)
            .iter()
            .flat_map(|envelope| self.tree.locate_in_envelope(envelope))
            .filter_map(|entry| {
                let distance = centre.distance_to(entry.location);
                (distance <= max_distance_meters).then_some((distance, entry))
            })
            .collect();

        matches.sort_unstable_by(|(left_distance, left), (right_distance, right)| {
            left_distance
                .total_cmp(right_distance)
                .then_with(|| left.id.cmp(&right.id))
        });

        matches
            .into_iter()
            .filter_map(|(distance_meters, entry)| {
                self.records.get(&entry.id).map(|record| NearbyProvider {
                    record: record.clone(),
                    distance_meters,
                })
            })
            .collect()
    }
}

/// Lon/lat boxes that together contain every point within `radius_meters`
/// of `centre`.
///
/// The latitude band is exact (`±r/R`). The longitude half-width is
/// `asin(sin(r/R) / cos φ)`; when the cap reaches a pole every longitude is
/// possible, and when the band crosses the antimeridian it is split in two.
fn search_envelopes(centre: GeoPoint, radius_meters: f64) -> Vec<AABB<[f64; 2]>> {
    let angular = radius_meters / EARTH_RADIUS_METERS;
    if angular >= PI {
        return vec![world_envelope()];
    }

    let latitude = centre.latitude().to_radians();
    let min_latitude = latitude - angular;
    let max_latitude = latitude + angular;
    if min_latitude <= -FRAC_PI_2 || max_latitude >= FRAC_PI_2 {
        return vec![padded(
            [-180.0, min_latitude.to_degrees().max(-90.0)],
            [180.0, max_latitude.to_degrees().min(90.0)],
        )];
    }

    let ratio = (angular.sin() / latitude.cos()).min(1.0);
    let half_width = ratio.asin().to_degrees();
    let min_lon = centre.longitude() - half_width;
    let max_lon = centre.longitude() + half_width;
    let min_lat = min_latitude.to_degrees();
    let max_lat = max_latitude.to_degrees();

    if max_lon - min_lon >= 360.0 {
        vec![padded([-180.0, min_lat], [180.0, max_lat])]
    } else if min_lon < -180.0 {
        vec![
            padded([min_lon + 360.0, min_lat], [180.0, max_lat]),
            padded([-180.0, min_lat], [max_lon, max_lat]),
        ]
    } else if max_lon > 180.0 {
        vec![
            padded([min_lon, min_lat], [180.0, max_lat]),
            padded([-180.0, min_lat], [max_lon - 360.0, max_lat]),
        ]
    } else {
        vec![padded([min_lon, min_lat], [max_lon, max_lat])]
    }
}

fn padded(lower: [f64; 2], upper: [f64; 2]) -> AABB<[f64; 2]> {
    let [min_lon, min_lat] = lower;
    let [max_lon, max_lat] = upper;
    AABB::from_corners(
        [min_lon - ENVELOPE_PADDING_DEGREES, min_lat - ENVELOPE_PADDING_DEGREES],
        [max_lon + ENVELOPE_PADDING_DEGREES, max_lat + ENVELOPE_PADDING_DEGREES],
    )
}

fn world_envelope() -> AABB<[f64; 2]> {
    padded([-180.0, -90.0], [180.0, 90.0])
}
