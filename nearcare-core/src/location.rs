//! Validated WGS84 coordinates and great-circle distance.
//!
//! Locations are always carried as `(longitude, latitude)`: the wrapped
//! [`geo::Point`] uses `x = longitude` and `y = latitude`. Callers that hold a
//! `(latitude, longitude)` pair must translate it explicitly at their
//! boundary; nothing in this crate swaps the two.

use geo::Point;
use thiserror::Error;

/// Mean Earth radius used by [`haversine_distance`], in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Error returned when a coordinate lies outside the WGS84 ranges.
///
/// `NaN` never satisfies a range check, so non-finite values are reported
/// through the same variants.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum CoordinateError {
    /// Longitude was outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// Latitude was outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// A geographic point stored as `(longitude, latitude)`.
///
/// # Examples
///
/// ```
/// use nearcare_core::GeoPoint;
///
/// # fn main() -> Result<(), nearcare_core::CoordinateError> {
/// let mg_road = GeoPoint::new(77.6033, 12.9716)?;
/// assert_eq!(mg_road.longitude(), 77.6033);
/// assert_eq!(mg_road.latitude(), 12.9716);
/// assert!(GeoPoint::new(200.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")
)]
pub struct GeoPoint(Point<f64>);

impl GeoPoint {
    /// Validates and constructs a point from longitude and latitude, in that
    /// order.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, CoordinateError> {
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        Ok(Self(Point::new(longitude, latitude)))
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(self) -> f64 {
        self.0.x()
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(self) -> f64 {
        self.0.y()
    }

    /// The underlying `geo` point (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn as_point(&self) -> &Point<f64> {
        &self.0
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        haversine_distance(self, other)
    }
}

impl TryFrom<Point<f64>> for GeoPoint {
    type Error = CoordinateError;

    fn try_from(point: Point<f64>) -> Result<Self, Self::Error> {
        Self::new(point.x(), point.y())
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        point.0
    }
}

/// Great-circle distance between two points on a sphere of radius
/// [`EARTH_RADIUS_METERS`], computed with the haversine formula.
///
/// # Examples
///
/// ```
/// use nearcare_core::{GeoPoint, haversine_distance};
///
/// # fn main() -> Result<(), nearcare_core::CoordinateError> {
/// let a = GeoPoint::new(0.0, 0.0)?;
/// let b = GeoPoint::new(0.0, 1.0)?;
/// let metres = haversine_distance(a, b);
/// assert!((metres - 111_194.93).abs() < 0.01);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn haversine_distance(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat_from = from.latitude().to_radians();
    let lat_to = to.latitude().to_radians();
    let delta_lat = lat_to - lat_from;
    let delta_lon = (to.longitude() - from.longitude()).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push the term marginally above 1 for antipodal points.
    2.0 * EARTH_RADIUS_METERS * half_chord.sqrt().min(1.0).asin()
}

/// GeoJSON representation used on the wire: `coordinates` is `[lng, lat]`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: GeoJsonKind,
    coordinates: [f64; 2],
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
enum GeoJsonKind {
    Point,
}

#[cfg(feature = "serde")]
impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = CoordinateError;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        let [longitude, latitude] = value.coordinates;
        Self::new(longitude, latitude)
    }
}

#[cfg(feature = "serde")]
impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: GeoJsonKind::Point,
            coordinates: [point.longitude(), point.latitude()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn point(longitude: f64, latitude: f64) -> GeoPoint {
        GeoPoint::new(longitude, latitude).expect("valid coordinates")
    }

    #[rstest]
    #[case(-180.0, -90.0)]
    #[case(180.0, 90.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_coordinates(#[case] longitude: f64, #[case] latitude: f64) {
        assert!(GeoPoint::new(longitude, latitude).is_ok());
    }

    #[rstest]
    #[case(200.0, 0.0, CoordinateError::LongitudeOutOfRange(200.0))]
    #[case(-180.5, 0.0, CoordinateError::LongitudeOutOfRange(-180.5))]
    #[case(0.0, 90.1, CoordinateError::LatitudeOutOfRange(90.1))]
    #[case(0.0, -91.0, CoordinateError::LatitudeOutOfRange(-91.0))]
    fn rejects_out_of_range_coordinates(
        #[case] longitude: f64,
        #[case] latitude: f64,
        #[case] expected: CoordinateError,
    ) {
        assert_eq!(GeoPoint::new(longitude, latitude), Err(expected));
    }

    #[rstest]
    fn rejects_non_finite_coordinates() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[rstest]
    fn keeps_longitude_first() {
        let location = point(77.6033, 12.9716);
        assert_eq!(location.as_point().x(), 77.6033);
        assert_eq!(location.as_point().y(), 12.9716);
    }

    #[rstest]
    fn distance_to_self_is_zero() {
        let location = point(77.6033, 12.9716);
        assert_eq!(location.distance_to(location), 0.0);
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = point(77.6033, 12.9716);
        let b = point(77.5946, 12.9082);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-9);
    }

    #[rstest]
    fn distance_between_bangalore_landmarks() {
        let mg_road = point(77.6033, 12.9716);
        let reference = point(77.5946, 12.9716);
        let metres = haversine_distance(reference, mg_road);
        assert!((metres - 942.7).abs() < 1.0, "unexpected distance {metres}");
    }

    #[rstest]
    fn antipodal_distance_is_half_circumference() {
        let metres = haversine_distance(point(0.0, 0.0), point(180.0, 0.0));
        let expected = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((metres - expected).abs() < 1e-6);
    }

    #[rstest]
    fn distance_across_antimeridian_is_short() {
        let metres = haversine_distance(point(179.99, 0.0), point(-179.99, 0.0));
        assert!(metres < 2_500.0, "unexpected distance {metres}");
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_as_geojson_point() {
        let json = serde_json::to_value(point(77.6033, 12.9716)).expect("serialise point");
        assert_eq!(
            json,
            serde_json::json!({ "type": "Point", "coordinates": [77.6033, 12.9716] })
        );
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialising_rejects_invalid_coordinates() {
        let json = serde_json::json!({ "type": "Point", "coordinates": [200.0, 0.0] });
        assert!(serde_json::from_value::<GeoPoint>(json).is_err());
    }
}
