//! Request/response contract for the layer that fronts the directory.
//!
//! These types mirror the JSON payloads a thin HTTP or CLI layer exchanges
//! with the engine. Callers speak `(latitude, longitude)`; this module is
//! where that pair becomes a [`GeoPoint`] built as `(longitude, latitude)`.
//! Every field is optional on the wire so that absent values surface as
//! [`ValidationError`] or [`InvalidArgument`] rather than a decode failure.

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_MAX_DISTANCE_METERS, DirectoryError, GeoPoint, InvalidArgument, NewProvider,
    ProviderId, ProviderRecord, QueryEngine, RecordStore, ValidationError,
};

/// Payload for creating a provider.
///
/// # Examples
///
/// ```
/// use nearcare_core::request::CreateProviderRequest;
///
/// let request: CreateProviderRequest = serde_json::from_str(
///     r#"{
///         "name": "Dr. Priya Sharma",
///         "specialty": "Dermatology",
///         "clinicName": "Skin Wellness Clinic",
///         "address": "456 JP Nagar 7th Phase, Bangalore",
///         "latitude": 12.9082,
///         "longitude": 77.5946
///     }"#,
/// )
/// .unwrap();
/// let draft = request.into_new_provider().unwrap();
/// assert_eq!(draft.location().longitude(), 77.5946);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderRequest {
    /// Provider display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Medical specialty.
    #[serde(default, alias = "specialization")]
    pub specialty: Option<String>,
    /// Clinic or organisation name.
    #[serde(default, alias = "clinicName")]
    pub organization_name: Option<String>,
    /// Registered street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Latitude in degrees.
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(default, alias = "lng")]
    pub longitude: Option<f64>,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl CreateProviderRequest {
    /// Validate the payload into a draft ready for insertion.
    pub fn into_new_provider(self) -> Result<NewProvider, ValidationError> {
        let latitude = self
            .latitude
            .ok_or(ValidationError::MissingField { field: "latitude" })?;
        let longitude = self
            .longitude
            .ok_or(ValidationError::MissingField { field: "longitude" })?;
        let location = GeoPoint::new(longitude, latitude)?;

        let mut draft = NewProvider::new(
            self.name.unwrap_or_default(),
            self.specialty.unwrap_or_default(),
            self.organization_name.unwrap_or_default(),
            self.address.unwrap_or_default(),
            location,
        )?;
        if let Some(phone) = self.phone {
            draft = draft.with_phone(phone);
        }
        if let Some(email) = self.email {
            draft = draft.with_email(email);
        }
        Ok(draft)
    }
}

/// Parameters of a proximity search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximitySearch {
    /// Latitude of the search centre.
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    /// Longitude of the search centre.
    #[serde(default, alias = "lng")]
    pub longitude: Option<f64>,
    /// Search radius in metres; [`DEFAULT_MAX_DISTANCE_METERS`] when absent.
    #[serde(default, alias = "maxDistance", alias = "radius")]
    pub max_distance_meters: Option<f64>,
}

impl ProximitySearch {
    /// Search around `(latitude, longitude)` with the default radius.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            max_distance_meters: None,
        }
    }

    /// Override the search radius.
    #[must_use]
    pub const fn with_max_distance(mut self, meters: f64) -> Self {
        self.max_distance_meters = Some(meters);
        self
    }

    /// Validate the parameters into a centre and radius.
    pub fn resolve(&self) -> Result<(GeoPoint, f64), InvalidArgument> {
        let latitude = self
            .latitude
            .ok_or(InvalidArgument::MissingCoordinate { field: "latitude" })?;
        let longitude = self
            .longitude
            .ok_or(InvalidArgument::MissingCoordinate { field: "longitude" })?;
        let centre = GeoPoint::new(longitude, latitude)?;
        let radius = self.max_distance_meters.unwrap_or(DEFAULT_MAX_DISTANCE_METERS);
        if radius.is_nan() || radius < 0.0 {
            return Err(InvalidArgument::InvalidDistance(radius));
        }
        Ok((centre, radius))
    }
}

/// Parameters of an address search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSearch {
    /// Case-insensitive fragment of the address.
    #[serde(default, alias = "area", alias = "location")]
    pub term: Option<String>,
}

impl AreaSearch {
    /// Search for `term`.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// Identifier the caller asked to delete.
    pub id: ProviderId,
    /// Whether a provider was actually removed.
    pub removed: bool,
}

impl<S: RecordStore> QueryEngine<S> {
    /// Validate and create a provider from a wire payload.
    pub fn handle_create(&self, request: CreateProviderRequest) -> Result<ProviderRecord, DirectoryError> {
        let draft = request.into_new_provider()?;
        self.create(draft)
    }

    /// Delete a provider, reporting whether one was removed.
    pub fn handle_delete(&self, id: ProviderId) -> Result<DeleteOutcome, DirectoryError> {
        let removed = self.delete(id)?;
        Ok(DeleteOutcome { id, removed })
    }

    /// Run a proximity search described by a wire payload.
    pub fn handle_proximity_search(
        &self,
        search: &ProximitySearch,
    ) -> Result<Vec<ProviderRecord>, DirectoryError> {
        let (centre, radius) = search.resolve()?;
        self.find_near(centre, radius)
    }

    /// Run an address search described by a wire payload.
    pub fn handle_area_search(&self, search: &AreaSearch) -> Result<Vec<ProviderRecord>, DirectoryError> {
        self.find_by_address_substring(search.term.as_deref().unwrap_or_default())
    }
}
