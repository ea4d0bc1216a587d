//! Listing records as the search core sees them.
//!
//! A [`SearchableRecord`] is one marketplace listing: free text used for
//! matching, a price range, optional coordinates and the lifecycle flag.
//! Records are normally materialized from a listing table with
//! [`SearchableRecord::from_df`].

use std::fmt;

use itertools::izip;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub use error::RecordError;
use error::Result;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite and inside `[-90, 90]` / `[-180, 180]`.
    pub fn validate(&self) -> std::result::Result<(), CoordinateIssue> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(CoordinateIssue::NonFinite);
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoordinateIssue::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(CoordinateIssue::LongitudeOutOfRange(self.lng));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Why a coordinate pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateIssue {
    NonFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl fmt::Display for CoordinateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "coordinates are not finite numbers"),
            Self::LatitudeOutOfRange(lat) => write!(f, "latitude {lat} outside [-90, 90]"),
            Self::LongitudeOutOfRange(lng) => write!(f, "longitude {lng} outside [-180, 180]"),
        }
    }
}

/// Problems that make a record unusable for geo-ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RecordIssue {
    /// Latitude or longitude out of range, or not finite
    InvalidCoordinates(String),
    /// Exactly one of latitude / longitude is set
    PartialCoordinates,
    /// `max_price < min_price`
    InvertedPriceRange { min_price: f64, max_price: f64 },
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinates(reason) => write!(f, "invalid coordinates: {reason}"),
            Self::PartialCoordinates => {
                write!(f, "only one of latitude/longitude is set")
            }
            Self::InvertedPriceRange {
                min_price,
                max_price,
            } => write!(f, "max_price {max_price} is below min_price {min_price}"),
        }
    }
}

/// One marketplace listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub min_price: f64,
    pub max_price: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl SearchableRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            active: true,
            ..Default::default()
        }
    }

    pub fn with_prices(mut self, min_price: f64, max_price: f64) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    /// Both coordinates, or `None` when either is missing.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }

    /// Coordinates usable for distance computations.
    pub fn valid_coordinates(&self) -> Option<GeoPoint> {
        self.coordinates().filter(GeoPoint::is_valid)
    }

    /// Check the invariants the external validation layer is expected to enforce.
    ///
    /// A record without any coordinates is fine; one with a single coordinate is not.
    pub fn validate(&self) -> std::result::Result<(), RecordIssue> {
        if self.max_price < self.min_price {
            return Err(RecordIssue::InvertedPriceRange {
                min_price: self.min_price,
                max_price: self.max_price,
            });
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)
                .validate()
                .map_err(|issue| RecordIssue::InvalidCoordinates(issue.to_string())),
            (None, None) => Ok(()),
            _ => Err(RecordIssue::PartialCoordinates),
        }
    }

    /// Build records from a listing table.
    ///
    /// `id` and `title` must be present on every row; the other text columns
    /// fall back to empty strings, prices to 0 and `status` to inactive.
    pub fn from_df(df: &DataFrame) -> Result<Vec<Self>> {
        let cols = df
            .select(geolisting_data::LISTING_COLUMNS)?
            .take_columns();

        izip!(
            cols[0].str()?,
            cols[1].str()?,
            cols[2].str()?,
            cols[3].str()?,
            cols[4].f64()?,
            cols[5].f64()?,
            cols[6].f64()?,
            cols[7].f64()?,
            cols[8].bool()?,
            cols[9].str()?,
            cols[10].str()?,
        )
        .enumerate()
        .map(
            |(
                row,
                (
                    id,
                    title,
                    description,
                    category,
                    min_price,
                    max_price,
                    latitude,
                    longitude,
                    status,
                    provider_id,
                    created_at,
                ),
            )|
             -> Result<Self> {
                Ok(Self {
                    id: id.ok_or(RecordError::MissingField { row, field: "id" })?.to_string(),
                    title: title
                        .ok_or(RecordError::MissingField {
                            row,
                            field: "title",
                        })?
                        .to_string(),
                    description: description.unwrap_or_default().to_string(),
                    category: category.unwrap_or_default().to_string(),
                    min_price: min_price.unwrap_or_default(),
                    max_price: max_price.unwrap_or_default(),
                    latitude,
                    longitude,
                    active: status.unwrap_or(false),
                    provider_id: provider_id.map(str::to_string),
                    created_at: created_at.map(str::to_string),
                })
            },
        )
        .collect()
    }
}

impl fmt::Display for SearchableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchableRecord {{ id: {}, title: \"{}\", category: \"{}\" }}",
            self.id, self.title, self.category
        )
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum RecordError {
        #[error("DataFrame error: {0}")]
        DataFrame(#[from] polars::prelude::PolarsError),
        #[error("Row {row} has no `{field}`")]
        MissingField { row: usize, field: &'static str },
    }
    pub type Result<T> = std::result::Result<T, RecordError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_df() -> DataFrame {
        df![
            "id" => ["a", "b"],
            "title" => ["Lawn Mowing", "Guitar Lessons"],
            "description" => [Some("Weekly lawn care"), None],
            "category" => ["Gardening", "Education"],
            "min_price" => [20.0, 15.0],
            "max_price" => [60.0, 40.0],
            "latitude" => [Some(4.711), None],
            "longitude" => [Some(-74.0721), None],
            "status" => [Some(true), None],
            "provider_id" => [Some("prov-1"), None],
            "created_at" => [Some("2025-01-01T00:00:00Z"), None],
        ]
        .unwrap()
    }

    #[test]
    fn test_from_df_maps_columns() {
        let records = SearchableRecord::from_df(&listing_df()).unwrap();

        assert_eq!(records.len(), 2);
        let lawn = &records[0];
        assert_eq!(lawn.id, "a");
        assert_eq!(lawn.coordinates(), Some(GeoPoint::new(4.711, -74.0721)));
        assert!(lawn.active);
        assert_eq!(lawn.provider_id.as_deref(), Some("prov-1"));

        let guitar = &records[1];
        assert_eq!(guitar.description, "");
        assert_eq!(guitar.coordinates(), None);
        assert!(!guitar.active, "Null status means inactive");
        assert_eq!(guitar.created_at, None);
    }

    #[test]
    fn test_from_df_requires_id() {
        let df = df![
            "id" => [None::<&str>],
            "title" => ["t"],
            "description" => ["d"],
            "category" => ["c"],
            "min_price" => [1.0],
            "max_price" => [2.0],
            "latitude" => [None::<f64>],
            "longitude" => [None::<f64>],
            "status" => [true],
            "provider_id" => [None::<&str>],
            "created_at" => [None::<&str>],
        ]
        .unwrap();

        match SearchableRecord::from_df(&df) {
            Err(RecordError::MissingField { row: 0, field: "id" }) => {}
            other => panic!("Expected missing id, got {other:?}"),
        }
    }

    #[test]
    fn test_from_df_missing_column_is_dataframe_error() {
        let df = df!["id" => ["a"]].unwrap();
        assert!(matches!(
            SearchableRecord::from_df(&df),
            Err(RecordError::DataFrame(_))
        ));
    }

    #[test]
    fn test_partial_coordinates_count_as_missing() {
        let mut record = SearchableRecord::new("x", "t", "d", "c");
        record.latitude = Some(10.0);

        assert_eq!(record.coordinates(), None);
        assert_eq!(record.validate(), Err(RecordIssue::PartialCoordinates));
    }

    #[test]
    fn test_validate_flags_bad_records() {
        let inverted = SearchableRecord::new("x", "t", "d", "c").with_prices(50.0, 10.0);
        assert!(matches!(
            inverted.validate(),
            Err(RecordIssue::InvertedPriceRange { .. })
        ));

        let out_of_range = SearchableRecord::new("y", "t", "d", "c").with_location(95.0, 0.0);
        assert!(matches!(
            out_of_range.validate(),
            Err(RecordIssue::InvalidCoordinates(_))
        ));
        assert_eq!(out_of_range.valid_coordinates(), None);

        let fine = SearchableRecord::new("z", "t", "d", "c")
            .with_prices(10.0, 10.0)
            .with_location(-90.0, 180.0);
        assert_eq!(fine.validate(), Ok(()));
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
        assert_eq!(
            GeoPoint::new(-91.0, 0.0).validate(),
            Err(CoordinateIssue::LatitudeOutOfRange(-91.0))
        );
        assert_eq!(
            GeoPoint::new(0.0, 180.5).validate(),
            Err(CoordinateIssue::LongitudeOutOfRange(180.5))
        );
        assert_eq!(
            GeoPoint::new(f64::NAN, 0.0).validate(),
            Err(CoordinateIssue::NonFinite)
        );
    }
}
