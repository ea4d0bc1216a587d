//! Search criteria and their wire form.

use serde::{Deserialize, Serialize};

use super::{Result, SearchConfig, SearchError};
use crate::record::GeoPoint;

pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Filters and proximity settings for one search.
///
/// Every filter is optional and independent; an unset filter does not
/// constrain the result. `radius_km` only matters with a `reference_point`.
///
/// ```rust
/// use geolisting::{GeoPoint, SearchCriteria};
///
/// let criteria = SearchCriteria::new()
///     .text("lawn")
///     .price_range(Some(10.0), Some(80.0))
///     .near(GeoPoint::new(4.711, -74.0721), 25.0);
/// assert!(criteria.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    /// Case-insensitive fragment matched against title, description and category
    pub text_query: Option<String>,
    /// Exact, case-sensitive category
    pub category: Option<String>,
    /// Listings whose `max_price` reaches at least this floor
    pub min_price: Option<f64>,
    /// Listings whose `min_price` does not exceed this ceiling
    pub max_price: Option<f64>,
    pub reference_point: Option<GeoPoint>,
    pub radius_km: f64,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            text_query: None,
            category: None,
            min_price: None,
            max_price: None,
            reference_point: None,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price_range(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn near(mut self, point: GeoPoint, radius_km: f64) -> Self {
        self.reference_point = Some(point);
        self.radius_km = radius_km;
        self
    }

    /// Trimmed text query, `None` when empty.
    pub fn effective_text_query(&self) -> Option<&str> {
        non_blank(self.text_query.as_deref())
    }

    /// Trimmed category, `None` when empty.
    pub fn effective_category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Reject criteria that cannot describe a search.
    pub fn validate(&self) -> Result<()> {
        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(SearchError::InvalidCriteria(format!(
                "radius_km must be a finite non-negative number, got {}",
                self.radius_km
            )));
        }
        if let Some(point) = &self.reference_point {
            point.validate().map_err(|issue| {
                SearchError::InvalidCriteria(format!("reference point {point}: {issue}"))
            })?;
        }
        for (name, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if bound.is_some_and(f64::is_nan) {
                return Err(SearchError::InvalidCriteria(format!("{name} is NaN")));
            }
        }
        Ok(())
    }

    /// [`Self::validate`] plus the limits of `config`.
    pub fn validate_with_config(&self, config: &SearchConfig) -> Result<()> {
        self.validate()?;
        if self.reference_point.is_some()
            && let Some(max_radius) = config.max_radius_km
            && self.radius_km > max_radius
        {
            return Err(SearchError::InvalidCriteria(format!(
                "radius_km {} exceeds the maximum of {max_radius}",
                self.radius_km
            )));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A search request as it arrives from the HTTP layer's query string.
///
/// `lat` and `lng` are separate fields here, so a request can carry only one
/// of them; converting to [`SearchCriteria`] rejects that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
}

impl SearchQuery {
    /// Convert into criteria, taking the default radius from `config`.
    pub fn into_criteria(self, config: &SearchConfig) -> Result<SearchCriteria> {
        let reference_point = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(SearchError::InvalidCriteria(
                    "lat was given without lng".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(SearchError::InvalidCriteria(
                    "lng was given without lat".to_string(),
                ));
            }
        };

        let criteria = SearchCriteria {
            text_query: self.query,
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            reference_point,
            radius_km: self.radius_km.unwrap_or(config.default_radius_km),
        };
        criteria.validate_with_config(config)?;
        Ok(criteria)
    }
}

impl TryFrom<SearchQuery> for SearchCriteria {
    type Error = SearchError;

    fn try_from(query: SearchQuery) -> Result<Self> {
        query.into_criteria(&SearchConfig::default())
    }
}
