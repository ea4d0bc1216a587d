use crate::{error::GeoListingError, search::SearchConfig};

/// Builder for creating search configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    /// Create a builder for walking-distance searches (small radius, short result list)
    pub fn nearby() -> Self {
        let mut builder = Self::new();
        builder.config.default_radius_km = 5.0;
        builder.config.max_radius_km = Some(25.0);
        builder.config.limit = Some(20);
        builder
    }

    /// Create a builder for searches across one metropolitan area
    pub fn citywide() -> Self {
        let mut builder = Self::new();
        builder.config.default_radius_km = 25.0;
        builder.config.max_radius_km = Some(100.0);
        builder.config.limit = Some(50);
        builder
    }

    /// Create a builder for wide searches spanning several cities
    pub fn regional() -> Self {
        let mut builder = Self::new();
        builder.config.default_radius_km = 200.0;
        builder.config.max_radius_km = Some(500.0);
        builder
    }

    /// Set the maximum number of results to return
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = Some(limit);
        self
    }

    /// Return every matching result
    pub fn unlimited(mut self) -> Self {
        self.config.limit = None;
        self
    }

    /// Accept any radius a request asks for
    pub fn without_max_radius(mut self) -> Self {
        self.config.max_radius_km = None;
        self
    }

    /// Set the default and maximum radius (the default must not exceed the maximum)
    pub fn radius_bounds(
        mut self,
        default_radius_km: f64,
        max_radius_km: f64,
    ) -> Result<Self, GeoListingError> {
        if !default_radius_km.is_finite() || default_radius_km < 0.0 {
            return Err(GeoListingError::ConfigError(format!(
                "Default radius must be a finite non-negative number, got {default_radius_km}"
            )));
        }
        if max_radius_km.is_nan() || default_radius_km > max_radius_km {
            return Err(GeoListingError::ConfigError(format!(
                "Default radius {default_radius_km} km exceeds maximum radius {max_radius_km} km"
            )));
        }

        self.config.default_radius_km = default_radius_km;
        self.config.max_radius_km = Some(max_radius_km);
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> SearchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{DEFAULT_MAX_RADIUS_KM, DEFAULT_RADIUS_KM};

    #[test]
    fn test_default_builder() {
        let config = SearchConfigBuilder::new().build();
        assert_eq!(config.default_radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(config.max_radius_km, Some(DEFAULT_MAX_RADIUS_KM));
        assert_eq!(config.limit, None);
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_presets() {
        let nearby = SearchConfigBuilder::nearby().build();
        assert_eq!(nearby.default_radius_km, 5.0);
        assert_eq!(nearby.max_radius_km, Some(25.0));
        assert_eq!(nearby.limit, Some(20));

        let citywide = SearchConfigBuilder::citywide().build();
        assert_eq!(citywide.default_radius_km, 25.0);
        assert_eq!(citywide.limit, Some(50));

        let regional = SearchConfigBuilder::regional().build();
        assert_eq!(regional.default_radius_km, 200.0);
        assert_eq!(regional.limit, None);
    }

    #[test]
    fn test_method_chaining() {
        let config = SearchConfigBuilder::nearby()
            .limit(5)
            .without_max_radius()
            .build();

        assert_eq!(config.limit, Some(5));
        assert_eq!(config.max_radius_km, None);
        assert_eq!(config.default_radius_km, 5.0, "Should keep preset radius");
    }

    #[test]
    fn test_unlimited_overrides_preset_limit() {
        let config = SearchConfigBuilder::citywide().unlimited().build();
        assert_eq!(config.limit, None);
    }

    #[test]
    fn test_radius_bounds_validation() {
        let config = SearchConfigBuilder::new()
            .radius_bounds(10.0, 30.0)
            .unwrap()
            .build();
        assert_eq!(config.default_radius_km, 10.0);
        assert_eq!(config.max_radius_km, Some(30.0));

        assert!(SearchConfigBuilder::new().radius_bounds(40.0, 30.0).is_err());
        assert!(SearchConfigBuilder::new().radius_bounds(-1.0, 30.0).is_err());
        assert!(SearchConfigBuilder::new().radius_bounds(f64::NAN, 30.0).is_err());
        assert!(SearchConfigBuilder::new().radius_bounds(10.0, f64::NAN).is_err());
        assert!(SearchConfigBuilder::new().radius_bounds(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_search_config_clone() {
        let original = SearchConfigBuilder::regional().limit(7).build();
        let cloned = original.clone();
        assert_eq!(original, cloned);
    }
}
