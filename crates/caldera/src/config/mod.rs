//! Query configuration: intent defaults and engine switches.

use crate::{
    error::CalderaError,
    geo::{BoundingBox, Coord},
};

/// Defaults applied when an intent request omits parameters, plus the
/// radius-hint switch. Build through [`QueryConfigBuilder`] to get
/// validation.
///
/// # Examples
///
/// ```rust
/// use caldera::QueryConfig;
///
/// let config = QueryConfig::builder()
///     .nearest_count(10)
///     .radius_km(250.0)
///     .build()?;
/// assert_eq!(config.default_nearest_count, 10);
/// # Ok::<(), caldera::CalderaError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    /// Result count when a nearest request omits `count`.
    pub default_nearest_count: usize,
    /// Radius in kilometres when a radius request omits `radius_km`.
    pub default_radius_km: f64,
    /// Query origin when a nearest/radius request omits coordinates.
    pub default_origin: Coord,
    /// Box corners when a bounding-box request omits them.
    pub default_bbox: BoundingBox,
    /// Run the storage radius prefilter before the authoritative distance
    /// recheck. Off by default: the full catalog is ordered and the
    /// distance engine alone decides membership. Either way, the recheck
    /// always runs.
    pub use_storage_radius_hint: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_nearest_count: 5,
            default_radius_km: 500.0,
            default_origin: Coord::new(1.264, 103.840),
            default_bbox: BoundingBox::new(35.0, 10.0, 45.0, 20.0),
            use_storage_radius_hint: false,
        }
    }
}

impl QueryConfig {
    #[must_use]
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::default()
    }
}

/// Builder for [`QueryConfig`] with ergonomic defaults.
#[derive(Debug, Clone, Default)]
pub struct QueryConfigBuilder {
    config: QueryConfig,
}

impl QueryConfigBuilder {
    /// Create a new builder with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default result count for nearest queries.
    #[must_use]
    pub fn nearest_count(mut self, count: usize) -> Self {
        self.config.default_nearest_count = count;
        self
    }

    /// Set the default radius for radius queries, in kilometres.
    #[must_use]
    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.config.default_radius_km = radius_km;
        self
    }

    /// Set the default origin for nearest/radius queries.
    #[must_use]
    pub fn origin(mut self, origin: Coord) -> Self {
        self.config.default_origin = origin;
        self
    }

    /// Set the default bounding box.
    #[must_use]
    pub fn bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.config.default_bbox = bbox;
        self
    }

    /// Enable or disable the storage radius prefilter.
    #[must_use]
    pub fn storage_radius_hint(mut self, enabled: bool) -> Self {
        self.config.use_storage_radius_hint = enabled;
        self
    }

    /// Validate and build the final configuration.
    pub fn build(self) -> Result<QueryConfig, CalderaError> {
        let config = self.config;
        if config.default_nearest_count == 0 {
            return Err(CalderaError::ConfigError(
                "default nearest count must be at least 1".to_string(),
            ));
        }
        if !config.default_radius_km.is_finite() || config.default_radius_km < 0.0 {
            return Err(CalderaError::ConfigError(format!(
                "default radius must be a non-negative number, got {}",
                config.default_radius_km
            )));
        }
        if !config.default_origin.is_finite() {
            return Err(CalderaError::ConfigError(
                "default origin must have finite coordinates".to_string(),
            ));
        }
        if !config.default_bbox.is_finite() {
            return Err(CalderaError::ConfigError(
                "default bounding box must have finite corners".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert_eq!(config.default_nearest_count, 5);
        assert_eq!(config.default_radius_km, 500.0);
        assert_eq!(config.default_origin, Coord::new(1.264, 103.840));
        assert_eq!(
            config.default_bbox,
            BoundingBox::new(35.0, 10.0, 45.0, 20.0)
        );
        assert!(!config.use_storage_radius_hint);
    }

    #[test]
    fn test_builder_chaining() {
        let config = QueryConfig::builder()
            .nearest_count(3)
            .radius_km(100.0)
            .origin(Coord::new(35.6762, 139.6503))
            .storage_radius_hint(true)
            .build()
            .unwrap();

        assert_eq!(config.default_nearest_count, 3);
        assert_eq!(config.default_radius_km, 100.0);
        assert!(config.use_storage_radius_hint);
    }

    #[test]
    fn test_builder_rejects_zero_count() {
        let result = QueryConfig::builder().nearest_count(0).build();
        assert!(matches!(result, Err(CalderaError::ConfigError(_))));
    }

    #[test]
    fn test_builder_rejects_negative_radius() {
        let result = QueryConfig::builder().radius_km(-1.0).build();
        assert!(matches!(result, Err(CalderaError::ConfigError(_))));
    }

    #[test]
    fn test_builder_rejects_non_finite_origin() {
        let result = QueryConfig::builder()
            .origin(Coord::new(f64::NAN, 0.0))
            .build();
        assert!(matches!(result, Err(CalderaError::ConfigError(_))));
    }
}
