//! Caldera - Spatial Point-Catalog Query Library
//!
//! Caldera stores point-location records (a volcano catalog out of the box;
//! the schema generalizes to any point-of-interest dataset), executes the
//! three supported spatial query shapes against them, and produces
//! distance-annotated, JSON-ready result lists:
//!
//! - **nearest-N**: the `count` entries closest to an origin
//! - **within-radius**: every entry within a radius of an origin
//! - **within-bounding-box**: every entry inside a lat/lon rectangle
//!
//! Storage-side spatial predicates (ordering, radius windows) are treated as
//! performance hints. Before any record is filtered or shown, its distance
//! is recomputed with the great-circle formula; the recomputed value is the
//! only one that counts. This guards against the classic failure mode of
//! storage engines silently mixing units (metres vs. degrees) or coordinate
//! order (lat/lon vs. lon/lat).
//!
//! # Quick Start
//!
//! ```rust
//! use caldera::{Coord, QueryDispatcher};
//!
//! // Dispatcher over the embedded sample catalog
//! let dispatcher = QueryDispatcher::new_embedded()?;
//!
//! // The three closest entries to Singapore
//! let results = dispatcher.nearest(Coord::new(1.264, 103.840), 3)?;
//! for record in &results {
//!     println!(
//!         "{} ({}): {:.1} km",
//!         record.name,
//!         record.country,
//!         record.distance_km.unwrap_or_default()
//!     );
//! }
//!
//! // Or drive it from a loose intent object, e.g. emitted by a
//! // language-model translator:
//! let request = caldera::IntentRequest::from_json(
//!     r#"{"kind": "radius", "parameters": {"latitude": -6.2, "longitude": 106.8, "radius": 500}}"#,
//! )?;
//! let results = dispatcher.dispatch_request(&request)?;
//! assert!(results.iter().all(|r| r.distance_km.unwrap() <= 500.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Concurrency
//!
//! The catalog is loaded once and read-only afterwards; every dispatch is a
//! pure read. A [`QueryDispatcher`] (or cheap clones of it) can serve
//! concurrent callers without locking.
//!
//! # Data
//!
//! A small Holocene volcano sample ships embedded so everything works with
//! zero setup. Real datasets load through [`data`] (GeoJSON files, or HTTP
//! download with the `download_data` feature).

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod catalog;
mod config;
mod dispatch;
pub mod error;
mod geo;
mod query;

// Re-export the data loading subcrate
pub use caldera_data as data;

pub use catalog::{CatalogError, GEOM_X, GEOM_Y, PointCatalog, PointRecord, STORAGE_DISTANCE};
pub use config::{QueryConfig, QueryConfigBuilder};
pub use dispatch::{QueryDispatcher, QueryDispatcherBuilder};
pub use error::CalderaError;
pub use geo::{BoundingBox, Coord, EARTH_RADIUS_KM, degree_window, haversine_distance_km};
pub use polars;
pub use query::{
    IntentRequest, QueryError, QueryIntent, RawCandidate, ResultRecord, normalize,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the caldera library.
///
/// Sets up structured logging with configurable levels and filtering. Call
/// once at the start of your application; later calls are no-ops.
///
/// # Examples
///
/// ```rust
/// use caldera::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), caldera::CalderaError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), CalderaError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("polars=warn".parse().unwrap());

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_embedded_dispatcher_creation() {
        setup_test_env();

        let dispatcher = QueryDispatcher::new_embedded();
        assert!(
            dispatcher.is_ok(),
            "Should be able to create dispatcher with embedded data"
        );
        assert!(!dispatcher.unwrap().catalog().is_empty());
    }

    #[test]
    fn test_basic_nearest_query() {
        setup_test_env();

        let dispatcher = QueryDispatcher::new_embedded().unwrap();
        let results = dispatcher.nearest(Coord::new(1.264, 103.840), 3).unwrap();

        assert_eq!(results.len(), 3);
        // Closest to Singapore in the sample is Krakatau, in the Sunda
        // Strait.
        assert_eq!(results[0].name, "Krakatau");
        for pair in results.windows(2) {
            assert!(pair[0].distance_km.unwrap() <= pair[1].distance_km.unwrap());
        }
    }

    #[test]
    fn test_default_bbox_covers_italy() {
        setup_test_env();

        let dispatcher = QueryDispatcher::new_embedded().unwrap();
        let bbox = dispatcher.config().default_bbox;
        let results = dispatcher.within_bounding_box(bbox).unwrap();

        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"Vesuvius"));
        assert!(names.contains(&"Etna"));
        assert!(names.contains(&"Stromboli"));
        assert!(!names.contains(&"Fujisan"));
    }
}
