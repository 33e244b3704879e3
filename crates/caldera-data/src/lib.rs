//! Dataset loading for the caldera spatial query library.
//!
//! This crate is the boundary between raw point-catalog datasets (GeoJSON
//! feature collections of volcanoes or other points of interest) and the
//! columnar catalog frame the query core consumes. It parses feature
//! collections, rejects features without usable coordinates before they can
//! reach the catalog, and reports load metadata (record counts, skip counts,
//! source, timestamp) back to the caller.
//!
//! The catalog is loaded exactly once at startup; nothing in this crate
//! mutates a frame after it has been handed out.
//!
//! With the `download_data` feature (on by default) the catalog can also be
//! fetched over HTTP and cached under [`static@DATA_DIR`].

use once_cell::sync::Lazy;
use std::path::PathBuf;
use tracing::warn;

pub mod embedded;
mod error;
pub mod geojson;
pub mod schema;
pub mod test_data;

#[cfg(feature = "download_data")]
pub mod fetch;

pub use error::{DataError, Result};
pub use geojson::{LoadMetadata, load_geojson_file, parse_feature_collection};

static TEST_DATA_DIR: Lazy<tempfile::TempDir> = Lazy::new(|| {
    tempfile::TempDir::new().expect("Failed to create global temporary test data directory")
});

pub const DATA_DIR_DEFAULT: &str = "./caldera_data";

/// Centralized function to determine if we should use test data.
pub fn should_use_test_data() -> bool {
    cfg!(test) || cfg!(doctest)
}

/// Global data directory path that automatically determines the appropriate
/// location. Downloads are cached here; tests get a throwaway directory.
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if should_use_test_data() {
        let temp_dir = TEST_DATA_DIR.path().to_path_buf();
        warn!(temp_dir = ?temp_dir, "Using temporary data directory for tests");
        temp_dir
    } else {
        let dir = std::env::var("CALDERA_DATA_DIR").unwrap_or_else(|_| DATA_DIR_DEFAULT.to_string());
        PathBuf::from(dir)
    }
});
