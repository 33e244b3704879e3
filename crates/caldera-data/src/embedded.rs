//! Embedded sample catalog.
//!
//! A small Holocene volcano sample ships inside the library so a dispatcher
//! can start with zero setup: no file paths, no downloads. The sample goes
//! through the same GeoJSON boundary as any external dataset.

use polars::prelude::DataFrame;

use crate::{Result, geojson};

const SAMPLE_GEOJSON: &str = include_str!("../assets/volcanoes_sample.geojson");

/// Source label reported in the embedded catalog's metadata.
pub const EMBEDDED_SOURCE: &str = "embedded:volcanoes_sample";

/// Parse the embedded sample into a catalog frame.
pub fn sample_catalog() -> Result<(DataFrame, geojson::LoadMetadata)> {
    geojson::parse_feature_collection(SAMPLE_GEOJSON, EMBEDDED_SOURCE)
}
