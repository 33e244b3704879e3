//! GeoJSON feature-collection parsing into the catalog frame.
//!
//! The parser targets the property layout of the Smithsonian Holocene
//! volcano catalog export (the layout of the original `volcano.json`
//! dataset), with aliases covering the WFS spelling of the same fields.
//! Features without a stable id or without both coordinates are rejected
//! here, with a warning and a running count, and never reach the catalog.

use std::path::Path;

use polars::prelude::*;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{Result, schema};

#[derive(Debug, Clone, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: FeatureProperties,
}

/// Property block of one catalog feature. Unknown properties are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FeatureProperties {
    #[serde(rename = "VolcanoID", alias = "Volcano_Number")]
    id: Option<u32>,
    #[serde(rename = "V_Name", alias = "Volcano_Name")]
    name: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Region")]
    region: Option<String>,
    #[serde(rename = "Subregion")]
    subregion: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
}

/// What a load produced: where the data came from, how many features became
/// catalog rows, and how many were rejected at the boundary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadMetadata {
    pub source: String,
    pub loaded: usize,
    pub skipped: usize,
    pub generated_at: String,
}

/// Parse a GeoJSON `FeatureCollection` into the catalog frame.
///
/// Features missing either coordinate, or missing a stable id, are skipped
/// with a warning; the skip count is reported in the returned metadata.
/// An empty collection yields an empty frame, not an error.
#[instrument(name = "Parse catalog GeoJSON", level = "info", skip(raw))]
pub fn parse_feature_collection(raw: &str, source: &str) -> Result<(DataFrame, LoadMetadata)> {
    let collection: FeatureCollection = serde_json::from_str(raw)?;

    let total = collection.features.len();
    let mut ids: Vec<u32> = Vec::with_capacity(total);
    let mut names: Vec<String> = Vec::with_capacity(total);
    let mut countries: Vec<String> = Vec::with_capacity(total);
    let mut regions: Vec<Option<String>> = Vec::with_capacity(total);
    let mut subregions: Vec<Option<String>> = Vec::with_capacity(total);
    let mut latitudes: Vec<f64> = Vec::with_capacity(total);
    let mut longitudes: Vec<f64> = Vec::with_capacity(total);

    let mut skipped = 0usize;
    for feature in collection.features {
        let props = feature.properties;
        let (Some(latitude), Some(longitude)) = (props.latitude, props.longitude) else {
            skipped += 1;
            warn!(
                name = props.name.as_deref().unwrap_or(""),
                "skipping feature without coordinates"
            );
            continue;
        };
        let Some(id) = props.id else {
            skipped += 1;
            warn!(
                name = props.name.as_deref().unwrap_or(""),
                "skipping feature without a stable id"
            );
            continue;
        };

        ids.push(id);
        names.push(props.name.unwrap_or_default());
        countries.push(props.country.unwrap_or_default());
        regions.push(props.region);
        subregions.push(props.subregion);
        latitudes.push(latitude);
        longitudes.push(longitude);
    }

    let frame = df!(
        schema::ID => ids,
        schema::NAME => names,
        schema::COUNTRY => countries,
        schema::REGION => regions,
        schema::SUBREGION => subregions,
        schema::LATITUDE => latitudes,
        schema::LONGITUDE => longitudes,
    )?;

    let metadata = LoadMetadata {
        source: source.to_string(),
        loaded: frame.height(),
        skipped,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    info!(
        source,
        loaded = metadata.loaded,
        skipped,
        "catalog frame ready"
    );

    Ok((frame, metadata))
}

/// Read and parse a GeoJSON catalog file from disk.
pub fn load_geojson_file(path: impl AsRef<Path>) -> Result<(DataFrame, LoadMetadata)> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    parse_feature_collection(&raw, &path.display().to_string())
}
