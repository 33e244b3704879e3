//! Catalog download over HTTP (`download_data` feature).
//!
//! Fetches a GeoJSON catalog, streams it into the cache under
//! [`static@crate::DATA_DIR`], and parses it through the same boundary as a
//! local file. Subsequent calls reuse the cached file unless forced.

use std::fs;
use std::path::PathBuf;

use futures::StreamExt;
use polars::prelude::DataFrame;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

use crate::{DATA_DIR, DataError, LoadMetadata, Result, geojson};

/// Smithsonian Global Volcanism Program Holocene catalog, GeoJSON output.
pub const HOLOCENE_CATALOG_URL: &str = "https://webservices.volcano.si.edu/geoserver/GVP-VOTW/ows?service=WFS&version=2.0.0&request=GetFeature&typeName=GVP-VOTW:Smithsonian_VOTW_Holocene_Volcanoes&outputFormat=application%2Fjson";

const CACHE_FILE_NAME: &str = "volcano_catalog.geojson";

fn cache_path() -> PathBuf {
    DATA_DIR.join(CACHE_FILE_NAME)
}

/// Download a GeoJSON catalog and parse it into the catalog frame.
///
/// With `force` unset, a previously downloaded copy in the data directory is
/// reused without touching the network.
#[instrument(name = "Download catalog", level = "info", skip(url))]
pub fn download_catalog(url: &str, force: bool) -> Result<(DataFrame, LoadMetadata)> {
    let cache = cache_path();
    if !force && cache.is_file() {
        info!(cache = ?cache, "reusing cached catalog download");
        return geojson::load_geojson_file(&cache);
    }

    fs::create_dir_all(&*DATA_DIR)?;
    let staging = NamedTempFile::new_in(&*DATA_DIR)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let client = reqwest::Client::new();
        let response = client.get(url).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(staging.path()).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok::<(), DataError>(())
    })?;

    staging
        .persist(&cache)
        .map_err(|persist| DataError::Io(persist.error))?;
    info!(cache = ?cache, "catalog downloaded");

    geojson::load_geojson_file(&cache)
}

/// Download the Smithsonian Holocene catalog with default settings.
pub fn download_holocene_catalog() -> Result<(DataFrame, LoadMetadata)> {
    download_catalog(HOLOCENE_CATALOG_URL, false)
}
