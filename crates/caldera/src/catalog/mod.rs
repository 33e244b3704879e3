//! The point catalog: immutable storage plus storage-assisted spatial
//! primitives.
//!
//! Backed by a polars [`DataFrame`]. The frame carries the scalar
//! latitude/longitude columns (the authoritative coordinates) and a derived
//! `geom_x`/`geom_y` pair (longitude first, matching the storage
//! convention) that the storage-side predicates operate on. Both encode the
//! same location; only the scalar pair is ever trusted for membership
//! decisions.
//!
//! Storage-side ordering and radius filtering are performance hints. The
//! bounding-box containment test is the one exact primitive, since no
//! downstream recheck exists for that path.

use std::collections::HashSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::geo::{BoundingBox, Coord, degree_window};
use caldera_data::schema;

/// Derived geometry columns, longitude first per the storage convention.
pub const GEOM_X: &str = "geom_x";
pub const GEOM_Y: &str = "geom_y";
/// Ordering key attached by [`PointCatalog::order_by_distance_to`]:
/// squared planar distance in degree units. Monotonic in the storage's idea
/// of closeness and in nothing else; no downstream code may interpret it.
pub const STORAGE_DISTANCE: &str = "storage_distance";

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),
    #[error("catalog frame is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("column `{column}` contains {count} null values")]
    NullValues { column: &'static str, count: usize },
    #[error("record {id}: latitude {latitude} outside [-90, 90]")]
    LatitudeOutOfRange { id: u32, latitude: f64 },
    #[error("record {id}: longitude {longitude} outside [-180, 180]")]
    LongitudeOutOfRange { id: u32, longitude: f64 },
    #[error("duplicate record id {0}")]
    DuplicateId(u32),
}

/// One catalog entry.
///
/// `country` is a free-text classifier; for a points-of-interest catalog it
/// holds the category instead. `region`/`subregion` are optional finer
/// classifiers carried in the catalog but never emitted in query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: u32,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// An immutable collection of [`PointRecord`]s with storage-assisted query
/// primitives.
///
/// The catalog is populated once and read-only afterwards, which is what
/// makes lock-free concurrent reads safe. Cloning is cheap: the backing
/// columns are shared.
#[derive(Debug, Clone)]
pub struct PointCatalog {
    frame: DataFrame,
}

impl PointCatalog {
    /// Build a catalog from records, validating the coordinate and identity
    /// invariants.
    #[instrument(name = "Build catalog", level = "info", skip_all, fields(records = records.len()))]
    pub fn from_records(records: Vec<PointRecord>) -> Result<Self> {
        let mut ids: Vec<u32> = Vec::with_capacity(records.len());
        let mut names: Vec<String> = Vec::with_capacity(records.len());
        let mut countries: Vec<String> = Vec::with_capacity(records.len());
        let mut regions: Vec<Option<String>> = Vec::with_capacity(records.len());
        let mut subregions: Vec<Option<String>> = Vec::with_capacity(records.len());
        let mut latitudes: Vec<f64> = Vec::with_capacity(records.len());
        let mut longitudes: Vec<f64> = Vec::with_capacity(records.len());

        for record in records {
            ids.push(record.id);
            names.push(record.name);
            countries.push(record.country);
            regions.push(record.region);
            subregions.push(record.subregion);
            latitudes.push(record.latitude);
            longitudes.push(record.longitude);
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

        Self::from_frame(frame)
    }

    /// Adopt a pre-built catalog frame (the dataset loader's output).
    ///
    /// Checks the schema, casts columns to their canonical types, validates
    /// the coordinate and identity invariants, and derives the geometry
    /// columns from the scalar coordinates.
    #[instrument(name = "Adopt catalog frame", level = "info", skip_all)]
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        for column in schema::BASE_COLUMNS {
            if frame.column(column).is_err() {
                return Err(CatalogError::MissingColumn(column));
            }
        }

        let frame = frame
            .lazy()
            .with_columns([
                col(schema::ID).cast(DataType::UInt32),
                col(schema::NAME).cast(DataType::String),
                col(schema::COUNTRY).cast(DataType::String),
                col(schema::REGION).cast(DataType::String),
                col(schema::SUBREGION).cast(DataType::String),
                col(schema::LATITUDE).cast(DataType::Float64),
                col(schema::LONGITUDE).cast(DataType::Float64),
            ])
            .with_columns([
                col(schema::LONGITUDE).alias(GEOM_X),
                col(schema::LATITUDE).alias(GEOM_Y),
            ])
            .collect()?;

        for column in [schema::ID, schema::LATITUDE, schema::LONGITUDE] {
            let count = frame.column(column)?.null_count();
            if count > 0 {
                return Err(CatalogError::NullValues { column, count });
            }
        }

        let catalog = Self { frame };
        catalog.validate_invariants()?;
        debug!(records = catalog.len(), "catalog ready");
        Ok(catalog)
    }

    fn validate_invariants(&self) -> Result<()> {
        let ids = self.frame.column(schema::ID)?.u32()?;
        let latitudes = self.frame.column(schema::LATITUDE)?.f64()?;
        let longitudes = self.frame.column(schema::LONGITUDE)?.f64()?;

        let mut seen = HashSet::with_capacity(self.frame.height());
        for i in 0..self.frame.height() {
            let (Some(id), Some(latitude), Some(longitude)) =
                (ids.get(i), latitudes.get(i), longitudes.get(i))
            else {
                continue;
            };
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(CatalogError::LatitudeOutOfRange { id, latitude });
            }
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(CatalogError::LongitudeOutOfRange { id, longitude });
            }
            if !seen.insert(id) {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(())
    }

    /// Number of records in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// The backing frame, including the derived geometry columns.
    #[must_use]
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Full scan of the catalog in storage order.
    pub fn records(&self) -> Result<Vec<PointRecord>> {
        let ids = self.frame.column(schema::ID)?.u32()?;
        let names = self.frame.column(schema::NAME)?.str()?;
        let countries = self.frame.column(schema::COUNTRY)?.str()?;
        let regions = self.frame.column(schema::REGION)?.str()?;
        let subregions = self.frame.column(schema::SUBREGION)?.str()?;
        let latitudes = self.frame.column(schema::LATITUDE)?.f64()?;
        let longitudes = self.frame.column(schema::LONGITUDE)?.f64()?;

        let mut records = Vec::with_capacity(self.frame.height());
        for i in 0..self.frame.height() {
            let (Some(id), Some(latitude), Some(longitude)) =
                (ids.get(i), latitudes.get(i), longitudes.get(i))
            else {
                continue;
            };
            records.push(PointRecord {
                id,
                name: names.get(i).unwrap_or_default().to_string(),
                country: countries.get(i).unwrap_or_default().to_string(),
                region: regions.get(i).map(ToString::to_string),
                subregion: subregions.get(i).map(ToString::to_string),
                latitude,
                longitude,
            });
        }
        Ok(records)
    }

    /// Storage-side ordering by planar distance to `origin`, ascending, with
    /// a stable tie-break on `id`.
    ///
    /// The attached [`STORAGE_DISTANCE`] column is computed over the derived
    /// geometry pair in degree units. It is an ordering hint, not a
    /// distance: downstream code recomputes the real great-circle distance
    /// before anything is filtered or shown.
    #[instrument(name = "Storage order by distance", level = "debug", skip(self))]
    pub fn order_by_distance_to(&self, origin: Coord) -> Result<DataFrame> {
        let dx = col(GEOM_X) - lit(origin.longitude);
        let dy = col(GEOM_Y) - lit(origin.latitude);

        self.frame
            .clone()
            .lazy()
            .with_column((dx.clone() * dx + dy.clone() * dy).alias(STORAGE_DISTANCE))
            .sort([STORAGE_DISTANCE, schema::ID], SortMultipleOptions::default())
            .collect()
            .map_err(From::from)
    }

    /// Storage-side radius prefilter: rows inside the degree-space window of
    /// `radius_km` around `origin`.
    ///
    /// Over-inclusive near the window corners and clamped at the
    /// antimeridian; never a membership decision. The authoritative filter
    /// happens downstream against recomputed great-circle distances.
    #[instrument(name = "Storage radius filter", level = "debug", skip(self))]
    pub fn filter_within_radius(&self, origin: Coord, radius_km: f64) -> Result<DataFrame> {
        let window = degree_window(origin, radius_km);

        self.frame
            .clone()
            .lazy()
            .filter(
                col(GEOM_Y)
                    .gt_eq(lit(window.min_lat))
                    .and(col(GEOM_Y).lt_eq(lit(window.max_lat)))
                    .and(col(GEOM_X).gt_eq(lit(window.min_lon)))
                    .and(col(GEOM_X).lt_eq(lit(window.max_lon))),
            )
            .collect()
            .map_err(From::from)
    }

    /// Exact inclusive containment on the scalar coordinate columns.
    ///
    /// Unlike the radius primitives this one is authoritative. A degenerate
    /// box (`min >= max` on either axis) matches nothing and produces an
    /// empty frame, not an error.
    #[instrument(name = "Storage bbox filter", level = "debug", skip(self))]
    pub fn filter_within_bbox(&self, bbox: &BoundingBox) -> Result<DataFrame> {
        self.frame
            .clone()
            .lazy()
            .filter(
                col(schema::LATITUDE)
                    .gt_eq(lit(bbox.min_lat))
                    .and(col(schema::LATITUDE).lt_eq(lit(bbox.max_lat)))
                    .and(col(schema::LONGITUDE).gt_eq(lit(bbox.min_lon)))
                    .and(col(schema::LONGITUDE).lt_eq(lit(bbox.max_lon))),
            )
            .collect()
            .map_err(From::from)
    }
}
