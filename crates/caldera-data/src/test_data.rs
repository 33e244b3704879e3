//! Deterministic catalog fixtures for tests and examples.
//!
//! Coordinates are real Holocene volcano locations so distance assertions in
//! tests stay meaningful.

use polars::prelude::*;

use crate::{Result, schema};

type VolcanoRow = (u32, &'static str, &'static str, &'static str, &'static str, f64, f64);

const CORE_VOLCANOES: [VolcanoRow; 2] = [
    (
        262000,
        "Krakatau",
        "Indonesia",
        "Indonesia",
        "Sunda Strait",
        -6.102,
        105.423,
    ),
    (
        283030,
        "Fujisan",
        "Japan",
        "Japan, Taiwan, Marianas",
        "Honshu",
        35.3606,
        138.7274,
    ),
];

const EXTENDED_VOLCANOES: [VolcanoRow; 10] = [
    (
        211020,
        "Vesuvius",
        "Italy",
        "Mediterranean and Western Asia",
        "Italy",
        40.821,
        14.426,
    ),
    (
        211060,
        "Etna",
        "Italy",
        "Mediterranean and Western Asia",
        "Italy",
        37.748,
        14.999,
    ),
    (
        211040,
        "Stromboli",
        "Italy",
        "Mediterranean and Western Asia",
        "Italy",
        38.789,
        15.213,
    ),
    (
        332020,
        "Mauna Loa",
        "United States",
        "Hawaii and Pacific Ocean",
        "Hawaiian Islands",
        19.475,
        -155.608,
    ),
    (
        321050,
        "St. Helens",
        "United States",
        "Canada and Western USA",
        "Washington",
        46.2,
        -122.18,
    ),
    (
        263250,
        "Merapi",
        "Indonesia",
        "Indonesia",
        "Java",
        -7.54,
        110.446,
    ),
    (
        264040,
        "Tambora",
        "Indonesia",
        "Indonesia",
        "Lesser Sunda Islands",
        -8.25,
        118.0,
    ),
    (
        273083,
        "Pinatubo",
        "Philippines",
        "Philippines and SE Asia",
        "Luzon",
        15.13,
        120.35,
    ),
    (
        372020,
        "Eyjafjallajokull",
        "Iceland",
        "Iceland and Arctic Ocean",
        "Iceland-S",
        63.633,
        -19.633,
    ),
    (
        352050,
        "Cotopaxi",
        "Ecuador",
        "South America",
        "Ecuador",
        -0.677,
        -78.436,
    ),
];

/// Size of the fixture catalog to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestDataConfig {
    include_extended: bool,
}

impl TestDataConfig {
    /// Two records (Krakatau and Fujisan): enough for ordering, radius and
    /// bounding-box assertions.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            include_extended: false,
        }
    }

    /// Twelve records spread across hemispheres, including points either
    /// side of the antimeridian-adjacent Pacific.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            include_extended: true,
        }
    }

    fn rows(self) -> Vec<VolcanoRow> {
        let mut rows = CORE_VOLCANOES.to_vec();
        if self.include_extended {
            rows.extend_from_slice(&EXTENDED_VOLCANOES);
        }
        rows
    }
}

/// Build a fixture catalog frame with the base schema.
pub fn catalog_frame(config: &TestDataConfig) -> Result<DataFrame> {
    let rows = config.rows();

    let mut ids: Vec<u32> = Vec::with_capacity(rows.len());
    let mut names: Vec<&str> = Vec::with_capacity(rows.len());
    let mut countries: Vec<&str> = Vec::with_capacity(rows.len());
    let mut regions: Vec<&str> = Vec::with_capacity(rows.len());
    let mut subregions: Vec<&str> = Vec::with_capacity(rows.len());
    let mut latitudes: Vec<f64> = Vec::with_capacity(rows.len());
    let mut longitudes: Vec<f64> = Vec::with_capacity(rows.len());

    for (id, name, country, region, subregion, latitude, longitude) in rows {
        ids.push(id);
        names.push(name);
        countries.push(country);
        regions.push(region);
        subregions.push(subregion);
        latitudes.push(latitude);
        longitudes.push(longitude);
    }

    df!(
        schema::ID => ids,
        schema::NAME => names,
        schema::COUNTRY => countries,
        schema::REGION => regions,
        schema::SUBREGION => subregions,
        schema::LATITUDE => latitudes,
        schema::LONGITUDE => longitudes,
    )
    .map_err(From::from)
}
