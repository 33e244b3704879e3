//! Column names of the catalog frame, shared between loading and querying.
//!
//! Every loader in this crate produces a frame with exactly these base
//! columns; the query core derives its geometry columns on top of them.

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const COUNTRY: &str = "country";
pub const REGION: &str = "region";
pub const SUBREGION: &str = "subregion";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Base columns every catalog frame carries, in canonical order.
pub const BASE_COLUMNS: [&str; 7] = [ID, NAME, COUNTRY, REGION, SUBREGION, LATITUDE, LONGITUDE];
