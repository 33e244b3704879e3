//! Great-circle distance primitives.
//!
//! This is the authority for every distance shown to or filtered for a
//! caller. Storage-reported distances elsewhere in the crate are ordering
//! hints with no unit guarantees; whenever the two disagree, this module
//! wins.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, spherical model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coord {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// An axis-aligned latitude/longitude rectangle, inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Inclusive containment test on both axes.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }

    /// A box with `min >= max` on either axis matches nothing.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min_lat >= self.max_lat || self.min_lon >= self.max_lon
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.min_lat.is_finite()
            && self.min_lon.is_finite()
            && self.max_lat.is_finite()
            && self.max_lon.is_finite()
    }
}

/// Great-circle distance between two points in kilometres.
///
/// Haversine over a spherical Earth. Symmetric, zero for coincident points,
/// total over every valid coordinate pair.
#[must_use]
pub fn haversine_distance_km(a: Coord, b: Coord) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Degree-space window guaranteed to contain the `radius_km` circle around
/// `origin`.
///
/// Used as the storage prefilter for radius queries. Over-inclusive near the
/// window corners; the window clamps at the antimeridian rather than
/// wrapping, so a circle crossing it is only partially covered. Never a
/// membership decision.
#[must_use]
pub fn degree_window(origin: Coord, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;
    if angular >= std::f64::consts::PI {
        return BoundingBox::new(-90.0, -180.0, 90.0, 180.0);
    }

    let lat_rad = origin.latitude.to_radians();
    let min_lat_rad = lat_rad - angular;
    let max_lat_rad = lat_rad + angular;

    // A window reaching either pole spans every longitude.
    if min_lat_rad <= -std::f64::consts::FRAC_PI_2 || max_lat_rad >= std::f64::consts::FRAC_PI_2 {
        return BoundingBox::new(
            min_lat_rad.to_degrees().max(-90.0),
            -180.0,
            max_lat_rad.to_degrees().min(90.0),
            180.0,
        );
    }

    let delta_lon = (angular.sin() / lat_rad.cos()).asin().to_degrees();
    BoundingBox::new(
        min_lat_rad.to_degrees(),
        (origin.longitude - delta_lon).max(-180.0),
        max_lat_rad.to_degrees(),
        (origin.longitude + delta_lon).min(180.0),
    )
}
