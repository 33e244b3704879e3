//! Authoritative result shaping: distance recheck, radius filter, final
//! ordering.
//!
//! Storage engines have historically reported distances in surprising units
//! (planar degrees, metres) and orderings. This module is the single place
//! where those reports stop mattering: every distance is recomputed with
//! the great-circle formula before it is filtered on or shown.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::engine::RawCandidate;
use crate::geo::{Coord, haversine_distance_km};

/// One output record, shaped for the JSON wire contract.
///
/// `distance_km` is present for nearest/radius results and absent for
/// bounding-box results, which carry no natural single-point distance.
/// Serialization emits exactly these fields; catalog internals (ids,
/// regional classifiers, storage hints) never leak out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Shape raw storage candidates into the final result list.
///
/// With an origin, every candidate's distance is recomputed with the
/// great-circle formula, replacing whatever the storage layer reported. A
/// nonzero `radius_km` keeps only candidates within it; a zero or absent
/// radius keeps everything. Results order ascending by recomputed distance,
/// equal distances by ascending id.
///
/// Without an origin (bounding-box queries) candidates pass through in
/// catalog order, carrying no distance.
#[must_use]
pub fn normalize(
    origin: Option<Coord>,
    candidates: Vec<RawCandidate>,
    radius_km: Option<f64>,
) -> Vec<ResultRecord> {
    let Some(origin) = origin else {
        return candidates
            .into_iter()
            .map(|candidate| ResultRecord {
                name: candidate.name,
                country: candidate.country,
                latitude: candidate.latitude,
                longitude: candidate.longitude,
                distance_km: None,
            })
            .collect();
    };

    candidates
        .into_iter()
        .map(|candidate| {
            let distance = haversine_distance_km(
                origin,
                Coord::new(candidate.latitude, candidate.longitude),
            );
            (candidate, distance)
        })
        .filter(|(_, distance)| match radius_km {
            Some(radius) if radius > 0.0 => *distance <= radius,
            _ => true,
        })
        .sorted_by(|(a, distance_a), (b, distance_b)| {
            distance_a
                .total_cmp(distance_b)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|(candidate, distance)| ResultRecord {
            name: candidate.name,
            country: candidate.country,
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            distance_km: Some(distance),
        })
        .collect()
}
