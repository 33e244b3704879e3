//! Spatial query execution against the catalog's storage primitives.
//!
//! Each operation returns raw candidate rows. Candidate selection may lean
//! on storage-side ordering and prefiltering; membership and final ordering
//! for distance-bearing queries are decided downstream by the normalizer.

use polars::prelude::*;
use tracing::{debug, instrument};

use crate::catalog::{self, PointCatalog, STORAGE_DISTANCE};
use crate::geo::{BoundingBox, Coord};
use caldera_data::schema;

/// A raw candidate row surfaced by the storage layer, before the
/// authoritative distance recheck.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub id: u32,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Storage-reported ordering key (squared planar degrees), when the
    /// candidate came from an ordered scan. Hint only; the normalizer
    /// overwrites it.
    pub storage_distance: Option<f64>,
}

/// Candidates for a nearest-N query: storage ordering ascending, truncated
/// to at most `count`. A catalog smaller than `count` yields everything.
/// Equal storage distances order by ascending id.
#[instrument(name = "Nearest candidates", level = "debug", skip(catalog))]
pub fn nearest_candidates(
    catalog: &PointCatalog,
    origin: Coord,
    count: usize,
) -> catalog::Result<Vec<RawCandidate>> {
    let ordered = catalog.order_by_distance_to(origin)?;
    let truncated = ordered.head(Some(count));
    candidates_from_frame(&truncated)
}

/// Candidates for a within-radius query.
///
/// The safe default (`use_storage_hint = false`) orders the full catalog and
/// leaves membership entirely to the normalizer's recheck. With the hint
/// enabled, the storage window prefilter trims the scan first; the recheck
/// still decides membership, so the hint can only cost recall if the storage
/// window under-covers (it clamps at the antimeridian).
#[instrument(name = "Radius candidates", level = "debug", skip(catalog))]
pub fn radius_candidates(
    catalog: &PointCatalog,
    origin: Coord,
    radius_km: f64,
    use_storage_hint: bool,
) -> catalog::Result<Vec<RawCandidate>> {
    if use_storage_hint {
        let prefiltered = catalog.filter_within_radius(origin, radius_km)?;
        debug!(
            rows = prefiltered.height(),
            total = catalog.len(),
            "storage radius window applied"
        );
        return candidates_from_frame(&prefiltered);
    }

    let ordered = catalog.order_by_distance_to(origin)?;
    candidates_from_frame(&ordered)
}

/// Candidates for a bounding-box query: exact containment, catalog order,
/// no distance.
#[instrument(name = "Bounding box candidates", level = "debug", skip(catalog))]
pub fn bbox_candidates(
    catalog: &PointCatalog,
    bbox: &BoundingBox,
) -> catalog::Result<Vec<RawCandidate>> {
    let contained = catalog.filter_within_bbox(bbox)?;
    candidates_from_frame(&contained)
}

fn candidates_from_frame(frame: &DataFrame) -> catalog::Result<Vec<RawCandidate>> {
    let ids = frame.column(schema::ID)?.u32()?;
    let names = frame.column(schema::NAME)?.str()?;
    let countries = frame.column(schema::COUNTRY)?.str()?;
    let latitudes = frame.column(schema::LATITUDE)?.f64()?;
    let longitudes = frame.column(schema::LONGITUDE)?.f64()?;
    let storage = frame
        .column(STORAGE_DISTANCE)
        .ok()
        .and_then(|column| column.f64().ok());

    let mut candidates = Vec::with_capacity(frame.height());
    for i in 0..frame.height() {
        let (Some(id), Some(latitude), Some(longitude)) =
            (ids.get(i), latitudes.get(i), longitudes.get(i))
        else {
            continue;
        };
        candidates.push(RawCandidate {
            id,
            name: names.get(i).unwrap_or_default().to_string(),
            country: countries.get(i).unwrap_or_default().to_string(),
            latitude,
            longitude,
            storage_distance: storage.and_then(|hints| hints.get(i)),
        });
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PointRecord;

    fn record(id: u32, name: &str, latitude: f64, longitude: f64) -> PointRecord {
        PointRecord {
            id,
            name: name.to_string(),
            country: String::new(),
            region: None,
            subregion: None,
            latitude,
            longitude,
        }
    }

    fn pacific_catalog() -> PointCatalog {
        PointCatalog::from_records(vec![
            record(1, "Krakatau", -6.102, 105.423),
            record(2, "Fujisan", 35.3606, 138.7274),
            record(3, "Merapi", -7.54, 110.446),
        ])
        .unwrap()
    }

    #[test]
    fn test_nearest_truncates_to_count() {
        let catalog = pacific_catalog();
        let candidates =
            nearest_candidates(&catalog, Coord::new(-6.0, 105.0), 2).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Krakatau");
        assert_eq!(candidates[1].name, "Merapi");
        assert!(candidates[0].storage_distance.is_some());
    }

    #[test]
    fn test_nearest_returns_all_when_count_exceeds_catalog() {
        let catalog = pacific_catalog();
        let candidates =
            nearest_candidates(&catalog, Coord::new(0.0, 0.0), 50).unwrap();
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_nearest_tie_breaks_by_id() {
        let catalog = PointCatalog::from_records(vec![
            record(9, "east", 0.0, 1.0),
            record(4, "north", 1.0, 0.0),
        ])
        .unwrap();

        let candidates = nearest_candidates(&catalog, Coord::new(0.0, 0.0), 2).unwrap();
        assert_eq!(candidates[0].id, 4);
        assert_eq!(candidates[1].id, 9);
    }

    #[test]
    fn test_radius_safe_path_scans_whole_catalog() {
        let catalog = pacific_catalog();
        let candidates =
            radius_candidates(&catalog, Coord::new(-6.102, 105.423), 10.0, false).unwrap();

        // Membership is not decided here: every record comes back, ordered
        // by the storage hint.
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].name, "Krakatau");
    }

    #[test]
    fn test_radius_hint_path_prefilters() {
        let catalog = pacific_catalog();
        let candidates =
            radius_candidates(&catalog, Coord::new(-6.102, 105.423), 700.0, true).unwrap();

        // Fujisan is thousands of kilometres outside the degree window.
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.name != "Fujisan"));
        assert!(candidates[0].storage_distance.is_none());
    }

    #[test]
    fn test_bbox_candidates_exact() {
        let catalog = pacific_catalog();
        let candidates =
            bbox_candidates(&catalog, &BoundingBox::new(30.0, 130.0, 40.0, 140.0)).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Fujisan");
        assert!(candidates[0].storage_distance.is_none());
    }

    #[test]
    fn test_empty_catalog_yields_no_candidates() {
        let catalog = PointCatalog::from_records(vec![]).unwrap();
        assert!(
            nearest_candidates(&catalog, Coord::new(0.0, 0.0), 5)
                .unwrap()
                .is_empty()
        );
        assert!(
            radius_candidates(&catalog, Coord::new(0.0, 0.0), 100.0, true)
                .unwrap()
                .is_empty()
        );
        assert!(
            bbox_candidates(&catalog, &BoundingBox::new(-10.0, -10.0, 10.0, 10.0))
                .unwrap()
                .is_empty()
        );
    }
}
