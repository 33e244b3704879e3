//! Integration tests for caldera spatial queries.
//!
//! These tests run against the full public API: catalog adoption from the
//! data-loading boundary, intent resolution, dispatch, and the wire-format
//! serialization of results.

use caldera::{
    BoundingBox, CalderaError, Coord, IntentRequest, PointCatalog, QueryConfig, QueryDispatcher,
    QueryError, QueryIntent, haversine_distance_km,
};
use caldera_data::test_data::{TestDataConfig, catalog_frame};

fn setup_test_env() {
    let _ = caldera::init_logging(tracing::Level::WARN);
}

fn sample_dispatcher() -> QueryDispatcher {
    let frame = catalog_frame(&TestDataConfig::sample()).expect("fixture frame should build");
    let catalog = PointCatalog::from_frame(frame).expect("fixture catalog should validate");
    QueryDispatcher::new(catalog)
}

#[test]
fn test_full_workflow() {
    setup_test_env();

    let dispatcher = sample_dispatcher();

    // 1. Nearest: bounded, ordered, annotated
    let origin = Coord::new(1.264, 103.840);
    let nearest = dispatcher.nearest(origin, 4).expect("nearest should work");
    assert_eq!(nearest.len(), 4);
    assert_eq!(nearest[0].name, "Krakatau");
    for pair in nearest.windows(2) {
        assert!(pair[0].distance_km.unwrap() <= pair[1].distance_km.unwrap());
    }

    // 2. Radius: every returned distance within bound
    let radius = dispatcher
        .within_radius(origin, 1500.0)
        .expect("radius should work");
    assert!(!radius.is_empty());
    for record in &radius {
        assert!(record.distance_km.unwrap() <= 1500.0);
    }

    // 3. Bounding box: membership only, no distances
    let italy = dispatcher
        .within_bounding_box(BoundingBox::new(35.0, 10.0, 45.0, 20.0))
        .expect("bbox should work");
    let names: Vec<_> = italy.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"Vesuvius"));
    assert!(italy.iter().all(|r| r.distance_km.is_none()));
}

#[test]
fn test_radius_results_are_a_superset_ordered_prefix_of_nearest() {
    setup_test_env();

    let dispatcher = sample_dispatcher();
    let origin = Coord::new(-6.2, 106.8);

    // Nearest-N is the N-prefix of the unbounded radius ranking.
    let nearest = dispatcher.nearest(origin, 3).unwrap();
    let unbounded = dispatcher.within_radius(origin, 0.0).unwrap();

    assert_eq!(unbounded.len(), dispatcher.catalog().len());
    assert_eq!(&unbounded[..3], &nearest[..]);
}

#[test]
fn test_recomputed_distances_match_the_distance_engine() {
    setup_test_env();

    let dispatcher = sample_dispatcher();
    let origin = Coord::new(35.0, 135.0);

    for record in dispatcher.nearest(origin, 12).unwrap() {
        let expected =
            haversine_distance_km(origin, Coord::new(record.latitude, record.longitude));
        let actual = record.distance_km.unwrap();
        assert!(
            (actual - expected).abs() < 1e-9,
            "{}: reported {actual}, engine says {expected}",
            record.name
        );
    }
}

#[test]
fn test_radius_authority_under_both_configurations() {
    setup_test_env();

    let frame = catalog_frame(&TestDataConfig::sample()).unwrap();
    let catalog = PointCatalog::from_frame(frame).unwrap();

    for use_hint in [false, true] {
        let dispatcher = QueryDispatcher::with_config(
            catalog.clone(),
            QueryConfig::builder()
                .storage_radius_hint(use_hint)
                .build()
                .unwrap(),
        );

        for radius_km in [100.0, 1000.0, 5000.0, 15000.0] {
            let origin = Coord::new(20.0, -100.0);
            let results = dispatcher.within_radius(origin, radius_km).unwrap();
            for record in &results {
                let true_distance =
                    haversine_distance_km(origin, Coord::new(record.latitude, record.longitude));
                assert!(
                    true_distance <= radius_km,
                    "hint={use_hint}: {} at {true_distance} km leaked past {radius_km} km",
                    record.name
                );
            }
        }
    }
}

#[test]
fn test_intent_request_boundary() {
    setup_test_env();

    let dispatcher = sample_dispatcher();

    // Endpoint-path kind with top-level parameters, as the original wire
    // format sent them.
    let request = IntentRequest::from_json(
        r#"{"choice": "/volcanoes/nearest", "latitude": 1.264, "longitude": 103.840, "nearest": 2}"#,
    )
    .unwrap();
    let results = dispatcher.dispatch_request(&request).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Krakatau");

    // Bare kind, nested parameters, numeric strings.
    let request = IntentRequest::from_json(
        r#"{"kind": "radius", "parameters": {"latitude": "38.0", "longitude": "15.0", "radius": "300"}}"#,
    )
    .unwrap();
    let results = dispatcher.dispatch_request(&request).unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.distance_km.unwrap() <= 300.0));

    // Missing parameters resolve to documented defaults (Italy box).
    let request = IntentRequest::from_json(r#"{"kind": "bounding-box"}"#).unwrap();
    let results = dispatcher.dispatch_request(&request).unwrap();
    assert_eq!(results.len(), 3);

    // Unknown kinds are rejected, never coerced.
    let request = IntentRequest::from_json(r#"{"kind": "point-in-polygon"}"#).unwrap();
    let error = dispatcher.dispatch_request(&request).unwrap_err();
    assert!(matches!(
        error,
        CalderaError::Query(QueryError::InvalidIntentKind(_))
    ));
}

#[test]
fn test_result_wire_format() {
    setup_test_env();

    let dispatcher = sample_dispatcher();

    let with_distance = dispatcher
        .nearest(Coord::new(1.264, 103.840), 1)
        .unwrap();
    let json = serde_json::to_value(&with_distance).unwrap();
    let first = &json.as_array().unwrap()[0];
    let object = first.as_object().unwrap();
    assert_eq!(object.len(), 5);
    for key in ["name", "country", "latitude", "longitude", "distance_km"] {
        assert!(object.contains_key(key), "missing key {key}");
    }

    let without_distance = dispatcher
        .within_bounding_box(BoundingBox::new(35.0, 10.0, 45.0, 20.0))
        .unwrap();
    let json = serde_json::to_value(&without_distance).unwrap();
    let first = &json.as_array().unwrap()[0];
    let object = first.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert!(!object.contains_key("distance_km"));
    assert!(!object.contains_key("id"));
    assert!(!object.contains_key("region"));
}

#[test]
fn test_empty_catalog_closure() {
    setup_test_env();

    let dispatcher = QueryDispatcher::new(PointCatalog::from_records(vec![]).unwrap());

    let intents = [
        QueryIntent::Nearest {
            origin: Coord::new(0.0, 0.0),
            count: 5,
        },
        QueryIntent::Radius {
            origin: Coord::new(0.0, 0.0),
            radius_km: 500.0,
        },
        QueryIntent::BoundingBox {
            bbox: BoundingBox::new(-90.0, -180.0, 90.0, 180.0),
        },
    ];
    for intent in &intents {
        assert!(
            dispatcher.dispatch(intent).unwrap().is_empty(),
            "empty catalog must yield an empty list for {intent:?}"
        );
    }
}

#[test]
fn test_concurrent_dispatch() {
    setup_test_env();

    use std::sync::Arc;
    use std::thread;

    let dispatcher = Arc::new(sample_dispatcher());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let intent = match i {
                    0 => QueryIntent::Nearest {
                        origin: Coord::new(1.264, 103.840),
                        count: 5,
                    },
                    1 => QueryIntent::Radius {
                        origin: Coord::new(40.0, 14.0),
                        radius_km: 400.0,
                    },
                    2 => QueryIntent::BoundingBox {
                        bbox: BoundingBox::new(35.0, 10.0, 45.0, 20.0),
                    },
                    _ => QueryIntent::Radius {
                        origin: Coord::new(19.4, -155.3),
                        radius_km: 100.0,
                    },
                };
                dispatcher.dispatch(&intent)
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().expect("thread should not panic");
        assert!(result.is_ok(), "concurrent dispatch should work");
    }
}

#[test]
fn test_dispatch_batch() {
    setup_test_env();

    let dispatcher = sample_dispatcher();
    let intents: Vec<_> = (1..=6)
        .map(|count| QueryIntent::Nearest {
            origin: Coord::new(0.0, 120.0),
            count,
        })
        .collect();

    let batched = dispatcher.dispatch_batch(&intents).unwrap();
    assert_eq!(batched.len(), intents.len());
    for (i, results) in batched.iter().enumerate() {
        assert_eq!(results.len(), i + 1);
    }
}

#[test]
fn test_catalog_from_loading_boundary() {
    setup_test_env();

    // The GeoJSON boundary rejects unusable features; the catalog then
    // enforces its own invariants on what made it through.
    let raw = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"VolcanoID": 1, "V_Name": "Kept", "Country": "X", "Latitude": 10.0, "Longitude": 20.0}},
            {"type": "Feature", "properties": {"VolcanoID": 2, "V_Name": "Dropped", "Country": "X", "Longitude": 20.0}}
        ]
    }"#;
    let (frame, metadata) = caldera_data::parse_feature_collection(raw, "inline").unwrap();
    assert_eq!(metadata.loaded, 1);
    assert_eq!(metadata.skipped, 1);

    let dispatcher = QueryDispatcher::new(PointCatalog::from_frame(frame).unwrap());
    let results = dispatcher.nearest(Coord::new(10.0, 20.0), 5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Kept");
}
