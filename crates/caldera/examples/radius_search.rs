//! Radius queries and the authoritative distance recheck
//!
//! Shows that the storage radius prefilter is only ever an optimization:
//! membership is identical with the hint on or off, because every candidate
//! is re-measured with the great-circle formula before the radius filter
//! applies.

use caldera::{Coord, PointCatalog, QueryConfig, QueryDispatcher};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (frame, metadata) = caldera::data::embedded::sample_catalog()?;
    println!(
        "Loaded {} records from {} ({} skipped)",
        metadata.loaded, metadata.source, metadata.skipped
    );
    let catalog = PointCatalog::from_frame(frame)?;

    let origin = Coord::new(-6.2, 106.8); // Jakarta
    let radius_km = 2000.0;

    let safe = QueryDispatcher::new(catalog.clone());
    let hinted = QueryDispatcher::with_config(
        catalog,
        QueryConfig::builder().storage_radius_hint(true).build()?,
    );

    let safe_results = safe.within_radius(origin, radius_km)?;
    let hinted_results = hinted.within_radius(origin, radius_km)?;
    assert_eq!(safe_results, hinted_results);

    println!("\nWithin {radius_km} km of Jakarta (either configuration):");
    for record in &safe_results {
        println!(
            "  {} ({}): {:.1} km",
            record.name,
            record.country,
            record.distance_km.unwrap_or_default()
        );
    }

    Ok(())
}
