//! Nearest-N queries against the embedded catalog
//!
//! This example demonstrates the fundamental query flow:
//! - Creating a dispatcher over the embedded sample catalog
//! - Running nearest-N queries from a few origins
//! - Reading the distance-annotated results

use caldera::{Coord, QueryDispatcher, ResultRecord};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = QueryDispatcher::new_embedded()?;

    println!("Nearest to Singapore (1.264, 103.840):");
    let results = dispatcher.nearest(Coord::new(1.264, 103.840), 5)?;
    print_results(&results);

    println!("\nNearest to Naples (40.85, 14.27):");
    let results = dispatcher.nearest(Coord::new(40.85, 14.27), 3)?;
    print_results(&results);

    println!("\nNearest to Hilo (19.7, -155.1):");
    let results = dispatcher.nearest(Coord::new(19.7, -155.1), 2)?;
    print_results(&results);

    Ok(())
}

fn print_results(results: &[ResultRecord]) {
    for (i, record) in results.iter().enumerate() {
        println!(
            "  {}. {} ({}) at {:.1} km",
            i + 1,
            record.name,
            record.country,
            record.distance_km.unwrap_or_default()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_volcanoes_example() {
        assert!(main().is_ok(), "example should run successfully");
    }
}
