//! Basic listing search functionality
//!
//! This example demonstrates the fundamental search operations:
//! - Creating a searcher over a generated sample catalogue
//! - Text, category and price searches
//! - Proximity searches ranked by distance

use geolisting::{GeoPoint, ListingSearcher, RankedResult, SearchCriteria, data::TestDataConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let searcher = ListingSearcher::from_test_data(&TestDataConfig::sample())?;
    println!("Loaded {} listings\n", searcher.len());

    // Free text, matched against title and description
    println!("Searching for 'lawn':");
    let results = searcher.search(&SearchCriteria::new().text("lawn"))?;
    print_search_results(&results, 3);

    // Exact category plus a price bound
    println!("\nHome repair services starting under 50:");
    let criteria = SearchCriteria::new()
        .category("Home Repair")
        .price_range(None, Some(50.0));
    let results = searcher.search(&criteria)?;
    print_search_results(&results, 3);

    // Everything within 10 km of central Bogotá, nearest first
    println!("\nListings within 10 km of Bogotá:");
    let criteria = SearchCriteria::new().near(GeoPoint::new(4.7110, -74.0721), 10.0);
    let results = searcher.search(&criteria)?;
    print_search_results(&results, 5);

    Ok(())
}

fn print_search_results(results: &[RankedResult], limit: usize) {
    for (i, result) in results.iter().take(limit).enumerate() {
        let distance = result
            .distance_km
            .map_or_else(|| "-".to_string(), |d| format!("{d:.2} km"));
        println!(
            "  {}. {} [{}] {:.0}-{:.0}, distance: {}",
            i + 1,
            result.record.title,
            result.record.category,
            result.record.min_price,
            result.record.max_price,
            distance
        );
    }

    if results.len() > limit {
        println!("  ... and {} more results", results.len() - limit);
    }
}
