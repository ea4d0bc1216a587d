//! Search configuration and customization
//!
//! This example demonstrates the configuration presets, result limits and
//! radius bounds, and how requests outside those bounds are rejected.

use geolisting::{
    GeoPoint, ListingSearcher, SearchConfig, SearchConfigBuilder, SearchCriteria,
    data::TestDataConfig,
};

const MEDELLIN: GeoPoint = GeoPoint::new(6.2442, -75.5812);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let searcher = ListingSearcher::from_test_data(&TestDataConfig::sample())?;

    println!("Comparing search configurations around Medellín:\n");

    test_preset_configs(&searcher)?;
    test_custom_configs(&searcher)?;

    Ok(())
}

fn describe(name: &str, config: &SearchConfig, found: usize) {
    println!(
        "  {name:<10} {found} results (default radius: {} km, max radius: {:?}, limit: {:?})",
        config.default_radius_km, config.max_radius_km, config.limit
    );
}

fn test_preset_configs(searcher: &ListingSearcher) -> Result<(), Box<dyn std::error::Error>> {
    println!("Preset configurations:");

    for (name, config) in [
        ("Nearby", SearchConfigBuilder::nearby().build()),
        ("Citywide", SearchConfigBuilder::citywide().build()),
        ("Regional", SearchConfigBuilder::regional().build()),
    ] {
        let criteria = SearchCriteria::new().near(MEDELLIN, config.default_radius_km);
        let results = searcher.search_with_config(&criteria, &config)?;
        describe(name, &config, results.len());
    }
    println!();

    Ok(())
}

fn test_custom_configs(searcher: &ListingSearcher) -> Result<(), Box<dyn std::error::Error>> {
    println!("Custom configurations:");

    let top_two = SearchConfigBuilder::regional().limit(2).build();
    let criteria = SearchCriteria::new().near(MEDELLIN, 400.0);
    let results = searcher.search_with_config(&criteria, &top_two)?;
    describe("Top two", &top_two, results.len());

    let tight = SearchConfigBuilder::new().radius_bounds(2.0, 10.0)?.build();
    let too_wide = SearchCriteria::new().near(MEDELLIN, 50.0);
    match searcher.search_with_config(&too_wide, &tight) {
        Ok(results) => println!("  Tight      {} results", results.len()),
        Err(e) => println!("  Tight      rejected: {e}"),
    }

    // Inconsistent bounds are caught when building
    if let Err(e) = SearchConfigBuilder::new().radius_bounds(20.0, 10.0) {
        println!("  Invalid    {e}");
    }

    Ok(())
}
