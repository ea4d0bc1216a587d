//! Batch processing for independent searches
//!
//! This example runs the same set of searches one by one and as a parallel
//! batch, then checks that both produce the same results.

use std::time::Instant;

use geolisting::{
    GeoPoint, ListingSearcher, SearchConfig, SearchConfigBuilder, SearchCriteria,
    data::TestDataConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let searcher = ListingSearcher::from_test_data(&TestDataConfig::geolocated_only(240))?;

    let cities = [
        ("Bogotá", GeoPoint::new(4.7110, -74.0721)),
        ("Medellín", GeoPoint::new(6.2442, -75.5812)),
        ("Cali", GeoPoint::new(3.4516, -76.5320)),
        ("Cartagena", GeoPoint::new(10.3910, -75.4794)),
        ("Santa Marta", GeoPoint::new(11.2408, -74.1990)),
    ];
    let queries: Vec<SearchCriteria> = cities
        .iter()
        .map(|(_, point)| SearchCriteria::new().near(*point, 25.0))
        .collect();

    println!("Processing {} searches...", queries.len());

    compare_performance(&searcher, &queries, &SearchConfig::default())?;

    let config = SearchConfigBuilder::citywide().limit(3).build();
    let batch = searcher.search_bulk(&queries, &config)?;
    println!("\nTop results per city (limit 3):");
    for ((city, _), results) in cities.iter().zip(&batch) {
        let titles: Vec<&str> = results.iter().map(|r| r.record.title.as_str()).collect();
        println!("  {city:<12} {titles:?}");
    }

    Ok(())
}

fn compare_performance(
    searcher: &ListingSearcher,
    queries: &[SearchCriteria],
    config: &SearchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\nPerformance comparison:");

    let start = Instant::now();
    let mut individual_results = Vec::new();
    for criteria in queries {
        individual_results.push(searcher.search_with_config(criteria, config)?);
    }
    let individual_time = start.elapsed();

    let start = Instant::now();
    let batch_results = searcher.search_bulk(queries, config)?;
    let batch_time = start.elapsed();

    println!("  Individual: {individual_time:?}");
    println!("  Batch:      {batch_time:?}");

    if individual_results != batch_results {
        return Err("Batch results differ from individual results".into());
    }
    println!("  Results identical");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_processing_example() {
        let _ = geolisting::init_logging(tracing::Level::WARN);
        assert!(main().is_ok(), "Batch processing example should run");
    }
}
