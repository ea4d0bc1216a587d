//! Data source and initialization patterns
//!
//! This example shows the ways to build a `ListingSearcher`: from records in
//! memory, from a generated listing export, and from a Parquet snapshot on disk.
//! Set `GEOLISTING_DATA_DIR` to load a real `listings.csv` or `listings.parquet`.

use geolisting::{
    ListingSearcher, SearchCriteria, SearchableRecord,
    data::{ListingData, TestDataConfig, get_data_dir},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Geolisting ListingSearcher - Data Source Examples\n");

    // Method 1: Records already in memory
    println!("1. From records in memory:");
    let in_memory = ListingSearcher::new(vec![
        SearchableRecord::new("a1", "Bike Repair", "Tune-ups and flat tyres", "Repairs")
            .with_prices(10.0, 80.0)
            .with_location(4.6486, -74.0628),
    ]);
    let results = in_memory.search(&SearchCriteria::new().text("bike"))?;
    println!("   Found {} results for 'bike'\n", results.len());

    // Method 2: A generated CSV export
    println!("2. From a generated listing export:");
    let data = ListingData::from_test_data(&TestDataConfig::sample())?;
    let searcher = ListingSearcher::from_data(&data)?;
    println!("   Loaded {} listings from {:?}\n", searcher.len(), data.source());

    // Method 3: Write a Parquet snapshot and load it back
    println!("3. From a Parquet snapshot:");
    let dir = tempfile::tempdir()?;
    let metadata = data.save_snapshot(dir.path())?;
    println!(
        "   Wrote {} rows ({} active) at {}",
        metadata.rows, metadata.active_rows, metadata.generated_at
    );
    let snapshot = ListingSearcher::from_data(&ListingData::from_dir(dir.path())?)?;
    println!("   Reloaded {} listings\n", snapshot.len());

    // Method 4: The configured data directory, if it holds a listing table
    println!("4. From the configured data directory {:?}:", get_data_dir());
    match ListingSearcher::initialize() {
        Ok(searcher) => println!("   Loaded {} listings", searcher.len()),
        Err(e) => println!("   Not available: {e}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_sources_example() {
        let _ = geolisting::init_logging(tracing::Level::WARN);
        assert!(main().is_ok(), "Data sources example should run");
    }
}
