use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;
use tracing::info;

use super::error::Result;
use super::raw::LISTING_COLUMNS;

/// 2025-01-01T00:00:00Z, the timestamp of the oldest generated listing.
const BASE_TIMESTAMP: i64 = 1_735_689_600;

/// Configuration for test data generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of listing rows to write
    pub listing_rows: usize,
    /// Whether to use realistic data or minimal test data
    pub realistic_data: bool,
    /// Keep the inactive listings of the realistic data set
    pub include_inactive: bool,
    /// Keep the listings without coordinates of the realistic data set
    pub include_missing_coordinates: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self {
            listing_rows: 24,
            realistic_data: true,
            include_inactive: true,
            include_missing_coordinates: true,
        }
    }
}

impl TestDataConfig {
    /// Minimal data for unit tests
    pub fn minimal() -> Self {
        Self {
            listing_rows: 3,
            realistic_data: false,
            include_inactive: false,
            include_missing_coordinates: true,
        }
    }

    /// Sample data for integration tests
    pub fn sample() -> Self {
        Self::default()
    }

    /// Realistic data where every listing is active and geolocated
    pub fn geolocated_only(rows: usize) -> Self {
        Self {
            listing_rows: rows,
            realistic_data: true,
            include_inactive: false,
            include_missing_coordinates: false,
        }
    }
}

/// Create a listing CSV export in a temporary file.
///
/// The file has a header row with [`LISTING_COLUMNS`] and is written newest
/// listing last, so callers relying on newest-first order must sort.
pub fn create_test_data(config: &TestDataConfig) -> Result<NamedTempFile> {
    info!("Creating test data with config: {:?}", config);

    let mut file = NamedTempFile::new()?;
    writeln!(file, "{}", LISTING_COLUMNS.join(","))?;

    if config.realistic_data && config.listing_rows > 3 {
        write_realistic_listings_data(&mut file, config)?;
    } else {
        write_minimal_listings_data(&mut file, config.listing_rows)?;
    }

    file.flush()?;
    Ok(file)
}

/// Deterministic UUID-shaped identifier for generated row `i`.
pub fn listing_id(i: usize) -> String {
    format!("{:08x}-4b1e-4c2a-9d3f-{:012x}", 0x5e4a_0000 + i, i)
}

fn created_at(i: usize) -> String {
    DateTime::<Utc>::from_timestamp(BASE_TIMESTAMP + (i as i64) * 3_600, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn fmt_coordinate(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

struct ListingRow {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    min_price: f64,
    max_price: f64,
    coordinates: Option<(f64, f64)>,
    active: bool,
    provider_id: &'static str,
}

fn write_row(file: &mut NamedTempFile, i: usize, row: &ListingRow) -> Result<()> {
    let (lat, lng) = row.coordinates.unzip();
    writeln!(
        file,
        "{},\"{}\",\"{}\",\"{}\",{},{},{},{},{},{},{}",
        listing_id(i),
        row.title,
        row.description,
        row.category,
        row.min_price,
        row.max_price,
        fmt_coordinate(lat),
        fmt_coordinate(lng),
        row.active,
        row.provider_id,
        created_at(i),
    )?;
    Ok(())
}

// Realistic data generators
fn write_realistic_listings_data(file: &mut NamedTempFile, config: &TestDataConfig) -> Result<()> {
    let base_data = [
        ListingRow {
            title: "Lawn Mowing",
            description: "Weekly Lawn Care Services for residential gardens",
            category: "Gardening",
            min_price: 20.0,
            max_price: 60.0,
            coordinates: Some((4.7110, -74.0721)),
            active: true,
            provider_id: "prov-bogota-01",
        },
        ListingRow {
            title: "House Cleaning",
            description: "Deep cleaning for apartments and offices",
            category: "Cleaning",
            min_price: 30.0,
            max_price: 90.0,
            coordinates: Some((6.2442, -75.5812)),
            active: true,
            provider_id: "prov-medellin-01",
        },
        ListingRow {
            title: "Guitar Lessons",
            description: "Private guitar lessons for beginners and intermediate players",
            category: "Education",
            min_price: 15.0,
            max_price: 40.0,
            coordinates: None,
            active: true,
            provider_id: "prov-online-01",
        },
        ListingRow {
            title: "Plumbing Repairs",
            description: "Leak detection and pipe replacement in Cali",
            category: "Home Repair",
            min_price: 25.0,
            max_price: 150.0,
            coordinates: Some((3.4516, -76.5320)),
            active: true,
            provider_id: "prov-cali-01",
        },
        ListingRow {
            title: "Dog Walking",
            description: "Hour long walks around Parque de la 93",
            category: "Pets",
            min_price: 10.0,
            max_price: 25.0,
            coordinates: Some((4.6768, -74.0483)),
            active: true,
            provider_id: "prov-bogota-02",
        },
        ListingRow {
            title: "Garden Design",
            description: "Landscaping and lawn installation for new homes",
            category: "Gardening",
            min_price: 200.0,
            max_price: 1500.0,
            coordinates: Some((4.6097, -74.0817)),
            active: true,
            provider_id: "prov-bogota-01",
        },
        ListingRow {
            title: "Closed Bakery Catering",
            description: "Catering for events (no longer offered)",
            category: "Food",
            min_price: 100.0,
            max_price: 400.0,
            coordinates: Some((4.7110, -74.0721)),
            active: false,
            provider_id: "prov-bogota-03",
        },
        ListingRow {
            title: "Electrician",
            description: "Certified residential electrical installations",
            category: "Home Repair",
            min_price: 40.0,
            max_price: 200.0,
            coordinates: Some((10.3910, -75.4794)),
            active: true,
            provider_id: "prov-cartagena-01",
        },
        ListingRow {
            title: "Spanish Tutoring",
            description: "Conversation practice for travellers",
            category: "Education",
            min_price: 12.0,
            max_price: 30.0,
            coordinates: Some((6.2518, -75.5636)),
            active: true,
            provider_id: "prov-medellin-02",
        },
        ListingRow {
            title: "Moving Help",
            description: "Two movers and a van within the city",
            category: "Moving",
            min_price: 80.0,
            max_price: 250.0,
            coordinates: None,
            active: true,
            provider_id: "prov-bogota-04",
        },
        ListingRow {
            title: "Pool Maintenance",
            description: "Seasonal pool cleaning (paused)",
            category: "Cleaning",
            min_price: 50.0,
            max_price: 120.0,
            coordinates: Some((11.2408, -74.1990)),
            active: false,
            provider_id: "prov-santamarta-01",
        },
        ListingRow {
            title: "Personal Training",
            description: "Outdoor fitness sessions in Chapinero",
            category: "Fitness",
            min_price: 20.0,
            max_price: 45.0,
            coordinates: Some((4.6486, -74.0628)),
            active: true,
            provider_id: "prov-bogota-05",
        },
    ];

    let rows = base_data
        .iter()
        .filter(|row| config.include_inactive || row.active)
        .filter(|row| config.include_missing_coordinates || row.coordinates.is_some())
        .cycle()
        .take(config.listing_rows);

    for (i, row) in rows.enumerate() {
        write_row(file, i, row)?;
    }
    Ok(())
}

// Minimal data generators
fn write_minimal_listings_data(file: &mut NamedTempFile, rows: usize) -> Result<()> {
    let data = [
        ListingRow {
            title: "Lawn Mowing",
            description: "Weekly Lawn Care Services for residential gardens",
            category: "Gardening",
            min_price: 20.0,
            max_price: 60.0,
            coordinates: Some((4.7110, -74.0721)),
            active: true,
            provider_id: "prov-bogota-01",
        },
        ListingRow {
            title: "House Cleaning",
            description: "Deep cleaning for apartments and offices",
            category: "Cleaning",
            min_price: 30.0,
            max_price: 90.0,
            coordinates: Some((6.2442, -75.5812)),
            active: true,
            provider_id: "prov-medellin-01",
        },
        ListingRow {
            title: "Guitar Lessons",
            description: "Private guitar lessons for beginners",
            category: "Education",
            min_price: 15.0,
            max_price: 40.0,
            coordinates: None,
            active: true,
            provider_id: "prov-online-01",
        },
    ];

    for (i, row) in data.iter().cycle().take(rows).enumerate() {
        write_row(file, i, row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn read_lines(file: &NamedTempFile) -> Vec<String> {
        let mut contents = String::new();
        std::fs::File::open(file.path())
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_minimal_data_has_header_and_rows() {
        let file = create_test_data(&TestDataConfig::minimal()).unwrap();
        let lines = read_lines(&file);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], LISTING_COLUMNS.join(","));
        assert!(lines[1].starts_with(&listing_id(0)));
    }

    #[test]
    fn test_realistic_data_respects_filters() {
        let file = create_test_data(&TestDataConfig::geolocated_only(30)).unwrap();
        let lines = read_lines(&file);

        assert_eq!(lines.len(), 31);
        for line in &lines[1..] {
            assert!(!line.contains(",false,"), "Inactive listing leaked: {line}");
            assert!(!line.contains(",,"), "Listing without coordinates leaked: {line}");
        }
    }

    #[test]
    fn test_listing_ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..500).map(listing_id).collect();
        assert_eq!(ids.len(), 500);
        assert_eq!(listing_id(0).len(), 36);
    }

    #[test]
    fn test_created_at_increases_with_row() {
        assert_eq!(created_at(0), "2025-01-01T00:00:00Z");
        assert!(created_at(1) > created_at(0));
    }
}
