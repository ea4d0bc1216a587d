use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

pub use super::error::{DataError, Result};

pub const LISTINGS_PARQUET: &str = "listings.parquet";
pub const LISTINGS_CSV: &str = "listings.csv";

/// Column names every listing table must carry, in record order.
pub const LISTING_COLUMNS: [&str; 11] = [
    "id",
    "title",
    "description",
    "category",
    "min_price",
    "max_price",
    "latitude",
    "longitude",
    "status",
    "provider_id",
    "created_at",
];

const LISTING_SCHEMA: [(PlSmallStr, DataType); 11] = [
    (PlSmallStr::from_static("id"), DataType::String),
    (PlSmallStr::from_static("title"), DataType::String),
    (PlSmallStr::from_static("description"), DataType::String),
    (PlSmallStr::from_static("category"), DataType::String),
    (PlSmallStr::from_static("min_price"), DataType::Float64),
    (PlSmallStr::from_static("max_price"), DataType::Float64),
    (PlSmallStr::from_static("latitude"), DataType::Float64),
    (PlSmallStr::from_static("longitude"), DataType::Float64),
    (PlSmallStr::from_static("status"), DataType::Boolean),
    (PlSmallStr::from_static("provider_id"), DataType::String),
    (PlSmallStr::from_static("created_at"), DataType::String),
];

/// Locate the listing table inside `dir`.
///
/// A Parquet snapshot wins over a CSV export when both exist.
#[instrument(name = "Find listing table", level = "info")]
pub fn find_listing_file(dir: &Path) -> Result<PathBuf> {
    info!("Checking for listing data in: {}", dir.display());

    let parquet_path = dir.join(LISTINGS_PARQUET);
    if parquet_path.exists() {
        return Ok(parquet_path);
    }
    let csv_path = dir.join(LISTINGS_CSV);
    if csv_path.exists() {
        return Ok(csv_path);
    }

    warn!("Listing data files not found");
    Err(DataError::RequiredFilesNotFound(dir.to_path_buf()))
}

/// Read a comma separated listing export with a header row.
pub fn get_listings_csv_lf(path: impl AsRef<Path>) -> Result<LazyFrame> {
    let lf = LazyCsvReader::new(path)
        .with_separator(b',')
        .with_has_header(true)
        .with_schema(Some(Schema::from_iter(LISTING_SCHEMA).into()))
        .finish()?;
    Ok(normalize_listings(lf))
}

/// Scan a Parquet listing snapshot, checking that the expected columns are present.
pub fn get_listings_parquet_lf(path: impl AsRef<Path>) -> Result<LazyFrame> {
    let lf = LazyFrame::scan_parquet(path, Default::default())?;
    ensure_listing_columns(&lf)?;
    Ok(normalize_listings(lf))
}

pub fn ensure_listing_columns(lf: &LazyFrame) -> Result<()> {
    let mut lf = lf.clone();
    let schema = lf.collect_schema()?;
    for name in LISTING_COLUMNS {
        if !schema.contains(name) {
            return Err(DataError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Cast to the listing schema, then fill the nullable columns that records
/// treat as non-optional.
fn normalize_listings(lf: LazyFrame) -> LazyFrame {
    lf.select(LISTING_SCHEMA.map(|(name, dtype)| col(name).cast(dtype)))
        .with_columns([
            col("description").fill_null(lit("")),
            col("category").fill_null(lit("")),
            col("min_price").fill_null(lit(0.0f64)),
            col("max_price").fill_null(lit(0.0f64)),
            col("status").fill_null(lit(false)),
        ])
}

#[cfg(test)]
mod tests {
    use super::super::test_data::{TestDataConfig, create_test_data};
    use super::*;
    use crate::tests_utils::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_get_listings_csv_lf_actual_parsing() {
        let test_file = create_test_data(&TestDataConfig::minimal()).unwrap();

        let df = get_listings_csv_lf(test_file.path())
            .unwrap()
            .collect()
            .unwrap();

        assert_eq!(df.height(), 3);
        assert_has_columns(&df, &LISTING_COLUMNS);
        assert_column_type(&df, "min_price", &DataType::Float64);
        assert_column_type(&df, "latitude", &DataType::Float64);
        assert_column_type(&df, "status", &DataType::Boolean);
        assert_no_nulls_in_column(&df, "id");
        assert_no_nulls_in_column(&df, "status");

        let titles: Vec<Option<&str>> = df
            .column("title")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert!(titles.contains(&Some("Lawn Mowing")));
    }

    #[test]
    fn test_missing_coordinates_parse_as_null() {
        let test_file = create_test_data(&TestDataConfig::minimal()).unwrap();
        let df = get_listings_csv_lf(test_file.path())
            .unwrap()
            .collect()
            .unwrap();

        let latitudes: Vec<Option<f64>> = df
            .column("latitude")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert!(latitudes.contains(&None), "Minimal data has a listing without coordinates");
    }

    #[test]
    fn test_nullable_columns_are_filled() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", LISTING_COLUMNS.join(",")).unwrap();
        writeln!(file, "abc,Only a title,,,,,,,,,").unwrap();
        file.flush().unwrap();

        let df = get_listings_csv_lf(file.path()).unwrap().collect().unwrap();
        assert_eq!(df.height(), 1);
        assert_no_nulls_in_column(&df, "description");
        assert_no_nulls_in_column(&df, "category");
        assert_no_nulls_in_column(&df, "min_price");
        assert_no_nulls_in_column(&df, "status");
        assert_eq!(
            df.column("status").unwrap().bool().unwrap().get(0),
            Some(false)
        );
    }

    #[test]
    fn test_parquet_integer_columns_are_cast_to_schema() {
        let mut df = df![
            "id" => ["a", "b"],
            "title" => ["Lawn Mowing", "House Painting"],
            "description" => ["", ""],
            "category" => ["Gardening", "Painting"],
            "min_price" => [50i64, 300],
            "max_price" => [120i64, 900],
            "latitude" => [4i64, 6],
            "longitude" => [-74i64, -75],
            "status" => [true, false],
            "provider_id" => ["p1", "p2"],
            "created_at" => ["2025-01-01T00:00:00Z", "2025-01-02T00:00:00Z"],
        ]
        .unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(LISTINGS_PARQUET);
        let mut file = std::fs::File::create(&path).unwrap();
        ParquetWriter::new(&mut file).finish(&mut df).unwrap();

        let df = get_listings_parquet_lf(&path).unwrap().collect().unwrap();
        assert_column_type(&df, "min_price", &DataType::Float64);
        assert_column_type(&df, "max_price", &DataType::Float64);
        assert_column_type(&df, "latitude", &DataType::Float64);
        assert_column_type(&df, "longitude", &DataType::Float64);
        assert_eq!(df.column("max_price").unwrap().f64().unwrap().get(1), Some(900.0));
    }

    #[test]
    fn test_find_listing_file_prefers_parquet() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            find_listing_file(dir.path()),
            Err(DataError::RequiredFilesNotFound(_))
        ));

        std::fs::write(dir.path().join(LISTINGS_CSV), "").unwrap();
        assert_eq!(
            find_listing_file(dir.path()).unwrap(),
            dir.path().join(LISTINGS_CSV)
        );

        std::fs::write(dir.path().join(LISTINGS_PARQUET), "").unwrap();
        assert_eq!(
            find_listing_file(dir.path()).unwrap(),
            dir.path().join(LISTINGS_PARQUET)
        );
    }

    #[test]
    fn test_ensure_listing_columns_reports_missing() {
        let lf = df![
            "id" => ["a"],
            "title" => ["t"],
        ]
        .unwrap()
        .lazy();

        match ensure_listing_columns(&lf) {
            Err(DataError::MissingColumn(name)) => assert_eq!(name, "description"),
            other => panic!("Expected MissingColumn error, got {other:?}"),
        }
    }
}
