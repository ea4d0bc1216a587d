use once_cell::sync::Lazy;
use std::path::PathBuf;

pub mod processed;
pub mod raw;
pub mod test_data;
#[cfg(test)]
pub(crate) mod tests_utils;

pub const DATA_DIR_DEFAULT: &str = "./geolisting_data";

/// Centralized function to determine if we should use test data.
pub fn should_use_test_data() -> bool {
    let is_test_environment = cfg!(test) || cfg!(doctest);

    #[cfg(feature = "test_data")]
    let explicit_test_data = std::env::var("USE_TEST_DATA")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    #[cfg(not(feature = "test_data"))]
    let explicit_test_data = false;

    is_test_environment || explicit_test_data
}

/// Get the appropriate test data config based on environment.
#[cfg(any(test, doctest, feature = "test_data"))]
pub fn get_test_data_config() -> test_data::TestDataConfig {
    if cfg!(doctest) {
        test_data::TestDataConfig::minimal()
    } else {
        match std::env::var("TEST_DATA_SIZE").as_deref() {
            Ok("sample") => test_data::TestDataConfig::sample(),
            _ => test_data::TestDataConfig::minimal(),
        }
    }
}

/// Directory holding the listing table.
///
/// Test runs never read it: `ListingData::new` loads a generated fixture instead.
pub static DATA_DIR: Lazy<PathBuf> =
    Lazy::new(|| resolve_data_dir(std::env::var("GEOLISTING_DATA_DIR").ok()));

fn resolve_data_dir(configured: Option<String>) -> PathBuf {
    PathBuf::from(configured.unwrap_or_else(|| DATA_DIR_DEFAULT.to_string()))
}

pub fn get_data_dir() -> &'static std::path::Path {
    DATA_DIR.as_path()
}

mod error {
    use polars::prelude::PolarsError;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DataError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Polars error: {0}")]
        Polars(#[from] PolarsError),
        #[error("Serialization error: {0}")]
        Serde(#[from] serde_json::Error),
        #[error("Required listing file not found in {0}")]
        RequiredFilesNotFound(std::path::PathBuf),
        #[error("Unsupported listing file format: {0}")]
        UnsupportedFormat(String),
        #[error("Listing table is missing column `{0}`")]
        MissingColumn(String),
    }

    pub type Result<T> = std::result::Result<T, DataError>;
}

pub use error::{DataError, Result};

// Re-export main types
pub use processed::{ListingData, ListingSource, SnapshotMetadata};
pub use raw::LISTING_COLUMNS;
pub use test_data::{TestDataConfig, create_test_data};
