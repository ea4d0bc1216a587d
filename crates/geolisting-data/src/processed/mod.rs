use super::error::{DataError, Result};
use super::raw::{self, LISTINGS_PARQUET};
use once_cell::sync::OnceCell;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::NamedTempFile;
use tracing::{info, info_span, instrument};

const SNAPSHOT_METADATA_JSON: &str = "listings_metadata.json";

/// Where a [`ListingData`] reads its listing table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    Csv(PathBuf),
    Parquet(PathBuf),
    /// Already materialized in memory
    Frame,
}

impl ListingSource {
    /// Pick the reader from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => Ok(Self::Csv(path)),
            Some("parquet") => Ok(Self::Parquet(path)),
            other => Err(DataError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Written next to a Parquet snapshot so later loads can report where the data came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub source: String,
    pub generated_at: String,
    pub rows: usize,
    pub active_rows: usize,
}

/// Lazily loaded listing table.
///
/// The table is read from its source the first time it is needed and kept in
/// memory afterwards. Clones share nothing but the source description.
#[derive(Clone)]
pub struct ListingData {
    source: ListingSource,
    listings_df: OnceCell<LazyFrame>,
    // Keeps generated fixtures alive for as long as the data is
    _fixture: Option<Arc<NamedTempFile>>,
}

impl std::fmt::Debug for ListingData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingData")
            .field("source", &self.source)
            .field("loaded", &self.listings_df.get().is_some())
            .finish()
    }
}

impl ListingData {
    /// Load listings from the configured data directory.
    ///
    /// Test builds read a generated fixture instead.
    pub fn new() -> Result<Self> {
        if let Some(fixture) = Self::test_fixture()? {
            return Ok(fixture);
        }
        Self::from_dir(crate::get_data_dir())
    }

    #[cfg(any(test, feature = "test_data"))]
    fn test_fixture() -> Result<Option<Self>> {
        if crate::should_use_test_data() {
            return Self::from_test_data(&crate::get_test_data_config()).map(Some);
        }
        Ok(None)
    }

    #[cfg(not(any(test, feature = "test_data")))]
    fn test_fixture() -> Result<Option<Self>> {
        Ok(None)
    }

    /// Load the listing table found in `dir` (Parquet snapshot first, then CSV export).
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let path = raw::find_listing_file(dir)?;
        Self::from_path(path)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::from_source(ListingSource::from_path(path)?))
    }

    pub fn from_source(source: ListingSource) -> Self {
        Self {
            source,
            listings_df: OnceCell::new(),
            _fixture: None,
        }
    }

    /// Wrap a frame that is already in memory.
    pub fn from_frame(df: DataFrame) -> Result<Self> {
        let lf = df.lazy();
        raw::ensure_listing_columns(&lf)?;
        Ok(Self {
            source: ListingSource::Frame,
            listings_df: OnceCell::with_value(lf),
            _fixture: None,
        })
    }

    /// Generate a CSV fixture and load it.
    pub fn from_test_data(config: &crate::TestDataConfig) -> Result<Self> {
        let file = crate::create_test_data(config)?;
        Ok(Self {
            source: ListingSource::Csv(file.path().to_path_buf()),
            listings_df: OnceCell::new(),
            _fixture: Some(Arc::new(file)),
        })
    }

    pub fn source(&self) -> &ListingSource {
        &self.source
    }

    fn get_data(source: &ListingSource) -> Result<LazyFrame> {
        info!(
            source = ?source,
            "Loading and collecting into memory for the first time..."
        );
        let t_load = std::time::Instant::now();
        let lf = match source {
            ListingSource::Csv(path) => raw::get_listings_csv_lf(path)?,
            ListingSource::Parquet(path) => raw::get_listings_parquet_lf(path)?,
            // Frames are stored on construction
            ListingSource::Frame => return Err(DataError::UnsupportedFormat("frame".into())),
        };
        let df = lf.collect()?;
        info!(
            rows = df.height(),
            time_collected = ?t_load.elapsed(),
            "Collected into memory"
        );
        Ok(df.lazy())
    }

    /// Every listing, in storage order.
    pub fn listings_df(&self) -> Result<&LazyFrame> {
        self.listings_df
            .get_or_try_init(|| Self::get_data(&self.source))
    }

    /// Listings ready to hand to the search core.
    ///
    /// `active_only` applies the lifecycle filter at the storage layer. It only
    /// saves work: the search core checks the flag again. Rows come back newest
    /// first (by `created_at`), rows without a timestamp last.
    #[instrument(name = "Prepare candidate listings", level = "debug", skip(self))]
    pub fn candidates_df(&self, active_only: bool) -> Result<DataFrame> {
        let mut lf = self.listings_df()?.clone();
        if active_only {
            lf = lf.filter(col("status").eq(lit(true)));
        }
        let df = newest_first(lf).collect()?;
        Ok(df)
    }

    pub fn height(&self) -> Result<usize> {
        Ok(self.listings_df()?.clone().collect()?.height())
    }

    /// Write the listing table as a Parquet snapshot plus a JSON metadata file into `dir`.
    #[instrument(name = "Save listing snapshot", level = "info", skip(self))]
    pub fn save_snapshot(&self, dir: &Path) -> Result<SnapshotMetadata> {
        let _span = info_span!("Write Parquet").entered();
        std::fs::create_dir_all(dir)?;
        let sink_time = std::time::Instant::now();

        let mut df = self.listings_df()?.clone().collect()?;
        let active_rows = df
            .clone()
            .lazy()
            .filter(col("status").eq(lit(true)))
            .collect()?
            .height();

        let path = dir.join(LISTINGS_PARQUET);
        let mut file = std::fs::File::create(&path)?;
        ParquetWriter::new(&mut file).finish(&mut df)?;

        let metadata = SnapshotMetadata {
            source: format!("{:?}", self.source),
            generated_at: chrono::Utc::now().to_rfc3339(),
            rows: df.height(),
            active_rows,
        };
        std::fs::write(
            dir.join(SNAPSHOT_METADATA_JSON),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        info!(
            path = ?path.file_stem(),
            rows = metadata.rows,
            sink_time = ?sink_time.elapsed(),
            "Saved to parquet file"
        );
        Ok(metadata)
    }

    /// Read the metadata written by [`Self::save_snapshot`], if any.
    pub fn load_snapshot_metadata(dir: &Path) -> Result<Option<SnapshotMetadata>> {
        let path = dir.join(SNAPSHOT_METADATA_JSON);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

/// Sort by `created_at` descending, keeping storage order among equal timestamps.
pub fn newest_first(lf: LazyFrame) -> LazyFrame {
    lf.sort(
        ["created_at"],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )
}
