//! Geolisting - Location-Filtered Listing Search
//!
//! Geolisting searches a catalogue of service listings by free text, category,
//! price range and proximity to a reference point. Matching listings come back
//! ranked nearest first, each annotated with its great-circle distance.
//!
//! # Quick Start
//!
//! ```rust
//! use geolisting::{GeoPoint, ListingSearcher, SearchCriteria, data::TestDataConfig};
//!
//! // Create a searcher over a generated sample catalogue
//! let searcher = ListingSearcher::from_test_data(&TestDataConfig::sample())?;
//!
//! // Text search, no location
//! let results = searcher.search(&SearchCriteria::new().text("lawn"))?;
//! assert!(!results.is_empty());
//!
//! // Everything within 10 km of central Bogotá, nearest first
//! let criteria = SearchCriteria::new().near(GeoPoint::new(4.711, -74.0721), 10.0);
//! for result in searcher.search(&criteria)? {
//!     println!("{} ({:.1} km)", result.record.title, result.distance_km.unwrap_or_default());
//! }
//! # Ok::<(), geolisting::error::GeoListingError>(())
//! ```
//!
//! # Pipeline
//!
//! Every search runs two stages in a fixed order:
//!
//! 1. **Predicates**: active listings only, then text, category and price range.
//! 2. **Geo stage**: with a reference point, listings outside the radius are
//!    dropped and the rest sorted by distance. Without one, order is kept.
//!
//! Listings with malformed coordinates or prices are skipped with a warning
//! instead of failing the search. [`ListingSearcher::search_with_report`]
//! returns them alongside the results.
//!
//! # Reviews
//!
//! [`ReviewBook`] keeps the reviews of listings with their helpfulness votes
//! and computes per-listing rating statistics. See [`review`].
//!
//! # Data
//!
//! Listings are read from a `listings.parquet` snapshot or `listings.csv` export
//! in the directory named by `GEOLISTING_DATA_DIR` (default `./geolisting_data`).
//! See [`data::ListingData`].
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
pub mod error;
mod record;
pub mod review;
mod search;

pub use core::{ListingSearcher, SHORT_ID_LEN};

pub use config::SearchConfigBuilder;
pub use geolisting_data as data;
pub use polars;
pub use record::{CoordinateIssue, GeoPoint, RecordError, RecordIssue, SearchableRecord};
pub use review::{Review, ReviewBook, ReviewError, ReviewSort, ReviewStats, VoteType};
pub use search::{
    DEFAULT_MAX_RADIUS_KM, DEFAULT_RADIUS_KM, MapBounds, RankedResult, RecordFilter,
    SearchConfig, SearchCriteria, SearchError, SearchOutcome, SearchQuery, SkippedRecordWarning,
    distance::{EARTH_RADIUS_KM, haversine_km},
    search,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Geolisting library.
///
/// `RUST_LOG` takes precedence over `level` when set. Safe to call more than
/// once; only the first call installs the subscriber.
///
/// # Examples
///
/// ```rust
/// use geolisting::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), geolisting::error::GeoListingError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::GeoListingError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("polars=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
