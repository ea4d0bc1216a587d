//! Core listing search functionality for the geolisting library.
//!
//! This module provides the main [`ListingSearcher`] interface. A searcher owns
//! one candidate set of listings (typically loaded once from a listing table)
//! and answers searches, map queries and lookups against it.
//!
//! # Quick Start
//!
//! ```rust
//! use geolisting::{GeoPoint, ListingSearcher, SearchCriteria, SearchableRecord};
//!
//! let searcher = ListingSearcher::new(vec![
//!     SearchableRecord::new("a", "Lawn Mowing", "Weekly lawn care", "Gardening")
//!         .with_prices(20.0, 60.0)
//!         .with_location(4.711, -74.0721),
//! ]);
//!
//! let criteria = SearchCriteria::new()
//!     .text("lawn")
//!     .near(GeoPoint::new(4.7, -74.07), 10.0);
//! let results = searcher.search(&criteria)?;
//! assert_eq!(results.len(), 1);
//! # Ok::<(), geolisting::error::GeoListingError>(())
//! ```

use std::sync::Arc;

use ahash::AHashMap as HashMap;
use geolisting_data::{ListingData, TestDataConfig};
use tracing::{debug, info, info_span, instrument};

use crate::{
    error::GeoListingError,
    record::SearchableRecord,
    search::{
        MapBounds, RankedResult, SearchConfig, SearchCriteria, SearchOutcome, SearchQuery,
        bulk_listing_search_inner, listing_search_inner, within_bounds,
    },
};

/// Length of the shortened listing ids used in shared links.
pub const SHORT_ID_LEN: usize = 8;

/// The main listing searcher.
///
/// Cloning is cheap: the candidate set and id index are shared.
#[derive(Debug, Clone)]
pub struct ListingSearcher {
    listings: Arc<[SearchableRecord]>,
    by_id: Arc<HashMap<String, usize>>,
}

impl ListingSearcher {
    /// Create a searcher over records already in memory.
    ///
    /// The given order is the candidate order searches start from.
    pub fn new(listings: Vec<SearchableRecord>) -> Self {
        let by_id = listings
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.id.clone(), idx))
            .collect::<HashMap<_, _>>();

        Self {
            listings: listings.into(),
            by_id: Arc::new(by_id),
        }
    }

    /// Load every listing from `data`, newest first.
    ///
    /// Inactive listings are kept so that provider views can list them; the
    /// search pipeline filters them out on its own.
    #[instrument(name = "Create ListingSearcher from data", level = "info", skip_all)]
    pub fn from_data(data: &ListingData) -> Result<Self, GeoListingError> {
        let t_init = std::time::Instant::now();

        let listings = {
            let _span = info_span!("Materialize listings").entered();
            let df = data.candidates_df(false)?;
            SearchableRecord::from_df(&df)?
        };

        info!(
            listings = listings.len(),
            elapsed_seconds = ?t_init.elapsed(),
            "ListingSearcher initialization complete"
        );
        Ok(Self::new(listings))
    }

    /// Load listings from the configured data directory.
    pub fn initialize() -> Result<Self, GeoListingError> {
        let data = ListingData::new()?;
        Self::from_data(&data)
    }

    /// Create a searcher over a generated fixture.
    pub fn from_test_data(config: &TestDataConfig) -> Result<Self, GeoListingError> {
        let data = ListingData::from_test_data(config)?;
        Self::from_data(&data)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Every listing, active or not, in candidate order.
    pub fn listings(&self) -> &[SearchableRecord] {
        &self.listings
    }

    // === Search ===

    /// Search with the default configuration.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RankedResult>, GeoListingError> {
        self.search_with_config(criteria, &SearchConfig::default())
    }

    /// Search with a custom configuration.
    pub fn search_with_config(
        &self,
        criteria: &SearchCriteria,
        config: &SearchConfig,
    ) -> Result<Vec<RankedResult>, GeoListingError> {
        self.search_with_report(criteria, config)
            .map(|outcome| outcome.results)
    }

    /// Search and also return the records skipped as malformed.
    pub fn search_with_report(
        &self,
        criteria: &SearchCriteria,
        config: &SearchConfig,
    ) -> Result<SearchOutcome, GeoListingError> {
        listing_search_inner(&self.listings, criteria, config).map_err(From::from)
    }

    /// Search from the query-string form of a request.
    pub fn search_query(
        &self,
        query: SearchQuery,
        config: &SearchConfig,
    ) -> Result<Vec<RankedResult>, GeoListingError> {
        let criteria = query.into_criteria(config)?;
        self.search_with_config(&criteria, config)
    }

    /// Run several independent searches in parallel.
    ///
    /// Results come back in the order of `all_criteria`.
    pub fn search_bulk(
        &self,
        all_criteria: &[SearchCriteria],
        config: &SearchConfig,
    ) -> Result<Vec<Vec<RankedResult>>, GeoListingError> {
        Ok(bulk_listing_search_inner(&self.listings, all_criteria, config)?
            .into_iter()
            .map(|outcome| outcome.results)
            .collect())
    }

    // === Listing views ===

    /// Active listings with coordinates, optionally inside `bounds`.
    pub fn listings_for_map(&self, bounds: Option<MapBounds>) -> Vec<&SearchableRecord> {
        let listings = within_bounds(&self.listings, bounds);
        debug!(bounds = ?bounds, found = listings.len(), "Map listings");
        listings
    }

    /// Active listings in exactly `category`.
    pub fn listings_by_category(&self, category: &str) -> Vec<&SearchableRecord> {
        self.listings
            .iter()
            .filter(|record| record.active && record.category == category)
            .collect()
    }

    /// All listings of a provider, including inactive ones.
    pub fn listings_by_provider(&self, provider_id: &str) -> Vec<&SearchableRecord> {
        self.listings
            .iter()
            .filter(|record| record.provider_id.as_deref() == Some(provider_id))
            .collect()
    }

    /// Find an active listing by id.
    ///
    /// An id of [`SHORT_ID_LEN`] characters without hyphens is a short id and
    /// matches the first listing whose id, hyphens removed, starts with it
    /// (ignoring ASCII case).
    pub fn find_by_id(&self, id: &str) -> Option<&SearchableRecord> {
        let record = if is_short_id(id) {
            self.listings
                .iter()
                .find(|record| record.active && matches_short_id(&record.id, id))
        } else {
            self.by_id
                .get(id)
                .map(|&idx| &self.listings[idx])
                .filter(|record| record.active)
        };
        debug!(id, found = record.is_some(), "Listing lookup");
        record
    }
}

fn is_short_id(id: &str) -> bool {
    id.len() == SHORT_ID_LEN && !id.contains('-')
}

fn matches_short_id(full_id: &str, short_id: &str) -> bool {
    full_id
        .chars()
        .filter(|c| *c != '-')
        .take(SHORT_ID_LEN)
        .zip(short_id.chars())
        .filter(|(a, b)| a.eq_ignore_ascii_case(b))
        .count()
        == SHORT_ID_LEN
}
