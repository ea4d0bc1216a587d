//! Search functionality for listing matching.
//!
//! This module contains the search pipeline: distance computation, attribute
//! predicates, radius filtering with proximity ranking, and the orchestration
//! that runs them in order.

pub use error::SearchError;
mod criteria;
pub mod distance;
mod geo;
mod predicate;
mod search_orchestration;

use error::Result;

pub use criteria::{DEFAULT_RADIUS_KM, SearchCriteria, SearchQuery};
pub use geo::{
    GeoRanking, MapBounds, RankedResult, SkippedRecordWarning, rank_by_distance, within_bounds,
};
pub use predicate::{RecordFilter, apply_predicates, build_filters};
pub use search_orchestration::{
    DEFAULT_MAX_RADIUS_KM, SearchConfig, SearchOutcome, bulk_listing_search_inner,
    listing_search_inner, search,
};

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum SearchError {
        #[error("Invalid search criteria: {0}")]
        InvalidCriteria(String),
        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }
    pub type Result<T> = std::result::Result<T, SearchError>;
}
