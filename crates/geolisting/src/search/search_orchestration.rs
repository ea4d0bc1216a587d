//! Search pipeline: attribute predicates first, then the geo stage.
//!
//! The order is fixed. The geo stage only ever sees records the predicate
//! stage kept, so a radius can narrow a result but never widen it.

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use super::{
    Result, SearchCriteria,
    criteria::DEFAULT_RADIUS_KM,
    geo::{GeoRanking, RankedResult, SkippedRecordWarning, rank_by_distance},
    predicate::apply_predicates,
};
use crate::{SearchConfigBuilder, record::SearchableRecord};

/// Largest radius accepted by default, in kilometres.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 500.0;

/// Configuration for listing search operations.
///
/// Use [`SearchConfigBuilder`] for presets and validated radius bounds.
///
/// ```rust
/// use geolisting::SearchConfig;
///
/// let config = SearchConfig::builder().limit(10).build();
/// assert_eq!(config.limit, Some(10));
/// assert_eq!(config.default_radius_km, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Radius used when a request gives a reference point but no radius
    pub default_radius_km: f64,
    /// Requests asking for a larger radius are rejected; `None` disables the check
    pub max_radius_km: Option<f64>,
    /// Maximum number of results to return after ranking
    pub limit: Option<usize>,
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: DEFAULT_RADIUS_KM,
            max_radius_km: Some(DEFAULT_MAX_RADIUS_KM),
            limit: None,
        }
    }
}

/// Ranked results together with the records the geo stage had to skip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<RankedResult>,
    pub skipped: Vec<SkippedRecordWarning>,
}

impl From<GeoRanking> for SearchOutcome {
    fn from(ranking: GeoRanking) -> Self {
        Self {
            results: ranking.results,
            skipped: ranking.skipped,
        }
    }
}

/// Run one search over `candidates`.
///
/// Fails only on invalid criteria. Malformed records are reported in
/// [`SearchOutcome::skipped`] and never abort the search.
#[instrument(name = "Listing Search", level = "debug", skip_all, fields(candidates = candidates.len()))]
pub fn listing_search_inner(
    candidates: &[SearchableRecord],
    criteria: &SearchCriteria,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    criteria.validate_with_config(config)?;

    let filtered = apply_predicates(candidates, criteria);
    let mut outcome: SearchOutcome =
        rank_by_distance(filtered, criteria.reference_point, criteria.radius_km).into();

    if let Some(limit) = config.limit {
        outcome.results.truncate(limit);
    }

    debug!(
        results = outcome.results.len(),
        skipped = outcome.skipped.len(),
        "Listing search complete"
    );
    Ok(outcome)
}

/// Run a search with default configuration and return only the ranked results.
pub fn search(
    candidates: &[SearchableRecord],
    criteria: &SearchCriteria,
) -> Result<Vec<RankedResult>> {
    listing_search_inner(candidates, criteria, &SearchConfig::default())
        .map(|outcome| outcome.results)
}

/// Run many independent searches over the same candidates in parallel.
///
/// Output order follows `all_criteria`. The first invalid criteria fails the batch.
pub fn bulk_listing_search_inner(
    candidates: &[SearchableRecord],
    all_criteria: &[SearchCriteria],
    config: &SearchConfig,
) -> Result<Vec<SearchOutcome>> {
    let t_start = std::time::Instant::now();
    info!(
        "Starting Bulk Listing Search for {} criteria over {} candidates.",
        all_criteria.len(),
        candidates.len()
    );

    let outcomes = all_criteria
        .par_iter()
        .map(|criteria| listing_search_inner(candidates, criteria, config))
        .collect::<Result<Vec<_>>>()?;

    info!(
        elapsed = ?t_start.elapsed(),
        "Bulk Listing Search complete"
    );
    Ok(outcomes)
}
