//! Attribute filtering of candidate listings.
//!
//! The criteria are turned into an ordered list of [`RecordFilter`]s and a
//! record survives only if every filter accepts it. The lifecycle filter is
//! always first and is never optional: storage may already have dropped
//! inactive listings, but nothing here relies on it.

use std::fmt;

use tracing::{debug, instrument};

use super::SearchCriteria;
use crate::record::SearchableRecord;

/// A single pure test over a record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFilter {
    /// `record.active`
    Active,
    /// Lowercased fragment found in title, description or category
    Text(String),
    /// Exact category equality
    Category(String),
    /// `record.max_price >= floor`
    MinPrice(f64),
    /// `record.min_price <= ceiling`
    MaxPrice(f64),
}

impl RecordFilter {
    pub fn matches(&self, record: &SearchableRecord) -> bool {
        match self {
            Self::Active => record.active,
            Self::Text(needle) => [&record.title, &record.description, &record.category]
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
            Self::Category(category) => record.category == *category,
            Self::MinPrice(floor) => record.max_price >= *floor,
            Self::MaxPrice(ceiling) => record.min_price <= *ceiling,
        }
    }
}

impl fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Text(needle) => write!(f, "text ~ \"{needle}\""),
            Self::Category(category) => write!(f, "category == \"{category}\""),
            Self::MinPrice(floor) => write!(f, "max_price >= {floor}"),
            Self::MaxPrice(ceiling) => write!(f, "min_price <= {ceiling}"),
        }
    }
}

/// Filters implied by `criteria`, in application order.
pub fn build_filters(criteria: &SearchCriteria) -> Vec<RecordFilter> {
    let mut filters = vec![RecordFilter::Active];

    if let Some(text) = criteria.effective_text_query() {
        filters.push(RecordFilter::Text(text.to_lowercase()));
    }
    if let Some(category) = criteria.effective_category() {
        filters.push(RecordFilter::Category(category.to_string()));
    }
    if let Some(floor) = criteria.min_price.filter(|floor| *floor > 0.0) {
        filters.push(RecordFilter::MinPrice(floor));
    }
    if let Some(ceiling) = criteria.max_price.filter(|ceiling| ceiling.is_finite()) {
        filters.push(RecordFilter::MaxPrice(ceiling));
    }

    filters
}

/// Records accepted by every filter, in candidate order.
#[instrument(name = "Apply predicates", level = "debug", skip_all, fields(candidates = candidates.len()))]
pub fn apply_predicates<'a>(
    candidates: &'a [SearchableRecord],
    criteria: &SearchCriteria,
) -> Vec<&'a SearchableRecord> {
    let filters = build_filters(criteria);
    let survivors: Vec<_> = candidates
        .iter()
        .filter(|record| filters.iter().all(|filter| filter.matches(record)))
        .collect();

    debug!(
        filters = %filters.iter().map(ToString::to_string).collect::<Vec<_>>().join(" AND "),
        survivors = survivors.len(),
        "Predicate stage complete"
    );
    survivors
}
