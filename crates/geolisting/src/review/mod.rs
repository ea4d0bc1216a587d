//! Reviews of listings: rating statistics, helpfulness votes and paging.
//!
//! [`ReviewBook`] holds the reviews and votes of a catalogue in memory and
//! enforces the one-review-per-reviewer and one-vote-per-voter rules.

mod stats;
mod votes;

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use error::ReviewError;
use error::Result;
pub use stats::ReviewStats;
pub use votes::{ReviewVote, ReviewVotes, VoteType};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
/// Largest page size `reviews_for` accepts.
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub service_id: String,
    pub reviewer_id: String,
    pub rating: u8,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        id: impl Into<String>,
        service_id: impl Into<String>,
        reviewer_id: impl Into<String>,
        rating: u8,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ReviewError::InvalidRating(rating));
        }
        Ok(Self {
            id: id.into(),
            service_id: service_id.into(),
            reviewer_id: reviewer_id.into(),
            rating,
            title: title.into(),
            comment: None,
            verified: false,
            created_at,
        })
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Order of a review listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    RatingHigh,
    RatingLow,
    Helpful,
}

/// One page of a service's reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage<'a> {
    pub reviews: Vec<&'a Review>,
    pub total_count: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewBook {
    reviews: Vec<Review>,
    votes: ReviewVotes,
}

impl ReviewBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Add a review. A reviewer can review each service once.
    #[instrument(name = "Add review", level = "debug", skip_all, fields(review_id = %review.id))]
    pub fn add(&mut self, review: Review) -> Result<&Review> {
        if self.reviews.iter().any(|r| {
            r.id == review.id
                || (r.service_id == review.service_id && r.reviewer_id == review.reviewer_id)
        }) {
            return Err(ReviewError::AlreadyReviewed {
                service_id: review.service_id,
                reviewer_id: review.reviewer_id,
            });
        }
        self.reviews.push(review);
        Ok(&self.reviews[self.reviews.len() - 1])
    }

    /// Remove a review written by `reviewer_id`, together with its votes.
    pub fn remove(&mut self, review_id: &str, reviewer_id: &str) -> bool {
        let before = self.reviews.len();
        self.reviews
            .retain(|r| !(r.id == review_id && r.reviewer_id == reviewer_id));
        let removed = self.reviews.len() < before;
        if removed {
            self.votes.clear_review(review_id);
        }
        debug!(review_id, removed, "Remove review");
        removed
    }

    pub fn get(&self, review_id: &str) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == review_id)
    }

    pub fn stats(&self, service_id: &str) -> ReviewStats {
        ReviewStats::from_ratings(
            self.reviews
                .iter()
                .filter(|r| r.service_id == service_id)
                .map(|r| r.rating),
        )
    }

    /// A page of a service's reviews. Pages start at 1.
    pub fn reviews_for(
        &self,
        service_id: &str,
        sort: ReviewSort,
        page: usize,
        limit: usize,
    ) -> Result<ReviewPage<'_>> {
        if page == 0 || limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ReviewError::InvalidPage { page, limit });
        }

        let mut reviews: Vec<&Review> = self
            .reviews
            .iter()
            .filter(|r| r.service_id == service_id)
            .collect();
        match sort {
            ReviewSort::Newest => reviews.sort_by_key(|r| Reverse(r.created_at)),
            ReviewSort::Oldest => reviews.sort_by_key(|r| r.created_at),
            ReviewSort::RatingHigh => {
                reviews.sort_by_key(|r| (Reverse(r.rating), Reverse(r.created_at)));
            }
            ReviewSort::RatingLow => reviews.sort_by_key(|r| (r.rating, Reverse(r.created_at))),
            ReviewSort::Helpful => reviews
                .sort_by_key(|r| (Reverse(self.helpful_count(&r.id)), Reverse(r.created_at))),
        }

        let total_count = reviews.len();
        let offset = (page - 1).saturating_mul(limit);
        let has_more = offset.saturating_add(limit) < total_count;
        let reviews = reviews.into_iter().skip(offset).take(limit).collect();

        Ok(ReviewPage {
            reviews,
            total_count,
            has_more,
        })
    }

    /// A reviewer's reviews, newest first.
    pub fn reviews_by(&self, reviewer_id: &str) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self
            .reviews
            .iter()
            .filter(|r| r.reviewer_id == reviewer_id)
            .collect();
        reviews.sort_by_key(|r| Reverse(r.created_at));
        reviews
    }

    // === Votes ===

    /// Vote on a review; a later vote by the same voter replaces the earlier one.
    ///
    /// Returns the stored vote and the vote type it replaced.
    #[instrument(name = "Vote on review", level = "debug", skip(self))]
    pub fn vote(
        &mut self,
        review_id: &str,
        voter_id: &str,
        vote_type: VoteType,
    ) -> Result<(ReviewVote, Option<VoteType>)> {
        if self.get(review_id).is_none() {
            return Err(ReviewError::ReviewNotFound(review_id.to_string()));
        }
        let previous = self.votes.upsert(review_id, voter_id, vote_type);
        let vote = ReviewVote {
            review_id: review_id.to_string(),
            voter_id: voter_id.to_string(),
            vote_type,
        };
        Ok((vote, previous))
    }

    pub fn remove_vote(&mut self, review_id: &str, voter_id: &str) -> Option<VoteType> {
        self.votes.remove(review_id, voter_id)
    }

    pub fn vote_of(&self, review_id: &str, voter_id: &str) -> Option<ReviewVote> {
        self.votes.get(review_id, voter_id)
    }

    pub fn helpful_count(&self, review_id: &str) -> usize {
        self.votes.count(review_id, VoteType::Helpful)
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ReviewError {
        #[error("Rating {0} is outside 1 to 5")]
        InvalidRating(u8),
        #[error("Reviewer {reviewer_id} has already reviewed service {service_id}")]
        AlreadyReviewed {
            service_id: String,
            reviewer_id: String,
        },
        #[error("Review {0} not found")]
        ReviewNotFound(String),
        #[error("Invalid page {page} with limit {limit}")]
        InvalidPage { page: usize, limit: usize },
    }
    pub type Result<T> = std::result::Result<T, ReviewError>;
}
