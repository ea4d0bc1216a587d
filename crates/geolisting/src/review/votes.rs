//! Helpfulness votes on reviews.
//!
//! A voter holds at most one vote per review. Voting again replaces the
//! earlier vote instead of adding a second one.

use std::fmt;

use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Helpful,
    NotHelpful,
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Helpful => write!(f, "helpful"),
            Self::NotHelpful => write!(f, "not_helpful"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewVote {
    pub review_id: String,
    pub voter_id: String,
    pub vote_type: VoteType,
}

/// Votes keyed by `(review_id, voter_id)`.
#[derive(Debug, Clone, Default)]
pub struct ReviewVotes {
    votes: HashMap<(String, String), VoteType>,
}

impl ReviewVotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Record a vote, replacing any earlier vote by the same voter on the same review.
    ///
    /// Returns the replaced vote type.
    pub fn upsert(&mut self, review_id: &str, voter_id: &str, vote_type: VoteType) -> Option<VoteType> {
        self.votes
            .insert((review_id.to_string(), voter_id.to_string()), vote_type)
    }

    pub fn remove(&mut self, review_id: &str, voter_id: &str) -> Option<VoteType> {
        self.votes
            .remove(&(review_id.to_string(), voter_id.to_string()))
    }

    pub fn get(&self, review_id: &str, voter_id: &str) -> Option<ReviewVote> {
        self.votes
            .get(&(review_id.to_string(), voter_id.to_string()))
            .map(|vote_type| ReviewVote {
                review_id: review_id.to_string(),
                voter_id: voter_id.to_string(),
                vote_type: *vote_type,
            })
    }

    pub fn count(&self, review_id: &str, vote_type: VoteType) -> usize {
        self.votes
            .iter()
            .filter(|((id, _), vote)| id == review_id && **vote == vote_type)
            .count()
    }

    /// Drop every vote on `review_id`.
    pub fn clear_review(&mut self, review_id: &str) {
        self.votes.retain(|(id, _), _| id != review_id);
    }
}
