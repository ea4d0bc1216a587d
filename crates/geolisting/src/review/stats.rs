//! Aggregate rating statistics for one service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    /// Mean rating rounded to one decimal, `0.0` without reviews
    pub average_rating: f64,
    /// Count per rating; every rating from 1 to 5 has an entry
    pub rating_distribution: BTreeMap<u8, usize>,
}

impl Default for ReviewStats {
    fn default() -> Self {
        Self {
            total_reviews: 0,
            average_rating: 0.0,
            rating_distribution: (MIN_RATING..=MAX_RATING).map(|r| (r, 0)).collect(),
        }
    }
}

impl ReviewStats {
    /// Ratings outside 1 to 5 are ignored; `Review::new` never produces them.
    pub fn from_ratings(ratings: impl IntoIterator<Item = u8>) -> Self {
        let mut stats = Self::default();
        let mut sum = 0u64;

        for rating in ratings {
            if let Some(count) = stats.rating_distribution.get_mut(&rating) {
                *count += 1;
                stats.total_reviews += 1;
                sum += u64::from(rating);
            }
        }

        if stats.total_reviews > 0 {
            let mean = sum as f64 / stats.total_reviews as f64;
            stats.average_rating = (mean * 10.0).round() / 10.0;
        }
        stats
    }

    pub fn count(&self, rating: u8) -> usize {
        self.rating_distribution.get(&rating).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = ReviewStats::from_ratings([]);
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.rating_distribution.len(), 5);
        assert!(stats.rating_distribution.values().all(|c| *c == 0));
        assert_eq!(stats, ReviewStats::default());
    }

    #[test]
    fn test_average_is_rounded_to_one_decimal() {
        // 14 / 3 = 4.666...
        let stats = ReviewStats::from_ratings([5, 5, 4]);
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_rating, 4.7);

        // 13 / 4 = 3.25 rounds up
        assert_eq!(ReviewStats::from_ratings([5, 4, 3, 1]).average_rating, 3.3);
        assert_eq!(ReviewStats::from_ratings([2]).average_rating, 2.0);
    }

    #[test]
    fn test_distribution() {
        let stats = ReviewStats::from_ratings([5, 1, 5, 3]);
        assert_eq!(stats.count(5), 2);
        assert_eq!(stats.count(4), 0);
        assert_eq!(stats.count(3), 1);
        assert_eq!(stats.count(1), 1);
        assert_eq!(stats.count(9), 0);
    }

    #[test]
    fn test_out_of_range_ratings_are_ignored() {
        let stats = ReviewStats::from_ratings([0, 6, 4]);
        assert_eq!(stats.total_reviews, 1);
        assert_eq!(stats.average_rating, 4.0);
    }

    #[test]
    fn test_serializes_distribution_by_rating() {
        let json = serde_json::to_value(ReviewStats::from_ratings([4])).unwrap();
        assert_eq!(json["totalReviews"], 1);
        assert_eq!(json["ratingDistribution"]["4"], 1);
        assert_eq!(json["ratingDistribution"]["1"], 0);
    }
}
