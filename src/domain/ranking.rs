// src/domain/ranking.rs
//
// Ranking read models
//
// Derived, read-only aggregates. Computed by SQL, never persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest page a ranking query returns
pub const MAX_RANKING_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerRank {
    pub account_id: Uuid,
    pub username: String,
    pub review_count: u32,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorRank {
    pub person_id: Uuid,
    pub full_name: String,

    /// Distinct films and series credited as director
    pub titles_directed: u32,

    /// Reviews across all of those titles
    pub review_count: u32,

    pub average_rating: f64,
}

/// Clamp a requested ranking size to 1..=MAX_RANKING_LIMIT
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_RANKING_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(5000), MAX_RANKING_LIMIT);
    }
}
