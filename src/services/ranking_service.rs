// src/services/ranking_service.rs
use crate::domain::ranking::{clamp_limit, DirectorRank, ReviewerRank};
use crate::error::AppResult;
use crate::repositories::RankingRepository;
use std::sync::Arc;

/// Directors with fewer reviews than this are left out of the ranking
pub const DIRECTOR_MIN_REVIEWS: u32 = 1;

pub struct RankingService {
    ranking_repo: Arc<dyn RankingRepository>,
}

impl RankingService {
    pub fn new(ranking_repo: Arc<dyn RankingRepository>) -> Self {
        Self { ranking_repo }
    }

    pub fn top_reviewers(&self, limit: u32) -> AppResult<Vec<ReviewerRank>> {
        self.ranking_repo.top_reviewers(clamp_limit(limit))
    }

    pub fn top_directors(&self, limit: u32) -> AppResult<Vec<DirectorRank>> {
        self.ranking_repo
            .top_directors(clamp_limit(limit), DIRECTOR_MIN_REVIEWS)
    }
}
