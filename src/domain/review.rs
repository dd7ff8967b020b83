// src/domain/review.rs
//
// Review Entity
//
// A rating (1-5) with an optional comment, one per account and title.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::TitleRef;
use crate::domain::{DomainError, DomainResult};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const COMMENT_MAX_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: TitleRef,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(account_id: Uuid, title: TitleRef, rating: u8, comment: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            title,
            rating,
            comment: normalize_comment(comment),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace rating and comment, keeping identity and creation time
    pub fn revise(&mut self, rating: u8, comment: Option<String>) {
        self.rating = rating;
        self.comment = normalize_comment(comment);
        self.updated_at = Utc::now();
    }
}

/// Average rating of one title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// `None` when the title has no reviews
    pub average: Option<f64>,
    pub count: u32,
}

/// Blank comments are stored as no comment
fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Validates Review invariants
pub fn validate_review(review: &Review) -> DomainResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
        return Err(DomainError::InvariantViolation(format!(
            "Rating {} is outside {}-{}",
            review.rating, MIN_RATING, MAX_RATING
        )));
    }

    if let Some(comment) = &review.comment {
        if comment.chars().count() > COMMENT_MAX_LEN {
            return Err(DomainError::InvariantViolation(format!(
                "Comment exceeds {} characters",
                COMMENT_MAX_LEN
            )));
        }
    }

    Ok(())
}
