// src/domain/promo.rs
//
// Promo Entity
//
// A discount template: a percentage valid up to and including its
// expiration date, optionally restricted to a genre or to one title.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{TitleKind, TitleRef};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promo {
    pub id: Uuid,
    pub description: String,

    /// Discount in percent, 1-100
    pub percentage: u8,

    /// Last day the promo can be used
    pub expires_on: NaiveDate,

    pub scope: PromoScope,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum PromoScope {
    Global,
    Genre(Uuid),
    Title(TitleRef),
}

impl PromoScope {
    /// Stored scope tag: `global`, `genre`, `film` or `series`
    pub fn tag(&self) -> &'static str {
        match self {
            PromoScope::Global => "global",
            PromoScope::Genre(_) => "genre",
            PromoScope::Title(TitleRef {
                kind: TitleKind::Film,
                ..
            }) => "film",
            PromoScope::Title(TitleRef {
                kind: TitleKind::Series,
                ..
            }) => "series",
        }
    }

    pub fn target_id(&self) -> Option<Uuid> {
        match self {
            PromoScope::Global => None,
            PromoScope::Genre(id) => Some(*id),
            PromoScope::Title(title) => Some(title.id),
        }
    }

    pub fn from_parts(tag: &str, target_id: Option<Uuid>) -> DomainResult<Self> {
        match (tag, target_id) {
            ("global", None) => Ok(PromoScope::Global),
            ("genre", Some(id)) => Ok(PromoScope::Genre(id)),
            ("film", Some(id)) => Ok(PromoScope::Title(TitleRef::film(id))),
            ("series", Some(id)) => Ok(PromoScope::Title(TitleRef::series(id))),
            (tag, target) => Err(DomainError::InvalidValue(format!(
                "invalid promo scope '{}' with target {:?}",
                tag, target
            ))),
        }
    }
}

impl Promo {
    pub fn new(description: String, percentage: u8, expires_on: NaiveDate, scope: PromoScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            percentage,
            expires_on,
            scope,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        today <= self.expires_on
    }

    /// Whether the promo covers `title`, given the genres attached to it
    pub fn applies_to(&self, title: TitleRef, genre_ids: &[Uuid]) -> bool {
        match self.scope {
            PromoScope::Global => true,
            PromoScope::Genre(genre_id) => genre_ids.contains(&genre_id),
            PromoScope::Title(target) => target == title,
        }
    }
}

/// Highest active discount applicable to a title, if any
pub fn best_discount(
    promos: &[Promo],
    title: TitleRef,
    genre_ids: &[Uuid],
    today: NaiveDate,
) -> Option<u8> {
    promos
        .iter()
        .filter(|p| p.is_active(today) && p.applies_to(title, genre_ids))
        .map(|p| p.percentage)
        .max()
}

/// Validates Promo invariants
pub fn validate_promo(promo: &Promo) -> DomainResult<()> {
    if promo.description.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Promo description cannot be empty".to_string(),
        ));
    }

    if !(1..=100).contains(&promo.percentage) {
        return Err(DomainError::InvariantViolation(format!(
            "Promo percentage {} is outside 1-100",
            promo.percentage
        )));
    }

    Ok(())
}
