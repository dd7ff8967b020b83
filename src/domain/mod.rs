// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod account;
pub mod card;
pub mod catalog;
pub mod cinema;
pub mod promo;
pub mod ranking;
pub mod request;
pub mod review;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Accounts
pub use account::{validate_account, validate_password_strength, Account, Role};

// Cinemas
pub use cinema::{validate_cinema, Cinema};

// Catalog
pub use catalog::{
    validate_episode, validate_film, validate_genre, validate_person, validate_season,
    validate_series, CastMember, CastRole, Episode, Film, Genre, Person, Season, Series,
    TitleKind, TitleRef,
};

// Reviews
pub use review::{validate_review, RatingSummary, Review};

// Promos
pub use promo::{best_discount, validate_promo, Promo, PromoScope};

// Loyalty cards
pub use card::Card;

// Requests
pub use request::{validate_request, Request, RequestState};

// Rankings (derived data)
pub use ranking::{DirectorRank, ReviewerRank};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
