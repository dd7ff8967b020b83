// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::TitleRef;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// ACCOUNT EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub account_id: Uuid,
    pub username: String,
    pub role: String, // "administrator", "registrar", "user"
}

impl AccountCreated {
    pub fn new(account_id: Uuid, username: String, role: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            account_id,
            username,
            role,
        }
    }
}

impl DomainEvent for AccountCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "AccountCreated" }
}

/// Emitted for unknown usernames and wrong passwords alike
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub username: String,
}

impl LoginFailed {
    pub fn new(username: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            username,
        }
    }
}

impl DomainEvent for LoginFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "LoginFailed" }
}

// ============================================================================
// CATALOG EVENTS
// ============================================================================

/// Emitted when a film or a series is added to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub title: TitleRef,
    pub name: String,
}

impl TitleAdded {
    pub fn new(title: TitleRef, name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            title,
            name,
        }
    }
}

impl DomainEvent for TitleAdded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "TitleAdded" }
}

// ============================================================================
// REVIEW EVENTS
// ============================================================================

/// Emitted for new reviews and for revisions of an existing one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPosted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub review_id: Uuid,
    pub account_id: Uuid,
    pub title: TitleRef,
    pub rating: u8,
}

impl ReviewPosted {
    pub fn new(review_id: Uuid, account_id: Uuid, title: TitleRef, rating: u8) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            review_id,
            account_id,
            title,
            rating,
        }
    }
}

impl DomainEvent for ReviewPosted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ReviewPosted" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub review_id: Uuid,
    pub deleted_by: Uuid,
}

impl ReviewDeleted {
    pub fn new(review_id: Uuid, deleted_by: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            review_id,
            deleted_by,
        }
    }
}

impl DomainEvent for ReviewDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ReviewDeleted" }
}

// ============================================================================
// PROMO EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub promo_id: Uuid,
    pub percentage: u8,
    pub expires_on: NaiveDate,
}

impl PromoCreated {
    pub fn new(promo_id: Uuid, percentage: u8, expires_on: NaiveDate) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            promo_id,
            percentage,
            expires_on,
        }
    }
}

impl DomainEvent for PromoCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PromoCreated" }
}

// ============================================================================
// CARD EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRegistered {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub card_id: Uuid,
    pub account_id: Uuid,
    pub cinema_id: Uuid,
}

impl CardRegistered {
    pub fn new(card_id: Uuid, account_id: Uuid, cinema_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            card_id,
            account_id,
            cinema_id,
        }
    }
}

impl DomainEvent for CardRegistered {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CardRegistered" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRenewed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub card_id: Uuid,
    pub renewal_date: NaiveDate,
}

impl CardRenewed {
    pub fn new(card_id: Uuid, renewal_date: NaiveDate) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            card_id,
            renewal_date,
        }
    }
}

impl DomainEvent for CardRenewed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CardRenewed" }
}

// ============================================================================
// REQUEST EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSubmitted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub account_id: Uuid,
    pub title: String,
}

impl RequestSubmitted {
    pub fn new(request_id: Uuid, account_id: Uuid, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            account_id,
            title,
        }
    }
}

impl DomainEvent for RequestSubmitted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "RequestSubmitted" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestClosed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub closed_by: Uuid,
}

impl RequestClosed {
    pub fn new(request_id: Uuid, closed_by: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request_id,
            closed_by,
        }
    }
}

impl DomainEvent for RequestClosed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "RequestClosed" }
}
