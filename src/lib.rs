// src/lib.rs
// CineHub - Cinema and media catalog manager
//
// Architecture:
// - Domain-centric: All business logic lives in domains
// - Event-driven: Services report what happened through the event bus
// - Explicit: No implicit behavior, no magic
// - Role-gated: Sessions expose only what an account's role permits
// - Application Layer: front-end boundary (sessions + DTOs)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod security;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    // Accounts
    Account,
    Role,
    // Cards
    Card,
    // Catalog
    CastMember,
    CastRole,
    Cinema,
    Episode,
    Film,
    Genre,
    Person,
    Season,
    Series,
    TitleKind,
    TitleRef,
    // Promos
    Promo,
    PromoScope,
    // Rankings
    DirectorRank,
    ReviewerRank,
    // Requests
    Request,
    RequestState,
    // Reviews
    RatingSummary,
    Review,
};

// ============================================================================
// PUBLIC API - Errors and configuration
// ============================================================================

pub use config::AppConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{create_event_bus, DomainEvent, EventBus, EventLogEntry};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, create_memory_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AuthService, CardService, CatalogService, PromoService, RankingService, RequestService,
    ReviewService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, Session, SessionController};

// Re-export application submodules
pub use application::dto;
