// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod auth_service;
pub mod card_service;
pub mod catalog_service;
pub mod promo_service;
pub mod ranking_service;
pub mod request_service;
pub mod review_service;

// Re-export all services and their types
pub use auth_service::{AuthService, CreateAccountRequest};

pub use card_service::CardService;

pub use catalog_service::{
    CatalogService,
    CreateEpisodeRequest,
    CreateFilmRequest,
    CreateSeriesRequest,
    SearchResults,
};

pub use promo_service::{CreatePromoRequest, PromoService};

pub use ranking_service::{RankingService, DIRECTOR_MIN_REVIEWS};

pub use request_service::{RequestService, SubmitRequestRequest};

pub use review_service::{PostReviewRequest, ReviewService};
