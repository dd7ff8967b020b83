// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

mod mapping;

pub mod account_repository;
pub mod card_repository;
pub mod cinema_repository;
pub mod film_repository;
pub mod genre_repository;
pub mod person_repository;
pub mod promo_repository;
pub mod ranking_repository;
pub mod request_repository;
pub mod review_repository;
pub mod series_graph;
pub mod series_repository;

pub use account_repository::{AccountRepository, SqliteAccountRepository};
pub use card_repository::{CardRepository, SqliteCardRepository};
pub use cinema_repository::{CinemaRepository, SqliteCinemaRepository};
pub use film_repository::{FilmRepository, SqliteFilmRepository};
pub use genre_repository::{GenreRepository, SqliteGenreRepository};
pub use person_repository::{PersonRepository, SqlitePersonRepository};
pub use promo_repository::{PromoRepository, SqlitePromoRepository};
pub use ranking_repository::{RankingRepository, SqliteRankingRepository};
pub use request_repository::{RequestRepository, SqliteRequestRepository};
pub use review_repository::{ReviewRepository, SqliteReviewRepository};
pub use series_graph::{SeriesGraphBuilder, SeriesJoinRow};
pub use series_repository::{SeriesRepository, SqliteSeriesRepository};
