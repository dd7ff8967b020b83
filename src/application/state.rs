// src/application/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, create_memory_pool, get_connection, initialize_database,
    ConnectionPool,
};
use crate::error::AppResult;
use crate::events::{create_event_bus, EventBus};
use crate::repositories::*;
use crate::services::{
    AuthService, CardService, CatalogService, PromoService, RankingService, RequestService,
    ReviewService,
};

/// Application state shared by every session.
/// All fields are Arc-wrapped for thread-safe sharing.
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub auth_service: Arc<AuthService>,
    pub catalog_service: Arc<CatalogService>,
    pub review_service: Arc<ReviewService>,
    pub promo_service: Arc<PromoService>,
    pub card_service: Arc<CardService>,
    pub request_service: Arc<RequestService>,
    pub ranking_service: Arc<RankingService>,
}

impl AppState {
    /// Open the configured database, apply the schema and wire all services
    pub fn bootstrap(config: &AppConfig) -> AppResult<Self> {
        let pool = create_connection_pool(config)?;
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
        }
        Ok(Self::from_pool(Arc::new(pool)))
    }

    /// Fresh in-memory database
    pub fn in_memory() -> AppResult<Self> {
        Ok(Self::from_pool(Arc::new(create_memory_pool()?)))
    }

    pub fn from_pool(pool: Arc<ConnectionPool>) -> Self {
        // 1. INFRASTRUCTURE
        let event_bus = Arc::new(create_event_bus());

        // 2. REPOSITORIES
        let account_repo: Arc<dyn AccountRepository> =
            Arc::new(SqliteAccountRepository::new(pool.clone()));
        let cinema_repo: Arc<dyn CinemaRepository> =
            Arc::new(SqliteCinemaRepository::new(pool.clone()));
        let genre_repo: Arc<dyn GenreRepository> =
            Arc::new(SqliteGenreRepository::new(pool.clone()));
        let person_repo: Arc<dyn PersonRepository> =
            Arc::new(SqlitePersonRepository::new(pool.clone()));
        let film_repo: Arc<dyn FilmRepository> = Arc::new(SqliteFilmRepository::new(pool.clone()));
        let series_repo: Arc<dyn SeriesRepository> =
            Arc::new(SqliteSeriesRepository::new(pool.clone()));
        let review_repo: Arc<dyn ReviewRepository> =
            Arc::new(SqliteReviewRepository::new(pool.clone()));
        let promo_repo: Arc<dyn PromoRepository> =
            Arc::new(SqlitePromoRepository::new(pool.clone()));
        let card_repo: Arc<dyn CardRepository> = Arc::new(SqliteCardRepository::new(pool.clone()));
        let request_repo: Arc<dyn RequestRepository> =
            Arc::new(SqliteRequestRepository::new(pool.clone()));
        let ranking_repo: Arc<dyn RankingRepository> =
            Arc::new(SqliteRankingRepository::new(pool.clone()));

        // 3. SERVICES
        let auth_service = Arc::new(AuthService::new(
            account_repo.clone(),
            cinema_repo.clone(),
            event_bus.clone(),
        ));
        let catalog_service = Arc::new(CatalogService::new(
            cinema_repo,
            genre_repo.clone(),
            person_repo,
            film_repo.clone(),
            series_repo.clone(),
            event_bus.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(
            review_repo,
            film_repo.clone(),
            series_repo.clone(),
            event_bus.clone(),
        ));
        let promo_service = Arc::new(PromoService::new(
            promo_repo,
            genre_repo,
            film_repo,
            series_repo,
            event_bus.clone(),
        ));
        let card_service = Arc::new(CardService::new(card_repo, account_repo, event_bus.clone()));
        let request_service = Arc::new(RequestService::new(request_repo, event_bus.clone()));
        let ranking_service = Arc::new(RankingService::new(ranking_repo));

        Self {
            pool,
            event_bus,
            auth_service,
            catalog_service,
            review_service,
            promo_service,
            card_service,
            request_service,
            ranking_service,
        }
    }
}
