// src/services/promo_service.rs
use crate::domain::catalog::TitleRef;
use crate::domain::promo::{best_discount, validate_promo, Promo, PromoScope};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, PromoCreated};
use crate::repositories::{FilmRepository, GenreRepository, PromoRepository, SeriesRepository};
use crate::services::catalog_service::{title_exists, title_genre_ids};
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePromoRequest {
    pub description: String,
    pub percentage: u8,
    pub expires_on: NaiveDate,
    pub scope: PromoScope,
}

pub struct PromoService {
    promo_repo: Arc<dyn PromoRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    film_repo: Arc<dyn FilmRepository>,
    series_repo: Arc<dyn SeriesRepository>,
    event_bus: Arc<EventBus>,
}

impl PromoService {
    pub fn new(
        promo_repo: Arc<dyn PromoRepository>,
        genre_repo: Arc<dyn GenreRepository>,
        film_repo: Arc<dyn FilmRepository>,
        series_repo: Arc<dyn SeriesRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            promo_repo,
            genre_repo,
            film_repo,
            series_repo,
            event_bus,
        }
    }

    pub fn create_promo(&self, request: CreatePromoRequest) -> AppResult<Promo> {
        let promo = Promo::new(
            request.description.trim().to_string(),
            request.percentage,
            request.expires_on,
            request.scope,
        );
        validate_promo(&promo).map_err(AppError::Domain)?;

        let target_exists = match promo.scope {
            PromoScope::Global => true,
            PromoScope::Genre(genre_id) => self.genre_repo.get_by_id(genre_id)?.is_some(),
            PromoScope::Title(title) => {
                title_exists(self.film_repo.as_ref(), self.series_repo.as_ref(), title)?
            }
        };
        if !target_exists {
            return Err(AppError::NotFound);
        }

        self.promo_repo.save(&promo)?;
        self.event_bus.emit(PromoCreated::new(
            promo.id,
            promo.percentage,
            promo.expires_on,
        ));

        Ok(promo)
    }

    pub fn list_all(&self) -> AppResult<Vec<Promo>> {
        self.promo_repo.list_all()
    }

    pub fn list_active(&self, today: NaiveDate) -> AppResult<Vec<Promo>> {
        self.promo_repo.list_active(today)
    }

    /// Active promos that apply to `title`, best first
    pub fn promos_for_title(&self, title: TitleRef, today: NaiveDate) -> AppResult<Vec<Promo>> {
        let genre_ids = title_genre_ids(self.film_repo.as_ref(), self.series_repo.as_ref(), title)?;

        Ok(self
            .promo_repo
            .list_active(today)?
            .into_iter()
            .filter(|p| p.applies_to(title, &genre_ids))
            .collect())
    }

    /// Highest active discount for `title`, if any promo applies
    pub fn best_discount(&self, title: TitleRef, today: NaiveDate) -> AppResult<Option<u8>> {
        let genre_ids = title_genre_ids(self.film_repo.as_ref(), self.series_repo.as_ref(), title)?;
        let promos = self.promo_repo.list_active(today)?;

        Ok(best_discount(&promos, title, &genre_ids, today))
    }

    pub fn delete_promo(&self, promo_id: Uuid) -> AppResult<()> {
        self.promo_repo.delete(promo_id)
    }
}
