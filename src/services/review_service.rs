// src/services/review_service.rs
use crate::domain::account::Account;
use crate::domain::catalog::TitleRef;
use crate::domain::review::{validate_review, RatingSummary, Review};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ReviewDeleted, ReviewPosted};
use crate::repositories::{FilmRepository, ReviewRepository, SeriesRepository};
use crate::services::catalog_service::title_exists;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PostReviewRequest {
    pub title: TitleRef,
    pub rating: u8,
    pub comment: Option<String>,
}

pub struct ReviewService {
    review_repo: Arc<dyn ReviewRepository>,
    film_repo: Arc<dyn FilmRepository>,
    series_repo: Arc<dyn SeriesRepository>,
    event_bus: Arc<EventBus>,
}

impl ReviewService {
    pub fn new(
        review_repo: Arc<dyn ReviewRepository>,
        film_repo: Arc<dyn FilmRepository>,
        series_repo: Arc<dyn SeriesRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            review_repo,
            film_repo,
            series_repo,
            event_bus,
        }
    }

    /// Insert the author's review of a title, or revise the one they
    /// already wrote.
    pub fn post_review(&self, author: &Account, request: PostReviewRequest) -> AppResult<Review> {
        if !title_exists(self.film_repo.as_ref(), self.series_repo.as_ref(), request.title)? {
            return Err(AppError::NotFound);
        }

        let review = match self
            .review_repo
            .get_for_account_and_title(author.id, request.title)?
        {
            Some(mut existing) => {
                existing.revise(request.rating, request.comment);
                existing
            }
            None => Review::new(author.id, request.title, request.rating, request.comment),
        };

        validate_review(&review).map_err(AppError::Domain)?;
        self.review_repo.upsert(&review)?;

        self.event_bus.emit(ReviewPosted::new(
            review.id,
            author.id,
            review.title,
            review.rating,
        ));

        Ok(review)
    }

    /// Authors may delete their own reviews, administrators any review
    pub fn delete_review(&self, actor: &Account, review_id: Uuid) -> AppResult<()> {
        let review = self
            .review_repo
            .get_by_id(review_id)?
            .ok_or(AppError::NotFound)?;

        if review.account_id != actor.id && !actor.is_administrator() {
            return Err(AppError::Forbidden(
                "only the author or an administrator can delete a review".to_string(),
            ));
        }

        self.review_repo.delete(review.id)?;
        self.event_bus.emit(ReviewDeleted::new(review.id, actor.id));

        Ok(())
    }

    pub fn reviews_for_title(&self, title: TitleRef) -> AppResult<Vec<Review>> {
        self.review_repo.list_for_title(title)
    }

    pub fn reviews_by_account(&self, account_id: Uuid) -> AppResult<Vec<Review>> {
        self.review_repo.list_by_account(account_id)
    }

    pub fn average_rating(&self, title: TitleRef) -> AppResult<RatingSummary> {
        self.review_repo.average_for_title(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Role;
    use crate::repositories::film_repository::MockFilmRepository;
    use crate::repositories::review_repository::MockReviewRepository;
    use crate::repositories::series_repository::MockSeriesRepository;

    fn account(role: Role) -> Account {
        Account::new(
            "someone".to_string(),
            "Some One".to_string(),
            "someone@example.org".to_string(),
            role,
            None,
            String::new(),
            String::new(),
        )
    }

    fn films_with(exists: bool) -> MockFilmRepository {
        let mut films = MockFilmRepository::new();
        films.expect_exists().returning(move |_| Ok(exists));
        films
    }

    #[test]
    fn test_post_review_of_missing_title() {
        let mut reviews = MockReviewRepository::new();
        reviews.expect_upsert().never();

        let service = ReviewService::new(
            Arc::new(reviews),
            Arc::new(films_with(false)),
            Arc::new(MockSeriesRepository::new()),
            Arc::new(EventBus::new()),
        );

        let result = service.post_review(
            &account(Role::User),
            PostReviewRequest {
                title: TitleRef::film(Uuid::new_v4()),
                rating: 4,
                comment: None,
            },
        );
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[test]
    fn test_post_review_revises_existing() {
        let author = account(Role::User);
        let title = TitleRef::film(Uuid::new_v4());
        let existing = Review::new(author.id, title, 2, Some("meh".to_string()));
        let existing_id = existing.id;

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_get_for_account_and_title()
            .returning(move |_, _| Ok(Some(existing.clone())));
        reviews
            .expect_upsert()
            .withf(move |r| r.id == existing_id && r.rating == 5)
            .times(1)
            .returning(|_| Ok(()));

        let bus = Arc::new(EventBus::new());
        let service = ReviewService::new(
            Arc::new(reviews),
            Arc::new(films_with(true)),
            Arc::new(MockSeriesRepository::new()),
            bus.clone(),
        );

        let review = service
            .post_review(&author, PostReviewRequest { title, rating: 5, comment: None })
            .unwrap();
        assert_eq!(review.id, existing_id);
        assert_eq!(review.comment, None);
        assert_eq!(bus.get_event_log()[0].event_type, "ReviewPosted");
    }

    #[test]
    fn test_rating_out_of_range() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_get_for_account_and_title()
            .returning(|_, _| Ok(None));
        reviews.expect_upsert().never();

        let service = ReviewService::new(
            Arc::new(reviews),
            Arc::new(films_with(true)),
            Arc::new(MockSeriesRepository::new()),
            Arc::new(EventBus::new()),
        );

        let result = service.post_review(
            &account(Role::User),
            PostReviewRequest {
                title: TitleRef::film(Uuid::new_v4()),
                rating: 6,
                comment: None,
            },
        );
        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_delete_permissions() {
        let author = account(Role::User);
        let stranger = account(Role::User);
        let admin = account(Role::Administrator);
        let review = Review::new(author.id, TitleRef::series(Uuid::new_v4()), 3, None);

        let mut reviews = MockReviewRepository::new();
        let stored = review.clone();
        reviews
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        reviews.expect_delete().times(2).returning(|_| Ok(()));

        let service = ReviewService::new(
            Arc::new(reviews),
            Arc::new(MockFilmRepository::new()),
            Arc::new(MockSeriesRepository::new()),
            Arc::new(EventBus::new()),
        );

        assert!(matches!(
            service.delete_review(&stranger, review.id),
            Err(AppError::Forbidden(_))
        ));
        service.delete_review(&author, review.id).unwrap();
        service.delete_review(&admin, review.id).unwrap();
    }
}
