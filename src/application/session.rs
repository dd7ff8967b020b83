// src/application/session.rs
//
// Role-dispatched sessions
//
// RULES:
// - A session can only be obtained through SessionController::login
// - The session type IS the authorization: role-specific operations exist
//   only on the matching session
// - Sessions accept plain values, call services, return DTOs
// - Never contain business logic

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::dto::*;
use crate::application::state::AppState;
use crate::domain::{Account, CastRole, PromoScope, RatingSummary, Role, TitleKind, TitleRef};
use crate::domain::{DirectorRank, ReviewerRank};
use crate::error::{AppError, AppResult};
use crate::services::{
    CreateAccountRequest, CreateEpisodeRequest, CreateFilmRequest, CreatePromoRequest,
    CreateSeriesRequest, PostReviewRequest, SubmitRequestRequest,
};

pub struct SessionController;

impl SessionController {
    /// Authenticate and open the session matching the account's role
    pub fn login(state: Arc<AppState>, username: &str, password: &str) -> AppResult<Session> {
        let account = state.auth_service.login(username, password)?;

        Ok(match account.role {
            Role::Administrator => Session::Admin(AdminSession { state, account }),
            Role::Registrar => Session::Registrar(RegistrarSession { state, account }),
            Role::User => Session::User(UserSession { state, account }),
        })
    }
}

pub enum Session {
    Admin(AdminSession),
    Registrar(RegistrarSession),
    User(UserSession),
}

impl Session {
    pub fn browse(&self) -> &dyn Browse {
        match self {
            Session::Admin(s) => s,
            Session::Registrar(s) => s,
            Session::User(s) => s,
        }
    }

    pub fn account(&self) -> AccountDto {
        self.browse().account().clone().into()
    }

    pub fn as_admin(&self) -> AppResult<&AdminSession> {
        match self {
            Session::Admin(s) => Ok(s),
            _ => Err(AppError::Forbidden("administrator session required".to_string())),
        }
    }

    pub fn as_registrar(&self) -> AppResult<&RegistrarSession> {
        match self {
            Session::Registrar(s) => Ok(s),
            _ => Err(AppError::Forbidden("registrar session required".to_string())),
        }
    }

    pub fn as_user(&self) -> AppResult<&UserSession> {
        match self {
            Session::User(s) => Ok(s),
            _ => Err(AppError::Forbidden("user session required".to_string())),
        }
    }
}

// ============================================================================
// SHARED BROWSING
// ============================================================================

/// Read-only operations available to every role
pub trait Browse {
    fn state(&self) -> &AppState;
    fn account(&self) -> &Account;

    fn list_films(&self) -> AppResult<Vec<FilmDto>> {
        let films = self.state().catalog_service.list_films()?;
        Ok(films.into_iter().map(FilmDto::from).collect())
    }

    fn list_series(&self) -> AppResult<Vec<SeriesDto>> {
        let series = self.state().catalog_service.list_series()?;
        Ok(series.into_iter().map(SeriesDto::from).collect())
    }

    fn get_film(&self, film_id: Uuid) -> AppResult<FilmDto> {
        self.state()
            .catalog_service
            .get_film(film_id)?
            .map(FilmDto::from)
            .ok_or(AppError::NotFound)
    }

    fn get_series(&self, series_id: Uuid) -> AppResult<SeriesDto> {
        self.state()
            .catalog_service
            .get_series(series_id)?
            .map(SeriesDto::from)
            .ok_or(AppError::NotFound)
    }

    fn search(&self, query: &str) -> AppResult<SearchResultsDto> {
        Ok(self.state().catalog_service.search(query)?.into())
    }

    fn list_genres(&self) -> AppResult<Vec<GenreDto>> {
        let genres = self.state().catalog_service.list_genres()?;
        Ok(genres.into_iter().map(GenreDto::from).collect())
    }

    fn list_by_genre(&self, genre_id: Uuid) -> AppResult<SearchResultsDto> {
        Ok(self.state().catalog_service.list_by_genre(genre_id)?.into())
    }

    fn list_cinemas(&self) -> AppResult<Vec<CinemaDto>> {
        let cinemas = self.state().catalog_service.list_cinemas()?;
        Ok(cinemas.into_iter().map(CinemaDto::from).collect())
    }

    fn active_promos(&self, today: NaiveDate) -> AppResult<Vec<PromoDto>> {
        let promos = self.state().promo_service.list_active(today)?;
        Ok(promos.into_iter().map(PromoDto::from).collect())
    }

    fn promos_for_title(&self, title: TitleRef, today: NaiveDate) -> AppResult<Vec<PromoDto>> {
        let promos = self.state().promo_service.promos_for_title(title, today)?;
        Ok(promos.into_iter().map(PromoDto::from).collect())
    }

    fn best_discount(&self, title: TitleRef, today: NaiveDate) -> AppResult<Option<u8>> {
        self.state().promo_service.best_discount(title, today)
    }

    fn reviews_for_title(&self, title: TitleRef) -> AppResult<Vec<ReviewDto>> {
        let reviews = self.state().review_service.reviews_for_title(title)?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }

    fn average_rating(&self, title: TitleRef) -> AppResult<RatingSummary> {
        self.state().review_service.average_rating(title)
    }

    fn top_reviewers(&self, limit: u32) -> AppResult<Vec<ReviewerRank>> {
        self.state().ranking_service.top_reviewers(limit)
    }

    fn top_directors(&self, limit: u32) -> AppResult<Vec<DirectorRank>> {
        self.state().ranking_service.top_directors(limit)
    }
}

macro_rules! impl_browse {
    ($($session:ty),*) => {
        $(
            impl Browse for $session {
                fn state(&self) -> &AppState {
                    &self.state
                }

                fn account(&self) -> &Account {
                    &self.account
                }
            }
        )*
    };
}

impl_browse!(AdminSession, RegistrarSession, UserSession);

// ============================================================================
// ADMINISTRATOR
// ============================================================================

pub struct AdminSession {
    state: Arc<AppState>,
    account: Account,
}

impl AdminSession {
    pub fn add_cinema(
        &self,
        name: String,
        city: String,
        address: Option<String>,
    ) -> AppResult<CinemaDto> {
        Ok(self.state.catalog_service.add_cinema(name, city, address)?.into())
    }

    pub fn add_genre(&self, name: String) -> AppResult<GenreDto> {
        Ok(self.state.catalog_service.add_genre(name)?.into())
    }

    pub fn add_person(&self, full_name: String) -> AppResult<PersonDto> {
        Ok(self.state.catalog_service.add_person(full_name)?.into())
    }

    pub fn add_film(&self, request: CreateFilmRequest) -> AppResult<FilmDto> {
        Ok(self.state.catalog_service.add_film(request)?.into())
    }

    pub fn add_series(&self, request: CreateSeriesRequest) -> AppResult<SeriesDto> {
        Ok(self.state.catalog_service.add_series(request)?.into())
    }

    pub fn add_season(
        &self,
        series_id: Uuid,
        number: u32,
        release_year: Option<i32>,
    ) -> AppResult<SeasonDto> {
        Ok(self
            .state
            .catalog_service
            .add_season(series_id, number, release_year)?
            .into())
    }

    pub fn add_episode(&self, request: CreateEpisodeRequest) -> AppResult<EpisodeDto> {
        Ok(self.state.catalog_service.add_episode(request)?.into())
    }

    pub fn add_film_cast_member(
        &self,
        film_id: Uuid,
        person_id: Uuid,
        role: CastRole,
    ) -> AppResult<CastMemberDto> {
        Ok(self
            .state
            .catalog_service
            .add_film_cast_member(film_id, person_id, role)?
            .into())
    }

    pub fn add_season_cast_member(
        &self,
        series_id: Uuid,
        season_number: u32,
        person_id: Uuid,
        role: CastRole,
    ) -> AppResult<CastMemberDto> {
        Ok(self
            .state
            .catalog_service
            .add_season_cast_member(series_id, season_number, person_id, role)?
            .into())
    }

    pub fn set_genres(&self, title: TitleRef, genre_ids: &[Uuid]) -> AppResult<()> {
        self.state.catalog_service.set_genres(title, genre_ids)
    }

    pub fn delete_title(&self, title: TitleRef) -> AppResult<()> {
        self.state.catalog_service.delete_title(title)
    }

    /// Create a registrar (bound to `cinema_id`), user or administrator
    pub fn create_account(
        &self,
        request: CreateAccountRequest,
        role: Role,
        cinema_id: Option<Uuid>,
    ) -> AppResult<AccountDto> {
        Ok(self
            .state
            .auth_service
            .create_account(request, role, cinema_id)?
            .into())
    }

    pub fn list_accounts(&self, role: Role) -> AppResult<Vec<AccountDto>> {
        let accounts = self.state.auth_service.list_accounts(role)?;
        Ok(accounts.into_iter().map(AccountDto::from).collect())
    }

    pub fn create_promo(&self, request: CreatePromoRequest) -> AppResult<PromoDto> {
        Ok(self.state.promo_service.create_promo(request)?.into())
    }

    pub fn list_promos(&self) -> AppResult<Vec<PromoDto>> {
        let promos = self.state.promo_service.list_all()?;
        Ok(promos.into_iter().map(PromoDto::from).collect())
    }

    pub fn delete_promo(&self, promo_id: Uuid) -> AppResult<()> {
        self.state.promo_service.delete_promo(promo_id)
    }

    pub fn open_requests(&self) -> AppResult<Vec<RequestDto>> {
        let requests = self.state.request_service.open_requests()?;
        Ok(requests.into_iter().map(RequestDto::from).collect())
    }

    pub fn close_request(&self, request_id: Uuid) -> AppResult<RequestDto> {
        Ok(self
            .state
            .request_service
            .close_request(&self.account, request_id)?
            .into())
    }

    /// Moderation: delete any review
    pub fn delete_review(&self, review_id: Uuid) -> AppResult<()> {
        self.state
            .review_service
            .delete_review(&self.account, review_id)
    }
}

// ============================================================================
// REGISTRAR
// ============================================================================

pub struct RegistrarSession {
    state: Arc<AppState>,
    account: Account,
}

impl RegistrarSession {
    /// The cinema this registrar works for
    pub fn cinema_id(&self) -> AppResult<Uuid> {
        self.account.cinema_id.ok_or_else(|| {
            AppError::Other(format!(
                "registrar '{}' has no cinema",
                self.account.username
            ))
        })
    }

    pub fn register_card(&self, username: &str, today: NaiveDate) -> AppResult<CardDto> {
        Ok(self
            .state
            .card_service
            .register_card(&self.account, username, today)
            .map(|card| CardDto::at(card, today))?)
    }

    pub fn renew_card(&self, card_id: Uuid, today: NaiveDate) -> AppResult<CardDto> {
        Ok(self
            .state
            .card_service
            .renew_card(&self.account, card_id, today)
            .map(|card| CardDto::at(card, today))?)
    }

    /// Cards issued at this registrar's cinema, with expiry as of `today`
    pub fn cinema_cards(&self, today: NaiveDate) -> AppResult<Vec<CardDto>> {
        let cards = self.state.card_service.cards_for_cinema(self.cinema_id()?)?;
        Ok(cards.into_iter().map(|card| CardDto::at(card, today)).collect())
    }
}

// ============================================================================
// USER
// ============================================================================

pub struct UserSession {
    state: Arc<AppState>,
    account: Account,
}

impl UserSession {
    pub fn post_review(
        &self,
        title: TitleRef,
        rating: u8,
        comment: Option<String>,
    ) -> AppResult<ReviewDto> {
        let request = PostReviewRequest {
            title,
            rating,
            comment,
        };
        Ok(self
            .state
            .review_service
            .post_review(&self.account, request)?
            .into())
    }

    pub fn delete_review(&self, review_id: Uuid) -> AppResult<()> {
        self.state
            .review_service
            .delete_review(&self.account, review_id)
    }

    pub fn my_reviews(&self) -> AppResult<Vec<ReviewDto>> {
        let reviews = self.state.review_service.reviews_by_account(self.account.id)?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }

    pub fn submit_request(
        &self,
        title: String,
        kind: TitleKind,
        note: Option<String>,
    ) -> AppResult<RequestDto> {
        let request = SubmitRequestRequest { title, kind, note };
        Ok(self
            .state
            .request_service
            .submit_request(&self.account, request)?
            .into())
    }

    pub fn my_requests(&self) -> AppResult<Vec<RequestDto>> {
        let requests = self.state.request_service.my_requests(&self.account)?;
        Ok(requests.into_iter().map(RequestDto::from).collect())
    }

    pub fn my_cards(&self, today: NaiveDate) -> AppResult<Vec<CardDto>> {
        let cards = self.state.card_service.cards_for_account(self.account.id)?;
        Ok(cards.into_iter().map(|card| CardDto::at(card, today)).collect())
    }

    pub fn change_password(&self, current_password: &str, new_password: &str) -> AppResult<()> {
        self.state
            .auth_service
            .change_password(self.account.id, current_password, new_password)
    }
}

/// Parse a promo scope given as `global`, `genre:<id>`, `film:<id>` or `series:<id>`
pub fn parse_promo_scope(raw: &str) -> AppResult<PromoScope> {
    let (tag, target) = match raw.split_once(':') {
        Some((tag, id)) => (tag, Some(Uuid::parse_str(id.trim())?)),
        None => (raw, None),
    };
    PromoScope::from_parts(tag.trim(), target).map_err(AppError::Domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_admin() -> Arc<AppState> {
        let state = Arc::new(AppState::in_memory().unwrap());
        state
            .auth_service
            .ensure_administrator("admin", "admin password")
            .unwrap();
        state
    }

    fn user_request(username: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            username: username.to_string(),
            full_name: "Some Body".to_string(),
            email: format!("{}@example.org", username),
            password: "password 123".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_login_dispatches_on_role() {
        let state = state_with_admin();
        let session = SessionController::login(state.clone(), "admin", "admin password").unwrap();
        assert!(matches!(session, Session::Admin(_)));
        assert!(session.as_user().is_err());

        state.auth_service.register_user(user_request("giulia")).unwrap();
        let session = SessionController::login(state.clone(), "giulia", "password 123").unwrap();
        assert!(matches!(session, Session::User(_)));
        assert_eq!(session.account().username, "giulia");

        let bad = SessionController::login(state, "giulia", "nope nope nope");
        assert!(matches!(bad, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_full_flow_across_roles() {
        let state = state_with_admin();
        let today = date(2026, 3, 1);

        // administrator sets up the catalog and a registrar
        let admin_session = SessionController::login(state.clone(), "admin", "admin password").unwrap();
        let admin = admin_session.as_admin().unwrap();
        let cinema = admin
            .add_cinema("Anteo".to_string(), "Milano".to_string(), None)
            .unwrap();
        let cinema_id = Uuid::parse_str(&cinema.id).unwrap();
        admin
            .create_account(user_request("desk"), Role::Registrar, Some(cinema_id))
            .unwrap();
        let film = admin
            .add_film(CreateFilmRequest {
                title: "Nuovo Cinema Paradiso".to_string(),
                release_year: 1988,
                duration_minutes: 155,
                synopsis: None,
                genre_ids: Vec::new(),
            })
            .unwrap();
        let film_ref = TitleRef::film(Uuid::parse_str(&film.id).unwrap());
        admin
            .create_promo(CreatePromoRequest {
                description: "Spring".to_string(),
                percentage: 15,
                expires_on: date(2026, 4, 30),
                scope: PromoScope::Title(film_ref),
            })
            .unwrap();

        // user reviews and asks for a title
        state.auth_service.register_user(user_request("giulia")).unwrap();
        let user_session = SessionController::login(state.clone(), "giulia", "password 123").unwrap();
        let user = user_session.as_user().unwrap();
        user.post_review(film_ref, 5, Some("Capolavoro".to_string())).unwrap();
        let request = user
            .submit_request("Amarcord".to_string(), TitleKind::Film, None)
            .unwrap();

        // registrar issues a card
        let desk_session = SessionController::login(state.clone(), "desk", "password 123").unwrap();
        let desk = desk_session.as_registrar().unwrap();
        desk.register_card("giulia", today).unwrap();
        assert_eq!(desk.cinema_cards(today).unwrap().len(), 1);
        let cards = user.my_cards(today).unwrap();
        assert_eq!(cards.len(), 1);
        assert!(!cards[0].expired);
        assert!(user.my_cards(date(2027, 3, 2)).unwrap()[0].expired);

        // administrator closes the request
        let closed = admin
            .close_request(Uuid::parse_str(&request.id).unwrap())
            .unwrap();
        assert_eq!(closed.state, "closed");
        assert!(admin.open_requests().unwrap().is_empty());

        // everyone browses
        let browse = user_session.browse();
        assert_eq!(browse.best_discount(film_ref, today).unwrap(), Some(15));
        assert_eq!(browse.reviews_for_title(film_ref).unwrap().len(), 1);
        assert_eq!(browse.top_reviewers(10).unwrap()[0].username, "giulia");
        assert_eq!(desk_session.browse().search("paradiso").unwrap().films.len(), 1);
    }

    #[test]
    fn test_parse_promo_scope() {
        let id = Uuid::new_v4();
        assert_eq!(parse_promo_scope("global").unwrap(), PromoScope::Global);
        assert_eq!(
            parse_promo_scope(&format!("series:{}", id)).unwrap(),
            PromoScope::Title(TitleRef::series(id))
        );
        assert!(parse_promo_scope("genre").is_err());
        assert!(parse_promo_scope("film:not-a-uuid").is_err());
    }
}
