// src/services/catalog_service.rs
use crate::domain::catalog::{
    validate_episode, validate_film, validate_genre, validate_person, validate_season,
    validate_series, CastMember, CastRole, Episode, Film, Genre, Person, Season, Series,
    TitleKind, TitleRef,
};
use crate::domain::cinema::{validate_cinema, Cinema};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, TitleAdded};
use crate::repositories::{
    CinemaRepository, FilmRepository, GenreRepository, PersonRepository, SeriesRepository,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateFilmRequest {
    pub title: String,
    pub release_year: i32,
    pub duration_minutes: u32,
    pub synopsis: Option<String>,
    pub genre_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateSeriesRequest {
    pub title: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub synopsis: Option<String>,
    pub genre_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateEpisodeRequest {
    pub series_id: Uuid,
    pub season_number: u32,
    pub number: u32,
    pub title: String,
    pub duration_minutes: Option<u32>,
}

/// Films and series matching one query
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub films: Vec<Film>,
    pub series: Vec<Series>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.films.len() + self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether the referenced film or series exists
pub(crate) fn title_exists(
    films: &dyn FilmRepository,
    series: &dyn SeriesRepository,
    title: TitleRef,
) -> AppResult<bool> {
    match title.kind {
        TitleKind::Film => films.exists(title.id),
        TitleKind::Series => series.exists(title.id),
    }
}

/// Genre ids attached to the referenced title
pub(crate) fn title_genre_ids(
    films: &dyn FilmRepository,
    series: &dyn SeriesRepository,
    title: TitleRef,
) -> AppResult<Vec<Uuid>> {
    match title.kind {
        TitleKind::Film => films.genre_ids(title.id),
        TitleKind::Series => series.genre_ids(title.id),
    }
}

pub struct CatalogService {
    cinema_repo: Arc<dyn CinemaRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    person_repo: Arc<dyn PersonRepository>,
    film_repo: Arc<dyn FilmRepository>,
    series_repo: Arc<dyn SeriesRepository>,
    event_bus: Arc<EventBus>,
}

impl CatalogService {
    pub fn new(
        cinema_repo: Arc<dyn CinemaRepository>,
        genre_repo: Arc<dyn GenreRepository>,
        person_repo: Arc<dyn PersonRepository>,
        film_repo: Arc<dyn FilmRepository>,
        series_repo: Arc<dyn SeriesRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            cinema_repo,
            genre_repo,
            person_repo,
            film_repo,
            series_repo,
            event_bus,
        }
    }

    // ------------------------------------------------------------------
    // Cinemas, genres, people
    // ------------------------------------------------------------------

    pub fn add_cinema(
        &self,
        name: String,
        city: String,
        address: Option<String>,
    ) -> AppResult<Cinema> {
        let cinema = Cinema::new(
            name.trim().to_string(),
            city.trim().to_string(),
            address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
        );

        validate_cinema(&cinema).map_err(AppError::Domain)?;
        self.cinema_repo.save(&cinema)?;

        Ok(cinema)
    }

    pub fn list_cinemas(&self) -> AppResult<Vec<Cinema>> {
        self.cinema_repo.list_all()
    }

    pub fn get_cinema(&self, cinema_id: Uuid) -> AppResult<Option<Cinema>> {
        self.cinema_repo.get_by_id(cinema_id)
    }

    pub fn add_genre(&self, name: String) -> AppResult<Genre> {
        let genre = Genre::new(name.trim().to_string());

        validate_genre(&genre).map_err(AppError::Domain)?;
        self.genre_repo.save(&genre)?;

        Ok(genre)
    }

    pub fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.genre_repo.list_all()
    }

    pub fn find_genre(&self, name: &str) -> AppResult<Option<Genre>> {
        self.genre_repo.get_by_name(name)
    }

    pub fn add_person(&self, full_name: String) -> AppResult<Person> {
        let person = Person::new(full_name.trim().to_string());

        validate_person(&person).map_err(AppError::Domain)?;
        self.person_repo.save(&person)?;

        Ok(person)
    }

    pub fn search_people(&self, query: &str) -> AppResult<Vec<Person>> {
        self.person_repo.search_by_name(query)
    }

    // ------------------------------------------------------------------
    // Titles
    // ------------------------------------------------------------------

    pub fn add_film(&self, request: CreateFilmRequest) -> AppResult<Film> {
        let mut film = Film::new(
            request.title.trim().to_string(),
            request.release_year,
            request.duration_minutes,
        );
        film.synopsis = request.synopsis;

        validate_film(&film).map_err(AppError::Domain)?;
        self.ensure_genres_exist(&request.genre_ids)?;

        self.film_repo.save(&film)?;
        if !request.genre_ids.is_empty() {
            self.film_repo.set_genres(film.id, &request.genre_ids)?;
        }

        self.event_bus
            .emit(TitleAdded::new(film.title_ref(), film.title.clone()));

        self.film_repo.get_by_id(film.id)?.ok_or(AppError::NotFound)
    }

    pub fn add_series(&self, request: CreateSeriesRequest) -> AppResult<Series> {
        let mut series = Series::new(request.title.trim().to_string(), request.start_year);
        series.end_year = request.end_year;
        series.synopsis = request.synopsis;

        validate_series(&series).map_err(AppError::Domain)?;
        self.ensure_genres_exist(&request.genre_ids)?;

        self.series_repo.save_series(&series)?;
        if !request.genre_ids.is_empty() {
            self.series_repo.set_genres(series.id, &request.genre_ids)?;
        }

        self.event_bus
            .emit(TitleAdded::new(series.title_ref(), series.title.clone()));

        self.series_repo
            .get_by_id(series.id)?
            .ok_or(AppError::NotFound)
    }

    pub fn add_season(
        &self,
        series_id: Uuid,
        number: u32,
        release_year: Option<i32>,
    ) -> AppResult<Season> {
        if !self.series_repo.exists(series_id)? {
            return Err(AppError::NotFound);
        }

        let mut season = Season::new(series_id, number);
        season.release_year = release_year;
        validate_season(&season).map_err(AppError::Domain)?;

        if self.series_repo.season_exists(series_id, number)? {
            return Err(AppError::Conflict(format!(
                "season {} already exists",
                number
            )));
        }

        self.series_repo.save_season(&season)?;
        Ok(season)
    }

    pub fn add_episode(&self, request: CreateEpisodeRequest) -> AppResult<Episode> {
        if !self
            .series_repo
            .season_exists(request.series_id, request.season_number)?
        {
            return Err(AppError::NotFound);
        }

        let mut episode = Episode::new(
            request.series_id,
            request.season_number,
            request.number,
            request.title.trim().to_string(),
        );
        episode.duration_minutes = request.duration_minutes;

        validate_episode(&episode).map_err(AppError::Domain)?;
        self.series_repo.save_episode(&episode)?;

        Ok(episode)
    }

    pub fn add_film_cast_member(
        &self,
        film_id: Uuid,
        person_id: Uuid,
        role: CastRole,
    ) -> AppResult<CastMember> {
        if !self.film_repo.exists(film_id)? {
            return Err(AppError::NotFound);
        }
        let member = self.cast_member(person_id, role)?;

        self.film_repo.add_cast_member(film_id, &member)?;
        Ok(member)
    }

    pub fn add_season_cast_member(
        &self,
        series_id: Uuid,
        season_number: u32,
        person_id: Uuid,
        role: CastRole,
    ) -> AppResult<CastMember> {
        if !self.series_repo.season_exists(series_id, season_number)? {
            return Err(AppError::NotFound);
        }
        let member = self.cast_member(person_id, role)?;

        self.series_repo
            .add_season_cast_member(series_id, season_number, &member)?;
        Ok(member)
    }

    /// Replace the genre set of a film or series
    pub fn set_genres(&self, title: TitleRef, genre_ids: &[Uuid]) -> AppResult<()> {
        if !title_exists(self.film_repo.as_ref(), self.series_repo.as_ref(), title)? {
            return Err(AppError::NotFound);
        }
        self.ensure_genres_exist(genre_ids)?;

        match title.kind {
            TitleKind::Film => self.film_repo.set_genres(title.id, genre_ids),
            TitleKind::Series => self.series_repo.set_genres(title.id, genre_ids),
        }
    }

    // ------------------------------------------------------------------
    // Browsing
    // ------------------------------------------------------------------

    pub fn list_films(&self) -> AppResult<Vec<Film>> {
        self.film_repo.list_all()
    }

    pub fn list_series(&self) -> AppResult<Vec<Series>> {
        self.series_repo.list_all()
    }

    pub fn get_film(&self, film_id: Uuid) -> AppResult<Option<Film>> {
        self.film_repo.get_by_id(film_id)
    }

    pub fn get_series(&self, series_id: Uuid) -> AppResult<Option<Series>> {
        self.series_repo.get_by_id(series_id)
    }

    /// Title search over films and series, case-insensitive for ASCII
    /// letters only (SQLite `LIKE` does not fold other characters).
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> AppResult<SearchResults> {
        Ok(SearchResults {
            films: self.film_repo.search_by_title(query)?,
            series: self.series_repo.search_by_title(query)?,
        })
    }

    pub fn list_by_genre(&self, genre_id: Uuid) -> AppResult<SearchResults> {
        if self.genre_repo.get_by_id(genre_id)?.is_none() {
            return Err(AppError::NotFound);
        }

        Ok(SearchResults {
            films: self.film_repo.list_by_genre(genre_id)?,
            series: self.series_repo.list_by_genre(genre_id)?,
        })
    }

    pub fn title_exists(&self, title: TitleRef) -> AppResult<bool> {
        title_exists(self.film_repo.as_ref(), self.series_repo.as_ref(), title)
    }

    /// Removes the title with its reviews and title-scoped promos
    pub fn delete_title(&self, title: TitleRef) -> AppResult<()> {
        match title.kind {
            TitleKind::Film => self.film_repo.delete(title.id)?,
            TitleKind::Series => self.series_repo.delete(title.id)?,
        }
        log::info!("deleted {}", title);
        Ok(())
    }

    fn cast_member(&self, person_id: Uuid, role: CastRole) -> AppResult<CastMember> {
        let person = self
            .person_repo
            .get_by_id(person_id)?
            .ok_or(AppError::NotFound)?;
        Ok(CastMember::new(person, role))
    }

    fn ensure_genres_exist(&self, genre_ids: &[Uuid]) -> AppResult<()> {
        for genre_id in genre_ids {
            if self.genre_repo.get_by_id(*genre_id)?.is_none() {
                return Err(AppError::Domain(crate::domain::DomainError::NotFound(
                    format!("genre {}", genre_id),
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, ConnectionPool};
    use crate::domain::account::{Account, Role};
    use crate::domain::promo::{Promo, PromoScope};
    use crate::domain::review::Review;
    use crate::repositories::{
        AccountRepository, PromoRepository, ReviewRepository, SqliteAccountRepository,
        SqliteCinemaRepository, SqliteFilmRepository, SqliteGenreRepository,
        SqlitePersonRepository, SqlitePromoRepository, SqliteReviewRepository,
        SqliteSeriesRepository,
    };
    use chrono::NaiveDate;

    fn service() -> (CatalogService, Arc<EventBus>) {
        let (service, bus, _) = service_with_pool();
        (service, bus)
    }

    fn service_with_pool() -> (CatalogService, Arc<EventBus>, Arc<ConnectionPool>) {
        let pool = Arc::new(create_memory_pool().unwrap());
        let bus = Arc::new(EventBus::new());
        let service = CatalogService::new(
            Arc::new(SqliteCinemaRepository::new(pool.clone())),
            Arc::new(SqliteGenreRepository::new(pool.clone())),
            Arc::new(SqlitePersonRepository::new(pool.clone())),
            Arc::new(SqliteFilmRepository::new(pool.clone())),
            Arc::new(SqliteSeriesRepository::new(pool.clone())),
            bus.clone(),
        );
        (service, bus, pool)
    }

    /// Stores one review and one title promo for `title`, plus a global promo
    fn attach_review_and_promos(pool: &Arc<ConnectionPool>, title: TitleRef) {
        let accounts = SqliteAccountRepository::new(pool.clone());
        let reviewer = Account::new(
            "giulia".to_string(),
            "Giulia Rossi".to_string(),
            "giulia@example.org".to_string(),
            Role::User,
            None,
            "digest".to_string(),
            "salt".to_string(),
        );
        accounts.save(&reviewer).unwrap();

        SqliteReviewRepository::new(pool.clone())
            .upsert(&Review::new(reviewer.id, title, 4, None))
            .unwrap();

        let promos = SqlitePromoRepository::new(pool.clone());
        let expires = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        promos
            .save(&Promo::new("Title night".to_string(), 20, expires, PromoScope::Title(title)))
            .unwrap();
        promos
            .save(&Promo::new("Everyone".to_string(), 5, expires, PromoScope::Global))
            .unwrap();
    }

    fn assert_only_global_promo_left(pool: &Arc<ConnectionPool>, title: TitleRef) {
        let reviews = SqliteReviewRepository::new(pool.clone());
        assert!(reviews.list_for_title(title).unwrap().is_empty());

        let promos = SqlitePromoRepository::new(pool.clone()).list_all().unwrap();
        assert_eq!(promos.len(), 1);
        assert_eq!(promos[0].scope, PromoScope::Global);
    }

    fn film_request(title: &str, genre_ids: Vec<Uuid>) -> CreateFilmRequest {
        CreateFilmRequest {
            title: title.to_string(),
            release_year: 1982,
            duration_minutes: 117,
            synopsis: None,
            genre_ids,
        }
    }

    fn series_request(title: &str) -> CreateSeriesRequest {
        CreateSeriesRequest {
            title: title.to_string(),
            start_year: 2017,
            end_year: Some(2020),
            synopsis: None,
            genre_ids: Vec::new(),
        }
    }

    #[test]
    fn test_add_film_with_genres_emits_event() {
        let (catalog, bus) = service();
        let scifi = catalog.add_genre(" Science Fiction ".to_string()).unwrap();
        assert_eq!(scifi.name, "Science Fiction");

        let film = catalog.add_film(film_request("Blade Runner", vec![scifi.id])).unwrap();
        assert_eq!(film.genres, vec![scifi]);

        let log = bus.get_event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].event_type, "TitleAdded");
    }

    #[test]
    fn test_add_film_rejects_unknown_genre_and_bad_values() {
        let (catalog, _) = service();
        let err = catalog
            .add_film(film_request("Blade Runner", vec![Uuid::new_v4()]))
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));

        let mut zero = film_request("Zero", Vec::new());
        zero.duration_minutes = 0;
        assert!(catalog.add_film(zero).is_err());
        assert!(catalog.list_films().unwrap().is_empty());
    }

    #[test]
    fn test_build_series_graph() {
        let (catalog, _) = service();
        let dark = catalog.add_series(series_request("Dark")).unwrap();

        catalog.add_season(dark.id, 1, Some(2017)).unwrap();
        catalog.add_season(dark.id, 2, Some(2019)).unwrap();
        let dup = catalog.add_season(dark.id, 1, None);
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        for (season, number, title) in [(1, 1, "Secrets"), (1, 2, "Lies"), (2, 1, "Beginnings and Endings")] {
            catalog
                .add_episode(CreateEpisodeRequest {
                    series_id: dark.id,
                    season_number: season,
                    number,
                    title: title.to_string(),
                    duration_minutes: Some(52),
                })
                .unwrap();
        }

        let missing_season = catalog.add_episode(CreateEpisodeRequest {
            series_id: dark.id,
            season_number: 3,
            number: 1,
            title: "Deja-vu".to_string(),
            duration_minutes: None,
        });
        assert!(matches!(missing_season, Err(AppError::NotFound)));

        let odar = catalog.add_person("Baran bo Odar".to_string()).unwrap();
        catalog
            .add_season_cast_member(dark.id, 1, odar.id, CastRole::Director)
            .unwrap();

        let loaded = catalog.get_series(dark.id).unwrap().unwrap();
        assert_eq!(loaded.episode_count(), 3);
        assert_eq!(loaded.seasons[&1].cast.len(), 1);
    }

    #[test]
    fn test_search_spans_both_kinds() {
        let (catalog, _) = service();
        catalog.add_film(film_request("The Dark Knight", Vec::new())).unwrap();
        catalog.add_series(series_request("Dark")).unwrap();
        catalog.add_film(film_request("Heat", Vec::new())).unwrap();

        let results = catalog.search("dark").unwrap();
        assert_eq!(results.films.len(), 1);
        assert_eq!(results.series.len(), 1);
        assert_eq!(catalog.search("").unwrap().len(), 3);
        assert!(catalog.search("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_set_genres_and_list_by_genre() {
        let (catalog, _) = service();
        let thriller = catalog.add_genre("Thriller".to_string()).unwrap();
        let heat = catalog.add_film(film_request("Heat", Vec::new())).unwrap();
        let dark = catalog.add_series(series_request("Dark")).unwrap();

        catalog.set_genres(heat.title_ref(), &[thriller.id]).unwrap();
        catalog.set_genres(dark.title_ref(), &[thriller.id]).unwrap();

        let results = catalog.list_by_genre(thriller.id).unwrap();
        assert_eq!(results.len(), 2);

        let missing = catalog.set_genres(TitleRef::film(Uuid::new_v4()), &[thriller.id]);
        assert!(matches!(missing, Err(AppError::NotFound)));
    }

    #[test]
    fn test_film_cast_and_delete() {
        let (catalog, _, pool) = service_with_pool();
        let heat = catalog.add_film(film_request("Heat", Vec::new())).unwrap();
        let mann = catalog.add_person("Michael Mann".to_string()).unwrap();

        catalog
            .add_film_cast_member(heat.id, mann.id, CastRole::Director)
            .unwrap();
        catalog.add_film_cast_member(heat.id, mann.id, CastRole::Writer).unwrap();
        let dup = catalog.add_film_cast_member(heat.id, mann.id, CastRole::Director);
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        assert_eq!(catalog.get_film(heat.id).unwrap().unwrap().cast.len(), 2);

        attach_review_and_promos(&pool, heat.title_ref());

        catalog.delete_title(heat.title_ref()).unwrap();
        assert!(!catalog.title_exists(heat.title_ref()).unwrap());
        assert_only_global_promo_left(&pool, heat.title_ref());
    }

    #[test]
    fn test_series_delete_removes_reviews_and_title_promos() {
        let (catalog, _, pool) = service_with_pool();
        let dark = catalog.add_series(series_request("Dark")).unwrap();
        catalog.add_season(dark.id, 1, Some(2017)).unwrap();
        attach_review_and_promos(&pool, dark.title_ref());

        catalog.delete_title(dark.title_ref()).unwrap();

        assert!(!catalog.title_exists(dark.title_ref()).unwrap());
        assert_only_global_promo_left(&pool, dark.title_ref());
    }
}
