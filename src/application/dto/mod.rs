// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are presentation-friendly representations
// - DTOs never carry credentials
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, Card, CastMember, Cinema, Episode, Film, Genre, Person, Promo, Request, Review,
    Season, Series,
};
use crate::services::SearchResults;

// ============================================================================
// ACCOUNT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDto {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub cinema_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CinemaDto {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
}

// ============================================================================
// CATALOG DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDto {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMemberDto {
    pub person_id: String,
    pub full_name: String,
    pub role: String, // "actor", "director", "writer"
    pub character: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmDto {
    pub id: String,
    pub title: String,
    pub release_year: i32,
    pub duration_minutes: u32,
    pub synopsis: Option<String>,
    pub genres: Vec<String>,
    pub cast: Vec<CastMemberDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeDto {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDto {
    pub number: u32,
    pub release_year: Option<i32>,
    pub episodes: Vec<EpisodeDto>,
    pub cast: Vec<CastMemberDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDto {
    pub id: String,
    pub title: String,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub synopsis: Option<String>,
    pub genres: Vec<String>,
    pub seasons: Vec<SeasonDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResultsDto {
    pub films: Vec<FilmDto>,
    pub series: Vec<SeriesDto>,
}

// ============================================================================
// REVIEW / PROMO / CARD / REQUEST DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDto {
    pub id: String,
    pub account_id: String,
    pub title_kind: String,
    pub title_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoDto {
    pub id: String,
    pub description: String,
    pub percentage: u8,
    pub expires_on: String,
    /// "global", "genre", "film" or "series"
    pub scope: String,
    pub target_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDto {
    pub id: String,
    pub account_id: String,
    pub cinema_id: String,
    pub issued_on: String,
    pub renewal_date: String,
    /// Past its renewal date on the day the DTO was built
    pub expired: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDto {
    pub id: String,
    pub account_id: String,
    pub title: String,
    pub kind: String,
    pub note: Option<String>,
    pub state: String,
    pub created_at: String,
    pub closed_at: Option<String>,
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username,
            full_name: account.full_name,
            email: account.email,
            role: account.role.to_string(),
            cinema_id: account.cinema_id.map(|id| id.to_string()),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

impl From<Cinema> for CinemaDto {
    fn from(cinema: Cinema) -> Self {
        Self {
            id: cinema.id.to_string(),
            name: cinema.name,
            city: cinema.city,
            address: cinema.address,
        }
    }
}

impl From<Genre> for GenreDto {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id.to_string(),
            name: genre.name,
        }
    }
}

impl From<Person> for PersonDto {
    fn from(person: Person) -> Self {
        Self {
            id: person.id.to_string(),
            full_name: person.full_name,
        }
    }
}

impl From<CastMember> for CastMemberDto {
    fn from(member: CastMember) -> Self {
        Self {
            person_id: member.person.id.to_string(),
            full_name: member.person.full_name,
            role: member.role.tag().to_string(),
            character: member.role.character().map(str::to_string),
        }
    }
}

impl From<Film> for FilmDto {
    fn from(film: Film) -> Self {
        Self {
            id: film.id.to_string(),
            title: film.title,
            release_year: film.release_year,
            duration_minutes: film.duration_minutes,
            synopsis: film.synopsis,
            genres: film.genres.into_iter().map(|g| g.name).collect(),
            cast: film.cast.into_iter().map(CastMemberDto::from).collect(),
        }
    }
}

impl From<Episode> for EpisodeDto {
    fn from(episode: Episode) -> Self {
        Self {
            id: episode.id.to_string(),
            number: episode.number,
            title: episode.title,
            duration_minutes: episode.duration_minutes,
        }
    }
}

impl From<Season> for SeasonDto {
    fn from(season: Season) -> Self {
        Self {
            number: season.number,
            release_year: season.release_year,
            episodes: season.episodes.into_values().map(EpisodeDto::from).collect(),
            cast: season.cast.into_iter().map(CastMemberDto::from).collect(),
        }
    }
}

impl From<Series> for SeriesDto {
    fn from(series: Series) -> Self {
        Self {
            id: series.id.to_string(),
            title: series.title,
            start_year: series.start_year,
            end_year: series.end_year,
            synopsis: series.synopsis,
            genres: series.genres.into_iter().map(|g| g.name).collect(),
            seasons: series.seasons.into_values().map(SeasonDto::from).collect(),
        }
    }
}

impl From<SearchResults> for SearchResultsDto {
    fn from(results: SearchResults) -> Self {
        Self {
            films: results.films.into_iter().map(FilmDto::from).collect(),
            series: results.series.into_iter().map(SeriesDto::from).collect(),
        }
    }
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            account_id: review.account_id.to_string(),
            title_kind: review.title.kind.to_string(),
            title_id: review.title.id.to_string(),
            rating: review.rating,
            comment: review.comment,
            updated_at: review.updated_at.to_rfc3339(),
        }
    }
}

impl From<Promo> for PromoDto {
    fn from(promo: Promo) -> Self {
        Self {
            id: promo.id.to_string(),
            description: promo.description,
            percentage: promo.percentage,
            expires_on: promo.expires_on.to_string(),
            scope: promo.scope.tag().to_string(),
            target_id: promo.scope.target_id().map(|id| id.to_string()),
        }
    }
}

impl CardDto {
    /// Card as seen on `today`
    pub fn at(card: Card, today: NaiveDate) -> Self {
        Self {
            id: card.id.to_string(),
            account_id: card.account_id.to_string(),
            cinema_id: card.cinema_id.to_string(),
            issued_on: card.issued_on.to_string(),
            expired: card.is_expired(today),
            renewal_date: card.renewal_date.to_string(),
        }
    }
}

impl From<Request> for RequestDto {
    fn from(request: Request) -> Self {
        Self {
            id: request.id.to_string(),
            account_id: request.account_id.to_string(),
            title: request.title,
            kind: request.kind.to_string(),
            note: request.note,
            state: request.state.to_string(),
            created_at: request.created_at.to_rfc3339(),
            closed_at: request.closed_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CastRole, PromoScope, Role};
    use uuid::Uuid;

    #[test]
    fn test_account_dto_has_no_credentials() {
        let account = Account::new(
            "giulia".to_string(),
            "Giulia Rossi".to_string(),
            "giulia@example.org".to_string(),
            Role::User,
            None,
            "secret-hash".to_string(),
            "secret-salt".to_string(),
        );

        let json = serde_json::to_string(&AccountDto::from(account)).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_series_dto_orders_seasons_and_episodes() {
        let mut series = Series::new("Dark".to_string(), 2017);
        let id = series.id;
        series
            .season_or_insert(2, None)
            .insert_episode_if_absent(Episode::new(id, 2, 1, "Beginnings and Endings".to_string()));
        let first = series.season_or_insert(1, Some(2017));
        first.insert_episode_if_absent(Episode::new(id, 1, 2, "Lies".to_string()));
        first.insert_episode_if_absent(Episode::new(id, 1, 1, "Secrets".to_string()));
        first.insert_cast_if_absent(CastMember::new(
            Person::new("Louis Hofmann".to_string()),
            CastRole::Actor { character: Some("Jonas Kahnwald".to_string()) },
        ));

        let dto = SeriesDto::from(series);
        assert_eq!(dto.seasons[0].number, 1);
        assert_eq!(dto.seasons[0].episodes[0].title, "Secrets");
        assert_eq!(dto.seasons[0].cast[0].character.as_deref(), Some("Jonas Kahnwald"));
        assert_eq!(dto.seasons[1].number, 2);
    }

    #[test]
    fn test_promo_dto_scope() {
        let genre = Genre::new("Noir".to_string());
        let promo = Promo::new(
            "Noir week".to_string(),
            20,
            chrono::NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            PromoScope::Genre(genre.id),
        );

        let dto = PromoDto::from(promo);
        assert_eq!(dto.scope, "genre");
        assert_eq!(dto.target_id, Some(genre.id.to_string()));
        assert_eq!(dto.expires_on, "2026-06-01");
    }

    #[test]
    fn test_card_dto_expiry() {
        let issued = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let card = Card::issue(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), issued).unwrap();

        let on_renewal_day = CardDto::at(card.clone(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(on_renewal_day.renewal_date, "2026-03-10");
        assert!(!on_renewal_day.expired);

        let day_after = CardDto::at(card, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert!(day_after.expired);
    }
}
