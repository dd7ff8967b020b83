// src/repositories/ranking_repository.rs
//
// Read-only aggregate reports. Everything is computed in SQL.

use std::sync::Arc;

use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::ranking::{DirectorRank, ReviewerRank};
use crate::error::AppResult;
use crate::repositories::mapping::{u32_column, uuid_column};

#[cfg_attr(test, mockall::automock)]
pub trait RankingRepository: Send + Sync {
    /// Accounts ordered by number of reviews written
    fn top_reviewers(&self, limit: u32) -> AppResult<Vec<ReviewerRank>>;

    /// Directors ordered by the average rating of the titles they directed
    fn top_directors(&self, limit: u32, min_reviews: u32) -> AppResult<Vec<DirectorRank>>;
}

pub struct SqliteRankingRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteRankingRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_reviewer(row: &Row) -> Result<ReviewerRank, rusqlite::Error> {
        Ok(ReviewerRank {
            account_id: uuid_column(row, "id")?,
            username: row.get("username")?,
            review_count: u32_column(row, "review_count")?,
            average_rating: row.get("average_rating")?,
        })
    }

    fn row_to_director(row: &Row) -> Result<DirectorRank, rusqlite::Error> {
        Ok(DirectorRank {
            person_id: uuid_column(row, "id")?,
            full_name: row.get("full_name")?,
            titles_directed: u32_column(row, "titles_directed")?,
            review_count: u32_column(row, "review_count")?,
            average_rating: row.get("average_rating")?,
        })
    }
}

impl RankingRepository for SqliteRankingRepository {
    fn top_reviewers(&self, limit: u32) -> AppResult<Vec<ReviewerRank>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT a.id, a.username,
                    COUNT(r.id) AS review_count,
                    AVG(r.rating) AS average_rating
             FROM accounts a
             JOIN reviews r ON r.account_id = a.id
             GROUP BY a.id, a.username
             ORDER BY review_count DESC, a.username
             LIMIT ?1",
        )?;

        let ranks: Vec<ReviewerRank> = stmt
            .query_map(params![limit], Self::row_to_reviewer)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ranks)
    }

    fn top_directors(&self, limit: u32, min_reviews: u32) -> AppResult<Vec<DirectorRank>> {
        let conn = self.pool.get()?;

        // A series counts once per director however many seasons they directed
        let mut stmt = conn.prepare(
            "WITH directed AS (
                SELECT person_id, 'film' AS title_kind, film_id AS title_id
                FROM film_cast WHERE role = 'director'
                UNION
                SELECT person_id, 'series' AS title_kind, series_id AS title_id
                FROM season_cast WHERE role = 'director'
             )
             SELECT p.id, p.full_name,
                    COUNT(DISTINCT d.title_kind || ':' || d.title_id) AS titles_directed,
                    COUNT(r.id) AS review_count,
                    COALESCE(AVG(r.rating), 0.0) AS average_rating
             FROM directed d
             JOIN people p ON p.id = d.person_id
             LEFT JOIN reviews r ON r.title_kind = d.title_kind AND r.title_id = d.title_id
             GROUP BY p.id, p.full_name
             HAVING COUNT(r.id) >= ?2
             ORDER BY average_rating DESC, review_count DESC, p.full_name
             LIMIT ?1",
        )?;

        let ranks: Vec<DirectorRank> = stmt
            .query_map(params![limit, min_reviews], Self::row_to_director)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ranks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::domain::account::{Account, Role};
    use crate::domain::catalog::{CastMember, CastRole, Film, Person, Season, Series, TitleRef};
    use crate::domain::review::Review;
    use crate::repositories::account_repository::{AccountRepository, SqliteAccountRepository};
    use crate::repositories::film_repository::{FilmRepository, SqliteFilmRepository};
    use crate::repositories::person_repository::{PersonRepository, SqlitePersonRepository};
    use crate::repositories::review_repository::{ReviewRepository, SqliteReviewRepository};
    use crate::repositories::series_repository::{SeriesRepository, SqliteSeriesRepository};

    struct Fixture {
        ranking: SqliteRankingRepository,
        accounts: SqliteAccountRepository,
        reviews: SqliteReviewRepository,
        films: SqliteFilmRepository,
        series: SqliteSeriesRepository,
        people: SqlitePersonRepository,
    }

    fn fixture() -> Fixture {
        let pool = Arc::new(create_memory_pool().unwrap());
        Fixture {
            ranking: SqliteRankingRepository::new(pool.clone()),
            accounts: SqliteAccountRepository::new(pool.clone()),
            reviews: SqliteReviewRepository::new(pool.clone()),
            films: SqliteFilmRepository::new(pool.clone()),
            series: SqliteSeriesRepository::new(pool.clone()),
            people: SqlitePersonRepository::new(pool),
        }
    }

    fn user(fx: &Fixture, name: &str) -> Account {
        let account = Account::new(
            name.to_string(),
            name.to_string(),
            format!("{}@example.org", name),
            Role::User,
            None,
            "h".repeat(128),
            "s".repeat(32),
        );
        fx.accounts.save(&account).unwrap();
        account
    }

    #[test]
    fn test_top_reviewers_by_count_then_name() {
        let fx = fixture();
        let anna = user(&fx, "anna");
        let bruno = user(&fx, "bruno");
        let carla = user(&fx, "carla");
        user(&fx, "silent");

        for _ in 0..2 {
            fx.reviews
                .upsert(&Review::new(carla.id, TitleRef::film(uuid::Uuid::new_v4()), 2, None))
                .unwrap();
        }
        fx.reviews
            .upsert(&Review::new(anna.id, TitleRef::film(uuid::Uuid::new_v4()), 5, None))
            .unwrap();
        fx.reviews
            .upsert(&Review::new(bruno.id, TitleRef::film(uuid::Uuid::new_v4()), 4, None))
            .unwrap();

        let ranks = fx.ranking.top_reviewers(10).unwrap();
        let names: Vec<&str> = ranks.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["carla", "anna", "bruno"]);
        assert_eq!(ranks[0].review_count, 2);
        assert_eq!(ranks[0].average_rating, 2.0);

        assert_eq!(fx.ranking.top_reviewers(1).unwrap().len(), 1);
    }

    #[test]
    fn test_top_directors_across_films_and_series() {
        let fx = fixture();
        let anna = user(&fx, "anna");
        let bruno = user(&fx, "bruno");

        let hawley = Person::new("Noah Hawley".to_string());
        let leone = Person::new("Sergio Leone".to_string());
        let nobody = Person::new("Unreviewed Director".to_string());
        for p in [&hawley, &leone, &nobody] {
            fx.people.save(p).unwrap();
        }

        let fargo = Series::new("Fargo".to_string(), 2014);
        fx.series.save_series(&fargo).unwrap();
        for n in [1, 2] {
            fx.series.save_season(&Season::new(fargo.id, n)).unwrap();
            fx.series
                .add_season_cast_member(fargo.id, n, &CastMember::new(hawley.clone(), CastRole::Director))
                .unwrap();
        }

        let western = Film::new("Per qualche dollaro in più".to_string(), 1965, 132);
        let other = Film::new("Giù la testa".to_string(), 1971, 157);
        for (film, director) in [(&western, &leone), (&other, &nobody)] {
            fx.films.save(film).unwrap();
            fx.films
                .add_cast_member(film.id, &CastMember::new(director.clone(), CastRole::Director))
                .unwrap();
        }

        fx.reviews.upsert(&Review::new(anna.id, fargo.title_ref(), 5, None)).unwrap();
        fx.reviews.upsert(&Review::new(bruno.id, fargo.title_ref(), 4, None)).unwrap();
        fx.reviews.upsert(&Review::new(anna.id, western.title_ref(), 3, None)).unwrap();

        let ranks = fx.ranking.top_directors(10, 1).unwrap();
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[0].full_name, "Noah Hawley");
        assert_eq!(ranks[0].titles_directed, 1);
        assert_eq!(ranks[0].review_count, 2);
        assert_eq!(ranks[0].average_rating, 4.5);
        assert_eq!(ranks[1].full_name, "Sergio Leone");

        let everyone = fx.ranking.top_directors(10, 0).unwrap();
        assert_eq!(everyone.len(), 3);
        assert_eq!(everyone[2].review_count, 0);
    }
}
