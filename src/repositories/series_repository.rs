// src/repositories/series_repository.rs

use std::sync::Arc;

use rusqlite::{params, Connection, Row, ToSql};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::catalog::{CastMember, CastRole, Episode, Genre, Person, Season, Series};
use crate::error::{unique_violation, AppError, AppResult};
use crate::repositories::mapping::{
    conversion_error, like_pattern, opt_u32_column, opt_uuid_column, timestamp_column,
    u32_column, uuid_column,
};
use crate::repositories::series_graph::{SeriesGraphBuilder, SeriesJoinRow};

#[cfg_attr(test, mockall::automock)]
pub trait SeriesRepository: Send + Sync {
    fn save_series(&self, series: &Series) -> AppResult<()>;
    fn save_season(&self, season: &Season) -> AppResult<()>;
    fn save_episode(&self, episode: &Episode) -> AppResult<()>;
    fn add_season_cast_member(
        &self,
        series_id: Uuid,
        season_number: u32,
        member: &CastMember,
    ) -> AppResult<()>;
    fn set_genres(&self, series_id: Uuid, genre_ids: &[Uuid]) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Series>>;
    fn exists(&self, id: Uuid) -> AppResult<bool>;
    fn season_exists(&self, series_id: Uuid, season_number: u32) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<Series>>;
    fn search_by_title(&self, query: &str) -> AppResult<Vec<Series>>;
    fn list_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Series>>;
    fn genre_ids(&self, series_id: Uuid) -> AppResult<Vec<Uuid>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteSeriesRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSeriesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_join_row(row: &Row) -> Result<SeriesJoinRow, rusqlite::Error> {
        let series_id = uuid_column(row, "series_id")?;
        let series = Series {
            id: series_id,
            title: row.get("title")?,
            start_year: row.get("start_year")?,
            end_year: row.get("end_year")?,
            synopsis: row.get("synopsis")?,
            genres: Vec::new(),
            seasons: Default::default(),
            created_at: timestamp_column(row, "created_at")?,
        };

        let season_number = opt_u32_column(row, "season_number")?;

        let episode = match (season_number, opt_uuid_column(row, "episode_id")?) {
            (Some(season_number), Some(episode_id)) => Some(Episode {
                id: episode_id,
                series_id,
                season_number,
                number: u32_column(row, "episode_number")?,
                title: row.get("episode_title")?,
                duration_minutes: opt_u32_column(row, "episode_duration")?,
            }),
            _ => None,
        };

        let cast = match opt_uuid_column(row, "person_id")? {
            Some(person_id) => {
                let tag: String = row.get("cast_role")?;
                let role = CastRole::from_parts(&tag, row.get("cast_character")?)
                    .map_err(conversion_error)?;
                let person = Person {
                    id: person_id,
                    full_name: row.get("person_name")?,
                };
                Some(CastMember::new(person, role))
            }
            None => None,
        };

        Ok(SeriesJoinRow {
            series,
            season_number,
            season_year: row.get("season_year")?,
            episode,
            cast,
        })
    }

    /// Load every series matching `filter` (a WHERE clause on alias `s`)
    /// as a full graph: one flattened join for seasons, episodes and
    /// cast, then a second pass for genres.
    fn load_series(
        conn: &Connection,
        filter: &str,
        params: &[&dyn ToSql],
    ) -> AppResult<Vec<Series>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT s.id AS series_id, s.title, s.start_year, s.end_year, s.synopsis, s.created_at,
                    se.number AS season_number, se.release_year AS season_year,
                    e.id AS episode_id, e.number AS episode_number,
                    e.title AS episode_title, e.duration_minutes AS episode_duration,
                    sc.role AS cast_role, sc.character AS cast_character,
                    p.id AS person_id, p.full_name AS person_name
             FROM series s
             LEFT JOIN seasons se ON se.series_id = s.id
             LEFT JOIN episodes e
                    ON e.series_id = se.series_id AND e.season_number = se.number
             LEFT JOIN season_cast sc
                    ON sc.series_id = se.series_id AND sc.season_number = se.number
             LEFT JOIN people p ON p.id = sc.person_id
             {}
             ORDER BY s.title, s.id, se.number, e.number,
                      CASE sc.role WHEN 'director' THEN 0 WHEN 'writer' THEN 1 ELSE 2 END,
                      p.full_name",
            filter
        ))?;

        let mut builder = SeriesGraphBuilder::new();
        for row in stmt.query_map(params, Self::row_to_join_row)? {
            builder.push_row(row?)?;
        }

        if builder.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT sg.series_id, g.id, g.name
             FROM series_genres sg
             JOIN genres g ON g.id = sg.genre_id
             JOIN series s ON s.id = sg.series_id
             {} ORDER BY g.name",
            filter
        ))?;

        let genres = stmt.query_map(params, |row| {
            Ok((
                uuid_column(row, "series_id")?,
                Genre {
                    id: uuid_column(row, "id")?,
                    name: row.get("name")?,
                },
            ))
        })?;

        for entry in genres {
            let (series_id, genre) = entry?;
            builder.attach_genre(series_id, genre);
        }

        log::trace!("Rebuilt {} series graph(s)", builder.len());
        Ok(builder.finish())
    }
}

impl SeriesRepository for SqliteSeriesRepository {
    fn save_series(&self, series: &Series) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO series (id, title, start_year, end_year, synopsis, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                start_year = excluded.start_year,
                end_year = excluded.end_year,
                synopsis = excluded.synopsis",
            params![
                series.id.to_string(),
                series.title,
                series.start_year,
                series.end_year,
                series.synopsis,
                series.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn save_season(&self, season: &Season) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO seasons (series_id, number, release_year) VALUES (?1, ?2, ?3)
             ON CONFLICT(series_id, number) DO UPDATE SET release_year = excluded.release_year",
            params![season.series_id.to_string(), season.number, season.release_year],
        )?;

        Ok(())
    }

    fn save_episode(&self, episode: &Episode) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO episodes (id, series_id, season_number, number, title, duration_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                duration_minutes = excluded.duration_minutes",
            params![
                episode.id.to_string(),
                episode.series_id.to_string(),
                episode.season_number,
                episode.number,
                episode.title,
                episode.duration_minutes,
            ],
        )
        .map_err(|e| {
            unique_violation(
                e,
                &format!(
                    "season {} already has an episode {}",
                    episode.season_number, episode.number
                ),
            )
        })?;

        Ok(())
    }

    fn add_season_cast_member(
        &self,
        series_id: Uuid,
        season_number: u32,
        member: &CastMember,
    ) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO season_cast (series_id, season_number, person_id, role, character)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                series_id.to_string(),
                season_number,
                member.person.id.to_string(),
                member.role.tag(),
                member.role.character(),
            ],
        )
        .map_err(|e| {
            unique_violation(
                e,
                &format!(
                    "{} is already credited as {} in season {}",
                    member.person.full_name,
                    member.role.tag(),
                    season_number
                ),
            )
        })?;

        Ok(())
    }

    fn set_genres(&self, series_id: Uuid, genre_ids: &[Uuid]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM series_genres WHERE series_id = ?1",
            params![series_id.to_string()],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO series_genres (series_id, genre_id) VALUES (?1, ?2)",
            )?;
            for genre_id in genre_ids {
                stmt.execute(params![series_id.to_string(), genre_id.to_string()])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Series>> {
        let conn = self.pool.get()?;
        let id = id.to_string();

        let series = Self::load_series(&conn, "WHERE s.id = ?1", &[&id as &dyn ToSql])?;
        Ok(series.into_iter().next())
    }

    fn exists(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM series WHERE id = ?1)",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(found)
    }

    fn season_exists(&self, series_id: Uuid, season_number: u32) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM seasons WHERE series_id = ?1 AND number = ?2)",
            params![series_id.to_string(), season_number],
            |row| row.get(0),
        )?;

        Ok(found)
    }

    fn list_all(&self) -> AppResult<Vec<Series>> {
        let conn = self.pool.get()?;
        Self::load_series(&conn, "", &[])
    }

    fn search_by_title(&self, query: &str) -> AppResult<Vec<Series>> {
        let conn = self.pool.get()?;
        let pattern = like_pattern(query);

        Self::load_series(
            &conn,
            "WHERE s.title LIKE ?1 ESCAPE '\\'",
            &[&pattern as &dyn ToSql],
        )
    }

    fn list_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Series>> {
        let conn = self.pool.get()?;
        let genre_id = genre_id.to_string();

        Self::load_series(
            &conn,
            "WHERE s.id IN (SELECT series_id FROM series_genres WHERE genre_id = ?1)",
            &[&genre_id as &dyn ToSql],
        )
    }

    fn genre_ids(&self, series_id: Uuid) -> AppResult<Vec<Uuid>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT genre_id FROM series_genres WHERE series_id = ?1")?;

        let ids: Vec<Uuid> = stmt
            .query_map(params![series_id.to_string()], |row| uuid_column(row, "genre_id"))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Deletes the series graph together with its reviews and title-scoped promos
    fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let id = id.to_string();

        tx.execute(
            "DELETE FROM reviews WHERE title_kind = 'series' AND title_id = ?1",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM promos WHERE scope_kind = 'series' AND scope_id = ?1",
            params![id],
        )?;
        let rows_affected = tx.execute("DELETE FROM series WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::repositories::genre_repository::{GenreRepository, SqliteGenreRepository};
    use crate::repositories::person_repository::{PersonRepository, SqlitePersonRepository};

    struct Fixture {
        series: SqliteSeriesRepository,
        genres: SqliteGenreRepository,
        people: SqlitePersonRepository,
    }

    fn fixture() -> Fixture {
        let pool = Arc::new(create_memory_pool().unwrap());
        Fixture {
            series: SqliteSeriesRepository::new(pool.clone()),
            genres: SqliteGenreRepository::new(pool.clone()),
            people: SqlitePersonRepository::new(pool),
        }
    }

    fn add_season(fx: &Fixture, series: &Series, number: u32, episodes: &[&str]) {
        let mut season = Season::new(series.id, number);
        season.release_year = Some(series.start_year + number as i32 - 1);
        fx.series.save_season(&season).unwrap();
        for (i, title) in episodes.iter().enumerate() {
            let ep = Episode::new(series.id, number, i as u32 + 1, title.to_string());
            fx.series.save_episode(&ep).unwrap();
        }
    }

    #[test]
    fn test_full_graph_round_trip() {
        let fx = fixture();
        let dark = Series::new("Dark".to_string(), 2017);
        fx.series.save_series(&dark).unwrap();
        add_season(&fx, &dark, 1, &["Secrets", "Lies", "Past and Present"]);
        add_season(&fx, &dark, 2, &["Beginnings and Endings", "Dark Matter"]);

        let odar = Person::new("Baran bo Odar".to_string());
        let friese = Person::new("Jantje Friese".to_string());
        fx.people.save(&odar).unwrap();
        fx.people.save(&friese).unwrap();
        for season in [1, 2] {
            fx.series
                .add_season_cast_member(dark.id, season, &CastMember::new(odar.clone(), CastRole::Director))
                .unwrap();
            fx.series
                .add_season_cast_member(dark.id, season, &CastMember::new(friese.clone(), CastRole::Writer))
                .unwrap();
        }

        let drama = Genre::new("Drama".to_string());
        let scifi = Genre::new("Science Fiction".to_string());
        fx.genres.save(&drama).unwrap();
        fx.genres.save(&scifi).unwrap();
        fx.series.set_genres(dark.id, &[scifi.id, drama.id]).unwrap();

        let loaded = fx.series.get_by_id(dark.id).unwrap().unwrap();
        assert_eq!(loaded.seasons.len(), 2);
        assert_eq!(loaded.seasons[&1].episodes.len(), 3);
        assert_eq!(loaded.seasons[&2].episodes.len(), 2);
        assert_eq!(loaded.seasons[&2].episodes[&1].title, "Beginnings and Endings");
        assert_eq!(loaded.seasons[&1].cast.len(), 2);
        assert!(loaded.seasons[&1].cast[0].is_director());
        assert_eq!(loaded.seasons[&2].release_year, Some(2018));
        assert_eq!(loaded.genres, vec![drama, scifi]);
    }

    #[test]
    fn test_list_all_includes_empty_series() {
        let fx = fixture();
        let fargo = Series::new("Fargo".to_string(), 2014);
        let atlanta = Series::new("Atlanta".to_string(), 2016);
        fx.series.save_series(&fargo).unwrap();
        fx.series.save_series(&atlanta).unwrap();
        add_season(&fx, &fargo, 1, &["The Crocodile's Dilemma"]);

        let all = fx.series.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Atlanta");
        assert!(all[0].seasons.is_empty());
        assert_eq!(all[1].episode_count(), 1);
    }

    #[test]
    fn test_duplicate_episode_number_is_conflict() {
        let fx = fixture();
        let dark = Series::new("Dark".to_string(), 2017);
        fx.series.save_series(&dark).unwrap();
        add_season(&fx, &dark, 1, &["Secrets"]);

        let dup = Episode::new(dark.id, 1, 1, "Secrets again".to_string());
        assert!(matches!(fx.series.save_episode(&dup), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_episode_requires_season() {
        let fx = fixture();
        let dark = Series::new("Dark".to_string(), 2017);
        fx.series.save_series(&dark).unwrap();

        let orphan = Episode::new(dark.id, 3, 1, "Deja-vu".to_string());
        assert!(fx.series.save_episode(&orphan).is_err());
        assert!(!fx.series.season_exists(dark.id, 3).unwrap());
    }

    #[test]
    fn test_search_and_delete() {
        let fx = fixture();
        let dark = Series::new("Dark".to_string(), 2017);
        fx.series.save_series(&dark).unwrap();
        add_season(&fx, &dark, 1, &["Secrets"]);

        assert_eq!(fx.series.search_by_title("dar").unwrap().len(), 1);
        assert!(fx.series.search_by_title("light").unwrap().is_empty());

        fx.series.delete(dark.id).unwrap();
        assert!(!fx.series.exists(dark.id).unwrap());
        assert!(matches!(fx.series.delete(dark.id), Err(AppError::NotFound)));
    }
}
