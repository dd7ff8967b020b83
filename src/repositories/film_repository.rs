// src/repositories/film_repository.rs
//
// Films are loaded in three passes over the same filter: the film rows,
// then their genres, then their cast. Each pass attaches children to the
// already-loaded film by id.

use std::collections::HashMap;
use std::sync::Arc;

use rusqlite::{params, Connection, Row, ToSql};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::catalog::{CastMember, CastRole, Film, Genre, Person};
use crate::error::{unique_violation, AppError, AppResult};
use crate::repositories::mapping::{
    conversion_error, like_pattern, timestamp_column, u32_column, uuid_column,
};

#[cfg_attr(test, mockall::automock)]
pub trait FilmRepository: Send + Sync {
    fn save(&self, film: &Film) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Film>>;
    fn exists(&self, id: Uuid) -> AppResult<bool>;
    fn list_all(&self) -> AppResult<Vec<Film>>;
    fn search_by_title(&self, query: &str) -> AppResult<Vec<Film>>;
    fn list_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Film>>;
    fn genre_ids(&self, film_id: Uuid) -> AppResult<Vec<Uuid>>;
    fn set_genres(&self, film_id: Uuid, genre_ids: &[Uuid]) -> AppResult<()>;
    fn add_cast_member(&self, film_id: Uuid, member: &CastMember) -> AppResult<()>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteFilmRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteFilmRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_film(row: &Row) -> Result<Film, rusqlite::Error> {
        Ok(Film {
            id: uuid_column(row, "id")?,
            title: row.get("title")?,
            release_year: row.get("release_year")?,
            duration_minutes: u32_column(row, "duration_minutes")?,
            synopsis: row.get("synopsis")?,
            genres: Vec::new(),
            cast: Vec::new(),
            created_at: timestamp_column(row, "created_at")?,
        })
    }

    fn row_to_cast_member(row: &Row) -> Result<(Uuid, CastMember), rusqlite::Error> {
        let tag: String = row.get("role")?;
        let role = CastRole::from_parts(&tag, row.get("character")?).map_err(conversion_error)?;
        let person = Person {
            id: uuid_column(row, "person_id")?,
            full_name: row.get("full_name")?,
        };
        Ok((uuid_column(row, "film_id")?, CastMember::new(person, role)))
    }

    /// Load every film matching `filter` (a WHERE clause on alias `f`)
    /// with its genres and cast attached.
    fn load_films(
        conn: &Connection,
        filter: &str,
        params: &[&dyn ToSql],
    ) -> AppResult<Vec<Film>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT f.id, f.title, f.release_year, f.duration_minutes, f.synopsis, f.created_at
             FROM films f {} ORDER BY f.title, f.id",
            filter
        ))?;

        let mut films: Vec<Film> = stmt
            .query_map(params, Self::row_to_film)?
            .collect::<Result<Vec<_>, _>>()?;

        if films.is_empty() {
            return Ok(films);
        }

        let index: HashMap<Uuid, usize> =
            films.iter().enumerate().map(|(i, f)| (f.id, i)).collect();

        let mut stmt = conn.prepare(&format!(
            "SELECT fg.film_id, g.id, g.name
             FROM film_genres fg
             JOIN genres g ON g.id = fg.genre_id
             JOIN films f ON f.id = fg.film_id
             {} ORDER BY g.name",
            filter
        ))?;

        let genres = stmt.query_map(params, |row| {
            Ok((
                uuid_column(row, "film_id")?,
                Genre {
                    id: uuid_column(row, "id")?,
                    name: row.get("name")?,
                },
            ))
        })?;

        for entry in genres {
            let (film_id, genre) = entry?;
            if let Some(&i) = index.get(&film_id) {
                films[i].insert_genre_if_absent(genre);
            }
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT fc.film_id, fc.role, fc.character, p.id AS person_id, p.full_name
             FROM film_cast fc
             JOIN people p ON p.id = fc.person_id
             JOIN films f ON f.id = fc.film_id
             {}
             ORDER BY CASE fc.role WHEN 'director' THEN 0 WHEN 'writer' THEN 1 ELSE 2 END,
                      p.full_name",
            filter
        ))?;

        let cast = stmt.query_map(params, Self::row_to_cast_member)?;

        for entry in cast {
            let (film_id, member) = entry?;
            if let Some(&i) = index.get(&film_id) {
                films[i].insert_cast_if_absent(member);
            }
        }

        Ok(films)
    }
}

impl FilmRepository for SqliteFilmRepository {
    fn save(&self, film: &Film) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO films (id, title, release_year, duration_minutes, synopsis, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                release_year = excluded.release_year,
                duration_minutes = excluded.duration_minutes,
                synopsis = excluded.synopsis",
            params![
                film.id.to_string(),
                film.title,
                film.release_year,
                film.duration_minutes,
                film.synopsis,
                film.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Film>> {
        let conn = self.pool.get()?;
        let id = id.to_string();

        let films = Self::load_films(&conn, "WHERE f.id = ?1", &[&id as &dyn ToSql])?;
        Ok(films.into_iter().next())
    }

    fn exists(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM films WHERE id = ?1)",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(found)
    }

    fn list_all(&self) -> AppResult<Vec<Film>> {
        let conn = self.pool.get()?;
        Self::load_films(&conn, "", &[])
    }

    fn search_by_title(&self, query: &str) -> AppResult<Vec<Film>> {
        let conn = self.pool.get()?;
        let pattern = like_pattern(query);

        Self::load_films(&conn, "WHERE f.title LIKE ?1 ESCAPE '\\'", &[&pattern as &dyn ToSql])
    }

    fn list_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Film>> {
        let conn = self.pool.get()?;
        let genre_id = genre_id.to_string();

        Self::load_films(
            &conn,
            "WHERE f.id IN (SELECT film_id FROM film_genres WHERE genre_id = ?1)",
            &[&genre_id as &dyn ToSql],
        )
    }

    fn genre_ids(&self, film_id: Uuid) -> AppResult<Vec<Uuid>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT genre_id FROM film_genres WHERE film_id = ?1")?;

        let ids: Vec<Uuid> = stmt
            .query_map(params![film_id.to_string()], |row| uuid_column(row, "genre_id"))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Replace the film's genre set
    fn set_genres(&self, film_id: Uuid, genre_ids: &[Uuid]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM film_genres WHERE film_id = ?1",
            params![film_id.to_string()],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO film_genres (film_id, genre_id) VALUES (?1, ?2)",
            )?;
            for genre_id in genre_ids {
                stmt.execute(params![film_id.to_string(), genre_id.to_string()])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn add_cast_member(&self, film_id: Uuid, member: &CastMember) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO film_cast (film_id, person_id, role, character) VALUES (?1, ?2, ?3, ?4)",
            params![
                film_id.to_string(),
                member.person.id.to_string(),
                member.role.tag(),
                member.role.character(),
            ],
        )
        .map_err(|e| {
            unique_violation(
                e,
                &format!(
                    "{} is already credited as {}",
                    member.person.full_name,
                    member.role.tag()
                ),
            )
        })?;

        Ok(())
    }

    /// Deletes the film together with its reviews and title-scoped promos
    fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let id = id.to_string();

        tx.execute(
            "DELETE FROM reviews WHERE title_kind = 'film' AND title_id = ?1",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM promos WHERE scope_kind = 'film' AND scope_id = ?1",
            params![id],
        )?;
        let rows_affected = tx.execute("DELETE FROM films WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tx.commit()?;
        Ok(())
    }
}
