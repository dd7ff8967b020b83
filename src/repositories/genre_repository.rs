// src/repositories/genre_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::catalog::Genre;
use crate::error::{unique_violation, AppError, AppResult};
use crate::repositories::mapping::uuid_column;

#[cfg_attr(test, mockall::automock)]
pub trait GenreRepository: Send + Sync {
    fn save(&self, genre: &Genre) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Genre>>;
    fn get_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    fn list_all(&self) -> AppResult<Vec<Genre>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteGenreRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteGenreRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_genre(row: &Row) -> Result<Genre, rusqlite::Error> {
        Ok(Genre {
            id: uuid_column(row, "id")?,
            name: row.get("name")?,
        })
    }
}

impl GenreRepository for SqliteGenreRepository {
    fn save(&self, genre: &Genre) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO genres (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![genre.id.to_string(), genre.name],
        )
        .map_err(|e| unique_violation(e, &format!("genre '{}' already exists", genre.name)))?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM genres WHERE id = ?1")?;

        match stmt.query_row(params![id.to_string()], Self::row_to_genre) {
            Ok(genre) => Ok(Some(genre)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM genres WHERE name = ?1")?;

        match stmt.query_row(params![name.trim()], Self::row_to_genre) {
            Ok(genre) => Ok(Some(genre)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Genre>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM genres ORDER BY name")?;

        let genres: Vec<Genre> = stmt
            .query_map([], Self::row_to_genre)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(genres)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected =
            conn.execute("DELETE FROM genres WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[test]
    fn test_names_are_unique_ignoring_case() {
        let repo = SqliteGenreRepository::new(Arc::new(create_memory_pool().unwrap()));
        let noir = Genre::new("Noir".to_string());
        repo.save(&noir).unwrap();

        let err = repo.save(&Genre::new("NOIR".to_string())).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        assert_eq!(repo.get_by_name("noir").unwrap(), Some(noir));
    }

    #[test]
    fn test_list_sorted() {
        let repo = SqliteGenreRepository::new(Arc::new(create_memory_pool().unwrap()));
        repo.save(&Genre::new("Western".to_string())).unwrap();
        repo.save(&Genre::new("Comedy".to_string())).unwrap();

        let names: Vec<String> = repo.list_all().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Comedy", "Western"]);
    }
}
