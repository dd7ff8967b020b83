// src/repositories/cinema_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::cinema::Cinema;
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::uuid_column;

#[cfg_attr(test, mockall::automock)]
pub trait CinemaRepository: Send + Sync {
    fn save(&self, cinema: &Cinema) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Cinema>>;
    fn list_all(&self) -> AppResult<Vec<Cinema>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteCinemaRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCinemaRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_cinema(row: &Row) -> Result<Cinema, rusqlite::Error> {
        Ok(Cinema {
            id: uuid_column(row, "id")?,
            name: row.get("name")?,
            city: row.get("city")?,
            address: row.get("address")?,
        })
    }
}

impl CinemaRepository for SqliteCinemaRepository {
    fn save(&self, cinema: &Cinema) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO cinemas (id, name, city, address) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name, city = excluded.city, address = excluded.address",
            params![
                cinema.id.to_string(),
                cinema.name,
                cinema.city,
                cinema.address,
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Cinema>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name, city, address FROM cinemas WHERE id = ?1")?;

        match stmt.query_row(params![id.to_string()], Self::row_to_cinema) {
            Ok(cinema) => Ok(Some(cinema)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Cinema>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT id, name, city, address FROM cinemas ORDER BY city, name")?;

        let cinemas: Vec<Cinema> = stmt
            .query_map([], Self::row_to_cinema)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cinemas)
    }

    /// Fails while registrars are still bound to the cinema
    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected =
            conn.execute("DELETE FROM cinemas WHERE id = ?1", params![id.to_string()])?;

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
    fn test_save_list_delete() {
        let repo = SqliteCinemaRepository::new(Arc::new(create_memory_pool().unwrap()));
        let roma = Cinema::new("Barberini".to_string(), "Roma".to_string(), None);
        let milano = Cinema::new("Anteo".to_string(), "Milano".to_string(), Some("Via Milazzo 9".to_string()));
        repo.save(&roma).unwrap();
        repo.save(&milano).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all, vec![milano.clone(), roma.clone()]);

        repo.delete(roma.id).unwrap();
        assert!(repo.get_by_id(roma.id).unwrap().is_none());
        assert!(matches!(repo.delete(roma.id), Err(AppError::NotFound)));
    }
}
