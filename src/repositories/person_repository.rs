// src/repositories/person_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::catalog::Person;
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::{like_pattern, uuid_column};

#[cfg_attr(test, mockall::automock)]
pub trait PersonRepository: Send + Sync {
    fn save(&self, person: &Person) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Person>>;
    fn search_by_name(&self, query: &str) -> AppResult<Vec<Person>>;
}

pub struct SqlitePersonRepository {
    pool: Arc<ConnectionPool>,
}

impl SqlitePersonRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_person(row: &Row) -> Result<Person, rusqlite::Error> {
        Ok(Person {
            id: uuid_column(row, "id")?,
            full_name: row.get("full_name")?,
        })
    }
}

impl PersonRepository for SqlitePersonRepository {
    fn save(&self, person: &Person) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO people (id, full_name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET full_name = excluded.full_name",
            params![person.id.to_string(), person.full_name],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Person>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, full_name FROM people WHERE id = ?1")?;

        match stmt.query_row(params![id.to_string()], Self::row_to_person) {
            Ok(person) => Ok(Some(person)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn search_by_name(&self, query: &str) -> AppResult<Vec<Person>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, full_name FROM people
             WHERE full_name LIKE ?1 ESCAPE '\\'
             ORDER BY full_name",
        )?;

        let people: Vec<Person> = stmt
            .query_map(params![like_pattern(query)], Self::row_to_person)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(people)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[test]
    fn test_search_by_name() {
        let repo = SqlitePersonRepository::new(Arc::new(create_memory_pool().unwrap()));
        repo.save(&Person::new("Sergio Leone".to_string())).unwrap();
        repo.save(&Person::new("Federico Fellini".to_string())).unwrap();

        let found = repo.search_by_name("leo").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "Sergio Leone");

        assert_eq!(repo.search_by_name("").unwrap().len(), 2);
    }
}
