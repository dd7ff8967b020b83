// src/repositories/promo_repository.rs

use std::sync::Arc;

use chrono::NaiveDate;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::promo::{Promo, PromoScope};
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::{
    conversion_error, date_column, format_date, opt_uuid_column, timestamp_column, uuid_column,
};

#[cfg_attr(test, mockall::automock)]
pub trait PromoRepository: Send + Sync {
    fn save(&self, promo: &Promo) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Promo>>;
    fn list_all(&self) -> AppResult<Vec<Promo>>;
    /// Promos whose expiration date is `today` or later
    fn list_active(&self, today: NaiveDate) -> AppResult<Vec<Promo>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqlitePromoRepository {
    pool: Arc<ConnectionPool>,
}

const PROMO_COLUMNS: &str =
    "id, description, percentage, expires_on, scope_kind, scope_id, created_at";

impl SqlitePromoRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_promo(row: &Row) -> Result<Promo, rusqlite::Error> {
        let tag: String = row.get("scope_kind")?;
        let scope = PromoScope::from_parts(&tag, opt_uuid_column(row, "scope_id")?)
            .map_err(conversion_error)?;

        Ok(Promo {
            id: uuid_column(row, "id")?,
            description: row.get("description")?,
            percentage: row.get("percentage")?,
            expires_on: date_column(row, "expires_on")?,
            scope,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl PromoRepository for SqlitePromoRepository {
    fn save(&self, promo: &Promo) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO promos (
                id, description, percentage, expires_on, scope_kind, scope_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                description = excluded.description,
                percentage = excluded.percentage,
                expires_on = excluded.expires_on,
                scope_kind = excluded.scope_kind,
                scope_id = excluded.scope_id",
            params![
                promo.id.to_string(),
                promo.description,
                promo.percentage,
                format_date(promo.expires_on),
                promo.scope.tag(),
                promo.scope.target_id().map(|id| id.to_string()),
                promo.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Promo>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM promos WHERE id = ?1", PROMO_COLUMNS))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_promo) {
            Ok(promo) => Ok(Some(promo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Promo>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM promos ORDER BY expires_on DESC, percentage DESC",
            PROMO_COLUMNS
        ))?;

        let promos: Vec<Promo> = stmt
            .query_map([], Self::row_to_promo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(promos)
    }

    fn list_active(&self, today: NaiveDate) -> AppResult<Vec<Promo>> {
        let conn = self.pool.get()?;

        // ISO dates compare correctly as text
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM promos WHERE expires_on >= ?1
             ORDER BY percentage DESC, expires_on",
            PROMO_COLUMNS
        ))?;

        let promos: Vec<Promo> = stmt
            .query_map(params![format_date(today)], Self::row_to_promo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(promos)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected =
            conn.execute("DELETE FROM promos WHERE id = ?1", params![id.to_string()])?;

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
    use crate::domain::catalog::TitleRef;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_scope_survives_storage() {
        let repo = SqlitePromoRepository::new(Arc::new(create_memory_pool().unwrap()));
        let film_id = Uuid::new_v4();
        let genre_id = Uuid::new_v4();

        let scopes = [
            PromoScope::Global,
            PromoScope::Genre(genre_id),
            PromoScope::Title(TitleRef::film(film_id)),
            PromoScope::Title(TitleRef::series(film_id)),
        ];
        for scope in scopes {
            let promo = Promo::new("Spring".to_string(), 10, date(2026, 5, 1), scope);
            repo.save(&promo).unwrap();
            assert_eq!(repo.get_by_id(promo.id).unwrap().unwrap().scope, scope);
        }
    }

    #[test]
    fn test_list_active_includes_expiration_day() {
        let repo = SqlitePromoRepository::new(Arc::new(create_memory_pool().unwrap()));
        let expired = Promo::new("Winter".to_string(), 30, date(2026, 3, 14), PromoScope::Global);
        let last_day = Promo::new("Spring".to_string(), 15, date(2026, 3, 15), PromoScope::Global);
        let later = Promo::new("Summer".to_string(), 20, date(2026, 8, 31), PromoScope::Global);
        for p in [&expired, &last_day, &later] {
            repo.save(p).unwrap();
        }

        let active: Vec<Uuid> = repo
            .list_active(date(2026, 3, 15))
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(active, vec![later.id, last_day.id]);
        assert_eq!(repo.list_all().unwrap().len(), 3);

        repo.delete(expired.id).unwrap();
        assert!(matches!(repo.delete(expired.id), Err(AppError::NotFound)));
    }
}
