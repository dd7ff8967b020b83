// src/repositories/review_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::catalog::TitleRef;
use crate::domain::review::{RatingSummary, Review};
use crate::error::{unique_violation, AppError, AppResult};
use crate::repositories::mapping::{parsed_column, timestamp_column, u32_column, uuid_column};

#[cfg_attr(test, mockall::automock)]
pub trait ReviewRepository: Send + Sync {
    /// Insert, or update rating and comment of an existing review with the same id
    fn upsert(&self, review: &Review) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;
    fn get_for_account_and_title(
        &self,
        account_id: Uuid,
        title: TitleRef,
    ) -> AppResult<Option<Review>>;
    fn list_for_title(&self, title: TitleRef) -> AppResult<Vec<Review>>;
    fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Review>>;
    fn average_for_title(&self, title: TitleRef) -> AppResult<RatingSummary>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteReviewRepository {
    pool: Arc<ConnectionPool>,
}

const REVIEW_COLUMNS: &str =
    "id, account_id, title_kind, title_id, rating, comment, created_at, updated_at";

impl SqliteReviewRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_review(row: &Row) -> Result<Review, rusqlite::Error> {
        Ok(Review {
            id: uuid_column(row, "id")?,
            account_id: uuid_column(row, "account_id")?,
            title: TitleRef {
                kind: parsed_column(row, "title_kind")?,
                id: uuid_column(row, "title_id")?,
            },
            rating: row.get("rating")?,
            comment: row.get("comment")?,
            created_at: timestamp_column(row, "created_at")?,
            updated_at: timestamp_column(row, "updated_at")?,
        })
    }
}

impl ReviewRepository for SqliteReviewRepository {
    fn upsert(&self, review: &Review) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO reviews (
                id, account_id, title_kind, title_id, rating, comment, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                rating = excluded.rating,
                comment = excluded.comment,
                updated_at = excluded.updated_at",
            params![
                review.id.to_string(),
                review.account_id.to_string(),
                review.title.kind.to_string(),
                review.title.id.to_string(),
                review.rating,
                review.comment,
                review.created_at.to_rfc3339(),
                review.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| unique_violation(e, &format!("{} was already reviewed by this account", review.title)))?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_review) {
            Ok(review) => Ok(Some(review)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_for_account_and_title(
        &self,
        account_id: Uuid,
        title: TitleRef,
    ) -> AppResult<Option<Review>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reviews
             WHERE account_id = ?1 AND title_kind = ?2 AND title_id = ?3",
            REVIEW_COLUMNS
        ))?;

        match stmt.query_row(
            params![
                account_id.to_string(),
                title.kind.to_string(),
                title.id.to_string()
            ],
            Self::row_to_review,
        ) {
            Ok(review) => Ok(Some(review)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_for_title(&self, title: TitleRef) -> AppResult<Vec<Review>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reviews
             WHERE title_kind = ?1 AND title_id = ?2
             ORDER BY updated_at DESC",
            REVIEW_COLUMNS
        ))?;

        let reviews: Vec<Review> = stmt
            .query_map(
                params![title.kind.to_string(), title.id.to_string()],
                Self::row_to_review,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Review>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reviews WHERE account_id = ?1 ORDER BY updated_at DESC",
            REVIEW_COLUMNS
        ))?;

        let reviews: Vec<Review> = stmt
            .query_map(params![account_id.to_string()], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reviews)
    }

    fn average_for_title(&self, title: TitleRef) -> AppResult<RatingSummary> {
        let conn = self.pool.get()?;

        let summary = conn.query_row(
            "SELECT AVG(rating) AS average, COUNT(*) AS count FROM reviews
             WHERE title_kind = ?1 AND title_id = ?2",
            params![title.kind.to_string(), title.id.to_string()],
            |row| {
                Ok(RatingSummary {
                    average: row.get("average")?,
                    count: u32_column(row, "count")?,
                })
            },
        )?;

        Ok(summary)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected =
            conn.execute("DELETE FROM reviews WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
