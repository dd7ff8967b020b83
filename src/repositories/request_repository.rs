// src/repositories/request_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::request::{Request, RequestState};
use crate::error::{AppError, AppResult};
use crate::repositories::mapping::{
    opt_timestamp_column, opt_uuid_column, parsed_column, timestamp_column, uuid_column,
};

#[cfg_attr(test, mockall::automock)]
pub trait RequestRepository: Send + Sync {
    fn save(&self, request: &Request) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Request>>;
    fn list_by_state(&self, state: RequestState) -> AppResult<Vec<Request>>;
    fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Request>>;
}

pub struct SqliteRequestRepository {
    pool: Arc<ConnectionPool>,
}

const REQUEST_COLUMNS: &str =
    "id, account_id, title, kind, note, state, created_at, closed_at, closed_by";

impl SqliteRequestRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_request(row: &Row) -> Result<Request, rusqlite::Error> {
        Ok(Request {
            id: uuid_column(row, "id")?,
            account_id: uuid_column(row, "account_id")?,
            title: row.get("title")?,
            kind: parsed_column(row, "kind")?,
            note: row.get("note")?,
            state: parsed_column(row, "state")?,
            created_at: timestamp_column(row, "created_at")?,
            closed_at: opt_timestamp_column(row, "closed_at")?,
            closed_by: opt_uuid_column(row, "closed_by")?,
        })
    }
}

impl RequestRepository for SqliteRequestRepository {
    fn save(&self, request: &Request) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO requests (
                id, account_id, title, kind, note, state, created_at, closed_at, closed_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                note = excluded.note,
                state = excluded.state,
                closed_at = excluded.closed_at,
                closed_by = excluded.closed_by",
            params![
                request.id.to_string(),
                request.account_id.to_string(),
                request.title,
                request.kind.to_string(),
                request.note,
                request.state.to_string(),
                request.created_at.to_rfc3339(),
                request.closed_at.map(|t| t.to_rfc3339()),
                request.closed_by.map(|id| id.to_string()),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Request>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM requests WHERE id = ?1", REQUEST_COLUMNS))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_request) {
            Ok(request) => Ok(Some(request)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// Oldest first, so open requests are handled in arrival order
    fn list_by_state(&self, state: RequestState) -> AppResult<Vec<Request>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM requests WHERE state = ?1 ORDER BY created_at, id",
            REQUEST_COLUMNS
        ))?;

        let requests: Vec<Request> = stmt
            .query_map(params![state.to_string()], Self::row_to_request)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(requests)
    }

    fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Request>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM requests WHERE account_id = ?1 ORDER BY created_at DESC, id",
            REQUEST_COLUMNS
        ))?;

        let requests: Vec<Request> = stmt
            .query_map(params![account_id.to_string()], Self::row_to_request)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(requests)
    }
}
