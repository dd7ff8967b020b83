// src/repositories/account_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::account::{Account, Role};
use crate::error::{unique_violation, AppError, AppResult};
use crate::repositories::mapping::{opt_uuid_column, parsed_column, timestamp_column, uuid_column};

#[cfg_attr(test, mockall::automock)]
pub trait AccountRepository: Send + Sync {
    fn save(&self, account: &Account) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
    fn get_by_username(&self, username: &str) -> AppResult<Option<Account>>;
    fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>>;
    fn update_password(&self, id: Uuid, password_hash: &str, salt: &str) -> AppResult<()>;
    fn count_by_role(&self, role: Role) -> AppResult<u64>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteAccountRepository {
    pool: Arc<ConnectionPool>,
}

const ACCOUNT_COLUMNS: &str =
    "id, username, full_name, email, role, cinema_id, password_hash, salt, created_at";

impl SqliteAccountRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
        Ok(Account {
            id: uuid_column(row, "id")?,
            username: row.get("username")?,
            full_name: row.get("full_name")?,
            email: row.get("email")?,
            role: parsed_column(row, "role")?,
            cinema_id: opt_uuid_column(row, "cinema_id")?,
            password_hash: row.get("password_hash")?,
            salt: row.get("salt")?,
            created_at: timestamp_column(row, "created_at")?,
        })
    }
}

impl AccountRepository for SqliteAccountRepository {
    fn save(&self, account: &Account) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO accounts (
                id, username, full_name, email, role, cinema_id, password_hash, salt, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                full_name = excluded.full_name,
                email = excluded.email,
                role = excluded.role,
                cinema_id = excluded.cinema_id,
                password_hash = excluded.password_hash,
                salt = excluded.salt",
            params![
                account.id.to_string(),
                account.username,
                account.full_name,
                account.email,
                account.role.to_string(),
                account.cinema_id.map(|id| id.to_string()),
                account.password_hash,
                account.salt,
                account.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| unique_violation(e, &format!("username '{}' is already taken", account.username)))?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts WHERE id = ?1",
            ACCOUNT_COLUMNS
        ))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_account) {
            Ok(account) => Ok(Some(account)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// Case-insensitive, the column is `COLLATE NOCASE`
    fn get_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts WHERE username = ?1",
            ACCOUNT_COLUMNS
        ))?;

        match stmt.query_row(params![username], Self::row_to_account) {
            Ok(account) => Ok(Some(account)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_by_role(&self, role: Role) -> AppResult<Vec<Account>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts WHERE role = ?1 ORDER BY username",
            ACCOUNT_COLUMNS
        ))?;

        let accounts: Vec<Account> = stmt
            .query_map(params![role.to_string()], Self::row_to_account)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    fn update_password(&self, id: Uuid, password_hash: &str, salt: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE accounts SET password_hash = ?1, salt = ?2 WHERE id = ?3",
            params![password_hash, salt, id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn count_by_role(&self, role: Role) -> AppResult<u64> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM accounts WHERE role = ?1",
            params![role.to_string()],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected =
            conn.execute("DELETE FROM accounts WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
