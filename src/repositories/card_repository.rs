// src/repositories/card_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::card::Card;
use crate::error::{unique_violation, AppError, AppResult};
use crate::repositories::mapping::{date_column, format_date, uuid_column};

#[cfg_attr(test, mockall::automock)]
pub trait CardRepository: Send + Sync {
    fn save(&self, card: &Card) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Card>>;
    fn get_for_account_and_cinema(
        &self,
        account_id: Uuid,
        cinema_id: Uuid,
    ) -> AppResult<Option<Card>>;
    fn list_by_cinema(&self, cinema_id: Uuid) -> AppResult<Vec<Card>>;
    fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Card>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SqliteCardRepository {
    pool: Arc<ConnectionPool>,
}

const CARD_COLUMNS: &str = "id, account_id, cinema_id, registered_by, issued_on, renewal_date";

impl SqliteCardRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_card(row: &Row) -> Result<Card, rusqlite::Error> {
        Ok(Card {
            id: uuid_column(row, "id")?,
            account_id: uuid_column(row, "account_id")?,
            cinema_id: uuid_column(row, "cinema_id")?,
            registered_by: uuid_column(row, "registered_by")?,
            issued_on: date_column(row, "issued_on")?,
            renewal_date: date_column(row, "renewal_date")?,
        })
    }

    fn query_cards(&self, filter: &str, key: Uuid) -> AppResult<Vec<Card>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cards WHERE {} = ?1 ORDER BY issued_on, id",
            CARD_COLUMNS, filter
        ))?;

        let cards: Vec<Card> = stmt
            .query_map(params![key.to_string()], Self::row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }
}

impl CardRepository for SqliteCardRepository {
    fn save(&self, card: &Card) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO cards (id, account_id, cinema_id, registered_by, issued_on, renewal_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET renewal_date = excluded.renewal_date",
            params![
                card.id.to_string(),
                card.account_id.to_string(),
                card.cinema_id.to_string(),
                card.registered_by.to_string(),
                format_date(card.issued_on),
                format_date(card.renewal_date),
            ],
        )
        .map_err(|e| unique_violation(e, "account already holds a card at this cinema"))?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Card>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS))?;

        match stmt.query_row(params![id.to_string()], Self::row_to_card) {
            Ok(card) => Ok(Some(card)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_for_account_and_cinema(
        &self,
        account_id: Uuid,
        cinema_id: Uuid,
    ) -> AppResult<Option<Card>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cards WHERE account_id = ?1 AND cinema_id = ?2",
            CARD_COLUMNS
        ))?;

        match stmt.query_row(
            params![account_id.to_string(), cinema_id.to_string()],
            Self::row_to_card,
        ) {
            Ok(card) => Ok(Some(card)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_by_cinema(&self, cinema_id: Uuid) -> AppResult<Vec<Card>> {
        self.query_cards("cinema_id", cinema_id)
    }

    fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Card>> {
        self.query_cards("account_id", account_id)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected =
            conn.execute("DELETE FROM cards WHERE id = ?1", params![id.to_string()])?;

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
    use crate::domain::account::{Account, Role};
    use crate::domain::cinema::Cinema;
    use crate::repositories::account_repository::{AccountRepository, SqliteAccountRepository};
    use crate::repositories::cinema_repository::{CinemaRepository, SqliteCinemaRepository};
    use chrono::NaiveDate;

    struct Fixture {
        cards: SqliteCardRepository,
        holder: Account,
        registrar: Account,
        cinema: Cinema,
    }

    fn fixture() -> Fixture {
        let pool = Arc::new(create_memory_pool().unwrap());
        let cinemas = SqliteCinemaRepository::new(pool.clone());
        let accounts = SqliteAccountRepository::new(pool.clone());

        let cinema = Cinema::new("Anteo".to_string(), "Milano".to_string(), None);
        cinemas.save(&cinema).unwrap();

        let holder = Account::new(
            "giulia".to_string(),
            "Giulia Rossi".to_string(),
            "giulia@example.org".to_string(),
            Role::User,
            None,
            "h".repeat(128),
            "s".repeat(32),
        );
        let registrar = Account::new(
            "desk".to_string(),
            "Front Desk".to_string(),
            "desk@example.org".to_string(),
            Role::Registrar,
            Some(cinema.id),
            "h".repeat(128),
            "s".repeat(32),
        );
        accounts.save(&holder).unwrap();
        accounts.save(&registrar).unwrap();

        Fixture {
            cards: SqliteCardRepository::new(pool),
            holder,
            registrar,
            cinema,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 10).unwrap()
    }

    #[test]
    fn test_save_and_renew() {
        let fx = fixture();
        let mut card = Card::issue(fx.holder.id, fx.cinema.id, fx.registrar.id, today()).unwrap();
        fx.cards.save(&card).unwrap();

        card.renew(today()).unwrap();
        fx.cards.save(&card).unwrap();

        let stored = fx.cards.get_by_id(card.id).unwrap().unwrap();
        assert_eq!(stored.renewal_date, NaiveDate::from_ymd_opt(2028, 4, 10).unwrap());
        assert_eq!(stored.issued_on, today());
        assert_eq!(
            fx.cards.get_for_account_and_cinema(fx.holder.id, fx.cinema.id).unwrap(),
            Some(stored)
        );
    }

    #[test]
    fn test_one_card_per_account_and_cinema() {
        let fx = fixture();
        let first = Card::issue(fx.holder.id, fx.cinema.id, fx.registrar.id, today()).unwrap();
        let second = Card::issue(fx.holder.id, fx.cinema.id, fx.registrar.id, today()).unwrap();
        fx.cards.save(&first).unwrap();

        assert!(matches!(fx.cards.save(&second), Err(AppError::Conflict(_))));
        assert_eq!(fx.cards.list_by_cinema(fx.cinema.id).unwrap().len(), 1);
        assert_eq!(fx.cards.list_by_account(fx.holder.id).unwrap().len(), 1);

        fx.cards.delete(first.id).unwrap();
        assert!(fx.cards.list_by_account(fx.holder.id).unwrap().is_empty());
    }
}
