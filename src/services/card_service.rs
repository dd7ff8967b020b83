// src/services/card_service.rs
use crate::domain::account::{Account, Role};
use crate::domain::card::Card;
use crate::error::{AppError, AppResult};
use crate::events::{CardRegistered, CardRenewed, EventBus};
use crate::repositories::{AccountRepository, CardRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

pub struct CardService {
    card_repo: Arc<dyn CardRepository>,
    account_repo: Arc<dyn AccountRepository>,
    event_bus: Arc<EventBus>,
}

impl CardService {
    pub fn new(
        card_repo: Arc<dyn CardRepository>,
        account_repo: Arc<dyn AccountRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            card_repo,
            account_repo,
            event_bus,
        }
    }

    /// Issue a card for `username` at the registrar's own cinema
    pub fn register_card(
        &self,
        registrar: &Account,
        username: &str,
        today: NaiveDate,
    ) -> AppResult<Card> {
        let cinema_id = registrar_cinema(registrar)?;

        let holder = self
            .account_repo
            .get_by_username(username.trim())?
            .ok_or(AppError::NotFound)?;

        if holder.role != Role::User {
            return Err(AppError::Forbidden(format!(
                "cards are only issued to user accounts, '{}' is a {}",
                holder.username, holder.role
            )));
        }

        if self
            .card_repo
            .get_for_account_and_cinema(holder.id, cinema_id)?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "'{}' already holds a card at this cinema",
                holder.username
            )));
        }

        let card = Card::issue(holder.id, cinema_id, registrar.id, today)?;
        self.card_repo.save(&card)?;

        self.event_bus
            .emit(CardRegistered::new(card.id, holder.id, cinema_id));

        Ok(card)
    }

    /// Extend a card issued at the registrar's cinema by one year
    pub fn renew_card(
        &self,
        registrar: &Account,
        card_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Card> {
        let cinema_id = registrar_cinema(registrar)?;

        let mut card = self
            .card_repo
            .get_by_id(card_id)?
            .ok_or(AppError::NotFound)?;

        if card.cinema_id != cinema_id {
            return Err(AppError::Forbidden(
                "card belongs to another cinema".to_string(),
            ));
        }

        card.renew(today)?;
        self.card_repo.save(&card)?;

        self.event_bus
            .emit(CardRenewed::new(card.id, card.renewal_date));

        Ok(card)
    }

    pub fn cards_for_cinema(&self, cinema_id: Uuid) -> AppResult<Vec<Card>> {
        self.card_repo.list_by_cinema(cinema_id)
    }

    pub fn cards_for_account(&self, account_id: Uuid) -> AppResult<Vec<Card>> {
        self.card_repo.list_by_account(account_id)
    }
}

fn registrar_cinema(account: &Account) -> AppResult<Uuid> {
    match (account.role, account.cinema_id) {
        (Role::Registrar, Some(cinema_id)) => Ok(cinema_id),
        _ => Err(AppError::Forbidden(
            "only registrars can manage cards".to_string(),
        )),
    }
}
