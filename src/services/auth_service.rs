// src/services/auth_service.rs
use crate::domain::account::{validate_account, validate_password_strength, Account, Role};
use crate::error::{AppError, AppResult};
use crate::events::{AccountCreated, EventBus, LoginFailed};
use crate::repositories::{AccountRepository, CinemaRepository};
use crate::security::{generate_salt, hash_password, verify_password};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    account_repo: Arc<dyn AccountRepository>,
    cinema_repo: Arc<dyn CinemaRepository>,
    event_bus: Arc<EventBus>,
}

impl AuthService {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        cinema_repo: Arc<dyn CinemaRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            account_repo,
            cinema_repo,
            event_bus,
        }
    }

    /// Authenticate by username and password.
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    pub fn login(&self, username: &str, password: &str) -> AppResult<Account> {
        let username = username.trim();

        match self.account_repo.get_by_username(username)? {
            Some(account) if verify_password(password, &account.salt, &account.password_hash) => {
                log::debug!("'{}' logged in as {}", account.username, account.role);
                Ok(account)
            }
            _ => {
                self.event_bus.emit(LoginFailed::new(username.to_string()));
                Err(AppError::Unauthorized)
            }
        }
    }

    /// Self-service sign up. Always creates a `User`.
    pub fn register_user(&self, request: CreateAccountRequest) -> AppResult<Account> {
        self.create_account(request, Role::User, None)
    }

    /// Create an account in any role. Registrars must name an existing cinema.
    pub fn create_account(
        &self,
        request: CreateAccountRequest,
        role: Role,
        cinema_id: Option<Uuid>,
    ) -> AppResult<Account> {
        validate_password_strength(&request.password).map_err(AppError::Domain)?;

        if let Some(cinema_id) = cinema_id {
            if self.cinema_repo.get_by_id(cinema_id)?.is_none() {
                return Err(AppError::NotFound);
            }
        }

        let salt = generate_salt();
        let password_hash = hash_password(&request.password, &salt);

        let account = Account::new(
            request.username.trim().to_string(),
            request.full_name.trim().to_string(),
            request.email.trim().to_string(),
            role,
            cinema_id,
            password_hash,
            salt,
        );

        validate_account(&account).map_err(AppError::Domain)?;
        self.account_repo.save(&account)?;

        self.event_bus.emit(AccountCreated::new(
            account.id,
            account.username.clone(),
            account.role.to_string(),
        ));

        Ok(account)
    }

    /// Replace the password after checking the current one
    pub fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let mut account = self
            .account_repo
            .get_by_id(account_id)?
            .ok_or(AppError::NotFound)?;

        if !verify_password(current_password, &account.salt, &account.password_hash) {
            return Err(AppError::Unauthorized);
        }

        validate_password_strength(new_password).map_err(AppError::Domain)?;

        let salt = generate_salt();
        account.set_credentials(hash_password(new_password, &salt), salt);
        self.account_repo
            .update_password(account.id, &account.password_hash, &account.salt)?;

        log::info!("password changed for '{}'", account.username);
        Ok(())
    }

    /// Bootstrap: create the first administrator unless one already exists.
    ///
    /// Returns the new account, or `None` when nothing was created.
    pub fn ensure_administrator(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<Account>> {
        if self.account_repo.count_by_role(Role::Administrator)? > 0 {
            return Ok(None);
        }

        let request = CreateAccountRequest {
            username: username.to_string(),
            full_name: "Administrator".to_string(),
            email: format!("{}@localhost", username.trim()),
            password: password.to_string(),
        };

        self.create_account(request, Role::Administrator, None).map(Some)
    }

    pub fn list_accounts(&self, role: Role) -> AppResult<Vec<Account>> {
        self.account_repo.list_by_role(role)
    }

    pub fn get_account(&self, account_id: Uuid) -> AppResult<Option<Account>> {
        self.account_repo.get_by_id(account_id)
    }

    pub fn find_account(&self, username: &str) -> AppResult<Option<Account>> {
        self.account_repo.get_by_username(username.trim())
    }
}
