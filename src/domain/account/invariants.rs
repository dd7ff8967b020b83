use super::entity::{Account, Role};
use crate::domain::{DomainError, DomainResult};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;

/// Validates all Account invariants
pub fn validate_account(account: &Account) -> DomainResult<()> {
    validate_username(&account.username)?;
    validate_email(&account.email)?;
    validate_full_name(&account.full_name)?;
    validate_cinema_binding(account)?;
    Ok(())
}

/// 3-32 chars from `[A-Za-z0-9._-]`
pub fn validate_username(username: &str) -> DomainResult<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(DomainError::InvariantViolation(format!(
            "Username must be {}-{} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(DomainError::InvariantViolation(format!(
            "Username '{}' contains invalid characters",
            username
        )));
    }

    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    let mut parts = email.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.trim().is_empty() && !domain.trim().is_empty()
        }
        _ => false,
    };

    if !valid {
        return Err(DomainError::InvariantViolation(format!(
            "Invalid email address '{}'",
            email
        )));
    }
    Ok(())
}

fn validate_full_name(full_name: &str) -> DomainResult<()> {
    if full_name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Full name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// A Registrar has exactly one cinema; nobody else has one
fn validate_cinema_binding(account: &Account) -> DomainResult<()> {
    match (account.role, account.cinema_id) {
        (Role::Registrar, None) => Err(DomainError::InvariantViolation(
            "A registrar must be associated with a cinema".to_string(),
        )),
        (Role::Administrator | Role::User, Some(_)) => Err(DomainError::InvariantViolation(
            format!("A {} cannot be associated with a cinema", account.role),
        )),
        _ => Ok(()),
    }
}

/// Plain-text password policy, checked before hashing
pub fn validate_password_strength(password: &str) -> DomainResult<()> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Password must be at most {} characters",
            PASSWORD_MAX_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn account(username: &str, role: Role, cinema_id: Option<Uuid>) -> Account {
        Account::new(
            username.to_string(),
            "Giulia Bianchi".to_string(),
            "giulia@example.com".to_string(),
            role,
            cinema_id,
            "hash".to_string(),
            "salt".to_string(),
        )
    }

    #[test]
    fn test_valid_accounts() {
        assert!(validate_account(&account("giulia.b", Role::User, None)).is_ok());
        assert!(validate_account(&account("root", Role::Administrator, None)).is_ok());
        assert!(validate_account(&account("desk_1", Role::Registrar, Some(Uuid::new_v4()))).is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username("ok-name_1.x").is_ok());
    }

    #[test]
    fn test_registrar_cinema_binding() {
        assert!(validate_account(&account("desk", Role::Registrar, None)).is_err());
        assert!(validate_account(&account("user", Role::User, Some(Uuid::new_v4()))).is_err());
    }

    #[test]
    fn test_email_rules() {
        let mut acc = account("giulia", Role::User, None);
        acc.email = "no-at-sign".to_string();
        assert!(validate_account(&acc).is_err());
        acc.email = "a@b@c".to_string();
        assert!(validate_account(&acc).is_err());
        acc.email = "@example.com".to_string();
        assert!(validate_account(&acc).is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("long enough").is_ok());
        assert!(validate_password_strength(&"x".repeat(129)).is_err());
    }
}
