use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// A credentialed identity
///
/// The credential pair (`password_hash`, `salt`) never leaves the service
/// layer; it is skipped when an account is serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Login name, unique case-insensitively
    pub username: String,

    pub full_name: String,

    pub email: String,

    pub role: Role,

    /// The single cinema a Registrar works for. Always `None` for other roles.
    pub cinema_id: Option<Uuid>,

    #[serde(skip_serializing)]
    pub password_hash: String,

    #[serde(skip_serializing)]
    pub salt: String,

    pub created_at: DateTime<Utc>,
}

/// Access role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    Registrar,
    User,
}

impl Account {
    pub fn new(
        username: String,
        full_name: String,
        email: String,
        role: Role,
        cinema_id: Option<Uuid>,
        password_hash: String,
        salt: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            full_name,
            email,
            role,
            cinema_id,
            password_hash,
            salt,
            created_at: Utc::now(),
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Replace the stored credential pair
    pub fn set_credentials(&mut self, password_hash: String, salt: String) {
        self.password_hash = password_hash;
        self.salt = salt;
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => write!(f, "administrator"),
            Role::Registrar => write!(f, "registrar"),
            Role::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Role::Administrator),
            "registrar" => Ok(Role::Registrar),
            "user" => Ok(Role::User),
            other => Err(DomainError::InvalidValue(format!("unknown role '{}'", other))),
        }
    }
}
