// src/domain/cinema.rs
//
// Cinema Entity
//
// A venue where loyalty cards are issued. Registrars are bound to one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cinema {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
}

impl Cinema {
    pub fn new(name: String, city: String, address: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            city,
            address,
        }
    }
}

/// Validates Cinema invariants
pub fn validate_cinema(cinema: &Cinema) -> DomainResult<()> {
    if cinema.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Cinema name cannot be empty".to_string(),
        ));
    }

    if cinema.city.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Cinema city cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cinema_validation() {
        let ok = Cinema::new("Odeon".to_string(), "Milano".to_string(), None);
        assert!(validate_cinema(&ok).is_ok());

        let no_city = Cinema::new("Odeon".to_string(), " ".to_string(), None);
        assert!(validate_cinema(&no_city).is_err());
    }
}
