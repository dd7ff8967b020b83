use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Someone who appears in the credits of a film or a season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub full_name: String,
}

impl Person {
    pub fn new(full_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
        }
    }
}

/// What a person did on a title
///
/// Stored as a type tag (`actor`, `director`, `writer`) plus an optional
/// character name that only actors carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CastRole {
    Actor { character: Option<String> },
    Director,
    Writer,
}

impl CastRole {
    pub fn tag(&self) -> &'static str {
        match self {
            CastRole::Actor { .. } => "actor",
            CastRole::Director => "director",
            CastRole::Writer => "writer",
        }
    }

    pub fn character(&self) -> Option<&str> {
        match self {
            CastRole::Actor { character } => character.as_deref(),
            _ => None,
        }
    }

    /// Rebuild a role from its stored type tag
    pub fn from_parts(tag: &str, character: Option<String>) -> DomainResult<Self> {
        match tag {
            "actor" => Ok(CastRole::Actor { character }),
            "director" => Ok(CastRole::Director),
            "writer" => Ok(CastRole::Writer),
            other => Err(DomainError::InvalidValue(format!(
                "unknown cast role '{}'",
                other
            ))),
        }
    }
}

/// A person credited on a film or a season in a given role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub person: Person,
    pub role: CastRole,
}

impl CastMember {
    pub fn new(person: Person, role: CastRole) -> Self {
        Self { person, role }
    }

    /// Identity within one film or season
    pub fn key(&self) -> (Uuid, &'static str) {
        (self.person.id, self.role.tag())
    }

    pub fn is_director(&self) -> bool {
        self.role == CastRole::Director
    }
}

/// Insert `member` unless an entry with the same (person, role) exists.
/// Returns whether it was inserted.
pub(crate) fn insert_cast_if_absent(cast: &mut Vec<CastMember>, member: CastMember) -> bool {
    if cast.iter().any(|m| m.key() == member.key()) {
        return false;
    }
    cast.push(member);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_dispatch_from_tag() {
        let actor = CastRole::from_parts("actor", Some("Neo".to_string())).unwrap();
        assert_eq!(actor.character(), Some("Neo"));
        assert_eq!(CastRole::from_parts("director", Some("ignored".to_string())).unwrap(), CastRole::Director);
        assert_eq!(CastRole::from_parts("writer", None).unwrap().tag(), "writer");
        assert!(CastRole::from_parts("grip", None).is_err());
    }

    #[test]
    fn test_same_person_in_two_roles_is_kept_twice() {
        let person = Person::new("Clint Eastwood".to_string());
        let mut cast = Vec::new();

        assert!(insert_cast_if_absent(&mut cast, CastMember::new(person.clone(), CastRole::Director)));
        assert!(insert_cast_if_absent(
            &mut cast,
            CastMember::new(person.clone(), CastRole::Actor { character: None })
        ));
        assert!(!insert_cast_if_absent(&mut cast, CastMember::new(person, CastRole::Director)));

        assert_eq!(cast.len(), 2);
    }
}
