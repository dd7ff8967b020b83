// src/domain/request.rs
//
// Request Entity
//
// A user's suggestion to add a film or series to the catalog.
// Lifecycle: Open -> Closed (by an administrator). Closing is final.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::TitleKind;
use crate::domain::{DomainError, DomainResult};

pub const REQUEST_TITLE_MAX_LEN: usize = 200;
pub const REQUEST_NOTE_MAX_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: Uuid,
    pub account_id: Uuid,

    /// Free-text title the user is asking for
    pub title: String,

    pub kind: TitleKind,
    pub note: Option<String>,
    pub state: RequestState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Open,
    Closed,
}

impl Request {
    pub fn new(account_id: Uuid, title: String, kind: TitleKind, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            title: title.trim().to_string(),
            kind,
            note: note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            state: RequestState::Open,
            created_at: Utc::now(),
            closed_at: None,
            closed_by: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == RequestState::Open
    }

    pub fn close(&mut self, closed_by: Uuid) -> DomainResult<()> {
        if self.state == RequestState::Closed {
            return Err(DomainError::InvalidStateTransition(format!(
                "Request {} is already closed",
                self.id
            )));
        }

        self.state = RequestState::Closed;
        self.closed_at = Some(Utc::now());
        self.closed_by = Some(closed_by);
        Ok(())
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Open => write!(f, "open"),
            RequestState::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for RequestState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(RequestState::Open),
            "closed" => Ok(RequestState::Closed),
            other => Err(DomainError::InvalidValue(format!(
                "unknown request state '{}'",
                other
            ))),
        }
    }
}

/// Validates Request invariants
pub fn validate_request(request: &Request) -> DomainResult<()> {
    if request.title.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Requested title cannot be empty".to_string(),
        ));
    }
    if request.title.chars().count() > REQUEST_TITLE_MAX_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Requested title exceeds {} characters",
            REQUEST_TITLE_MAX_LEN
        )));
    }
    if let Some(note) = &request.note {
        if note.chars().count() > REQUEST_NOTE_MAX_LEN {
            return Err(DomainError::InvariantViolation(format!(
                "Note exceeds {} characters",
                REQUEST_NOTE_MAX_LEN
            )));
        }
    }
    if request.state == RequestState::Closed && request.closed_at.is_none() {
        return Err(DomainError::InvariantViolation(
            "Closed request must carry a closing time".to_string(),
        ));
    }
    Ok(())
}
