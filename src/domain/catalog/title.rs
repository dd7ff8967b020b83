use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// The two kinds of reviewable, promotable titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleKind {
    Film,
    Series,
}

/// Reference to a film or a series by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleRef {
    pub kind: TitleKind,
    pub id: Uuid,
}

impl TitleRef {
    pub fn film(id: Uuid) -> Self {
        Self {
            kind: TitleKind::Film,
            id,
        }
    }

    pub fn series(id: Uuid) -> Self {
        Self {
            kind: TitleKind::Series,
            id,
        }
    }
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleKind::Film => write!(f, "film"),
            TitleKind::Series => write!(f, "series"),
        }
    }
}

impl FromStr for TitleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "film" => Ok(TitleKind::Film),
            "series" => Ok(TitleKind::Series),
            other => Err(DomainError::InvalidValue(format!(
                "unknown title kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TitleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
