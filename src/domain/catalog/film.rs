use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::genre::Genre;
use super::person::{insert_cast_if_absent, CastMember, Person};
use super::title::TitleRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Film {
    /// Internal immutable identifier
    pub id: Uuid,

    pub title: String,

    pub release_year: i32,

    /// Running time in minutes
    pub duration_minutes: u32,

    pub synopsis: Option<String>,

    /// Attached genre tags, ordered by name when loaded
    pub genres: Vec<Genre>,

    /// Credits, unique per (person, role)
    pub cast: Vec<CastMember>,

    pub created_at: DateTime<Utc>,
}

impl Film {
    pub fn new(title: String, release_year: i32, duration_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            release_year,
            duration_minutes,
            synopsis: None,
            genres: Vec::new(),
            cast: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn title_ref(&self) -> TitleRef {
        TitleRef::film(self.id)
    }

    pub fn directors(&self) -> impl Iterator<Item = &Person> {
        self.cast.iter().filter(|m| m.is_director()).map(|m| &m.person)
    }

    pub fn insert_genre_if_absent(&mut self, genre: Genre) -> bool {
        if self.genres.iter().any(|g| g.id == genre.id) {
            return false;
        }
        self.genres.push(genre);
        true
    }

    pub fn insert_cast_if_absent(&mut self, member: CastMember) -> bool {
        insert_cast_if_absent(&mut self.cast, member)
    }
}
