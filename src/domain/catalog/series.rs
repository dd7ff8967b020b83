use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::genre::Genre;
use super::person::{insert_cast_if_absent, CastMember};
use super::title::TitleRef;

/// A series owns its seasons, each season owns its episodes and cast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    /// Internal immutable identifier
    pub id: Uuid,

    pub title: String,

    pub start_year: i32,

    /// `None` while still running
    pub end_year: Option<i32>,

    pub synopsis: Option<String>,

    pub genres: Vec<Genre>,

    /// Keyed by season number
    pub seasons: BTreeMap<u32, Season>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub series_id: Uuid,

    /// 1-based, unique within the series
    pub number: u32,

    pub release_year: Option<i32>,

    /// Keyed by episode number
    pub episodes: BTreeMap<u32, Episode>,

    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: Uuid,
    pub series_id: Uuid,
    pub season_number: u32,

    /// 1-based, unique within the season
    pub number: u32,

    pub title: String,
    pub duration_minutes: Option<u32>,
}

impl Series {
    pub fn new(title: String, start_year: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            start_year,
            end_year: None,
            synopsis: None,
            genres: Vec::new(),
            seasons: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn title_ref(&self) -> TitleRef {
        TitleRef::series(self.id)
    }

    /// Return the season with this number, creating an empty one if absent
    pub fn season_or_insert(&mut self, number: u32, release_year: Option<i32>) -> &mut Season {
        let series_id = self.id;
        self.seasons.entry(number).or_insert_with(|| {
            let mut season = Season::new(series_id, number);
            season.release_year = release_year;
            season
        })
    }

    pub fn insert_genre_if_absent(&mut self, genre: Genre) -> bool {
        if self.genres.iter().any(|g| g.id == genre.id) {
            return false;
        }
        self.genres.push(genre);
        true
    }

    pub fn episode_count(&self) -> usize {
        self.seasons.values().map(|s| s.episodes.len()).sum()
    }
}

impl Season {
    pub fn new(series_id: Uuid, number: u32) -> Self {
        Self {
            series_id,
            number,
            release_year: None,
            episodes: BTreeMap::new(),
            cast: Vec::new(),
        }
    }

    /// Insert unless an episode with the same number is already attached
    pub fn insert_episode_if_absent(&mut self, episode: Episode) -> bool {
        if self.episodes.contains_key(&episode.number) {
            return false;
        }
        self.episodes.insert(episode.number, episode);
        true
    }

    pub fn insert_cast_if_absent(&mut self, member: CastMember) -> bool {
        insert_cast_if_absent(&mut self.cast, member)
    }
}

impl Episode {
    pub fn new(series_id: Uuid, season_number: u32, number: u32, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            series_id,
            season_number,
            number,
            title,
            duration_minutes: None,
        }
    }

    /// Identity of an episode: (series, season, episode number)
    pub fn key(&self) -> (Uuid, u32, u32) {
        (self.series_id, self.season_number, self.number)
    }
}
