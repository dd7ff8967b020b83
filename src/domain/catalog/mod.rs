//! Catalog domain: films, series and everything hanging off them.
//!
//! Critical Catalog Invariants:
//!
//! 1. A season is identified by (series id, season number)
//! 2. An episode is identified by (series id, season number, episode number)
//! 3. A cast member appears at most once per (person, role) in a film or season
//! 4. Genres are shared tags; deleting a title never deletes a genre

pub mod film;
pub mod genre;
pub mod invariants;
pub mod person;
pub mod series;
pub mod title;

pub use film::Film;
pub use genre::Genre;
pub use invariants::{
    validate_episode, validate_film, validate_genre, validate_person, validate_season,
    validate_series,
};
pub use person::{CastMember, CastRole, Person};
pub use series::{Episode, Season, Series};
pub use title::{TitleKind, TitleRef};
