use super::film::Film;
use super::genre::Genre;
use super::person::Person;
use super::series::{Episode, Season, Series};
use crate::domain::{DomainError, DomainResult};

/// First year a motion picture could plausibly carry
pub const MIN_YEAR: i32 = 1888;
pub const MAX_YEAR: i32 = 2100;

pub fn validate_film(film: &Film) -> DomainResult<()> {
    validate_title(&film.title)?;
    validate_year(film.release_year)?;

    if film.duration_minutes == 0 {
        return Err(DomainError::InvariantViolation(
            "Film duration must be positive".to_string(),
        ));
    }
    Ok(())
}

/// If present, the end year cannot precede the start year
pub fn validate_series(series: &Series) -> DomainResult<()> {
    validate_title(&series.title)?;
    validate_year(series.start_year)?;

    if let Some(end) = series.end_year {
        validate_year(end)?;
        if end < series.start_year {
            return Err(DomainError::InvariantViolation(format!(
                "Series end year {} is before start year {}",
                end, series.start_year
            )));
        }
    }
    Ok(())
}

pub fn validate_season(season: &Season) -> DomainResult<()> {
    if season.number == 0 {
        return Err(DomainError::InvariantViolation(
            "Season numbers start at 1".to_string(),
        ));
    }
    if let Some(year) = season.release_year {
        validate_year(year)?;
    }
    Ok(())
}

pub fn validate_episode(episode: &Episode) -> DomainResult<()> {
    if episode.season_number == 0 || episode.number == 0 {
        return Err(DomainError::InvariantViolation(
            "Season and episode numbers start at 1".to_string(),
        ));
    }
    validate_title(&episode.title)?;

    if episode.duration_minutes == Some(0) {
        return Err(DomainError::InvariantViolation(
            "Episode duration must be positive".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_genre(genre: &Genre) -> DomainResult<()> {
    if genre.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Genre name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_person(person: &Person) -> DomainResult<()> {
    if person.full_name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Person name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_year(year: i32) -> DomainResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DomainError::InvariantViolation(format!(
            "Year {} is out of range {}-{}",
            year, MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_film_rules() {
        assert!(validate_film(&Film::new("Alien".to_string(), 1979, 117)).is_ok());
        assert!(validate_film(&Film::new("".to_string(), 1979, 117)).is_err());
        assert!(validate_film(&Film::new("Alien".to_string(), 1700, 117)).is_err());
        assert!(validate_film(&Film::new("Alien".to_string(), 1979, 0)).is_err());
    }

    #[test]
    fn test_series_years() {
        let mut series = Series::new("The Wire".to_string(), 2002);
        assert!(validate_series(&series).is_ok());

        series.end_year = Some(2008);
        assert!(validate_series(&series).is_ok());

        series.end_year = Some(2001);
        assert!(validate_series(&series).is_err());
    }

    #[test]
    fn test_season_and_episode_numbers() {
        let id = Uuid::new_v4();
        assert!(validate_season(&Season::new(id, 0)).is_err());
        assert!(validate_season(&Season::new(id, 1)).is_ok());

        assert!(validate_episode(&Episode::new(id, 1, 0, "Pilot".to_string())).is_err());
        assert!(validate_episode(&Episode::new(id, 1, 1, " ".to_string())).is_err());
        assert!(validate_episode(&Episode::new(id, 1, 1, "Pilot".to_string())).is_ok());
    }
}
