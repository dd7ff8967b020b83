// src/repositories/series_graph.rs
//
// Rebuilds series graphs from a flattened LEFT JOIN.
//
// The join returns one row per (series, season, episode, cast member).
// Parents repeat on every row, children may be NULL. The fold keeps the
// first occurrence of each node and ignores repeats:
//
//   series   keyed by series id
//   season   keyed by (series id, season number)
//   episode  keyed by (series id, season number, episode number)
//   cast     keyed by (person id, role) within a season

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::catalog::{CastMember, Episode, Genre, Series};
use crate::domain::{DomainError, DomainResult};

/// One row of the series / season / episode / cast join
#[derive(Debug, Clone)]
pub struct SeriesJoinRow {
    /// Series columns; seasons and genres are always empty here
    pub series: Series,
    pub season_number: Option<u32>,
    pub season_year: Option<i32>,
    pub episode: Option<Episode>,
    pub cast: Option<CastMember>,
}

/// Accumulates join rows into series graphs, preserving row order
#[derive(Debug, Default)]
pub struct SeriesGraphBuilder {
    series: Vec<Series>,
    index: HashMap<Uuid, usize>,
}

impl SeriesGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: SeriesJoinRow) -> DomainResult<()> {
        let series_id = row.series.id;

        let slot = match self.index.get(&series_id) {
            Some(&i) => i,
            None => {
                self.series.push(row.series);
                self.index.insert(series_id, self.series.len() - 1);
                self.series.len() - 1
            }
        };
        let series = &mut self.series[slot];

        let Some(season_number) = row.season_number else {
            if row.episode.is_some() || row.cast.is_some() {
                return Err(DomainError::InvariantViolation(format!(
                    "series {} has episode or cast data without a season",
                    series_id
                )));
            }
            return Ok(());
        };

        let season = series.season_or_insert(season_number, row.season_year);

        if let Some(episode) = row.episode {
            if episode.series_id != series_id || episode.season_number != season_number {
                return Err(DomainError::InvariantViolation(format!(
                    "episode {} does not belong to season {} of series {}",
                    episode.id, season_number, series_id
                )));
            }
            season.insert_episode_if_absent(episode);
        }

        if let Some(member) = row.cast {
            season.insert_cast_if_absent(member);
        }

        Ok(())
    }

    /// Attach a genre to an already-built series. Unknown ids are ignored.
    pub fn attach_genre(&mut self, series_id: Uuid, genre: Genre) -> bool {
        match self.index.get(&series_id) {
            Some(&i) => self.series[i].insert_genre_if_absent(genre),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn finish(self) -> Vec<Series> {
        self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CastRole, Person};

    fn row(
        series: &Series,
        season: Option<u32>,
        episode: Option<(u32, &str)>,
        cast: Option<CastMember>,
    ) -> SeriesJoinRow {
        SeriesJoinRow {
            series: series.clone(),
            season_number: season,
            season_year: None,
            episode: match (season, episode) {
                (Some(s), Some((n, title))) => {
                    let mut ep = Episode::new(series.id, s, n, title.to_string());
                    // ids are stable per (season, number) in a real join
                    ep.id = Uuid::from_u128(((s as u128) << 32) | n as u128);
                    Some(ep)
                }
                _ => None,
            },
            cast,
        }
    }

    #[test]
    fn test_series_without_seasons() {
        let dark = Series::new("Dark".to_string(), 2017);
        let mut builder = SeriesGraphBuilder::new();
        builder.push_row(row(&dark, None, None, None)).unwrap();

        let built = builder.finish();
        assert_eq!(built.len(), 1);
        assert!(built[0].seasons.is_empty());
    }

    #[test]
    fn test_cross_product_rows_fold_without_duplicates() {
        let dark = Series::new("Dark".to_string(), 2017);
        let odar = CastMember::new(Person::new("Baran bo Odar".to_string()), CastRole::Director);
        let friese = CastMember::new(Person::new("Jantje Friese".to_string()), CastRole::Writer);

        let mut builder = SeriesGraphBuilder::new();
        // 2 episodes x 2 cast members in season 1
        for ep in [(1, "Secrets"), (2, "Lies")] {
            for member in [&odar, &friese] {
                builder
                    .push_row(row(&dark, Some(1), Some(ep), Some(member.clone())))
                    .unwrap();
            }
        }

        let built = builder.finish();
        let season = &built[0].seasons[&1];
        assert_eq!(season.episodes.len(), 2);
        assert_eq!(season.cast.len(), 2);
    }

    #[test]
    fn test_same_episode_number_in_different_seasons_kept_apart() {
        let dark = Series::new("Dark".to_string(), 2017);
        let mut builder = SeriesGraphBuilder::new();
        builder.push_row(row(&dark, Some(1), Some((1, "Secrets")), None)).unwrap();
        builder
            .push_row(row(&dark, Some(2), Some((1, "Beginnings and Endings")), None))
            .unwrap();

        let built = builder.finish();
        assert_eq!(built[0].seasons.len(), 2);
        assert_eq!(built[0].episode_count(), 2);
        assert_eq!(built[0].seasons[&2].episodes[&1].title, "Beginnings and Endings");
    }

    #[test]
    fn test_same_person_in_two_roles_kept() {
        let fargo = Series::new("Fargo".to_string(), 2014);
        let hawley = Person::new("Noah Hawley".to_string());

        let mut builder = SeriesGraphBuilder::new();
        builder
            .push_row(row(&fargo, Some(1), None, Some(CastMember::new(hawley.clone(), CastRole::Writer))))
            .unwrap();
        builder
            .push_row(row(&fargo, Some(1), None, Some(CastMember::new(hawley.clone(), CastRole::Director))))
            .unwrap();
        builder
            .push_row(row(&fargo, Some(1), None, Some(CastMember::new(hawley, CastRole::Writer))))
            .unwrap();

        assert_eq!(builder.finish()[0].seasons[&1].cast.len(), 2);
    }

    #[test]
    fn test_row_order_is_preserved_and_genres_attach_by_id() {
        let b = Series::new("Babylon Berlin".to_string(), 2017);
        let a = Series::new("Atlanta".to_string(), 2016);
        let mut builder = SeriesGraphBuilder::new();
        builder.push_row(row(&b, None, None, None)).unwrap();
        builder.push_row(row(&a, None, None, None)).unwrap();
        builder.push_row(row(&b, Some(1), None, None)).unwrap();

        let drama = Genre::new("Drama".to_string());
        assert!(builder.attach_genre(b.id, drama.clone()));
        assert!(!builder.attach_genre(b.id, drama));
        assert!(!builder.attach_genre(Uuid::new_v4(), Genre::new("Noir".to_string())));

        let built = builder.finish();
        assert_eq!(built[0].id, b.id);
        assert_eq!(built[1].id, a.id);
        assert_eq!(built[0].genres.len(), 1);
    }

    #[test]
    fn test_episode_without_season_is_rejected() {
        let dark = Series::new("Dark".to_string(), 2017);
        let mut bad = row(&dark, None, None, None);
        bad.episode = Some(Episode::new(dark.id, 1, 1, "Secrets".to_string()));

        let mut builder = SeriesGraphBuilder::new();
        assert!(builder.push_row(bad).is_err());
    }
}
