//! Pipeline Module
//! One load's worth of derived tables: normalized votes, favourites and the
//! country menu. Rebuilt in full whenever a new raw table arrives.

use crate::data::integrity::{self, IntegrityReport};
use crate::data::processor::{MissingPointsPolicy, ProcessorError, VoteProcessor};
use polars::prelude::*;
use tracing::info;

/// Derived, read-only tables for the three dashboard views.
#[derive(Debug, Clone)]
pub struct VoteTables {
    /// Final-round votes with `points`.
    pub votes: DataFrame,
    /// 12-point counts per (from_country, to_country).
    pub favourites: DataFrame,
    /// Sorted distinct receiving countries.
    pub countries: Vec<String>,
    pub integrity: IntegrityReport,
}

impl VoteTables {
    pub fn build(raw: &DataFrame, policy: MissingPointsPolicy) -> Result<Self, ProcessorError> {
        let votes = VoteProcessor::normalize(raw, policy)?;
        let favourites = VoteProcessor::favourites(&votes)?;
        let countries = VoteProcessor::countries(&votes)?;

        let integrity = integrity::check_now(&votes)?;
        integrity.log();

        info!(
            "Prepared {} final-round votes, {} favourite pairs, {} countries",
            votes.height(),
            favourites.height(),
            countries.len()
        );
        Ok(Self {
            votes,
            favourites,
            countries,
            integrity,
        })
    }

    /// Per-year totals for `country`; empty for an unknown country.
    pub fn country_totals(&self, country: &str) -> Result<DataFrame, ProcessorError> {
        VoteProcessor::country_totals(&self.votes, country)
    }

    /// Country preselected in the menu.
    pub fn default_country(&self) -> Option<&str> {
        self.countries.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::*;

    #[test]
    fn builds_all_views_from_raw_votes() {
        let raw = df!(
            ROUND => ["final", "final", "final", "semi-final-2"],
            FROM_COUNTRY => ["se", "no", "dk", "fi"],
            TO_COUNTRY => ["no", "se", "se", "se"],
            YEAR => [2015i32, 2015, 2016, 2016],
            JURY_POINTS => [Some(12i32), None, Some(5), Some(12)],
            TOTAL_POINTS => [Some(24i32), Some(12), Some(10), Some(20)],
        )
        .unwrap();

        let tables = VoteTables::build(&raw, MissingPointsPolicy::Reject).unwrap();
        assert_eq!(tables.votes.height(), 3);
        assert_eq!(tables.favourites.height(), 2);
        assert_eq!(tables.countries, vec!["no", "se"]);
        assert_eq!(tables.default_country(), Some("no"));
        assert!(tables.integrity.is_clean());

        let totals = VoteProcessor::country_total_rows(&tables.country_totals("se").unwrap()).unwrap();
        let per_year: Vec<(i32, i64)> = totals.iter().map(|t| (t.year, t.points)).collect();
        assert_eq!(per_year, vec![(2015, 12), (2016, 5)]);
    }

    #[test]
    fn null_country_is_reported_not_fatal() {
        let raw = df!(
            ROUND => ["final", "final"],
            FROM_COUNTRY => ["se", "no"],
            TO_COUNTRY => [Some("no"), None],
            YEAR => [2015i32, 2015],
            JURY_POINTS => [Some(12i32), Some(8)],
            TOTAL_POINTS => [Some(24i32), Some(16)],
        )
        .unwrap();

        let tables = VoteTables::build(&raw, MissingPointsPolicy::Reject).unwrap();
        assert_eq!(tables.votes.height(), 2);
        assert_eq!(tables.countries, vec!["no"]);
        assert_eq!(tables.integrity.null_fields, 1);
        assert!(!tables.integrity.is_clean());
    }
}
