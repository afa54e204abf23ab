//! Data-integrity checks on normalized votes.
//!
//! The published dataset guarantees lowercase country codes, contest years
//! from 1956 onwards and non-negative points. Violations are reported, never
//! repaired.

use crate::data::processor::ProcessorError;
use crate::data::schema::{FIRST_CONTEST_YEAR, FROM_COUNTRY, POINTS, TO_COUNTRY, YEAR};
use chrono::Datelike;
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Codes that are not lowercase or shorter than two characters.
    pub bad_country_codes: BTreeSet<String>,
    /// Years outside [1956, `max_year`].
    pub bad_years: BTreeSet<i32>,
    /// Votes with negative points.
    pub negative_points: usize,
    /// Votes with a null country code or year.
    pub null_fields: usize,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.bad_country_codes.is_empty()
            && self.bad_years.is_empty()
            && self.negative_points == 0
            && self.null_fields == 0
    }

    /// Emit one warning per violation kind.
    pub fn log(&self) {
        if !self.bad_country_codes.is_empty() {
            warn!("Malformed country codes: {:?}", self.bad_country_codes);
        }
        if !self.bad_years.is_empty() {
            warn!("Years outside the contest range: {:?}", self.bad_years);
        }
        if self.negative_points > 0 {
            warn!("{} vote(s) carry negative points", self.negative_points);
        }
        if self.null_fields > 0 {
            warn!("{} vote(s) lack a country code or year", self.null_fields);
        }
    }
}

fn is_country_code(code: &str) -> bool {
    code.chars().count() >= 2 && !code.chars().any(char::is_uppercase)
}

/// Check normalized votes against the dataset guarantees, with `max_year`
/// as the latest acceptable contest year.
pub fn check(votes: &DataFrame, max_year: i32) -> Result<IntegrityReport, ProcessorError> {
    let from = votes.column(FROM_COUNTRY)?.str()?;
    let to = votes.column(TO_COUNTRY)?.str()?;
    let years = votes.column(YEAR)?.i32()?;
    let points = votes.column(POINTS)?.i32()?;

    let mut report = IntegrityReport::default();
    for (((from, to), year), points) in from.into_iter().zip(to).zip(years).zip(points) {
        if from.is_none() || to.is_none() || year.is_none() {
            report.null_fields += 1;
        }
        for code in [from, to].into_iter().flatten() {
            if !is_country_code(code) {
                report.bad_country_codes.insert(code.to_string());
            }
        }
        if let Some(year) = year.filter(|y| !(FIRST_CONTEST_YEAR..=max_year).contains(y)) {
            report.bad_years.insert(year);
        }
        if points.is_some_and(|p| p < 0) {
            report.negative_points += 1;
        }
    }
    Ok(report)
}

/// [`check`] with the current calendar year as the upper bound.
pub fn check_now(votes: &DataFrame) -> Result<IntegrityReport, ProcessorError> {
    check(votes, chrono::Local::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(
        from: &[Option<&str>],
        to: &[Option<&str>],
        years: &[Option<i32>],
        points: &[i32],
    ) -> DataFrame {
        df!(
            FROM_COUNTRY => from,
            TO_COUNTRY => to,
            YEAR => years,
            POINTS => points,
        )
        .unwrap()
    }

    #[test]
    fn clean_votes_pass() {
        let df = votes(
            &[Some("se"), Some("gb")],
            &[Some("no"), Some("yu")],
            &[Some(1974), Some(1989)],
            &[12, 0],
        );
        assert!(check(&df, 2023).unwrap().is_clean());
    }

    #[test]
    fn reports_each_violation_kind() {
        let df = votes(
            &[Some("SE"), Some("x"), Some("se")],
            &[Some("no"), Some("no"), Some("no")],
            &[Some(2020), Some(1950), Some(2030)],
            &[12, 8, -1],
        );
        let report = check(&df, 2025).unwrap();

        assert_eq!(
            report.bad_country_codes,
            BTreeSet::from(["SE".to_string(), "x".to_string()])
        );
        assert_eq!(report.bad_years, BTreeSet::from([1950, 2030]));
        assert_eq!(report.negative_points, 1);
        assert_eq!(report.null_fields, 0);
        assert!(!report.is_clean());
    }

    #[test]
    fn null_country_or_year_is_reported() {
        let df = votes(
            &[Some("se"), Some("dk"), Some("fi")],
            &[None, Some("no"), Some("no")],
            &[Some(2020), None, Some(2020)],
            &[12, 8, 6],
        );
        let report = check(&df, 2025).unwrap();

        assert_eq!(report.null_fields, 2);
        assert!(report.bad_country_codes.is_empty());
        assert!(report.bad_years.is_empty());
    }
}
