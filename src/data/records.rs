//! Record engine: the same pipeline as [`VoteProcessor`](crate::data::VoteProcessor),
//! computed over typed rows instead of a columnar frame.

use crate::data::model::{CountryYearTotal, FavouriteCount, Vote, VoteRecord};
use crate::data::processor::{MissingPointsPolicy, ProcessorError};
use crate::data::schema::{
    FAVOURITE_SCORE, FINAL_ROUND, FROM_COUNTRY, JURY_POINTS, ROUND, TOTAL_POINTS, TO_COUNTRY,
    YEAR,
};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

impl VoteRecord {
    /// Convert the raw votes frame into records.
    ///
    /// Country codes and year are required; a null in any of them fails the
    /// conversion.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<VoteRecord>, ProcessorError> {
        let round = df.column(ROUND)?.str()?;
        let from = df.column(FROM_COUNTRY)?.str()?;
        let to = df.column(TO_COUNTRY)?.str()?;
        let year = df.column(YEAR)?.i32()?;
        let jury = df.column(JURY_POINTS)?.i32()?;
        let total = df.column(TOTAL_POINTS)?.i32()?;

        (0..df.height())
            .map(|row| -> Result<VoteRecord, ProcessorError> {
                let required = |column: &'static str, value: Option<&str>| {
                    value
                        .map(str::to_string)
                        .ok_or(ProcessorError::NullField { column, row })
                };
                Ok(VoteRecord {
                    round: round.get(row).map(str::to_string),
                    from_country: required(FROM_COUNTRY, from.get(row))?,
                    to_country: required(TO_COUNTRY, to.get(row))?,
                    year: year
                        .get(row)
                        .ok_or(ProcessorError::NullField { column: YEAR, row })?,
                    jury_points: jury.get(row),
                    total_points: total.get(row),
                })
            })
            .collect()
    }
}

/// Row-oriented vote engine.
pub struct RecordProcessor;

impl RecordProcessor {
    /// Keep final-round records and attach their unified points.
    pub fn normalize(
        raw: Vec<VoteRecord>,
        policy: MissingPointsPolicy,
    ) -> Result<Vec<Vote>, ProcessorError> {
        let input_len = raw.len();
        let mut votes = Vec::new();
        let mut missing: Vec<VoteRecord> = Vec::new();

        for record in raw
            .into_iter()
            .filter(|r| r.round.as_deref() == Some(FINAL_ROUND))
        {
            match record.unified_points() {
                Some(points) => votes.push(Vote { record, points }),
                None => missing.push(record),
            }
        }
        debug!(
            "Kept {} of {} records as final round",
            votes.len() + missing.len(),
            input_len
        );

        if let Some(first) = missing.first() {
            match policy {
                MissingPointsPolicy::Reject => {
                    return Err(ProcessorError::MissingPoints {
                        count: missing.len(),
                        first: first.to_string(),
                    });
                }
                MissingPointsPolicy::Drop => {
                    warn!("Dropping {} final-round vote(s) without points", missing.len());
                }
            }
        }
        Ok(votes)
    }

    /// Count 12-point awards per (from_country, to_country).
    pub fn favourites(votes: &[Vote]) -> Vec<FavouriteCount> {
        let mut counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
        for vote in votes.iter().filter(|v| v.points == FAVOURITE_SCORE) {
            *counts
                .entry((
                    vote.record.from_country.as_str(),
                    vote.record.to_country.as_str(),
                ))
                .or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|((from, to), points)| FavouriteCount {
                from_country: from.to_string(),
                to_country: to.to_string(),
                points,
            })
            .collect()
    }

    /// Points received by `country` per year, ascending by year.
    pub fn country_totals(votes: &[Vote], country: &str) -> Vec<CountryYearTotal> {
        let mut totals: BTreeMap<i32, i64> = BTreeMap::new();
        for vote in votes.iter().filter(|v| v.record.to_country == country) {
            *totals.entry(vote.record.year).or_insert(0) += i64::from(vote.points);
        }

        totals
            .into_iter()
            .map(|(year, points)| CountryYearTotal {
                to_country: country.to_string(),
                year,
                points,
            })
            .collect()
    }

    /// Distinct receiving countries, sorted.
    pub fn countries(votes: &[Vote]) -> Vec<String> {
        let unique: BTreeSet<&str> = votes
            .iter()
            .map(|v| v.record.to_country.as_str())
            .collect();
        unique.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        round: &str,
        from: &str,
        to: &str,
        jury: Option<i32>,
        total: Option<i32>,
    ) -> VoteRecord {
        VoteRecord {
            round: Some(round.to_string()),
            from_country: from.to_string(),
            to_country: to.to_string(),
            year: 2020,
            jury_points: jury,
            total_points: total,
        }
    }

    #[test]
    fn normalize_drops_other_rounds() {
        let raw = vec![
            record("final", "us", "uk", Some(12), Some(12)),
            record("final", "uk", "fr", Some(12), Some(12)),
            record("semi", "fr", "us", Some(12), Some(12)),
        ];
        let votes = RecordProcessor::normalize(raw, MissingPointsPolicy::Reject).unwrap();
        assert_eq!(votes.len(), 2);
        assert!(votes.iter().all(|v| v.record.round.as_deref() == Some("final")));
    }

    #[test]
    fn normalize_coalesces_points() {
        let raw = vec![
            record("final", "us", "uk", None, Some(8)),
            record("final", "uk", "fr", Some(10), Some(8)),
        ];
        let points: Vec<i32> = RecordProcessor::normalize(raw, MissingPointsPolicy::Reject)
            .unwrap()
            .iter()
            .map(|v| v.points)
            .collect();
        assert_eq!(points, vec![8, 10]);
    }

    #[test]
    fn normalize_applies_missing_points_policy() {
        let raw = vec![
            record("final", "us", "uk", None, None),
            record("final", "uk", "fr", None, Some(3)),
        ];

        let err =
            RecordProcessor::normalize(raw.clone(), MissingPointsPolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::MissingPoints { count: 1, ref first } if first == "us -> uk (2020)"
        ));

        let kept = RecordProcessor::normalize(raw, MissingPointsPolicy::Drop).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].points, 3);
    }

    #[test]
    fn null_rounds_never_survive() {
        let mut raw = record("final", "us", "uk", Some(1), Some(1));
        raw.round = None;
        let votes = RecordProcessor::normalize(vec![raw], MissingPointsPolicy::Reject).unwrap();
        assert!(votes.is_empty());
    }

    #[test]
    fn from_frame_requires_country_codes() {
        let df = df!(
            ROUND => ["final"],
            FROM_COUNTRY => [None::<&str>],
            TO_COUNTRY => ["uk"],
            YEAR => [2020i32],
            JURY_POINTS => [Some(12i32)],
            TOTAL_POINTS => [Some(12i32)],
        )
        .unwrap();

        let err = VoteRecord::from_frame(&df).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::NullField {
                column: FROM_COUNTRY,
                row: 0
            }
        ));
    }
}
