//! Data Processor Module
//! Final-round normalization and the two chart aggregations, expressed as
//! Polars lazy queries over the loaded votes frame.

use crate::data::model::{CountryYearTotal, FavouriteCount};
use crate::data::schema::{
    FAVOURITE_SCORE, FINAL_ROUND, FROM_COUNTRY, JURY_POINTS, POINTS, ROUND, TOTAL_POINTS,
    TO_COUNTRY, YEAR,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("{count} final-round vote(s) have neither jury nor total points (first: {first})")]
    MissingPoints { count: usize, first: String },
    #[error("Null {column} in row {row}")]
    NullField { column: &'static str, row: usize },
}

/// What to do with a final-round vote that has neither jury nor total points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPointsPolicy {
    /// Fail the run.
    Reject,
    /// Remove the vote and log how many were removed.
    Drop,
}

impl Default for MissingPointsPolicy {
    fn default() -> Self {
        MissingPointsPolicy::Reject
    }
}

/// Columnar vote engine.
pub struct VoteProcessor;

impl VoteProcessor {
    /// Keep final-round rows and derive `points` from jury points, falling
    /// back to total points.
    ///
    /// Output keeps every input column plus `points` (Int32).
    pub fn normalize(
        raw: &DataFrame,
        policy: MissingPointsPolicy,
    ) -> Result<DataFrame, ProcessorError> {
        let finals = raw
            .clone()
            .lazy()
            .filter(col(ROUND).eq(lit(FINAL_ROUND)))
            .with_column(
                when(col(JURY_POINTS).is_null())
                    .then(col(TOTAL_POINTS))
                    .otherwise(col(JURY_POINTS))
                    .cast(DataType::Int32)
                    .alias(POINTS),
            )
            .collect()?;
        debug!("Kept {} of {} rows as final round", finals.height(), raw.height());

        let missing = finals.column(POINTS)?.null_count();
        if missing == 0 {
            return Ok(finals);
        }

        match policy {
            MissingPointsPolicy::Reject => {
                let first = finals
                    .clone()
                    .lazy()
                    .filter(col(POINTS).is_null())
                    .limit(1)
                    .collect()?;
                let from = first.column(FROM_COUNTRY)?.str()?.get(0).unwrap_or("?");
                let to = first.column(TO_COUNTRY)?.str()?.get(0).unwrap_or("?");
                let year = first
                    .column(YEAR)?
                    .i32()?
                    .get(0)
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "?".to_string());

                Err(ProcessorError::MissingPoints {
                    count: missing,
                    first: format!("{from} -> {to} ({year})"),
                })
            }
            MissingPointsPolicy::Drop => {
                warn!("Dropping {} final-round vote(s) without points", missing);
                let kept = finals
                    .lazy()
                    .filter(col(POINTS).is_not_null())
                    .collect()?;
                Ok(kept)
            }
        }
    }

    /// Count 12-point awards per (from_country, to_country).
    ///
    /// Output columns: [from_country, to_country, points], no defined order.
    pub fn favourites(votes: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let favourites = votes
            .clone()
            .lazy()
            .filter(col(POINTS).eq(lit(FAVOURITE_SCORE)))
            .group_by([col(FROM_COUNTRY), col(TO_COUNTRY)])
            .agg([col(POINTS).count().cast(DataType::UInt32)])
            .collect()?;
        Ok(favourites)
    }

    /// Points received by `country` per year, ascending by year.
    ///
    /// Output columns: [to_country, year, points]. Empty if no vote went to
    /// `country`.
    pub fn country_totals(votes: &DataFrame, country: &str) -> Result<DataFrame, ProcessorError> {
        let totals = votes
            .clone()
            .lazy()
            .filter(col(TO_COUNTRY).eq(lit(country)))
            .group_by([col(TO_COUNTRY), col(YEAR)])
            .agg([col(POINTS).cast(DataType::Int64).sum()])
            .sort([YEAR], SortMultipleOptions::default())
            .collect()?;
        Ok(totals)
    }

    /// Distinct receiving countries, sorted.
    pub fn countries(votes: &DataFrame) -> Result<Vec<String>, ProcessorError> {
        let unique: BTreeSet<&str> = votes
            .column(TO_COUNTRY)?
            .str()?
            .into_iter()
            .flatten()
            .collect();
        Ok(unique.into_iter().map(str::to_string).collect())
    }

    /// Rows of a [`VoteProcessor::favourites`] frame.
    pub fn favourite_rows(favourites: &DataFrame) -> Result<Vec<FavouriteCount>, ProcessorError> {
        let from = favourites.column(FROM_COUNTRY)?.str()?;
        let to = favourites.column(TO_COUNTRY)?.str()?;
        let counts = favourites.column(POINTS)?.u32()?;

        Ok(from
            .into_iter()
            .zip(to)
            .zip(counts)
            .filter_map(|((from, to), count)| {
                Some(FavouriteCount {
                    from_country: from?.to_string(),
                    to_country: to?.to_string(),
                    points: count?,
                })
            })
            .collect())
    }

    /// Rows of a [`VoteProcessor::country_totals`] frame, in frame order.
    pub fn country_total_rows(totals: &DataFrame) -> Result<Vec<CountryYearTotal>, ProcessorError> {
        let to = totals.column(TO_COUNTRY)?.str()?;
        let years = totals.column(YEAR)?.i32()?;
        let points = totals.column(POINTS)?.i64()?;

        Ok(to
            .into_iter()
            .zip(years)
            .zip(points)
            .filter_map(|((to, year), points)| {
                Some(CountryYearTotal {
                    to_country: to?.to_string(),
                    year: year?,
                    points: points?,
                })
            })
            .collect())
    }
}
