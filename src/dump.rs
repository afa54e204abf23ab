//! Headless mode: run the pipeline once and write a view as CSV.

use crate::cli::View;
use anyhow::{Context, Result};
use eurovision_dash::config::Config;
use eurovision_dash::data::{TtlCache, VoteTables};
use polars::prelude::*;
use std::io::Write;
use std::time::Instant;
use tracing::{info, warn};

/// Build the tables for `view` and write them to `out`.
pub fn run_dump(
    config: &Config,
    view: View,
    country: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let loader = config.loader();
    let key = loader.source().key();
    let mut cache = TtlCache::new(config.cache_ttl());

    let raw = cache
        .get_or_load(&key, Instant::now(), || loader.load())
        .with_context(|| format!("Failed to load votes from {key}"))?;
    let tables = VoteTables::build(raw, config.pipeline.missing_points)
        .context("Failed to prepare votes")?;

    let mut frame = match view {
        View::Favourites => tables.favourites.clone(),
        View::Raw => tables.votes.clone(),
        View::Country => {
            let selected = match country.or(tables.default_country()) {
                Some(selected) => selected.to_string(),
                None => {
                    warn!("No countries in the dataset");
                    String::new()
                }
            };
            info!("Country view for {}", selected);
            tables.country_totals(&selected)?
        }
    };

    CsvWriter::new(out)
        .include_header(true)
        .finish(&mut frame)
        .context("Failed to write CSV")?;
    Ok(())
}
