//! Command-line interface argument parsing.

use clap::{Parser, ValueEnum};
use eurovision_dash::config::Config;
use eurovision_dash::data::MissingPointsPolicy;
use std::path::PathBuf;
use tracing::Level;

/// Eurovision Dash - final-round voting dashboard
///
/// Opens the dashboard window by default. With --dump, writes one view as
/// CSV to stdout instead.
///
/// Examples:
///   eurovision_dash
///   eurovision_dash --source ./votes.csv --missing-points drop
///   eurovision_dash --dump country --country se
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for eurovision-dash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Votes CSV location (URL or local path), overrides the config file
    #[arg(short, long, value_name = "URL|PATH", env = "EUROVISION_VOTES")]
    pub source: Option<String>,

    /// Handling of final-round votes with neither jury nor total points
    #[arg(long, value_enum)]
    pub missing_points: Option<MissingPointsPolicy>,

    /// Write a view as CSV to stdout instead of opening the window
    #[arg(long, value_enum, value_name = "VIEW")]
    pub dump: Option<View>,

    /// Country for the country view (defaults to the first in the menu)
    #[arg(long, value_name = "CODE")]
    pub country: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Favourites,
    Country,
    Raw,
}

impl Args {
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Apply command-line overrides on top of the file configuration.
    pub fn merge_into(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.source.url = source.clone();
        }
        if let Some(policy) = self.missing_points {
            config.pipeline.missing_points = policy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::parse_from([
            "eurovision_dash",
            "--source",
            "votes.csv",
            "--missing-points",
            "drop",
            "--dump",
            "favourites",
        ]);
        let mut config = Config::default();
        args.merge_into(&mut config);

        assert_eq!(config.source.url, "votes.csv");
        assert_eq!(config.pipeline.missing_points, MissingPointsPolicy::Drop);
        assert_eq!(args.dump, Some(View::Favourites));
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn no_flags_keep_config() {
        let args = Args::parse_from(["eurovision_dash", "-v"]);
        let mut config = Config::default();
        args.merge_into(&mut config);

        assert_eq!(config, Config::default());
        assert_eq!(args.log_level(), Level::DEBUG);
    }
}
