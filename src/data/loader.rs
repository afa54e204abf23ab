//! Vote Dataset Loader Module
//! Fetches the votes CSV (remote URL or local file) and parses it with Polars
//! against the declared vote schema.

use crate::data::schema::{self, SchemaViolation};
use polars::prelude::*;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Published votes dataset.
pub const DEFAULT_VOTES_URL: &str =
    "https://github.com/Spijkervet/eurovision-dataset/releases/download/2023/votes.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Column {column} has type {found}, expected {expected}")]
    Schema {
        column: String,
        expected: DataType,
        found: DataType,
    },
}

impl From<SchemaViolation> for LoaderError {
    fn from(violation: SchemaViolation) -> Self {
        match violation {
            SchemaViolation::Missing(column) => LoaderError::MissingColumn(column),
            SchemaViolation::WrongType {
                column,
                expected,
                found,
            } => LoaderError::Schema {
                column,
                expected,
                found,
            },
        }
    }
}

/// Where the votes CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteSource {
    Remote(String),
    Local(PathBuf),
}

impl VoteSource {
    /// `http://` and `https://` locations are remote, anything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            VoteSource::Remote(location.to_string())
        } else {
            VoteSource::Local(PathBuf::from(location))
        }
    }

    /// Identifier used as the cache key.
    pub fn key(&self) -> String {
        match self {
            VoteSource::Remote(url) => url.clone(),
            VoteSource::Local(path) => path.display().to_string(),
        }
    }
}

impl Default for VoteSource {
    fn default() -> Self {
        VoteSource::Remote(DEFAULT_VOTES_URL.to_string())
    }
}

/// Loads the raw votes table.
#[derive(Debug, Clone)]
pub struct VoteLoader {
    source: VoteSource,
    timeout: Duration,
}

impl Default for VoteLoader {
    fn default() -> Self {
        Self::new(VoteSource::default(), Duration::from_secs(60))
    }
}

impl VoteLoader {
    pub fn new(source: VoteSource, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn source(&self) -> &VoteSource {
        &self.source
    }

    /// Fetch and parse the dataset. Any failure aborts the load.
    pub fn load(&self) -> Result<DataFrame, LoaderError> {
        let bytes = match &self.source {
            VoteSource::Remote(url) => self.fetch(url)?,
            VoteSource::Local(path) => std::fs::read(path).map_err(|source| LoaderError::Io {
                path: path.clone(),
                source,
            })?,
        };
        debug!("Read {} bytes from {}", bytes.len(), self.source.key());

        let df = parse_votes_csv(bytes)?;
        info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            self.source.key()
        );
        Ok(df)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError> {
        let fetch_error = |source| LoaderError::Fetch {
            url: url.to_string(),
            source,
        };

        info!("Fetching votes from {}", url);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(fetch_error)?;
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;
        let body = response.bytes().map_err(fetch_error)?;
        Ok(body.to_vec())
    }
}

/// Parse CSV bytes with the declared vote schema, rejecting files that
/// do not conform.
pub fn parse_votes_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_schema_overwrite(Some(Arc::new(schema::vote_schema())))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    if let Some(violation) = schema::violations(&df).into_iter().next() {
        return Err(violation.into());
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
year,round,from_country,to_country,total_points,tele_points,jury_points
2021,final,us,uk,12,,12
2021,final,uk,fr,8,4,
2021,semi-final-1,fr,us,12,6,6
";

    #[test]
    fn parses_declared_column_types() {
        let df = parse_votes_csv(SAMPLE.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column(schema::YEAR).unwrap().dtype(), &DataType::Int32);
        assert_eq!(
            df.column(schema::JURY_POINTS).unwrap().dtype(),
            &DataType::Int32
        );
        assert_eq!(df.column(schema::JURY_POINTS).unwrap().null_count(), 1);
        // Undeclared columns are kept.
        assert!(df.column("tele_points").is_ok());
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "year,round,from_country,to_country,total_points\n2021,final,us,uk,12\n";
        let err = parse_votes_csv(csv.as_bytes().to_vec()).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MissingColumn(_) | LoaderError::CsvError(_)
        ));
    }

    #[test]
    fn rejects_non_integer_points() {
        let csv = "\
year,round,from_country,to_country,total_points,jury_points
2021,final,us,uk,twelve,12
";
        assert!(parse_votes_csv(csv.as_bytes().to_vec()).is_err());
    }

    #[test]
    fn loads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = VoteSource::parse(file.path().to_str().unwrap());
        assert!(matches!(source, VoteSource::Local(_)));

        let df = VoteLoader::new(source, Duration::from_secs(1))
            .load()
            .unwrap();
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn missing_local_file_is_io_error() {
        let loader = VoteLoader::new(
            VoteSource::Local(PathBuf::from("/nonexistent/votes.csv")),
            Duration::from_secs(1),
        );
        assert!(matches!(loader.load(), Err(LoaderError::Io { .. })));
    }

    #[test]
    fn source_kind_follows_scheme() {
        assert_eq!(
            VoteSource::parse(DEFAULT_VOTES_URL),
            VoteSource::Remote(DEFAULT_VOTES_URL.to_string())
        );
        assert_eq!(VoteSource::default().key(), DEFAULT_VOTES_URL);
    }

    #[test]
    #[ignore = "downloads the published dataset"]
    fn loads_published_dataset() {
        let df = VoteLoader::default().load().unwrap();
        assert!(df.height() > 0);
    }
}
