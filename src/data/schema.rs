//! Vote dataset schema.
//! Column names and the declared type of every column the pipeline reads.

use polars::prelude::*;

// ── Raw vote columns ────────────────────────────────────────────────────────
pub const ROUND: &str = "round";
pub const FROM_COUNTRY: &str = "from_country";
pub const TO_COUNTRY: &str = "to_country";
pub const YEAR: &str = "year";
pub const JURY_POINTS: &str = "jury_points";
pub const TOTAL_POINTS: &str = "total_points";

// ── Derived columns ─────────────────────────────────────────────────────────
pub const POINTS: &str = "points";

/// Round value kept by normalization.
pub const FINAL_ROUND: &str = "final";

/// Score that marks a favourite pair.
pub const FAVOURITE_SCORE: i32 = 12;

/// First contest year.
pub const FIRST_CONTEST_YEAR: i32 = 1956;

/// Declared type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
}

impl ColumnKind {
    pub fn dtype(self) -> DataType {
        match self {
            ColumnKind::Text => DataType::String,
            ColumnKind::Integer => DataType::Int32,
        }
    }
}

/// Every column a vote file must carry, with its declared type.
pub const VOTE_COLUMNS: [(&str, ColumnKind); 6] = [
    (ROUND, ColumnKind::Text),
    (FROM_COUNTRY, ColumnKind::Text),
    (TO_COUNTRY, ColumnKind::Text),
    (YEAR, ColumnKind::Integer),
    (JURY_POINTS, ColumnKind::Integer),
    (TOTAL_POINTS, ColumnKind::Integer),
];

/// Polars schema used as the CSV reader's type override.
pub fn vote_schema() -> Schema {
    VOTE_COLUMNS
        .iter()
        .map(|(name, kind)| (PlSmallStr::from_static(*name), kind.dtype()))
        .collect()
}

/// A declared column that is absent or carries the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    Missing(String),
    WrongType {
        column: String,
        expected: DataType,
        found: DataType,
    },
}

/// Check a frame against [`VOTE_COLUMNS`]. Extra columns are allowed.
pub fn violations(df: &DataFrame) -> Vec<SchemaViolation> {
    VOTE_COLUMNS
        .iter()
        .filter_map(|(name, kind)| match df.column(name) {
            Err(_) => Some(SchemaViolation::Missing(name.to_string())),
            Ok(col) if col.dtype() != &kind.dtype() => Some(SchemaViolation::WrongType {
                column: name.to_string(),
                expected: kind.dtype(),
                found: col.dtype().clone(),
            }),
            Ok(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_all_columns() {
        let schema = vote_schema();
        assert_eq!(schema.len(), VOTE_COLUMNS.len());
        assert_eq!(schema.get(YEAR), Some(&DataType::Int32));
        assert_eq!(schema.get(ROUND), Some(&DataType::String));
    }

    #[test]
    fn reports_missing_and_mistyped_columns() {
        let df = df!(
            ROUND => ["final"],
            FROM_COUNTRY => ["us"],
            TO_COUNTRY => ["uk"],
            YEAR => ["2020"],
            TOTAL_POINTS => [12i32],
        )
        .unwrap();

        let found = violations(&df);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&SchemaViolation::Missing(JURY_POINTS.to_string())));
        assert!(found.contains(&SchemaViolation::WrongType {
            column: YEAR.to_string(),
            expected: DataType::Int32,
            found: DataType::String,
        }));
    }
}
