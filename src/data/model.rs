//! Row types shared by both vote engines.

use std::fmt;

/// One row of the raw votes table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub round: Option<String>,
    pub from_country: String,
    pub to_country: String,
    pub year: i32,
    pub jury_points: Option<i32>,
    pub total_points: Option<i32>,
}

impl VoteRecord {
    /// Jury points when present, total points otherwise.
    pub fn unified_points(&self) -> Option<i32> {
        self.jury_points.or(self.total_points)
    }
}

impl fmt::Display for VoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from_country, self.to_country, self.year)
    }
}

/// A final-round vote with its unified `points`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub record: VoteRecord,
    pub points: i32,
}

/// Number of 12-point awards from one country to another.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FavouriteCount {
    pub from_country: String,
    pub to_country: String,
    pub points: u32,
}

/// Points received by a country in one contest year.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryYearTotal {
    pub to_country: String,
    pub year: i32,
    pub points: i64,
}
