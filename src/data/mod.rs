//! Data module - vote loading, caching and transformation

mod cache;
pub mod integrity;
mod loader;
mod model;
mod pipeline;
mod processor;
mod records;
pub mod schema;

pub use cache::{TtlCache, DEFAULT_TTL};
pub use integrity::IntegrityReport;
pub use loader::{parse_votes_csv, LoaderError, VoteLoader, VoteSource, DEFAULT_VOTES_URL};
pub use model::{CountryYearTotal, FavouriteCount, Vote, VoteRecord};
pub use pipeline::VoteTables;
pub use processor::{MissingPointsPolicy, ProcessorError, VoteProcessor};
pub use records::RecordProcessor;
