pub mod history;
pub mod rate_limit;
pub mod schema;

pub use history::HistoryEntry;
pub use rate_limit::{Admission, RateLimitPolicy, RateWindow};
pub use schema::{Column, SchemaSnapshot, Table};
