use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful translation, kept for the session history view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub sql: String,
    pub translated_at: DateTime<Utc>,
    /// Wall time spent in `translate`, in milliseconds
    pub elapsed_ms: u64,
    /// Whether the SQL came straight from the translation cache
    pub from_cache: bool,
}
