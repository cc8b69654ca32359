use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::models::SchemaSnapshot;

/// Digest of a (question, schema) pair
///
/// `key = SHA256(normalized_question + "\n" + canonical_schema_json)`, hex
/// encoded. The schema is serialized with tables sorted by name, so two
/// snapshots with the same content always yield the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn compute(question: &str, schema: &SchemaSnapshot) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalize_question(question).as_bytes());
        hasher.update(b"\n");
        hasher.update(canonical_schema(schema).as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim and collapse runs of whitespace
pub fn normalize_question(question: &str) -> String {
    question.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn canonical_schema(schema: &SchemaSnapshot) -> String {
    // Serializing plain structs cannot fail
    serde_json::to_string(&schema.sorted_tables()).unwrap_or_default()
}

/// Accepted SQL and when it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub sql: String,
    pub created_at: DateTime<Utc>,
}

/// Memo of accepted translations
///
/// Entries are never evicted; the cache grows for the lifetime of the
/// owning converter.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.sql.as_str())
    }

    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: CacheKey, sql: String, created_at: DateTime<Utc>) {
        tracing::debug!("Caching translation under key {}", key);
        self.entries.insert(key, CacheEntry { sql, created_at });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
