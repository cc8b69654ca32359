//! Text2SQL Library
//!
//! Translates natural-language questions into SQL using an external
//! text-generation model, with caching, rate limiting, schema-aware prompts
//! and shape validation of the generated statement.

pub mod cache;
pub mod clock;
pub mod config;
pub mod constants;
pub mod converter;
pub mod error;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod rate_limiter;
pub mod schema;
pub mod sql;

pub use cache::{CacheKey, TranslationCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use converter::Converter;
pub use error::{Result, TranslateError};
pub use llm::{GeminiClient, GenerationParams, ModelClient};
pub use models::{Column, HistoryEntry, RateLimitPolicy, SchemaSnapshot, Table};
pub use prompt::{PromptBuilder, PromptStrategy, SchemaFormatter};
pub use rate_limiter::RateLimiter;
pub use schema::{sample_schema, JsonSchemaFile, SampleSchema, SchemaProvider};
