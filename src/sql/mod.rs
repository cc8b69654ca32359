//! Post-processing of model output: sanitization, quote normalization and
//! shape validation. Heuristics only; nothing here parses SQL.

pub mod quotes;
pub mod sanitize;
pub mod validate;

pub use quotes::{normalize_quotes, LiteralNormalizer, QuoteNormalizer};
pub use sanitize::sanitize;
pub use validate::{is_acceptable, HeuristicValidator, ShapeValidator};
