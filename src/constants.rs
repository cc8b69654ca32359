/// Maximum model calls allowed inside one rate-limit window
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 50;

/// Length of the fixed rate-limit window in seconds
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Model used when `GEMINI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Logical database the curated prompt was written for.
/// Targeting it selects the reference prompt strategy.
pub const REFERENCE_DATABASE: &str = "projeto_final";

/// HTTP timeout for a single model call
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// Value shipped in `.env.example`; treated the same as a missing key
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

// =============================================================================
// Sampling
// =============================================================================

/// Near-deterministic sampling keeps repeated questions stable
pub const GENERATION_TEMPERATURE: f32 = 0.1;

/// Upper bound on generated tokens; enough for multi-join statements
pub const GENERATION_MAX_OUTPUT_TOKENS: u32 = 300;

pub const GENERATION_TOP_P: f32 = 0.8;

pub const GENERATION_TOP_K: u32 = 40;

// =============================================================================
// Shape validation
// =============================================================================

/// Accepted statements are strictly longer than this many characters
pub const MIN_SQL_CHARS: usize = 10;

/// Accepted statements are strictly shorter than this many characters
pub const MAX_SQL_CHARS: usize = 2000;

/// Degenerate fragments the model has been seen to emit (compared uppercased)
pub const DEGENERATE_FRAGMENTS: [&str; 3] = ["SELECT;", "FROM;", "SELECT AVG(T1.GRADE);"];

// =============================================================================
// Sanitization
// =============================================================================

/// A line containing any of these (lowercased) starts trailing commentary
pub const EXPLANATION_MARKERS: [&str; 6] = [
    "explanation:",
    "explicação:",
    "result:",
    "resultado:",
    "this query",
    "esta consulta",
];
