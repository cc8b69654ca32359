use std::sync::OnceLock;

use regex::Regex;

/// Rewrites string literals into the target dialect's quoting
///
/// Kept behind a trait so the regex heuristics can be replaced by a real
/// tokenizer without touching the converter.
pub trait LiteralNormalizer: Send {
    fn normalize(&self, sql: &str) -> String;
}

/// Turns `"literal"` into `'literal'` where a value is clearly expected
///
/// Two patterns are applied in order:
/// - after `=`, `<>`, `!=`, `LIKE` or `IN` followed by whitespace
/// - after a known string-valued column compared with `=`, `<>` or `!=`,
///   with any spacing
///
/// The closing quote must end the value (whitespace, `;`, `)`, `,` or end of
/// text), so qualified identifiers like `"Takes".id` are left alone, as are
/// quoted identifiers in other positions (`SELECT "Name" FROM "Student"`).
#[derive(Debug, Default, Clone, Copy)]
pub struct QuoteNormalizer;

impl LiteralNormalizer for QuoteNormalizer {
    fn normalize(&self, sql: &str) -> String {
        normalize_quotes(sql)
    }
}

fn patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r#"(?i)((?:<>|!=|=|\bLIKE|\bIN)\s+)"([^"]+)"([\s;),]|$)"#)
                .expect("comparison literal pattern is valid"),
            Regex::new(concat!(
                r#"(?i)(\b(?:dept_name|semester|title|building|name)"#,
                r#"\s*(?:<>|!=|=)\s*)"([^"]+)"([\s;),]|$)"#,
            ))
            .expect("column literal pattern is valid"),
        ]
    })
}

pub fn normalize_quotes(sql: &str) -> String {
    let mut result = sql.to_string();
    for pattern in patterns() {
        result = pattern.replace_all(&result, "$1'$2'$3").into_owned();
    }
    result
}
