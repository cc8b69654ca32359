use crate::constants::{DEGENERATE_FRAGMENTS, MAX_SQL_CHARS, MIN_SQL_CHARS};

/// Structural plausibility check applied before SQL is handed out
pub trait ShapeValidator: Send {
    fn is_acceptable(&self, sql: &str) -> bool;
}

/// Keyword and length heuristics; not a parser
///
/// Accepts well-formed nonsense and rejects some valid but very short
/// statements. Keyword checks are case-insensitive substring matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicValidator;

impl ShapeValidator for HeuristicValidator {
    fn is_acceptable(&self, sql: &str) -> bool {
        is_acceptable(sql)
    }
}

pub fn is_acceptable(sql: &str) -> bool {
    let text = sql.trim();
    if text.is_empty() {
        return false;
    }

    let upper = text.to_uppercase();

    let (select_pos, from_pos) = match (upper.find("SELECT"), upper.find("FROM")) {
        (Some(select), Some(from)) => (select, from),
        _ => return false,
    };
    if select_pos >= from_pos {
        return false;
    }

    if !text.ends_with(';') {
        return false;
    }

    let length = text.chars().count();
    if length <= MIN_SQL_CHARS || length >= MAX_SQL_CHARS {
        return false;
    }

    !DEGENERATE_FRAGMENTS.contains(&upper.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_minimal_statement() {
        assert!(is_acceptable("SELECT 1 FROM t;"));
        assert!(is_acceptable("select name from instructor order by salary desc;"));
    }

    #[test]
    fn test_rejects_fragments() {
        assert!(!is_acceptable("SELECT;"));
        assert!(!is_acceptable("FROM;"));
        assert!(!is_acceptable(";"));
        assert!(!is_acceptable(""));
    }

    #[test]
    fn test_rejects_missing_or_misordered_clauses() {
        assert!(!is_acceptable("SELECT COUNT(*) AS total_students;"));
        assert!(!is_acceptable("FROM student SELECT name;"));
        assert!(!is_acceptable("DELETE FROM student WHERE id = 1;"));
    }

    #[test]
    fn test_requires_terminator() {
        assert!(!is_acceptable("SELECT name FROM student"));
    }

    fn statement_of_len(chars: usize, fill: char) -> String {
        let prefix = "SELECT a FROM t WHERE x = '";
        let suffix = "';";
        let body: String = std::iter::repeat(fill)
            .take(chars - prefix.len() - suffix.len())
            .collect();
        format!("{prefix}{body}{suffix}")
    }

    #[test]
    fn test_upper_length_bound_is_exclusive() {
        assert!(is_acceptable(&statement_of_len(MAX_SQL_CHARS - 1, 'y')));
        assert!(!is_acceptable(&statement_of_len(MAX_SQL_CHARS, 'y')));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let sql = statement_of_len(MAX_SQL_CHARS - 1, 'é');
        assert!(sql.len() > MAX_SQL_CHARS);
        assert!(is_acceptable(&sql));
    }
}
