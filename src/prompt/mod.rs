//! Schema-aware prompt construction.

pub mod catalog;
pub mod schema_format;

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::constants::REFERENCE_DATABASE;
use crate::models::SchemaSnapshot;

pub use schema_format::{ColumnRole, SchemaFormatter};

use catalog::{DEPARTMENT_VOCABULARY, GENERIC_RULES, REFERENCE_RULES, WORKED_EXAMPLES};

/// Which prompt template to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStrategy {
    /// Curated prompt for the reference university database: examples,
    /// vocabulary mappings and generation rules
    Reference,
    /// Strict formatting rules for schemas without curated knowledge
    Generic,
}

impl PromptStrategy {
    /// Default strategy for a target database name
    pub fn for_database(name: &str) -> Self {
        if name == REFERENCE_DATABASE {
            PromptStrategy::Reference
        } else {
            PromptStrategy::Generic
        }
    }
}

impl FromStr for PromptStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" => Ok(PromptStrategy::Reference),
            "generic" => Ok(PromptStrategy::Generic),
            other => Err(format!(
                "Invalid PROMPT_STRATEGY '{}': expected 'reference' or 'generic'",
                other
            )),
        }
    }
}

impl fmt::Display for PromptStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptStrategy::Reference => f.write_str("reference"),
            PromptStrategy::Generic => f.write_str("generic"),
        }
    }
}

/// Builds the instruction text sent to the model
///
/// Pure: the output depends only on the strategy, the question, the schema
/// and the static tables in [`catalog`].
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    strategy: PromptStrategy,
}

impl PromptBuilder {
    pub fn new(strategy: PromptStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> PromptStrategy {
        self.strategy
    }

    pub fn build(&self, question: &str, schema: &SchemaSnapshot) -> String {
        let schema_text = SchemaFormatter::format(schema, self.strategy);
        match self.strategy {
            PromptStrategy::Reference => reference_prompt(question.trim(), &schema_text),
            PromptStrategy::Generic => generic_prompt(question.trim(), &schema_text),
        }
    }
}

fn reference_prompt(question: &str, schema_text: &str) -> String {
    let mut prompt = String::from(concat!(
        "You are a PostgreSQL expert. Convert this natural-language question ",
        "into one valid, complete SQL query.\n\n",
    ));

    prompt.push_str("DETAILED DATABASE SCHEMA:\n");
    prompt.push_str(schema_text);
    prompt.push('\n');

    prompt.push_str("DEPARTMENT MAPPINGS (IMPORTANT):\n");
    for (spoken, stored) in DEPARTMENT_VOCABULARY.iter() {
        let spoken: Vec<String> = spoken.iter().map(|s| format!("\"{s}\"")).collect();
        let _ = writeln!(prompt, "- {} → '{}'", spoken.join(" or "), stored);
    }
    prompt.push('\n');

    prompt.push_str("EXAMPLES OF VALID QUERIES:\n");
    for (i, (intent, lines)) in WORKED_EXAMPLES.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}:", i + 1, intent);
        for line in lines.iter() {
            let _ = writeln!(prompt, "   {line}");
        }
        prompt.push('\n');
    }

    prompt.push_str("MANDATORY RULES:\n");
    push_numbered(&mut prompt, &REFERENCE_RULES);
    prompt.push('\n');

    push_question(&mut prompt, question);
    prompt
}

fn generic_prompt(question: &str, schema_text: &str) -> String {
    let mut prompt = String::from(concat!(
        "You are a SQL expert. Convert this natural-language question ",
        "into one valid SQL query over the schema below.\n\n",
    ));

    prompt.push_str("SCHEMA:\n");
    prompt.push_str(schema_text);
    prompt.push('\n');

    prompt.push_str("FORMATTING RULES:\n");
    push_numbered(&mut prompt, &GENERIC_RULES);
    prompt.push_str(concat!(
        "\nExample layout:\n",
        "SELECT c.name, o.total\n",
        "FROM customers c\n",
        "JOIN orders o\n",
        "  ON o.customer_id = c.id\n",
        "WHERE o.total > 100;\n\n",
    ));

    push_question(&mut prompt, question);
    prompt
}

fn push_numbered(prompt: &mut String, rules: &[&str]) {
    for (i, rule) in rules.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, rule);
    }
}

fn push_question(prompt: &mut String, question: &str) {
    let _ = writeln!(prompt, "QUESTION: {question}\n");
    prompt.push_str(
        "Return only the complete SQL statement, with no explanation, markdown or comments:",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::sample_schema;

    const QUESTION: &str = "Qual é a média de notas dos cursos de Economia em 2010?";

    #[test]
    fn test_strategy_selection_by_database() {
        assert_eq!(PromptStrategy::for_database("projeto_final"), PromptStrategy::Reference);
        assert_eq!(PromptStrategy::for_database("sales"), PromptStrategy::Generic);
        assert_eq!("Generic".parse::<PromptStrategy>(), Ok(PromptStrategy::Generic));
        assert!("fancy".parse::<PromptStrategy>().is_err());
    }

    #[test]
    fn test_reference_prompt_sections() {
        let prompt =
            PromptBuilder::new(PromptStrategy::Reference).build(QUESTION, &sample_schema());

        assert!(prompt.contains("TABLE: takes - Student enrolments and final grades"));
        assert!(prompt.contains("- \"Economia\" or \"Economics\" → 'Finance'"));
        assert!(prompt
            .contains("- \"Ciência da Computação\" or \"Computer Science\" → 'Comp. Sci.'"));
        assert!(prompt.contains("   JOIN course c ON t.course_id = c.course_id"));
        assert!(prompt.contains("1. ALWAYS include the SELECT and FROM clauses"));
        assert!(prompt.contains("10. NEVER return incomplete or fragmentary SQL"));
        assert!(prompt.contains(&format!("QUESTION: {QUESTION}")));
        assert!(prompt.ends_with("with no explanation, markdown or comments:"));
    }

    #[test]
    fn test_generic_prompt_omits_curated_material() {
        let prompt = PromptBuilder::new(PromptStrategy::Generic).build(QUESTION, &sample_schema());

        assert!(!prompt.contains("DEPARTMENT MAPPINGS"));
        assert!(!prompt.contains("EXAMPLES OF VALID QUERIES"));
        assert!(prompt.contains("UPPERCASE"));
        assert!(prompt.contains("Indent the ON condition under each JOIN by two spaces"));
        assert!(prompt
            .contains("student(id INTEGER, name VARCHAR, dept_name VARCHAR, tot_cred INTEGER)"));
        assert!(prompt.contains(&format!("QUESTION: {QUESTION}")));
    }

    #[test]
    fn test_build_is_pure() {
        let builder = PromptBuilder::new(PromptStrategy::Reference);
        assert_eq!(
            builder.build(QUESTION, &sample_schema()),
            builder.build(QUESTION, &sample_schema())
        );
    }
}
