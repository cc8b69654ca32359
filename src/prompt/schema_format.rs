use std::fmt::Write;

use crate::models::{Column, SchemaSnapshot, Table};
use crate::prompt::catalog::{known_table, KnownTable, KNOWN_TABLES};
use crate::prompt::PromptStrategy;

/// Logical role of a column within its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    PrimaryKey,
    ForeignKey,
    Plain,
}

impl ColumnRole {
    fn label(self) -> Option<&'static str> {
        match self {
            ColumnRole::PrimaryKey => Some("PRIMARY KEY"),
            ColumnRole::ForeignKey => Some("FOREIGN KEY"),
            ColumnRole::Plain => None,
        }
    }
}

/// Renders a schema snapshot into the context block embedded in prompts
pub struct SchemaFormatter;

impl SchemaFormatter {
    /// Render `schema` for the given prompt strategy
    ///
    /// Output never depends on the snapshot's table order.
    pub fn format(schema: &SchemaSnapshot, strategy: PromptStrategy) -> String {
        match strategy {
            PromptStrategy::Reference => Self::format_reference(schema),
            PromptStrategy::Generic => Self::format_compact(schema),
        }
    }

    fn format_reference(schema: &SchemaSnapshot) -> String {
        let mut out = String::new();

        for known in KNOWN_TABLES.iter() {
            if let Some(table) = schema.table(known.name) {
                Self::write_known_table(&mut out, schema, known, table);
            }
        }

        let mut unknown: Vec<&Table> = schema
            .tables()
            .iter()
            .filter(|t| known_table(&t.name).is_none())
            .collect();
        unknown.sort_by(|a, b| a.name.cmp(&b.name));

        for table in unknown {
            let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
            let _ = writeln!(out, "TABLE: {}", table.name);
            let _ = writeln!(out, "Columns: {}", names.join(", "));
            out.push('\n');
        }

        out
    }

    fn write_known_table(
        out: &mut String,
        schema: &SchemaSnapshot,
        known: &KnownTable,
        table: &Table,
    ) {
        let _ = writeln!(out, "TABLE: {} - {}", known.name, known.description);
        out.push_str("Columns:\n");

        for column in &table.columns {
            let role = column_role(schema, known, &column.name);
            let catalogued = known.column(&column.name);
            let data_type = column
                .data_type
                .as_deref()
                .or(catalogued.map(|c| c.data_type));

            let annotation: Vec<&str> = data_type.into_iter().chain(role.label()).collect();

            let _ = write!(out, "  • {}", column.name);
            if !annotation.is_empty() {
                let _ = write!(out, " ({})", annotation.join(", "));
            }
            if let Some(c) = catalogued {
                let _ = write!(out, " - {}", c.description);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "Relationships: {}", relationships(schema, known, table));
        out.push('\n');
    }

    fn format_compact(schema: &SchemaSnapshot) -> String {
        let mut out = String::new();
        for table in schema.sorted_tables() {
            let columns: Vec<String> = table.columns.iter().map(compact_column).collect();
            let _ = writeln!(out, "{}({})", table.name, columns.join(", "));
        }
        out
    }
}

fn compact_column(column: &Column) -> String {
    match &column.data_type {
        Some(data_type) => format!("{} {}", column.name, data_type),
        None => column.name.clone(),
    }
}

/// Role of `column` in a known table
///
/// Catalogued columns use their declared role. Anything else is a foreign
/// key when it shares its name with the primary key of another known table
/// in the snapshot.
pub fn column_role(schema: &SchemaSnapshot, known: &KnownTable, column: &str) -> ColumnRole {
    if let Some(c) = known.column(column) {
        return if c.primary_key {
            ColumnRole::PrimaryKey
        } else if c.references.is_some() {
            ColumnRole::ForeignKey
        } else {
            ColumnRole::Plain
        };
    }

    let is_foreign_key = KNOWN_TABLES
        .iter()
        .filter(|other| other.name != known.name && schema.contains(other.name))
        .any(|other| other.primary_key().any(|k| k == column));

    if is_foreign_key {
        ColumnRole::ForeignKey
    } else {
        ColumnRole::Plain
    }
}

/// Summary of the present tables `table` joins with, e.g. `department (dept_name), takes (id)`
fn relationships(schema: &SchemaSnapshot, known: &KnownTable, table: &Table) -> String {
    let mut links = Vec::new();

    for other in KNOWN_TABLES.iter().filter(|o| o.name != known.name) {
        let Some(other_table) = schema.table(other.name) else {
            continue;
        };

        let shared: Vec<&str> = table
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| other_table.has_column(name))
            .filter(|name| {
                let outgoing = known.column(name).and_then(|c| c.references) == Some(other.name);
                let incoming = other.column(name).and_then(|c| c.references) == Some(known.name);
                outgoing || incoming
            })
            .collect();

        if !shared.is_empty() {
            links.push(format!("{} ({})", other.name, shared.join(", ")));
        }
    }

    if links.is_empty() {
        "none".to_string()
    } else {
        links.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::sample_schema;

    #[test]
    fn test_reference_block_for_student() {
        let text = SchemaFormatter::format(&sample_schema(), PromptStrategy::Reference);

        assert!(text.contains("TABLE: student - University students"));
        assert!(text.contains("  • id (INTEGER, PRIMARY KEY) - Unique student ID"));
        let dept_line = "  • dept_name (VARCHAR, FOREIGN KEY) - Department the student belongs to";
        assert!(text.contains(dept_line));
        assert!(text.contains("  • tot_cred (INTEGER) - Total credits earned"));
        assert!(text.contains("Relationships: takes (id), department (dept_name)"));
    }

    #[test]
    fn test_junction_and_department_relationships() {
        let text = SchemaFormatter::format(&sample_schema(), PromptStrategy::Reference);

        assert!(text.contains("Relationships: student (id), course (course_id)"));
        assert!(text.contains(
            "Relationships: student (dept_name), instructor (dept_name), course (dept_name)"
        ));
    }

    #[test]
    fn test_output_follows_vocabulary_order() {
        let mut tables = sample_schema().tables().to_vec();
        tables.reverse();
        let reversed = SchemaSnapshot::new(tables);

        let text = SchemaFormatter::format(&reversed, PromptStrategy::Reference);
        let positions: Vec<usize> = ["student", "instructor", "course", "takes", "department"]
            .iter()
            .map(|name| text.find(&format!("TABLE: {name} ")).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(text, SchemaFormatter::format(&sample_schema(), PromptStrategy::Reference));
    }

    #[test]
    fn test_unknown_table_lists_column_names_only() {
        let schema = SchemaSnapshot::new(vec![
            Table::new("section", vec![Column::typed("sec_id", "INTEGER"), Column::new("room")]),
            Table::new("student", vec![Column::new("id"), Column::new("name")]),
        ]);

        let text = SchemaFormatter::format(&schema, PromptStrategy::Reference);

        assert!(text.contains("TABLE: section\nColumns: sec_id, room\n"));
        assert!(text.find("TABLE: student").unwrap() < text.find("TABLE: section").unwrap());
        // No other known tables present, so no relationships
        assert!(text.contains("Relationships: none"));
    }

    #[test]
    fn test_unknown_tables_sorted_by_name() {
        let schema = SchemaSnapshot::new(vec![
            Table::new("time_slot", vec![Column::new("day")]),
            Table::new("advisor", vec![Column::new("s_id")]),
            Table::new("course", vec![Column::new("course_id")]),
        ]);

        let text = SchemaFormatter::format(&schema, PromptStrategy::Reference);
        let course = text.find("TABLE: course").unwrap();
        let advisor = text.find("TABLE: advisor").unwrap();
        let time_slot = text.find("TABLE: time_slot").unwrap();

        assert!(course < advisor && advisor < time_slot);
    }

    #[test]
    fn test_uncatalogued_column_role_is_inferred() {
        let schema = SchemaSnapshot::new(vec![
            Table::new("instructor", vec![Column::new("id"), Column::new("course_id")]),
            Table::new("course", vec![Column::new("course_id")]),
        ]);
        let instructor = known_table("instructor").unwrap();

        assert_eq!(column_role(&schema, instructor, "id"), ColumnRole::PrimaryKey);
        assert_eq!(column_role(&schema, instructor, "course_id"), ColumnRole::ForeignKey);
        assert_eq!(column_role(&schema, instructor, "office"), ColumnRole::Plain);
    }

    #[test]
    fn test_generic_strategy_is_compact_and_sorted() {
        let schema = SchemaSnapshot::new(vec![
            Table::new("orders", vec![Column::typed("id", "BIGINT"), Column::new("total")]),
            Table::new("customers", vec![Column::typed("id", "BIGINT")]),
        ]);

        assert_eq!(
            SchemaFormatter::format(&schema, PromptStrategy::Generic),
            "customers(id BIGINT)\norders(id BIGINT, total)\n"
        );
    }
}
