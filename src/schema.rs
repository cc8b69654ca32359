use std::path::{Path, PathBuf};

use crate::error::{Result, TranslateError};
use crate::models::{Column, SchemaSnapshot, Table};

/// Supplies the schema a question is translated against
///
/// Live database introspection lives outside this crate; anything that can
/// produce a [`SchemaSnapshot`] can implement this.
pub trait SchemaProvider {
    fn snapshot(&self) -> Result<SchemaSnapshot>;
}

/// The five-table university schema used when no database is reachable
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleSchema;

impl SchemaProvider for SampleSchema {
    fn snapshot(&self) -> Result<SchemaSnapshot> {
        Ok(sample_schema())
    }
}

pub fn sample_schema() -> SchemaSnapshot {
    fn table(name: &str, columns: &[(&str, &str)]) -> Table {
        Table::new(
            name,
            columns
                .iter()
                .map(|(column, data_type)| Column::typed(*column, *data_type))
                .collect(),
        )
    }

    SchemaSnapshot::new(vec![
        table(
            "student",
            &[
                ("id", "INTEGER"),
                ("name", "VARCHAR"),
                ("dept_name", "VARCHAR"),
                ("tot_cred", "INTEGER"),
            ],
        ),
        table(
            "instructor",
            &[
                ("id", "INTEGER"),
                ("name", "VARCHAR"),
                ("dept_name", "VARCHAR"),
                ("salary", "NUMERIC"),
            ],
        ),
        table(
            "course",
            &[
                ("course_id", "VARCHAR"),
                ("title", "VARCHAR"),
                ("dept_name", "VARCHAR"),
                ("credits", "INTEGER"),
            ],
        ),
        table(
            "takes",
            &[
                ("id", "INTEGER"),
                ("course_id", "VARCHAR"),
                ("sec_id", "INTEGER"),
                ("semester", "VARCHAR"),
                ("year", "INTEGER"),
                ("grade", "NUMERIC"),
            ],
        ),
        table(
            "department",
            &[("dept_name", "VARCHAR"), ("building", "VARCHAR"), ("budget", "NUMERIC")],
        ),
    ])
}

/// Schema snapshot stored as JSON on disk
///
/// Format: `[{"name": "student", "columns": [{"name": "id", "type": "INTEGER"}]}]`
#[derive(Debug, Clone)]
pub struct JsonSchemaFile {
    path: PathBuf,
}

impl JsonSchemaFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SchemaProvider for JsonSchemaFile {
    fn snapshot(&self) -> Result<SchemaSnapshot> {
        tracing::info!("Loading schema from: {:?}", self.path);

        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            TranslateError::Schema(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let schema: SchemaSnapshot = serde_json::from_str(&raw).map_err(|e| {
            TranslateError::Schema(format!("Invalid schema file {}: {}", self.path.display(), e))
        })?;

        if schema.is_empty() {
            return Err(TranslateError::Schema(format!(
                "Schema file {} contains no tables",
                self.path.display()
            )));
        }

        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sample_schema_shape() {
        let schema = SampleSchema.snapshot().unwrap();
        let names: Vec<&str> = schema.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["student", "instructor", "course", "takes", "department"]);
        assert_eq!(schema.table("takes").unwrap().columns.len(), 6);
        assert_eq!(
            schema.table("department").unwrap().columns[2],
            Column::typed("budget", "NUMERIC")
        );
    }

    #[test]
    fn test_json_schema_file_loads_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&sample_schema()).unwrap()).unwrap();

        let loaded = JsonSchemaFile::new(file.path()).snapshot().unwrap();
        assert_eq!(loaded, sample_schema());
    }

    #[test]
    fn test_json_schema_file_errors() {
        let missing = JsonSchemaFile::new("/nonexistent/schema.json").snapshot();
        assert!(matches!(missing, Err(TranslateError::Schema(_))));

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        let err = JsonSchemaFile::new(empty.path()).snapshot().unwrap_err();
        assert!(err.to_string().contains("no tables"));
    }
}
