//! Static knowledge about the reference university database.
//!
//! Everything here is fixed at compile time so prompt building stays a pure
//! function of the question and schema.

/// Column metadata the reference prompt knows about
#[derive(Debug, Clone, Copy)]
pub struct KnownColumn {
    pub name: &'static str,
    pub data_type: &'static str,
    pub description: &'static str,
    pub primary_key: bool,
    /// Table this column points at, for foreign keys
    pub references: Option<&'static str>,
}

/// Table metadata the reference prompt knows about
#[derive(Debug, Clone, Copy)]
pub struct KnownTable {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [KnownColumn],
}

impl KnownTable {
    pub fn column(&self, name: &str) -> Option<&'static KnownColumn> {
        let columns: &'static [KnownColumn] = self.columns;
        columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &'static str> {
        let columns: &'static [KnownColumn] = self.columns;
        columns.iter().filter(|c| c.primary_key).map(|c| c.name)
    }
}

const fn pk(name: &'static str, data_type: &'static str, description: &'static str) -> KnownColumn {
    KnownColumn {
        name,
        data_type,
        description,
        primary_key: true,
        references: None,
    }
}

const fn fk(
    name: &'static str,
    data_type: &'static str,
    references: &'static str,
    description: &'static str,
) -> KnownColumn {
    KnownColumn {
        name,
        data_type,
        description,
        primary_key: false,
        references: Some(references),
    }
}

const fn col(
    name: &'static str,
    data_type: &'static str,
    description: &'static str,
) -> KnownColumn {
    KnownColumn {
        name,
        data_type,
        description,
        primary_key: false,
        references: None,
    }
}

/// Known tables, in the order they are rendered
pub static KNOWN_TABLES: [KnownTable; 5] = [
    KnownTable {
        name: "student",
        description: "University students",
        columns: &[
            pk("id", "INTEGER", "Unique student ID"),
            col("name", "VARCHAR", "Student full name"),
            fk("dept_name", "VARCHAR", "department", "Department the student belongs to"),
            col("tot_cred", "INTEGER", "Total credits earned"),
        ],
    },
    KnownTable {
        name: "instructor",
        description: "Professors and instructors",
        columns: &[
            pk("id", "INTEGER", "Unique instructor ID"),
            col("name", "VARCHAR", "Instructor full name"),
            fk("dept_name", "VARCHAR", "department", "Department the instructor teaches in"),
            col("salary", "NUMERIC", "Instructor salary"),
        ],
    },
    KnownTable {
        name: "course",
        description: "Catalogue of courses offered",
        columns: &[
            pk("course_id", "VARCHAR", "Course code"),
            col("title", "VARCHAR", "Course title"),
            fk("dept_name", "VARCHAR", "department", "Department offering the course"),
            col("credits", "INTEGER", "Credits awarded by the course"),
        ],
    },
    KnownTable {
        name: "takes",
        description: "Student enrolments and final grades",
        columns: &[
            fk("id", "INTEGER", "student", "Enrolled student ID"),
            fk("course_id", "VARCHAR", "course", "Enrolled course ID"),
            col("sec_id", "INTEGER", "Section ID"),
            col("semester", "VARCHAR", "Semester (Fall, Spring, Summer)"),
            col("year", "INTEGER", "Academic year (e.g. 2024, 2023)"),
            col("grade", "NUMERIC", "Final grade, 0-10, NULL when not yet graded"),
        ],
    },
    KnownTable {
        name: "department",
        description: "University departments",
        columns: &[
            pk("dept_name", "VARCHAR", "Department name"),
            col("building", "VARCHAR", "Building where the department is located"),
            col("budget", "NUMERIC", "Department budget"),
        ],
    },
];

pub fn known_table(name: &str) -> Option<&'static KnownTable> {
    KNOWN_TABLES.iter().find(|t| t.name == name)
}

/// Spoken department names and the value stored in `dept_name`
pub const DEPARTMENT_VOCABULARY: [(&[&str], &str); 4] = [
    (&["Economia", "Economics"], "Finance"),
    (&["Ciência da Computação", "Computer Science"], "Comp. Sci."),
    (&["Física", "Physics"], "Physics"),
    (&["Matemática", "Mathematics"], "Math"),
];

/// Worked examples: (intent, SQL lines)
pub const WORKED_EXAMPLES: [(&str, &[&str]); 5] = [
    (
        "Average grade for a department in a given year",
        &[
            "SELECT AVG(t.grade)",
            "FROM takes t",
            "JOIN course c ON t.course_id = c.course_id",
            "WHERE c.dept_name = 'Finance' AND t.year = 2024;",
        ],
    ),
    (
        "Count students in a department",
        &["SELECT COUNT(*)", "FROM student", "WHERE dept_name = 'Comp. Sci.';"],
    ),
    (
        "List instructors by salary",
        &["SELECT name, salary", "FROM instructor", "ORDER BY salary DESC;"],
    ),
    (
        "Courses offered by a department",
        &["SELECT title, credits", "FROM course", "WHERE dept_name = 'Physics';"],
    ),
    (
        "Students with their grades",
        &[
            "SELECT s.name, c.title, t.grade",
            "FROM student s",
            "JOIN takes t ON s.id = t.id",
            "JOIN course c ON t.course_id = c.course_id",
            "WHERE t.year = 2024;",
        ],
    ),
];

/// Numbered generation rules for the reference prompt
pub const REFERENCE_RULES: [&str; 10] = [
    "ALWAYS include the SELECT and FROM clauses",
    "Use JOINs when an attribute lives in a related table",
    "For grade averages use AVG(takes.grade) with a JOIN between takes and course",
    "To filter by department use WHERE course.dept_name = 'Dept_Name'",
    "To filter by year use WHERE takes.year = YYYY",
    "Use single quotes for strings: 'Finance', never \"Finance\"",
    "Always end the statement with a semicolon",
    "For counts use COUNT(*) or COUNT(DISTINCT column)",
    "Use ORDER BY column DESC/ASC when an ordering is implied",
    "NEVER return incomplete or fragmentary SQL",
];

/// Formatting rules for schemas the prompt has no curated knowledge of
pub const GENERIC_RULES: [&str; 7] = [
    "Write every SQL keyword in UPPERCASE (SELECT, FROM, WHERE, JOIN, ON, GROUP BY, ORDER BY)",
    "Put each clause on its own line",
    "Indent the ON condition under each JOIN by two spaces",
    "Use only the tables and columns listed in the schema",
    "Always include the SELECT and FROM clauses",
    "Use single quotes for string literals",
    "End the statement with a semicolon",
];
