use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use text2sql::{
    Config, Converter, JsonSchemaFile, SampleSchema, SchemaFormatter, SchemaProvider,
    SchemaSnapshot, TranslateError,
};

/// Canned questions for the reference database
static EXAMPLE_QUESTIONS: [(&str, &str); 5] = [
    ("Economics average 2010", "Qual é a média de notas dos cursos de Economia em 2010?"),
    ("Count CS students", "Quantos estudantes há em ciência da computação?"),
    ("Highest salary", "Quem tem o maior salário?"),
    ("All students", "Mostrar todos os estudantes"),
    ("List instructors", "Listar todos os professores"),
];

/// text2sql - translate natural-language questions into SQL
#[derive(Parser, Debug)]
#[command(name = "text2sql")]
#[command(about = "Translate natural-language questions into SQL", long_about = None)]
struct Cli {
    /// Question to translate (Portuguese or English)
    question: Option<String>,

    /// Translate one of the built-in example questions (1-5)
    #[arg(short = 'e', long = "example", conflicts_with = "question")]
    example: Option<usize>,

    /// JSON schema snapshot to translate against (overrides SCHEMA_PATH)
    #[arg(short = 's', long = "schema")]
    schema: Option<PathBuf>,

    /// Print the schema context sent to the model and exit
    #[arg(long = "show-schema")]
    show_schema: bool,

    /// List the built-in example questions and exit
    #[arg(long = "list-examples")]
    list_examples: bool,

    /// Print the result as JSON
    #[arg(long = "json")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout carries only the SQL
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "text2sql=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.list_examples {
        for (i, (label, question)) in EXAMPLE_QUESTIONS.iter().enumerate() {
            println!("{}. {:<24} {}", i + 1, label, question);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let schema = load_schema(cli.schema.as_ref().or(config.schema_path.as_ref()))?;

    if cli.show_schema {
        print!("{}", SchemaFormatter::format(&schema, config.prompt_strategy));
        return Ok(ExitCode::SUCCESS);
    }

    let question = match (cli.question, cli.example) {
        (Some(q), _) if !q.trim().is_empty() => q,
        (_, Some(n)) => match n.checked_sub(1).and_then(|i| EXAMPLE_QUESTIONS.get(i)) {
            Some((_, q)) => q.to_string(),
            None => anyhow::bail!("--example must be between 1 and {}", EXAMPLE_QUESTIONS.len()),
        },
        _ => anyhow::bail!("Enter a question, or pick one with --example"),
    };

    // Translation blocks (HTTP call, rate-limit sleep), and the blocking HTTP
    // client must be created and dropped off the runtime threads
    let task_question = question.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut converter = Converter::from_config(&config)?;
        let sql = converter.translate(&task_question, &schema)?;
        let elapsed_ms = converter.history().last().map(|h| h.elapsed_ms).unwrap_or(0);
        Ok::<_, TranslateError>((sql, elapsed_ms))
    })
    .await
    .map_err(TranslateError::from)?;

    match outcome {
        Ok((sql, elapsed_ms)) => {
            if cli.json {
                println!(
                    "{}",
                    json!({ "question": question, "sql": sql, "elapsed_ms": elapsed_ms })
                );
            } else {
                println!("{sql}");
            }
            tracing::info!("SQL generated in {:.1}s", elapsed_ms as f64 / 1000.0);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if cli.json {
                println!(
                    "{}",
                    json!({ "question": question, "error": e.to_string(), "kind": e.kind() })
                );
            } else {
                eprintln!("Error: {e}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_schema(path: Option<&PathBuf>) -> text2sql::Result<SchemaSnapshot> {
    match path {
        Some(path) => JsonSchemaFile::new(path).snapshot(),
        None => {
            tracing::info!("No schema file configured; using sample schema");
            SampleSchema.snapshot()
        }
    }
}
