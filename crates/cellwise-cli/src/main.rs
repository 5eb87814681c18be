//! Cellwise CLI - inspect test data sheets and documents

use anyhow::{bail, Context, Result};
use cellwise::prelude::*;
use cellwise::{DocumentTree, JsonSchema, JsonTree, SchemaValidator};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellwise")]
#[command(author, version, about = "Inspect test data held in sheets and JSON documents")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a CSV file, directory or spreadsheet
    Sheets {
        /// CSV file, directory of CSV files or spreadsheet file
        source: PathBuf,
    },

    /// Print the records of a sheet as JSON lines
    Records {
        /// CSV file, directory of CSV files or spreadsheet file
        source: PathBuf,

        /// Sheet name (default: the only sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Print the cases built from one or more columns
    Columns {
        /// CSV file, directory of CSV files or spreadsheet file
        source: PathBuf,

        /// Sheet name
        sheet: String,

        /// Column names
        #[arg(required = true)]
        columns: Vec<String>,
    },

    /// Read one value from a JSON document
    Get {
        /// JSON document, or a document config with --config
        input: PathBuf,

        /// Section name or dotted path
        section: String,

        /// Key within the section, or an index with --index
        key: String,

        /// Treat the input as a document config file
        #[arg(short, long)]
        config: bool,

        /// Validate the document against this schema first
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Read the key as an array index
        #[arg(short, long)]
        index: bool,
    },

    /// Validate a JSON document against a schema
    Validate {
        /// JSON document
        input: PathBuf,

        /// JSON Schema file
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Sheets { source } => list_sheets(&source),
        Commands::Records { source, sheet } => print_records(&source, sheet.as_deref()),
        Commands::Columns {
            source,
            sheet,
            columns,
        } => print_columns(&source, &sheet, &columns),
        Commands::Get {
            input,
            section,
            key,
            config,
            schema,
            index,
        } => get_value(&input, &section, &key, config, schema, index),
        Commands::Validate { input, schema } => validate(&input, &schema),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_workbook(source: &Path) -> Result<Workbook> {
    Workbook::open(source).with_context(|| format!("Failed to open '{}'", source.display()))
}

fn list_sheets(source: &Path) -> Result<()> {
    let workbook = open_workbook(source)?;
    for (i, name) in workbook.sheet_names().into_iter().enumerate() {
        println!("{}\t{}", i, name);
    }
    Ok(())
}

fn print_records(source: &Path, sheet: Option<&str>) -> Result<()> {
    let workbook = open_workbook(source)?;
    let worksheet = match sheet {
        Some(name) => workbook.sheet(name)?,
        None if workbook.sheet_count() == 1 => workbook
            .worksheet(0)
            .context("Workbook has no sheets")?,
        None => bail!(
            "'{}' holds {} sheets; choose one with --sheet",
            source.display(),
            workbook.sheet_count()
        ),
    };

    let mut out = io::stdout().lock();
    for record in RecordMaterializer::default().materialize(worksheet)? {
        let record = record?;
        let object: serde_json::Map<String, serde_json::Value> = record
            .iter()
            .map(|(name, value)| (name.to_string(), to_json(value)))
            .collect();
        writeln!(out, "{}", serde_json::Value::Object(object)).context("Failed to write to stdout")?;
    }
    Ok(())
}

fn print_columns(source: &Path, sheet: &str, columns: &[String]) -> Result<()> {
    let provider = SheetProvider::new(source);
    let cases = match columns {
        [column] => provider.column_data(sheet, column)?,
        _ => provider.multi_column_data(sheet, columns)?,
    };

    let mut out = io::stdout().lock();
    for case in &cases {
        let line: Vec<String> = case.iter().map(ToString::to_string).collect();
        writeln!(out, "{}", line.join("\t")).context("Failed to write to stdout")?;
    }
    eprintln!("{} case(s)", cases.len());
    Ok(())
}

fn get_value(
    input: &Path,
    section: &str,
    key: &str,
    is_config: bool,
    schema: Option<PathBuf>,
    index: bool,
) -> Result<()> {
    let mut config = if is_config {
        DocumentConfig::from_file(input)?
    } else {
        DocumentConfig::new(input)
    };
    if schema.is_some() {
        config.schema_path = schema;
    }

    let store = DocumentStore::load(&config)
        .with_context(|| format!("Failed to load '{}'", input.display()))?;
    let value: CoercedValue = if index {
        let position: usize = key
            .parse()
            .with_context(|| format!("'{}' is not an array index", key))?;
        store.get_by_index(section, position)?
    } else {
        store.get(section, key)?
    };

    println!("{}", value);
    Ok(())
}

fn validate(input: &Path, schema: &Path) -> Result<()> {
    let tree = JsonTree::from_file(input)?;
    let schema = JsonSchema::from_file(schema)?;

    let violations = schema.validate(tree.root());
    if violations.is_empty() {
        println!("'{}' is valid", input.display());
        return Ok(());
    }
    for violation in &violations {
        println!("{}", violation);
    }
    bail!("{} violation(s) found", violations.len())
}

fn to_json(value: &CoercedValue) -> serde_json::Value {
    match value {
        CoercedValue::Boolean(b) => serde_json::Value::Bool(*b),
        CoercedValue::Absent => serde_json::Value::Null,
        // Beyond f64 precision; keep every digit as text
        CoercedValue::Number(n @ Number::Big(_)) => serde_json::Value::String(n.to_string()),
        CoercedValue::Number(n) => n
            .to_string()
            .parse::<serde_json::Number>()
            .map(serde_json::Value::Number)
            .unwrap_or_else(|_| serde_json::Value::String(n.to_string())),
        other => serde_json::Value::String(other.to_string()),
    }
}
