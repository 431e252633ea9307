//! Purpose: `rowset` CLI entry point for replaying result-set dumps through the typed accessors.
//! Role: Binary crate root; parses args, loads a dump into a table, emits JSON on stdout.
//! Invariants: Commands emit one compact JSON value per line on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::error::Error as StdError;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use command_dispatch::dispatch_command;
use rowset::api::{DuplicateColumns, Error, ErrorKind, ResultTable, TableOptions, to_exit_code};
use rowset::json::dump;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

#[derive(Parser)]
#[command(
    name = "rowset",
    version,
    about = "Inspect buffered SQL result sets through typed accessors",
    long_about = r#"Load a result-set dump (columns + rows as JSON) and read it the way an
application would: by column name, through int/float/string/time accessors."#,
    after_help = r#"EXAMPLES
  $ rowset columns users.json
  $ rowset rows users.json --row 0
  $ rowset get users.json --row 0 --column created_at --as time

DUMP FORMAT
  {"columns":[{"name":"id","type":"BIGINT"}],"rows":[["42"],[7],[null]]}
  Cells: null, integer, float, string (raw bytes), {"timestamp":"YYYY-MM-DD HH:MM:SS"}"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten)]
    load: LoadArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Copy, Clone, Debug)]
struct LoadArgs {
    #[arg(
        long,
        global = true,
        help = "Fail on temporal literals that match no known shape instead of reading the zero timestamp"
    )]
    strict_temporal: bool,
    #[arg(long, global = true, help = "Reject result sets that repeat a column name")]
    reject_duplicates: bool,
}

impl LoadArgs {
    fn options(self) -> TableOptions {
        let duplicates = if self.reject_duplicates {
            DuplicateColumns::Reject
        } else {
            DuplicateColumns::LastWins
        };
        TableOptions::new()
            .with_strict_temporal(self.strict_temporal)
            .with_duplicate_columns(duplicates)
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "List columns with their declared type and accessor family")]
    Columns {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    #[command(about = "Print rows as JSON objects keyed by column name")]
    Rows {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long, help = "Only print this row (0-based)")]
        row: Option<usize>,
    },
    #[command(about = "Read one cell through a typed accessor")]
    Get {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long, help = "Row index (0-based)")]
        row: usize,
        #[arg(long, help = "Column name")]
        column: String,
        #[arg(long = "as", value_enum, default_value = "auto", help = "Accessor to use")]
        read_as: ReadAs,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReadAs {
    Auto,
    Int,
    Int64,
    Float32,
    Float64,
    String,
    Time,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `rowset --help`."));
            }
        },
    };

    dispatch_command(cli.command, cli.load.options())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn load_table(file: &Path, options: TableOptions) -> Result<ResultTable, Error> {
    let stream = dump::read_path(file)?;
    ResultTable::load_with(stream, options)
}

fn emit_json(value: Value) {
    let json = serde_json::to_string(&value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::UnknownColumn => "unknown column".to_string(),
        ErrorKind::UnsupportedConversion => "unsupported conversion".to_string(),
        ErrorKind::Parse => "value did not parse".to_string(),
        ErrorKind::UnconvertibleKind => "cell kind cannot be converted".to_string(),
        ErrorKind::InvalidTarget => "invalid record target".to_string(),
        ErrorKind::NoCurrentRow => "no current row".to_string(),
        ErrorKind::StreamFailure => "result stream failed".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(column) = err.column() {
        inner.insert("column".to_string(), json!(column));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(column) = err.column() {
        lines.push(format!("column: {column}"));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
