use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cliparse_core::{ParseOutcome, Schema, SchemaFile};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when strict mode rejected the tokens.
const EXIT_REJECTED: i32 = 2;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CLIPARSE_LOG";

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "cliparse")]
#[command(about = "Classify command-line tokens against an option schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` and print the classified result.
    Parse(ParseArgs),
    /// Print the usage banner declared by a schema file.
    Usage(UsageArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Abort on the first unknown or invalid option, overriding the schema file.
    #[arg(long)]
    strict: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to classify, without the program name.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Schema file (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: PathBuf,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Usage(args) => run_usage(args),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_REJECTED),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_schema_file(path: &Path) -> Result<(SchemaFile, Schema), String> {
    let file = SchemaFile::load(path)
        .map_err(|err| format!("Failed to load schema '{}': {err}", path.display()))?;
    let schema = file
        .to_schema()
        .map_err(|err| format!("Invalid schema '{}': {err}", path.display()))?;
    debug!(path = %path.display(), strict = schema.is_strict(), "loaded schema");
    Ok((file, schema))
}

fn run_parse(args: ParseArgs) -> Result<bool, String> {
    let mut parser = cliparse_core::Parser::from_tokens(args.tokens);
    if let Some(path) = &args.schema {
        let (file, schema) = load_schema_file(path)?;
        parser = parser.with_schema(schema);
        if let Some(usage) = file.usage {
            parser = parser.with_usage(usage);
        }
    }
    if args.strict {
        parser.set_strict_mode(true);
    }

    let success = parser.parse();
    let outcome = parser.outcome();

    let raw = format_outcome(&outcome, args.format)?;
    print!("{raw}");

    if success {
        for message in &outcome.errors {
            eprintln!("warning: {message}");
        }
    } else {
        for message in &outcome.errors {
            eprintln!("error: {message}");
        }
    }

    Ok(success)
}

fn run_usage(args: UsageArgs) -> Result<bool, String> {
    let (file, schema) = load_schema_file(&args.schema)?;
    print!(
        "{}",
        cliparse_core::render_usage(&schema, file.usage.as_deref())
    );
    Ok(true)
}

fn format_outcome(outcome: &ParseOutcome, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(outcome)
            .map(|mut raw| {
                raw.push('\n');
                raw
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(outcome).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        CliOutputFormat::Text => Ok(outcome_to_text(outcome)),
    }
}

fn outcome_to_text(outcome: &ParseOutcome) -> String {
    let mut out = String::new();

    let status = match outcome.success {
        Some(true) => "ok",
        Some(false) => "rejected",
        None => "not parsed",
    };
    out.push_str(&format!("Status: {status}\n"));

    if !outcome.options.is_empty() {
        out.push_str("Options:\n");
        for (name, value) in &outcome.options {
            out.push_str(&format!("  {name} = {value}\n"));
        }
    }
    if !outcome.commands.is_empty() {
        out.push_str(&format!("Commands: {}\n", outcome.commands.join(" ")));
    }
    if !outcome.arguments.is_empty() {
        out.push_str(&format!("Arguments: {}\n", outcome.arguments.join(" ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args_take_tokens_after_separator() {
        let cli = Cli::try_parse_from([
            "cliparse", "parse", "--strict", "--", "--opt", "-x", "--", "arg",
        ])
        .unwrap();
        let Command::Parse(args) = cli.command else {
            panic!("expected parse subcommand");
        };
        assert!(args.strict);
        assert_eq!(args.tokens, ["--opt", "-x", "--", "arg"]);
    }

    #[test]
    fn test_text_output_lists_buckets() {
        let mut parser = cliparse_core::Parser::from_tokens(["cmd", "--opt=1", "-v", "--", "a"]);
        parser.parse();
        let text = outcome_to_text(&parser.outcome());
        assert_eq!(
            text,
            "Status: ok\nOptions:\n  opt = 1\n  v = true\nCommands: cmd\nArguments: a\n"
        );
    }
}
