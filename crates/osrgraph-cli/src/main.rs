use std::fs;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use osrgraph_core::{
    BatchOptions, BatchReport, DirectorySource, PathListSource, analyze_replay, analyze_source,
    has_replay_extension, write_csv, write_json,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "osrgraph")]
#[command(version)]
#[command(
    about = "Decode osu! replays (.osr) and export per-replay accuracy.",
    long_about = None,
    after_help = "Examples:\n  osrgraph replays export ~/osu/Data/r -o out.csv\n  osrgraph replays export 'replays/*.osr' --stdout --format json\n  osrgraph replays inspect replay.osr --pretty"
)]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Suppress non-error output
    #[arg(long, global = true)]
    quiet: bool,

    /// Append log events to this file as well
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log level for --log-file, independent of the console level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Debug)]
    log_file_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on replay files.
    Replays {
        #[command(subcommand)]
        command: ReplayCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ReplayCommands {
    /// Decode every replay of a directory, file or glob and export one row per replay.
    #[command(
        after_help = "Examples:\n  osrgraph replays export ~/osu/Data/r -o out.csv\n  osrgraph replays export 'replays/*.osr' --stdout --format json"
    )]
    Export {
        /// Directory of .osr files, a single .osr file, or a glob pattern
        input: PathBuf,

        /// Output path
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        out: Option<PathBuf>,

        /// Write the export to stdout
        #[arg(long, conflicts_with = "out")]
        stdout: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Leave replays of other game modes out of the export
        #[arg(long)]
        standard_only: bool,

        /// Exit with a non-zero code if any replay failed to decode
        #[arg(long)]
        strict: bool,
    },
    /// Decode a single replay and print it as JSON.
    Inspect {
        /// Path to a .osr file
        input: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        return report_error(err);
    }

    let result = match cli.command {
        Commands::Replays { command } => match command {
            ReplayCommands::Export {
                input,
                out,
                stdout,
                format,
                pretty,
                standard_only,
                strict,
            } => cmd_replays_export(ExportArgs {
                input,
                out,
                stdout,
                format,
                pretty,
                standard_only,
                strict,
                quiet: cli.quiet,
            }),
            ReplayCommands::Inspect { input, pretty } => cmd_replays_inspect(input, pretty),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(err),
    }
}

fn report_error(err: CliError) -> ExitCode {
    eprintln!("error: {}", err.message);
    if let Some(hint) = err.hint {
        eprintln!("hint: {}", hint);
    }
    ExitCode::from(2)
}

/// Console layer on stderr filtered by `RUST_LOG` or `--log-level`, plus an
/// optional append-only file layer with its own level.
fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let default = if cli.quiet {
        "error"
    } else {
        cli.log_level.as_filter()
    };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .with_filter(console_filter);

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .with_filter(EnvFilter::new(cli.log_file_level.as_filter())),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();
    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File, CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                CliError::new(
                    format!("failed to create log directory {}: {}", parent.display(), err),
                    None,
                )
            })?;
        }
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            CliError::new(
                format!("failed to open log file {}: {}", path.display(), err),
                Some("check that the log file path is writable".to_string()),
            )
        })
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

struct ExportArgs {
    input: PathBuf,
    out: Option<PathBuf>,
    stdout: bool,
    format: OutputFormat,
    pretty: bool,
    standard_only: bool,
    strict: bool,
    quiet: bool,
}

fn cmd_replays_export(args: ExportArgs) -> Result<(), CliError> {
    if args.pretty && args.format != OutputFormat::Json {
        return Err(CliError::new(
            "--pretty only applies to JSON output",
            Some("add --format json".to_string()),
        ));
    }

    let out = if args.stdout {
        None
    } else {
        Some(args.out.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--out or --stdout".to_string()),
            )
        })?)
    };

    let input = resolve_input(&args.input)?;
    match &input {
        ResolvedInput::Directory(dir) => debug!(dir = %dir.display(), "exporting directory"),
        ResolvedInput::Files(files) => debug!(files = files.len(), "exporting files"),
    }
    if let Some(out_path) = out.as_ref() {
        ensure_output_differs(out_path, &input)?;
    }

    let options = BatchOptions {
        standard_only: args.standard_only,
    };
    let report = match &input {
        ResolvedInput::Directory(dir) => {
            let source = DirectorySource::open(dir)
                .with_context(|| format!("Failed to list replays in {}", dir.display()))?;
            analyze_source(source, options)
        }
        ResolvedInput::Files(paths) => analyze_source(PathListSource::new(paths.clone()), options),
    }
    .context("replay export failed")?;

    info!(
        files = report.files_total,
        decoded = report.entries.len(),
        failed = report.failures.len(),
        skipped = report.skipped,
        "went through {} replays",
        report.files_total
    );

    match out {
        None => {
            let stdout = io::stdout();
            write_report(stdout.lock(), &report, args.format, args.pretty)?;
        }
        Some(out_path) => {
            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            let file = fs::File::create(&out_path)
                .with_context(|| format!("Failed to create output: {}", out_path.display()))?;
            write_report(BufWriter::new(file), &report, args.format, args.pretty)?;
            if !args.quiet {
                eprintln!(
                    "OK: {} replays written -> {} ({} failed, {} skipped)",
                    report.entries.len(),
                    out_path.display(),
                    report.failures.len(),
                    report.skipped
                );
            }
        }
    }

    if args.strict && report.has_failures() {
        return Err(CliError::new(
            format!("{} replays failed to decode", report.failures.len()),
            Some(format!("first failure: {}", first_failure(&report))),
        ));
    }
    Ok(())
}

fn cmd_replays_inspect(input: PathBuf, pretty: bool) -> Result<(), CliError> {
    if !input.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a single .osr file".to_string()),
        ));
    }
    let bytes =
        fs::read(&input).with_context(|| format!("Failed to read replay: {}", input.display()))?;
    let analysis = analyze_replay(&bytes).map_err(|err| {
        CliError::new(
            format!("failed to decode {}: {}", input.display(), err),
            Some("the file is not a complete .osr replay".to_string()),
        )
    })?;

    let json = if pretty {
        serde_json::to_string_pretty(&analysis)
    } else {
        serde_json::to_string(&analysis)
    }
    .context("JSON serialization failed")?;
    println!("{}", json);
    Ok(())
}

fn write_report<W: Write>(
    writer: W,
    report: &BatchReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let result = match format {
        OutputFormat::Csv => write_csv(writer, &report.entries),
        OutputFormat::Json => write_json(writer, report, pretty),
    };
    result.context("Failed to write export").map_err(Into::into)
}

fn first_failure(report: &BatchReport) -> String {
    report
        .failures
        .first()
        .map(|failure| format!("{} ({})", failure.file, failure.message))
        .unwrap_or_default()
}

enum ResolvedInput {
    Directory(PathBuf),
    Files(Vec<PathBuf>),
}

/// Existing paths are taken literally, so directories like `osu [old]` are
/// not read as patterns.
fn resolve_input(input: &Path) -> Result<ResolvedInput, CliError> {
    if input.is_dir() {
        return Ok(ResolvedInput::Directory(input.to_path_buf()));
    }
    if !input.exists() {
        let pattern = input.to_string_lossy();
        if is_glob_pattern(&pattern) {
            return resolve_glob(&pattern);
        }
        return Err(CliError::new(
            format!("input not found: {}", input.display()),
            Some("pass a replay directory (e.g. osu!/Data/r), a .osr file or a glob".to_string()),
        ));
    }
    if !has_replay_extension(input) {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .osr file".to_string()),
        ));
    }
    Ok(ResolvedInput::Files(vec![input.to_path_buf()]))
}

fn resolve_glob(pattern: &str) -> Result<ResolvedInput, CliError> {
    let paths = glob(pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() && has_replay_extension(&path) {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no replays match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .osr files".to_string()),
        ));
    }
    matches.sort();
    Ok(ResolvedInput::Files(matches))
}

fn ensure_output_differs(out: &Path, input: &ResolvedInput) -> Result<(), CliError> {
    let Some(target) = absolute_output_path(out) else {
        return Ok(());
    };
    let collides = match input {
        ResolvedInput::Directory(dir) => {
            target.exists()
                && has_replay_extension(&target)
                && fs::canonicalize(dir).is_ok_and(|dir| target.parent() == Some(dir.as_path()))
        }
        ResolvedInput::Files(files) => files
            .iter()
            .filter_map(|file| fs::canonicalize(file).ok())
            .any(|file| file == target),
    };
    if collides {
        return Err(CliError::new(
            format!("output path must differ from input: {}", out.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

/// Canonical parent joined with the file name; `None` when the parent does
/// not exist yet.
fn absolute_output_path(out: &Path) -> Option<PathBuf> {
    let parent = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = fs::canonicalize(parent).ok()?;
    Some(parent.join(out.file_name()?))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
