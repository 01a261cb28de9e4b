//! csig - Command-line interface for commit signals
//!
//! Commands:
//! - classify: Attribute each commit to an AI agent (NDJSON out)
//! - analyze: Full report with summary and temporal profile
//! - validate: Validate collector commit records
//! - patterns: List the built-in agent pattern registry

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commit_signals::adapter::{
    parse_commits_array, parse_commits_ndjson, to_records, validate_commits, RawCommit,
};
use commit_signals::classifier::classify_all;
use commit_signals::config::AnalysisConfig;
use commit_signals::patterns::PatternRegistry;
use commit_signals::pipeline::SignalProcessor;
use commit_signals::types::{ClassificationResult, SignalReport};
use commit_signals::{ComputeError, SIGNALS_VERSION};

/// csig - AI-assistance classification and work-pattern mining for commit histories
#[derive(Parser)]
#[command(name = "csig")]
#[command(version = SIGNALS_VERSION)]
#[command(about = "Classify AI-assisted commits and mine temporal work patterns", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify each commit (one NDJSON line per commit)
    Classify {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Analysis configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Produce a full signal report
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Session gap threshold in minutes (overrides the config file)
        #[arg(long)]
        gap_minutes: Option<u32>,

        /// Analysis configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate commit records
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in agent patterns in evaluation order
    Patterns {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one commit per line)
    Ndjson,
    /// JSON array of commits
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(command: Commands) -> Result<(), CsigCliError> {
    match command {
        Commands::Classify {
            input,
            output,
            input_format,
            config,
        } => cmd_classify(&input, &output, input_format, config.as_deref()),
        Commands::Analyze {
            input,
            output,
            input_format,
            output_format,
            gap_minutes,
            config,
        } => cmd_analyze(
            &input,
            &output,
            input_format,
            output_format,
            gap_minutes,
            config.as_deref(),
        ),
        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),
        Commands::Patterns { json } => cmd_patterns(json),
    }
}

fn cmd_classify(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    config: Option<&Path>,
) -> Result<(), CsigCliError> {
    let config = load_config(config)?;
    let custom = config.custom_registry()?;
    let registry = custom.as_ref().unwrap_or_else(|| PatternRegistry::builtin());

    let commits = read_commits(input, &input_format)?;
    let records = to_records(&commits)?;
    let classified = classify_all(registry, &records);

    let mut lines: Vec<String> = Vec::with_capacity(classified.len());
    for commit in &classified {
        let line = ClassifyLine {
            sha: &commit.record.sha,
            classification: commit.classification,
        };
        lines.push(serde_json::to_string(&line)?);
    }

    let mut output_data = lines.join("\n");
    if !output_data.is_empty() {
        output_data.push('\n');
    }
    write_output(output, &output_data)
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    gap_minutes: Option<u32>,
    config: Option<&Path>,
) -> Result<(), CsigCliError> {
    let mut config = load_config(config)?;
    if let Some(gap) = gap_minutes {
        config.session_gap_minutes = gap;
    }

    let commits = read_commits(input, &input_format)?;
    if commits.is_empty() {
        log::warn!("No commits in {}; writing an empty report", input.display());
    }
    let report = analyze_commits(&commits, config)?;

    write_output(output, &format_report(&report, &output_format)?)
}

fn analyze_commits(
    commits: &[RawCommit],
    config: AnalysisConfig,
) -> Result<SignalReport, CsigCliError> {
    let records = to_records(commits)?;

    let mut processor = SignalProcessor::with_config(config)?;
    processor.ingest_records(records);
    Ok(processor.build_report()?)
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), CsigCliError> {
    let commits = read_commits(input, &input_format)?;

    let results = validate_commits(&commits);
    let report = ValidationReport {
        total_commits: commits.len(),
        valid_commits: commits.len() - results.len(),
        invalid_commits: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                sha: r.sha.clone(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total commits:   {}", report.total_commits);
        println!("Valid commits:   {}", report.valid_commits);
        println!("Invalid commits: {}", report.invalid_commits);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Commit {} (index {}): {}",
                    err.sha.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_commits > 0 {
        Err(CsigCliError::ValidationFailed(report.invalid_commits))
    } else {
        Ok(())
    }
}

fn cmd_patterns(json: bool) -> Result<(), CsigCliError> {
    let specs = PatternRegistry::builtin().to_specs();

    if json {
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    println!("Agent patterns (evaluation order)");
    println!("=================================");
    for spec in &specs {
        println!("\n{}", spec.agent);
        print_patterns("email (high)", &spec.emails);
        print_patterns("co-author (high)", &spec.co_authored);
        print_patterns("keyword (medium)", &spec.keywords);
    }
    println!(
        "\nFallback (low): {}",
        commit_signals::patterns::FUZZY_AI_KEYWORDS.join(", ")
    );
    Ok(())
}

// Helper functions

fn print_patterns(label: &str, patterns: &[String]) {
    for pattern in patterns {
        println!("  {:<18} {}", label, pattern);
    }
}

fn read_input(input: &Path) -> Result<String, CsigCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_commits(input: &Path, input_format: &InputFormat) -> Result<Vec<RawCommit>, CsigCliError> {
    let input_data = read_input(input)?;
    let commits = match input_format {
        InputFormat::Ndjson => parse_commits_ndjson(&input_data)?,
        InputFormat::Json => parse_commits_array(&input_data)?,
    };
    log::debug!("Read {} commits from {}", commits.len(), input.display());
    Ok(commits)
}

fn write_output(output: &Path, data: &str) -> Result<(), CsigCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, CsigCliError> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(AnalysisConfig::from_json(&json)?)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn format_report(report: &SignalReport, format: &OutputFormat) -> Result<String, CsigCliError> {
    let mut data = match format {
        OutputFormat::Json => serde_json::to_string(report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(report)?,
    };
    data.push('\n');
    Ok(data)
}

// Error handling

#[derive(Debug)]
enum CsigCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    ValidationFailed(usize),
}

impl From<io::Error> for CsigCliError {
    fn from(e: io::Error) -> Self {
        CsigCliError::Io(e)
    }
}

impl From<ComputeError> for CsigCliError {
    fn from(e: ComputeError) -> Self {
        CsigCliError::Compute(e)
    }
}

impl From<serde_json::Error> for CsigCliError {
    fn from(e: serde_json::Error) -> Self {
        CsigCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CsigCliError> for CliError {
    fn from(e: CsigCliError) -> Self {
        match e {
            CsigCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CsigCliError::Compute(e @ ComputeError::Validation { .. }) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'csig validate' for details".to_string()),
            },
            CsigCliError::Compute(e @ ComputeError::InvalidPattern { .. }) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the regex syntax of custom patterns".to_string()),
            },
            CsigCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input is collector commit JSON (sha, date, message, ...)".to_string()),
            },
            CsigCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CsigCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} commits failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ClassifyLine<'a> {
    sha: &'a str,
    #[serde(flatten)]
    classification: ClassificationResult,
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_commits: usize,
    valid_commits: usize,
    invalid_commits: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    sha: Option<String>,
    error: String,
}
