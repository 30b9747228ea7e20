//! `remodel`: apply codemod rules to files on disk

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use remodel_engine::{BatchReport, BatchRunner, Config, Engine, FileReport, FileStatus, SourceFile};
use remodel_rules::RuleRegistry;
use tracing_subscriber::EnvFilter;

mod walk;

#[derive(Debug, Parser)]
#[command(name = "remodel", version, about = "Pattern-based React codemods")]
struct Cli {
    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply rules to files and directories
    Run(RunArgs),
    /// List registered rules
    List,
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Rule to apply; repeat to chain rules in order
    #[arg(short, long = "rule", value_name = "NAME")]
    rules: Vec<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report changes without writing files
    #[arg(long)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    report_json: bool,

    /// Skip re-parsing the printed output
    #[arg(long)]
    no_verify: bool,

    /// Files or directories to process
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    match cli.command {
        Command::List => {
            list();
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => run(&args),
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn list() {
    let registry = RuleRegistry::with_defaults();
    let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);
    for rule in registry.iter() {
        println!("{:width$}  {}", rule.name(), rule.description());
    }
}

fn run(args: &RunArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if args.no_verify {
        config.engine.verify_output = false;
    }

    let names = if args.rules.is_empty() {
        config.engine.default_rules.clone()
    } else {
        args.rules.clone()
    };
    if names.is_empty() {
        bail!("no rules selected; pass --rule or set engine.default_rules");
    }
    let registry = RuleRegistry::with_defaults();
    let rules = registry.resolve(&names).context("invalid rule selection")?;

    let inputs = walk::collect_paths(&args.paths, &config.engine);
    tracing::info!(
        files = inputs.paths.len(),
        unreadable = inputs.failures.len(),
        rules = ?names,
        "collected input files"
    );

    let mut unreadable = inputs.failures;
    let mut files = Vec::with_capacity(inputs.paths.len());
    for path in inputs.paths {
        match fs::read_to_string(&path) {
            Ok(text) => files.push(SourceFile::new(path, text)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read file");
                unreadable.push(FileReport::io_failure(path, &e));
            }
        }
    }

    let engine = Engine::new(config);
    let mut report = BatchRunner::new(&engine).run(files, &rules);
    for failure in unreadable {
        report.push(failure);
    }

    if !args.dry_run {
        write_changes(&mut report);
    }

    if args.report_json {
        println!("{}", report.to_json().context("failed to render report")?);
    } else {
        print_summary(&report, args.dry_run);
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Write changed files back, turning each failed write into a failed entry
fn write_changes(report: &mut BatchReport) {
    let mut failed = Vec::new();
    for (path, text) in report.changed() {
        match fs::write(path, text) {
            Ok(()) => tracing::debug!(path = %path.display(), "wrote file"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot write file");
                failed.push((path.to_path_buf(), e));
            }
        }
    }
    for (path, e) in failed {
        report.mark_io_failure(&path, &e);
    }
}

fn print_summary(report: &BatchReport, dry_run: bool) {
    for file in &report.files {
        match file.status {
            FileStatus::Changed => {
                let verb = if dry_run { "would change" } else { "changed" };
                println!("{verb} {} ({})", file.path.display(), file.rules.join(", "));
            }
            FileStatus::Failed => println!(
                "failed {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            ),
            FileStatus::Unchanged => {}
        }
    }
    let totals = report.totals;
    println!(
        "{} files: {} changed, {} unchanged, {} failed",
        totals.files, totals.changed, totals.unchanged, totals.failed
    );
}
