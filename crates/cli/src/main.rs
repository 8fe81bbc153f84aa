//! `yamlstyle`, a style linter for YAML files.
//!
//! Usage: yamlstyle [FILES]... [-c CONFIG] [-d CONFIG_DATA] [-f FORMAT]
//!
//! Without files (or with `-`) the source is read from standard input.
//! Exit status: 0 when no error was found, 1 when errors were found, 2 when
//! only warnings were found and `--strict` is set, 255 on usage, config or
//! I/O failures.

mod output;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use yamlstyle_lint::{Level, LintConfig, LintProblem, Linter};

use output::{Format, Printer};

/// Configuration file picked up from the working directory when neither
/// `-c` nor `-d` is given.
const DEFAULT_CONFIG_FILE: &str = ".yamlstyle.json";

#[derive(Debug, Parser)]
#[command(name = "yamlstyle")]
#[command(about = "Style linter for YAML files", long_about = None)]
#[command(version)]
struct Cli {
    /// Files to lint; `-` or no file reads standard input
    files: Vec<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config-file", conflicts_with = "config_data")]
    config_file: Option<PathBuf>,

    /// Configuration as inline JSON
    #[arg(short = 'd', long = "config-data")]
    config_data: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "standard")]
    format: Format,

    /// Exit with status 2 when only warnings are found
    #[arg(short, long)]
    strict: bool,

    /// Only report error level problems
    #[arg(long)]
    no_warnings: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<LintConfig> {
    if let Some(data) = &cli.config_data {
        return Ok(LintConfig::from_json(data)?);
    }
    if let Some(path) = &cli.config_file {
        return Ok(LintConfig::from_file(path)?);
    }
    let default = Path::new(DEFAULT_CONFIG_FILE);
    if default.is_file() {
        debug!(path = DEFAULT_CONFIG_FILE, "using configuration file");
        return Ok(LintConfig::from_file(default)?);
    }
    Ok(LintConfig::default())
}

fn read_input(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("cannot read standard input")?;
        return Ok(("stdin".to_string(), source));
    }
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Ok((path.display().to_string(), source))
}

#[derive(Debug, Default)]
struct Summary {
    errors: usize,
    warnings: usize,
}

impl Summary {
    fn record(&mut self, problems: &[LintProblem]) {
        for problem in problems {
            match problem.level {
                Level::Error => self.errors += 1,
                Level::Warning => self.warnings += 1,
            }
        }
    }

    fn exit_code(&self, strict: bool) -> ExitCode {
        if self.errors > 0 {
            ExitCode::from(1)
        } else if self.warnings > 0 && strict {
            ExitCode::from(2)
        } else {
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let linter = Linter::from_config(&config)?;

    let inputs = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut printer = Printer::new(stdout.lock(), cli.format, color);
    let mut summary = Summary::default();

    for path in &inputs {
        let (name, source) = read_input(path)?;
        let mut problems = linter.lint(&source);
        if cli.no_warnings {
            problems.retain(|p| p.level == Level::Error);
        }
        debug!(file = %name, problems = problems.len(), "linted");
        summary.record(&problems);
        printer.file(&name, &source, &problems)?;
    }
    printer.finish()?;

    Ok(summary.exit_code(cli.strict))
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(255)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("yamlstyle: {:#}", err);
            ExitCode::from(255)
        }
    }
}
