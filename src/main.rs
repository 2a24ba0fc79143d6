//! treecmp - read-only comparison of two directory trees.
//!
//! Usage:
//!   treecmp start [FOLDER1] [FOLDER2]   Compare two folders (prompts for missing ones)
//!   treecmp help                        Show help

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use treecmp_compare::{CompareConfig, CompareEngine, Platform, validate_root};

mod prompt;
mod render;

#[derive(Parser)]
#[command(
    name = "treecmp",
    version,
    about = "Compare two directory trees without modifying either",
    long_about = "treecmp walks two folders and lists every path that is missing on one side, \
                  has a different type, size or content, or could not be read.\n\n\
                  Run `treecmp start FOLDER1 FOLDER2`, or leave the folders out to be prompted.",
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two folders
    Start {
        /// First folder (prompted for if omitted)
        folder1: Option<PathBuf>,

        /// Second folder (prompted for if omitted)
        folder2: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Worker threads (0 = auto, 1 = sequential)
        #[arg(short = 'j', long, default_value = "0")]
        threads: usize,

        /// Entry names to leave out on both sides (glob, repeatable)
        #[arg(short, long = "ignore", value_name = "PATTERN")]
        ignore: Vec<String>,

        /// Leave out hidden entries (names starting with '.')
        #[arg(long)]
        skip_hidden: bool,

        /// Read buffer size in bytes for content comparison
        #[arg(long, default_value = "65536")]
        chunk_size: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let Some(platform) = Platform::detect() else {
        bail!("Unsupported platform: treecmp runs on Linux, macOS and Windows");
    };

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Start {
            folder1,
            folder2,
            format,
            threads,
            ignore,
            skip_hidden,
            chunk_size,
            no_color,
        } => {
            let config = CompareConfig::builder()
                .threads(threads)
                .ignore_patterns(ignore)
                .include_hidden(!skip_hidden)
                .chunk_size(chunk_size)
                .platform(platform)
                .build()
                .context("Invalid options")?;

            let first = acquire_root("first folder", folder1)?;
            let second = acquire_root("second folder", folder2)?;

            let color = !no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
            run_start(&first, &second, config, format, color)?;
        }
    }

    Ok(())
}

/// Validate a root given on the command line, or prompt until one validates.
fn acquire_root(label: &str, given: Option<PathBuf>) -> Result<PathBuf> {
    match given {
        Some(path) => Ok(validate_root(label, &path)?),
        None => {
            let stdin = io::stdin();
            prompt::prompt_for_root(label, &mut stdin.lock(), &mut io::stderr())
        }
    }
}

/// Compare two validated roots and print the result.
fn run_start(
    first: &Path,
    second: &Path,
    config: CompareConfig,
    format: OutputFormat,
    color: bool,
) -> Result<()> {
    eprintln!("Comparing {} with {}...", first.display(), second.display());

    let engine = CompareEngine::with_config(config);
    let report = engine.compare(first, second).context("Comparison failed")?;

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => render::render_report(&report, &mut stdout, color)?,
        OutputFormat::Json => render::render_json(&report, &mut stdout)?,
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
