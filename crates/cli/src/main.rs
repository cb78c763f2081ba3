mod config;
mod error;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use resultset::ResultSet;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use trace::{History, Verdict};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "stmtflow.toml";
const LOG_ENV: &str = "STMTFLOW_LOG";

#[derive(Parser)]
#[command(name = "stmtflow")]
#[command(about = "Inspect and compare SQL session traces", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./stmtflow.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a recorded history
    Dump {
        /// History file (JSON)
        file: PathBuf,
        /// Print row-bearing results as tables
        #[arg(short, long)]
        verbose: bool,
        /// Print start, end and cost of each statement
        #[arg(short, long)]
        latency: bool,
        /// Re-emit the history as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check that two histories are equivalent
    Compare {
        /// Expected history (JSON)
        expected: PathBuf,
        /// Actual history (JSON)
        actual: PathBuf,
        /// Sort rows of every statement before digesting
        #[arg(short, long)]
        sort: bool,
    },
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Dump {
            file,
            verbose,
            latency,
            json,
        } => cmd_dump(&config, &file, verbose, latency, json),
        Commands::Compare {
            expected,
            actual,
            sort,
        } => cmd_compare(&config, &expected, &actual, sort),
    }
}

fn cmd_dump(config: &Config, file: &Path, verbose: bool, latency: bool, json: bool) -> Result<()> {
    let history = load_history(file)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        history.dump_json(&mut out, &config.json_options())?;
    } else {
        let mut opts = config.text_options();
        opts.verbose |= verbose;
        opts.with_latency |= latency;
        history.dump_text(&mut out, &opts)?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_compare(config: &Config, expected: &Path, actual: &Path, sort: bool) -> Result<()> {
    let expected = load_history(expected)?;
    let actual = load_history(actual)?;

    let mut opts = config.digest_options();
    opts.sort |= sort;

    match expected.equal_to(&actual, Some(&opts)) {
        Verdict::Equal => {
            println!("equal ({} events)", expected.len());
            Ok(())
        }
        Verdict::Differ(msg) => Err(Error::Mismatch(msg)),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}

fn load_history(path: &Path) -> Result<History<ResultSet>> {
    let file = File::open(path).map_err(|source| Error::HistoryNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let history = History::load(BufReader::new(file)).inspect_err(|e| {
        warn!(path = %path.display(), error = %e, "failed to decode history");
    })?;
    debug!(path = %path.display(), events = history.len(), "loaded history");
    Ok(history)
}
