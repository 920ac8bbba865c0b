use clap::Parser as ClapParser;
use nexus::{repl, runner, Config};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// An interpreter for the Nexus expression language
#[derive(ClapParser, Debug)]
#[command(name = "nexus", version)]
struct Cli {
    /// The script file to execute
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start in interactive REPL mode
    #[arg(short, long)]
    interactive: bool,

    /// Report type errors and unsupported constructs instead of evaluating them to null
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            strict: self.strict,
            verbosity: self.verbose,
            ..Config::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.file {
        Some(path) if !cli.interactive => run_file(path, &config),
        _ => {
            repl::start(&config);
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &Path, config: &Config) -> ExitCode {
    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return ExitCode::FAILURE;
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.to_string_lossy();
            tracing::debug!(file = %filename, "running script");
            if runner::run(&source, Some(filename.as_ref()), config) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}
