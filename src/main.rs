use clap::{Parser, Subcommand};
use eyre::Result;
use std::io;
use std::path::PathBuf;
use tasklist::{Config, IdentityMode, ListFormat, Shell};
use tracing::{Level, debug, info};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Interactive to-do list with filtering, sorting and undo")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/tasklist/tasklist.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve undo targets by stable key instead of list position
    #[arg(long)]
    stable_ids: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Print task listings as JSON
    #[arg(long)]
    json: bool,

    /// Number of actions kept for undo
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    history_limit: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as YAML
    Config,
}

fn log_level(verbose: u8, configured: &str) -> Level {
    match verbose {
        0 => configured.parse().unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = Config::locate(cli.config.as_deref());
    let mut config = Config::load(source.as_deref())?;
    if cli.stable_ids {
        config.identity = IdentityMode::Stable;
    }
    if cli.no_color {
        config.color = false;
    }
    if cli.json {
        config.list_format = ListFormat::Json;
    }
    if let Some(limit) = cli.history_limit {
        config.history_limit = limit as usize;
    }
    config.validate()?;

    // Setup tracing; stdout belongs to the shell
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose, &config.log_level))
        .with_writer(io::stderr)
        .init();

    match &source {
        Some(path) => info!(path = ?path, "Loaded config"),
        None => debug!("No config file found, using defaults"),
    }

    match cli.command {
        Some(Commands::Config) => {
            print!("{}", config.to_yaml()?);
        }
        None => {
            let stdin = io::stdin();
            let mut shell = Shell::new(config, stdin.lock(), io::stdout());
            shell.run()?;
        }
    }

    Ok(())
}
