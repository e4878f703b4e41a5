use std::path::PathBuf;

use clap::{Parser, Subcommand};
use duofit_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod sink;

#[derive(Parser)]
#[command(name = "duofit", version, about = "Duofit interval timer")]
struct Cli {
    /// Config file (defaults to ~/.config/duofit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interval timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "duofit=debug,duofit_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("DUOFIT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, duofit_core::CoreError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<(), Box<dyn std::error::Error>> = load_config(cli.config.as_ref())
        .map_err(Into::into)
        .and_then(|config| match cli.command {
            Commands::Timer { action } => commands::timer::run(action, &config),
            Commands::Config { action } => commands::config::run(action, &config),
        });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
