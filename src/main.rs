use clap::Parser;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use trello_history_export::export;
use trello_history_export::utils::ExportConfig;

/// Export Trello board history to Markdown files:
/// one table of contents per board, one file per card.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of days of history to export.
    #[arg(value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,

    /// Directory to write the board exports into.
    /// Defaults to the current directory if not set in config.
    #[arg(long, value_name = "DIR")]
    target_dir: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/trello-history-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds to wait between API requests.
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    tick: u64,

    /// Print debug-level progress information.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    api_key: Option<String>,
    api_token: Option<String>,
    boards: Option<Vec<String>>,
    target_dir: Option<PathBuf>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        // Search: XDG/OS config dir, then nothing
        dirs::config_dir()
            .map(|d| d.join("trello-history-export/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let file_cfg = load_file_config(cli.config.as_deref())?;

    let api_key = file_cfg.api_key.ok_or_else(|| {
        eyre!("No API key configured.\nSet api_key in config.toml (see --help for the path).")
    })?;
    let api_token = file_cfg.api_token.ok_or_else(|| {
        eyre!("No API token configured.\nSet api_token in config.toml (see --help for the path).")
    })?;
    let boards = file_cfg
        .boards
        .filter(|boards| !boards.is_empty())
        .ok_or_else(|| {
            eyre!("No boards configured.\nSet boards = [\"<board id>\", ...] in config.toml.")
        })?;

    let target_dir = cli
        .target_dir
        .or(file_cfg.target_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = ExportConfig {
        target_dir,
        boards,
        api_key,
        api_token,
        api_base: None,
        num_days: cli.days,
        tick: Duration::from_secs(cli.tick),
        quiet: cli.quiet,
    };

    export::execute(config).await
}
