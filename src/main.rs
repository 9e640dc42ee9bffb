use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arcade_snake::game::GameConfig;
use arcade_snake::modes::{PlayMode, ReportMode};

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Classic snake in the terminal, with session statistics")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Path to the JSON settings file
    #[arg(long, default_value = "config/settings.json")]
    config: PathBuf,

    /// Where log output goes (the TUI owns the terminal)
    #[arg(long, default_value = "data/arcade_snake.log")]
    log_file: PathBuf,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Play,
    /// Print a report over the persisted statistics
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;

    let config = GameConfig::load(&cli.config);
    info!(
        grid_width = config.grid_width(),
        grid_height = config.grid_height(),
        initial_speed_ms = config.game.initial_speed_ms,
        "configuration loaded"
    );

    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(config);
            play_mode.run().await?;
        }
        Mode::Report => {
            let report_mode = ReportMode::new(&config);
            report_mode.run()?;
        }
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {:?}", parent))?;
        }
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
