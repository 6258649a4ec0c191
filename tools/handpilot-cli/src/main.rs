//! Handpilot CLI: drive the gesture engine from recorded landmarks.
//!
//! Usage:
//!   handpilot replay <FRAMES>    Run the engine over a frames JSONL file
//!   handpilot validate <FRAMES>  Check a frames JSONL file
//!   handpilot layout             Print the keyboard layout key boxes
//!   handpilot config             Print or save the effective configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use handpilot_common::config::AppConfig;
use handpilot_gesture_core::LayoutMode;

mod commands;

#[derive(Parser)]
#[command(
    name = "handpilot",
    about = "Camera hand gestures as mouse and keyboard input",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine over recorded frames
    Replay {
        /// Frames JSONL file
        frames: PathBuf,

        /// Write dispatched actions to this JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not print each action
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse a frames file and report what it contains
    Validate {
        /// Frames JSONL file
        frames: PathBuf,
    },

    /// Print the key boxes of the keyboard layout
    Layout {
        /// Layout table to print
        #[arg(long, value_enum, default_value = "normal")]
        mode: ModeArg,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Normal,
    Shift,
    Ctrl,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => LayoutMode::Normal,
            ModeArg::Shift => LayoutMode::Shift,
            ModeArg::Ctrl => LayoutMode::Ctrl,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    handpilot_common::logging::init_logging(&config.logging);
    tracing::debug!(path = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Replay {
            frames,
            output,
            quiet,
        } => commands::replay::run(&config, frames, output, quiet).await,
        Commands::Validate { frames } => commands::validate::run(&config, frames),
        Commands::Layout { mode } => commands::layout::run(&config, mode.into()),
        Commands::Config { save } => commands::config::run(&config, cli.config, save),
    }
}
