use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

/// Headless host that drives the engine frame loop over the demo town.
#[derive(Parser, Debug)]
#[command(about = "Headless host that drives the engine frame loop", version)]
pub struct Args {
    /// Directory containing settings-default.json
    #[arg(long, default_value = "config")]
    pub config_root: PathBuf,

    /// Fallback directory searched for settings-default.json when the local
    /// one has none
    #[arg(long)]
    pub global_config_root: Option<PathBuf>,

    /// Directory holding the user settings.json overlay; written back on a
    /// clean exit
    #[arg(long)]
    pub user_config_root: Option<PathBuf>,

    /// Number of fixed-step frames to drive before exiting
    #[arg(long, default_value_t = 120)]
    pub ticks: u64,

    /// Start a new game immediately instead of opening the main menu
    #[arg(long)]
    pub skip_menu: bool,

    /// Load this save id at boot
    #[arg(long, value_name = "SAVE")]
    pub load: Option<String>,

    /// Path to write the per-frame profiling attributes as JSON
    #[arg(long)]
    pub frame_stats_json: Option<PathBuf>,

    /// Path to write the collaborator event log as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,
}

pub fn parse() -> Result<Args> {
    let args = Args::parse();
    args.validate()?;
    Ok(args)
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if self.skip_menu && self.load.is_some() {
            bail!("--skip-menu cannot be combined with --load");
        }
        Ok(())
    }
}
