use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use crate::cli::Args;
use crate::engine::BootOptions;
use crate::headless::DemoHarness;
use crate::settings::Settings;

const FIXED_STEP: Duration = Duration::from_millis(16);

/// Drive the demo town headlessly for the requested number of frames and
/// write out whatever artifacts were asked for.
pub fn execute(args: Args) -> Result<()> {
    let settings = Settings::load(
        &args.config_root,
        args.global_config_root.as_deref(),
        args.user_config_root.as_deref(),
    )
    .context("loading engine settings")?;

    let harness = DemoHarness::new();
    let mut engine = harness.engine(&settings);

    engine.boot(&BootOptions {
        skip_menu: args.skip_menu,
        load_save: args.load.clone(),
    });
    harness.seed_demo_scripts();

    let driven = engine.run_fixed(args.ticks, FIXED_STEP);
    info!(
        "drove {driven} of {} requested frames (clock at {:.3}h)",
        args.ticks,
        harness.world.borrow().clock_hours()
    );

    if let Some(path) = args.event_log_json.as_ref() {
        let json = serde_json::to_string_pretty(&harness.log.report())
            .context("serializing event log to JSON")?;
        fs::write(path, &json)
            .with_context(|| format!("writing event log to {}", path.display()))?;
        println!("Saved event log to {}", path.display());
    }

    if let Some(path) = args.frame_stats_json.as_ref() {
        let json = serde_json::to_string_pretty(engine.frame_stats())
            .context("serializing frame stats to JSON")?;
        fs::write(path, &json)
            .with_context(|| format!("writing frame stats to {}", path.display()))?;
        println!("Saved frame stats to {}", path.display());
    } else if settings.log_frame_stats {
        info!(
            "frame stats retained for {} frames",
            engine.frame_stats().tracked_frames()
        );
    }

    if let Some(user_root) = args.user_config_root.as_ref() {
        let path = settings
            .save_user(user_root)
            .context("saving user settings")?;
        info!("saved user settings to {}", path.display());
    }

    println!(
        "Ran {driven} frames; play time {:.2}s.",
        harness.state.borrow().play_time().as_secs_f64()
    );
    Ok(())
}
