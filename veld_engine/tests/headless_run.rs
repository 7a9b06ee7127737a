//! End-to-end runs of the demo binary: config resolution, artifact dumps,
//! and the fatal-on-missing-settings startup path.

use std::fs;
use std::process::Command;

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::tempdir;

#[test]
fn demo_run_writes_requested_artifacts() -> Result<()> {
    let temp = tempdir().context("creating temporary run directory")?;
    let config_root = temp.path().join("config");
    fs::create_dir(&config_root).context("creating config dir")?;
    fs::write(config_root.join("settings-default.json"), "{}")
        .context("writing default settings")?;

    let event_log = temp.path().join("events.json");
    let frame_stats = temp.path().join("frame_stats.json");

    let output = Command::new(env!("CARGO_BIN_EXE_veld_engine"))
        .args([
            "--config-root",
            config_root.to_str().context("config path utf-8")?,
            "--skip-menu",
            "--ticks",
            "4",
            "--event-log-json",
            event_log.to_str().context("event log path utf-8")?,
            "--frame-stats-json",
            frame_stats.to_str().context("frame stats path utf-8")?,
        ])
        .output()
        .context("running veld_engine demo")?;
    assert!(
        output.status.success(),
        "demo run failed: {}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let events: Value = serde_json::from_str(
        &fs::read_to_string(&event_log).context("reading event log")?,
    )
    .context("parsing event log JSON")?;
    let entries = events["events"]
        .as_array()
        .context("event log has an events array")?;
    assert!(entries
        .iter()
        .any(|entry| entry.as_str() == Some("script.chapel_bell rings=1")));
    assert!(entries
        .iter()
        .any(|entry| entry.as_str().is_some_and(|s| s.starts_with("gui.update"))));

    let stats: Value = serde_json::from_str(
        &fs::read_to_string(&frame_stats).context("reading frame stats")?,
    )
    .context("parsing frame stats JSON")?;
    let first_frame = &stats["frames"]["1"];
    assert!(first_frame["script_time_taken"].is_number());
    assert!(first_frame["physics_time_end"].is_number());

    Ok(())
}

#[test]
fn missing_default_settings_aborts_startup() -> Result<()> {
    let temp = tempdir().context("creating temporary run directory")?;
    let empty_config = temp.path().join("config");
    fs::create_dir(&empty_config).context("creating config dir")?;

    let output = Command::new(env!("CARGO_BIN_EXE_veld_engine"))
        .args([
            "--config-root",
            empty_config.to_str().context("config path utf-8")?,
            "--ticks",
            "1",
        ])
        .output()
        .context("running veld_engine demo")?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("settings-default.json"),
        "unexpected stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn user_settings_are_written_back_on_exit() -> Result<()> {
    let temp = tempdir().context("creating temporary run directory")?;
    let config_root = temp.path().join("config");
    fs::create_dir(&config_root).context("creating config dir")?;
    fs::write(
        config_root.join("settings-default.json"),
        r#"{"time_scale": 12.0}"#,
    )
    .context("writing default settings")?;
    let user_root = temp.path().join("user");

    let output = Command::new(env!("CARGO_BIN_EXE_veld_engine"))
        .args([
            "--config-root",
            config_root.to_str().context("config path utf-8")?,
            "--user-config-root",
            user_root.to_str().context("user path utf-8")?,
            "--skip-menu",
            "--ticks",
            "2",
        ])
        .output()
        .context("running veld_engine demo")?;
    assert!(output.status.success());

    let written: Value = serde_json::from_str(
        &fs::read_to_string(user_root.join("settings.json")).context("reading user settings")?,
    )
    .context("parsing user settings JSON")?;
    assert_eq!(written["time_scale"], 12.0);
    Ok(())
}
