use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_FILE: &str = "settings-default.json";
const USER_FILE: &str = "settings.json";

/// Engine configuration the frame driver and boot flow consult. Loaded from
/// a required defaults file with an optional per-user overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gates the audio update phase entirely.
    pub sound_enabled: bool,
    /// Gates local and global script execution.
    pub scripts_enabled: bool,
    /// Game hours advanced per real hour of unpaused play.
    pub time_scale: f64,
    /// Emit a frame-stats summary on shutdown.
    pub log_frame_stats: bool,
    pub screenshot_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sound_enabled: true,
            scripts_enabled: true,
            time_scale: 30.0,
            log_frame_stats: false,
            screenshot_format: "png".to_string(),
        }
    }
}

impl Settings {
    /// Load settings. A `settings-default.json` must exist under
    /// `local_root` (preferred) or `global_root`; its absence aborts
    /// startup. A user `settings.json` under `user_root` overlays the
    /// defaults key by key when present.
    pub fn load(
        local_root: &Path,
        global_root: Option<&Path>,
        user_root: Option<&Path>,
    ) -> Result<Settings> {
        let local_default = local_root.join(DEFAULT_FILE);
        let global_default = global_root.map(|root| root.join(DEFAULT_FILE));

        let default_path = if local_default.is_file() {
            local_default
        } else if let Some(path) = global_default.filter(|path| path.is_file()) {
            path
        } else {
            bail!(
                "no default settings file found; expected {} under {}",
                DEFAULT_FILE,
                local_root.display()
            );
        };

        let mut merged: Value = read_json(&default_path)?;

        if let Some(user_path) = user_root.map(|root| root.join(USER_FILE)) {
            if user_path.is_file() {
                merge(&mut merged, read_json(&user_path)?);
            }
        }

        serde_json::from_value(merged)
            .with_context(|| format!("settings from {} have invalid fields", default_path.display()))
    }

    /// Write the active settings back as the user overlay.
    pub fn save_user(&self, user_root: &Path) -> Result<PathBuf> {
        fs::create_dir_all(user_root)
            .with_context(|| format!("creating user config dir {}", user_root.display()))?;
        let path = user_root.join(USER_FILE);
        let json = serde_json::to_string_pretty(self).context("serializing user settings")?;
        fs::write(&path, json)
            .with_context(|| format!("writing user settings to {}", path.display()))?;
        Ok(path)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Shallow key-by-key overlay; nested objects merge recursively so a user
/// file can override a single field.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, text: &str) {
        fs::write(path, text).expect("write fixture");
    }

    #[test]
    fn missing_default_settings_is_fatal() {
        let dir = tempdir().expect("tempdir");
        let err = Settings::load(dir.path(), None, None).expect_err("must fail");
        assert!(err.to_string().contains("settings-default.json"));
    }

    #[test]
    fn local_default_is_preferred_over_global() {
        let local = tempdir().expect("tempdir");
        let global = tempdir().expect("tempdir");
        write(
            &local.path().join(DEFAULT_FILE),
            r#"{"time_scale": 10.0}"#,
        );
        write(
            &global.path().join(DEFAULT_FILE),
            r#"{"time_scale": 99.0}"#,
        );

        let settings =
            Settings::load(local.path(), Some(global.path()), None).expect("settings load");
        assert_eq!(settings.time_scale, 10.0);
        // Unspecified fields fall back to the built-in defaults.
        assert!(settings.sound_enabled);
    }

    #[test]
    fn global_default_is_used_when_local_is_absent() {
        let local = tempdir().expect("tempdir");
        let global = tempdir().expect("tempdir");
        write(
            &global.path().join(DEFAULT_FILE),
            r#"{"sound_enabled": false}"#,
        );

        let settings =
            Settings::load(local.path(), Some(global.path()), None).expect("settings load");
        assert!(!settings.sound_enabled);
    }

    #[test]
    fn user_overlay_overrides_single_fields() {
        let root = tempdir().expect("tempdir");
        let user = tempdir().expect("tempdir");
        write(
            &root.path().join(DEFAULT_FILE),
            r#"{"time_scale": 30.0, "sound_enabled": true}"#,
        );
        write(&user.path().join(USER_FILE), r#"{"sound_enabled": false}"#);

        let settings =
            Settings::load(root.path(), None, Some(user.path())).expect("settings load");
        assert!(!settings.sound_enabled);
        assert_eq!(settings.time_scale, 30.0);
    }

    #[test]
    fn save_user_round_trips() {
        let root = tempdir().expect("tempdir");
        let user = tempdir().expect("tempdir");
        write(&root.path().join(DEFAULT_FILE), "{}");

        let mut settings = Settings::default();
        settings.screenshot_format = "jpg".to_string();
        settings.save_user(user.path()).expect("save user settings");

        let reloaded =
            Settings::load(root.path(), None, Some(user.path())).expect("settings load");
        assert_eq!(reloaded.screenshot_format, "jpg");
    }
}
