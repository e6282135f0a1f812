//! Timer and app settings: one JSON blob in the local data directory.
//! Loaded once at startup, persisted on every change. Partial blobs merge
//! over defaults field by field, so old files keep working as fields are
//! added.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::Blue
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Focus interval length, minutes.
    pub pomodoro_duration: u64,
    /// Short break length, minutes.
    pub short_break: u64,
    /// Long break length, minutes.
    pub long_break: u64,
    /// Every Nth completed focus interval earns a long break.
    pub pomodoros_until_long_break: u32,
    pub color_theme: ColorTheme,
    pub notifications: bool,
    pub sound_enabled: bool,
    /// Focus sessions per day the user is aiming for.
    pub daily_goal: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_duration: 90,
            short_break: 5,
            long_break: 15,
            pomodoros_until_long_break: 4,
            color_theme: ColorTheme::Blue,
            notifications: true,
            sound_enabled: true,
            daily_goal: 8,
        }
    }
}

/// PUT /api/settings body: every field optional, present fields overwrite.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    pub pomodoro_duration: Option<u64>,
    pub short_break: Option<u64>,
    pub long_break: Option<u64>,
    pub pomodoros_until_long_break: Option<u32>,
    pub color_theme: Option<ColorTheme>,
    pub notifications: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub daily_goal: Option<u32>,
}

impl UpdateSettingsRequest {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.pomodoro_duration {
            settings.pomodoro_duration = v;
        }
        if let Some(v) = self.short_break {
            settings.short_break = v;
        }
        if let Some(v) = self.long_break {
            settings.long_break = v;
        }
        if let Some(v) = self.pomodoros_until_long_break {
            settings.pomodoros_until_long_break = v;
        }
        if let Some(v) = self.color_theme {
            settings.color_theme = v;
        }
        if let Some(v) = self.notifications {
            settings.notifications = v;
        }
        if let Some(v) = self.sound_enabled {
            settings.sound_enabled = v;
        }
        if let Some(v) = self.daily_goal {
            settings.daily_goal = v;
        }
    }

    /// Durations and counters must stay positive; a zero-length interval or
    /// a zero cadence would wedge the session machine.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("pomodoro_duration", self.pomodoro_duration),
            ("short_break", self.short_break),
            ("long_break", self.long_break),
        ] {
            if value == Some(0) {
                return Err(format!("{name} must be at least 1 minute"));
            }
        }
        if self.pomodoros_until_long_break == Some(0) {
            return Err("pomodoros_until_long_break must be at least 1".into());
        }
        if self.daily_goal == Some(0) {
            return Err("daily_goal must be at least 1".into());
        }
        Ok(())
    }
}

/// Owns the current settings and the file they persist to.
pub struct SettingsState {
    path: PathBuf,
    current: RwLock<Settings>,
}

impl SettingsState {
    /// Missing file means defaults; an unreadable or corrupt blob is logged
    /// and replaced by defaults rather than failing startup.
    pub fn load(path: PathBuf) -> Self {
        let current = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Settings>(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Corrupt settings blob, using defaults");
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Could not read settings, using defaults");
                Settings::default()
            }
        };

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub async fn current(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Applies the patch and persists. A failed disk write is logged and the
    /// in-memory settings still change; nothing here is fatal.
    pub async fn update(&self, patch: &UpdateSettingsRequest) -> Settings {
        let mut guard = self.current.write().await;
        patch.apply(&mut guard);
        let snapshot = guard.clone();
        drop(guard);

        if let Err(e) = write_json_atomic(&self.path, &snapshot) {
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to persist settings");
        }
        snapshot
    }
}

/// Default blob location under the platform data directory.
pub fn default_settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "clarity", "clarity-api") {
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).ok();
        return data_dir.join(SETTINGS_FILE);
    }
    PathBuf::from(SETTINGS_FILE)
}

fn write_json_atomic(path: &Path, settings: &Settings) -> Result<(), String> {
    let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = File::create(&tmp_path).map_err(|e| e.to_string())?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| e.to_string())?;
    tmp_file.sync_all().map_err(|e| e.to_string())?;
    fs::rename(&tmp_path, path).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn unique_path(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        PathBuf::from(format!("/tmp/{}_{}.json", prefix, now))
    }

    #[test]
    fn defaults_match_product_values() {
        let s = Settings::default();
        assert_eq!(s.pomodoro_duration, 90);
        assert_eq!(s.short_break, 5);
        assert_eq!(s.long_break, 15);
        assert_eq!(s.pomodoros_until_long_break, 4);
        assert_eq!(s.color_theme, ColorTheme::Blue);
        assert!(s.notifications);
        assert!(s.sound_enabled);
        assert_eq!(s.daily_goal, 8);
    }

    #[test]
    fn partial_blob_merges_over_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"pomodoro_duration": 25, "color_theme": "green"}"#).unwrap();
        assert_eq!(s.pomodoro_duration, 25);
        assert_eq!(s.color_theme, ColorTheme::Green);
        // everything else keeps its default
        assert_eq!(s.short_break, 5);
        assert_eq!(s.daily_goal, 8);
    }

    #[test]
    fn update_validate_rejects_zero_durations() {
        let patch = UpdateSettingsRequest {
            short_break: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = UpdateSettingsRequest {
            pomodoros_until_long_break: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[tokio::test]
    async fn update_persists_and_reloads() {
        let path = unique_path("clarity_settings");
        let state = SettingsState::load(path.clone());

        let patch = UpdateSettingsRequest {
            pomodoro_duration: Some(50),
            daily_goal: Some(4),
            ..Default::default()
        };
        let updated = state.update(&patch).await;
        assert_eq!(updated.pomodoro_duration, 50);
        assert_eq!(updated.daily_goal, 4);

        let reloaded = SettingsState::load(path.clone());
        let current = reloaded.current().await;
        assert_eq!(current.pomodoro_duration, 50);
        assert_eq!(current.daily_goal, 4);
        assert_eq!(current.short_break, 5);

        fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let state = SettingsState::load(unique_path("clarity_settings_missing"));
        assert_eq!(state.current().await, Settings::default());
    }
}
