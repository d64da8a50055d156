// ── Settings persistence ──────────────────────────────────────────────────────
//
// Reads and writes `settings.json` in the Spacemark config directory.
// Missing or unreadable files fall back to defaults.

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    editor::CaretPolicy,
    error::{Result, SpacemarkError},
};

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Root of the JSON settings file.  Every field has a default so that files
/// written by older versions (or edited by hand) still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) version: u32,
    /// Editor font size in pixels at startup.
    pub(crate) font_size: u16,
    /// Floor for repeated font-size decreases.
    pub(crate) min_font_size: u16,
    /// Ceiling for repeated font-size increases.
    pub(crate) max_font_size: u16,
    /// Where the caret goes after an edit.
    pub(crate) caret: CaretPolicy,
    /// Default tracing filter, overridden by `SPACEMARK_LOG` / `RUST_LOG`.
    pub(crate) log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            font_size: 16,
            min_font_size: 5,
            max_font_size: 96,
            caret: CaretPolicy::Preserve,
            log_level: "info".to_owned(),
        }
    }
}

// ── Format version ────────────────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

const SETTINGS_FILE: &str = "settings.json";

#[cfg(windows)]
const APP_DIR: &str = "Spacemark";
#[cfg(not(windows))]
const APP_DIR: &str = "spacemark";

// ── Path ──────────────────────────────────────────────────────────────────────

/// Directory holding the settings file and the log.
///
/// `$SPACEMARK_CONFIG_DIR` if set, else the platform config directory from
/// `dirs` (`%APPDATA%`, `~/Library/Application Support`, `$XDG_CONFIG_HOME`
/// or `~/.config`) joined with the app name.
pub(crate) fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("SPACEMARK_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

impl Settings {
    /// Clamp values so that `min <= font_size <= max` and `min >= 1`.
    fn normalized(mut self) -> Self {
        self.min_font_size = self.min_font_size.max(1);
        self.max_font_size = self.max_font_size.max(self.min_font_size);
        self.font_size = self.font_size.clamp(self.min_font_size, self.max_font_size);
        self
    }

    // ── Load ──────────────────────────────────────────────────────────────────

    /// Read and parse the settings file.
    ///
    /// Falls back to defaults on any error: file missing, JSON parse failure,
    /// or an unrecognised version number.
    pub(crate) fn load() -> Self {
        config_dir()
            .and_then(|dir| Self::load_from(&dir.join(SETTINGS_FILE)))
            .unwrap_or_default()
    }

    fn load_from(path: &std::path::Path) -> Option<Self> {
        let data = fs::read(path).ok()?;
        let settings = Self::parse(&data)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Some(settings)
    }

    fn parse(data: &[u8]) -> Option<Self> {
        let settings: Self = serde_json::from_slice(data).ok()?;
        if settings.version != SETTINGS_VERSION {
            return None;
        }
        Some(settings.normalized())
    }

    // ── Save ──────────────────────────────────────────────────────────────────

    /// Write the settings to the config directory, creating it if needed.
    pub(crate) fn save(&self) -> Result<()> {
        let Some(dir) = config_dir() else {
            return Ok(());
        };
        self.save_to(&dir.join(SETTINGS_FILE))
    }

    fn save_to(&self, path: &std::path::Path) -> Result<()> {
        let io_err = |source| SpacemarkError::Write {
            path: path.to_owned(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = Settings {
            font_size: 22,
            caret: CaretPolicy::End,
            ..Settings::default()
        };
        settings.save_to(&path).expect("save");
        assert_eq!(Settings::load_from(&path), Some(settings));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let parsed = Settings::parse(br#"{"version":1,"font_size":12}"#).expect("parse");
        assert_eq!(parsed.font_size, 12);
        assert_eq!(parsed.min_font_size, 5);
        assert_eq!(parsed.caret, CaretPolicy::Preserve);
        assert_eq!(parsed.log_level, "info");
    }

    #[test]
    fn caret_policy_is_lowercase_in_json() {
        let parsed = Settings::parse(br#"{"version":1,"caret":"end"}"#).expect("parse");
        assert_eq!(parsed.caret, CaretPolicy::End);
    }

    #[test]
    fn config_dir_follows_platform_convention() {
        if std::env::var_os("SPACEMARK_CONFIG_DIR").is_none() {
            assert_eq!(config_dir(), dirs::config_dir().map(|d| d.join(APP_DIR)));
        }
    }

    #[test]
    fn wrong_version_is_rejected() {
        assert_eq!(Settings::parse(br#"{"version":99}"#), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(Settings::parse(b"not json"), None);
    }

    #[test]
    fn font_size_is_clamped_into_range() {
        let parsed =
            Settings::parse(br#"{"version":1,"font_size":2,"min_font_size":0}"#).expect("parse");
        assert_eq!(parsed.min_font_size, 1);
        assert_eq!(parsed.font_size, 2);

        let parsed = Settings::parse(br#"{"version":1,"font_size":3}"#).expect("parse");
        assert_eq!(parsed.font_size, 5);
    }
}
