use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::alerts::model::MatchConfig;
use super::model::{Alert, AlertId};
use super::rewards::zoom::Zoom;

/// Application settings, persisted as settings.json.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub feed_path: PathBuf,
    pub refresh_seconds: u64,
    /// Alert matcher toggles
    #[serde(default)]
    pub matcher: MatchConfig,
    /// Saved zoom per reward view
    #[serde(default)]
    pub zooms: HashMap<String, Zoom>,
    /// Alerts the user has completed, kept until they leave the feed
    #[serde(default)]
    pub done_alerts: BTreeSet<AlertId>,
}

impl Settings {
    pub fn zoom_for(&self, view: &str) -> Option<Zoom> {
        self.zooms.get(view).copied()
    }

    pub fn set_zoom(&mut self, view: &str, zoom: Zoom) {
        self.zooms.insert(view.to_string(), zoom);
    }

    /// Returns true if the alert was not already marked.
    pub fn mark_done(&mut self, id: &str) -> bool {
        self.done_alerts.insert(id.to_string())
    }

    /// Drop done marks for alerts missing from `alerts`. Returns true if any
    /// mark was dropped.
    pub fn forget_done_except(&mut self, alerts: &[Alert]) -> bool {
        let before = self.done_alerts.len();
        self.done_alerts
            .retain(|id| alerts.iter().any(|alert| &alert.id == id));
        self.done_alerts.len() != before
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_path: default_config_dir().join("alerts.txt"),
            refresh_seconds: 60,
            matcher: MatchConfig::default(),
            zooms: HashMap::new(),
            done_alerts: BTreeSet::new(),
        }
    }
}

/// `$HOME/.config/tenno-alerts`, or the working directory when no home is set.
pub fn default_config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config").join("tenno-alerts")
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            match fs::read_to_string(&self.config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => log::warn!("Invalid settings in {:?}: {}", self.config_path, e),
                },
                Err(e) => log::warn!("Cannot read {:?}: {}", self.config_path, e),
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alerts::model::CreditsTier;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());

        let default = manager.load();
        assert_eq!(default.refresh_seconds, 60);
        assert_eq!(default.zoom_for("Rewards"), None);

        let mut new_settings = Settings {
            feed_path: PathBuf::from("/tmp/alerts.json"),
            refresh_seconds: 30,
            matcher: MatchConfig {
                credits: CreditsTier::Min7k,
                auras: false,
                ..MatchConfig::default()
            },
            zooms: HashMap::new(),
            done_alerts: BTreeSet::new(),
        };
        new_settings.set_zoom("Rewards", Zoom::Zoom50);
        new_settings.mark_done("a1");

        manager.save(&new_settings).unwrap();
        let loaded = manager.load();

        assert_eq!(loaded, new_settings);
        assert_eq!(loaded.zoom_for("Rewards"), Some(Zoom::Zoom50));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("settings.json"),
            r#"{ "feed_path": "feed.txt", "refresh_seconds": 10 }"#,
        )
        .unwrap();

        let loaded = ConfigManager::new(dir.path()).load();
        assert_eq!(loaded.refresh_seconds, 10);
        assert_eq!(loaded.matcher, MatchConfig::default());
        assert!(loaded.zooms.is_empty());
        assert!(loaded.done_alerts.is_empty());
    }

    #[test]
    fn test_done_marks_follow_feed() {
        let mut settings = Settings::default();
        assert!(settings.mark_done("a"));
        assert!(!settings.mark_done("a"));
        settings.mark_done("b");

        let feed = vec![Alert::new("a", 3_000), Alert::new("c", 3_000)];
        assert!(settings.forget_done_except(&feed));
        assert_eq!(settings.done_alerts.iter().collect::<Vec<_>>(), vec!["a"]);
        assert!(!settings.forget_done_except(&feed));
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "[").unwrap();
        assert_eq!(ConfigManager::new(dir.path()).load().refresh_seconds, 60);
    }
}
