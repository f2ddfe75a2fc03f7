use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::pages::{default_photos, Photo};

pub const CONFIG_FILE: &str = "birthday.json";
pub const ENV_TARGET: &str = "BIRTHDAY_TARGET";
pub const ENV_DEBUG: &str = "BIRTHDAY_DEBUG";
pub const ENV_REMEMBER_REACHED: &str = "BIRTHDAY_REMEMBER_REACHED";

/// App settings read from `birthday.json` in the app data dir, with a few
/// environment overrides on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// RFC 3339, local `YYYY-MM-DDTHH:MM[:SS]`, `YYYY-MM-DD` (UTC midnight)
    /// or `NOW+<n>MIN`.
    pub target: Option<String>,
    pub recipient_name: String,
    /// Keep the reached flag across loads instead of clearing it.
    pub remember_reached: bool,
    pub music_path: Option<PathBuf>,
    pub decor_seed: Option<u64>,
    pub photos: Vec<Photo>,
    /// Include error details in fault events.
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: None,
            recipient_name: "Birthday Star".into(),
            remember_reached: false,
            music_path: None,
            decor_seed: None,
            photos: default_photos(),
            debug: cfg!(debug_assertions),
        }
    }
}

impl AppConfig {
    /// Reads `dir/birthday.json` if there is one and applies the process
    /// environment. A malformed file is logged and ignored.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let config = match dir.map(|dir| dir.join(CONFIG_FILE)) {
            Some(path) if path.exists() => Self::read(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(config) => {
                info!("config loaded from {}", path.display());
                Ok(config)
            }
            Err(err) => {
                warn!("ignoring malformed config {}: {err}", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(target) = lookup(ENV_TARGET).filter(|value| !value.trim().is_empty()) {
            self.target = Some(target);
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = is_truthy(&debug);
        }
        if let Some(remember) = lookup(ENV_REMEMBER_REACHED) {
            self.remember_reached = is_truthy(&remember);
        }
        self
    }

    /// The configured seed, or one drawn for this session.
    pub fn decor_seed(&self) -> u64 {
        self.decor_seed.unwrap_or_else(rand::random)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn file_fields_are_camel_case_and_optional() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "recipientName": "Sam", "rememberReached": true, "decorSeed": 9 }"#,
        )
        .unwrap();

        let config = AppConfig::read(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.recipient_name, "Sam");
        assert!(config.remember_reached);
        assert_eq!(config.decor_seed(), 9);
        assert_eq!(config.photos.len(), 12);
        assert!(config.target.is_none());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "recipient = Sam").unwrap();

        let config = AppConfig::read(&path).unwrap();
        assert_eq!(config.recipient_name, AppConfig::default().recipient_name);
    }

    #[test]
    fn environment_overrides_the_file() {
        let config = AppConfig {
            target: Some("2026-01-30T16:05:00".into()),
            ..AppConfig::default()
        }
        .with_env(env(&[
            (ENV_TARGET, "NOW+2MIN"),
            (ENV_DEBUG, "0"),
            (ENV_REMEMBER_REACHED, "true"),
        ]));

        assert_eq!(config.target.as_deref(), Some("NOW+2MIN"));
        assert!(!config.debug);
        assert!(config.remember_reached);
    }

    #[test]
    fn blank_target_override_is_ignored() {
        let config = AppConfig {
            target: Some("2026-01-30T16:05:00".into()),
            ..AppConfig::default()
        }
        .with_env(env(&[(ENV_TARGET, "  ")]));
        assert_eq!(config.target.as_deref(), Some("2026-01-30T16:05:00"));
    }
}
