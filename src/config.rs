use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::notification::ToastTiming;

pub const SUPPORTED_LANGUAGES: &[&str] = &["es", "en"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Terminal width (columns) at which the full navigation bar replaces
    /// the collapsible menu.
    #[serde(default = "default_desktop_breakpoint")]
    pub desktop_breakpoint: u16,
    #[serde(default = "default_toast_entrance_ms")]
    pub toast_entrance_ms: u64,
    #[serde(default = "default_toast_display_ms")]
    pub toast_display_ms: u64,
    #[serde(default = "default_toast_exit_ms")]
    pub toast_exit_ms: u64,
    #[serde(default = "default_hover_close_ms")]
    pub hover_close_ms: u64,
    #[serde(default = "default_shuffle_quiz_options")]
    pub shuffle_quiz_options: bool,
}

fn default_theme() -> String {
    "andes".to_string()
}
fn default_language() -> String {
    "es".to_string()
}
fn default_desktop_breakpoint() -> u16 {
    100
}
fn default_toast_entrance_ms() -> u64 {
    100
}
fn default_toast_display_ms() -> u64 {
    4000
}
fn default_toast_exit_ms() -> u64 {
    300
}
fn default_hover_close_ms() -> u64 {
    100
}
fn default_shuffle_quiz_options() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
            desktop_breakpoint: default_desktop_breakpoint(),
            toast_entrance_ms: default_toast_entrance_ms(),
            toast_display_ms: default_toast_display_ms(),
            toast_exit_ms: default_toast_exit_ms(),
            hover_close_ms: default_hover_close_ms(),
            shuffle_quiz_options: default_shuffle_quiz_options(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runasimi")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown languages.
    pub fn validate(&mut self) {
        if !SUPPORTED_LANGUAGES.contains(&self.language.as_str()) {
            self.language = default_language();
        }
        self.desktop_breakpoint = self.desktop_breakpoint.clamp(40, 300);
        self.toast_entrance_ms = self.toast_entrance_ms.min(2_000);
        // Shorter than the entrance a toast would leave before it is shown.
        self.toast_display_ms = self
            .toast_display_ms
            .clamp(self.toast_entrance_ms + 500, 60_000);
        self.toast_exit_ms = self.toast_exit_ms.min(2_000);
        self.hover_close_ms = self.hover_close_ms.min(1_000);
    }

    pub fn toast_timing(&self) -> ToastTiming {
        ToastTiming {
            entrance: Duration::from_millis(self.toast_entrance_ms),
            display: Duration::from_millis(self.toast_display_ms),
            exit: Duration::from_millis(self.toast_exit_ms),
        }
    }

    pub fn hover_close_delay(&self) -> Duration {
        Duration::from_millis(self.hover_close_ms)
    }
}
