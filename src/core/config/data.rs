use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::policy::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Settings persisted in `config.toml`. Every field is optional; unset fields
/// fall back to built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Gemini model identifier (e.g., "gemini-3-pro-preview")
    pub model: Option<String>,
    /// API root, without the `v1beta/...` path
    pub base_url: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
}

/// Keys accepted by `tutor set` / `tutor unset`.
pub const CONFIG_KEYS: &[&str] = &["model", "base-url", "theme"];

impl Config {
    pub fn model_or_default(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Sets a value by its CLI key. Returns false for unknown keys.
    pub fn set_value(&mut self, key: &str, value: String) -> bool {
        match key {
            "model" => self.model = Some(value),
            "base-url" => self.base_url = Some(value),
            "theme" => self.theme = Some(value),
            _ => return false,
        }
        true
    }

    /// Clears a value by its CLI key. Returns false for unknown keys.
    pub fn unset_value(&mut self, key: &str) -> bool {
        match key {
            "model" => self.model = None,
            "base-url" => self.base_url = None,
            "theme" => self.theme = None,
            _ => return false,
        }
        true
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
