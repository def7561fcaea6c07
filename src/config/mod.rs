//! Configuration module for tagsearch
//!
//! Holds the search tuning knobs (debounce delay, minimum query length,
//! selection limit) together with the form-level flags and translation
//! strings a host binds to a widget. Configuration can be built in code or
//! read from a TOML file.

pub mod translations;

pub use translations::Translations;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Debounce delay used when none (or zero) is configured
pub const DEFAULT_DELAY_MS: u64 = 400;

/// Minimum query length used when none (or zero) is configured
pub const DEFAULT_MIN_CHARS: usize = 3;

/// Search behaviour settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Minimum number of characters before a search is started
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Maximum number of selected items (unlimited when absent)
    #[serde(default)]
    pub max_items: Option<usize>,

    /// Clear the query and results after each selection
    #[serde(default)]
    pub clear_on_add: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            min_chars: DEFAULT_MIN_CHARS,
            max_items: None,
            clear_on_add: false,
        }
    }
}

impl SearchConfig {
    /// Set the debounce delay
    #[must_use]
    pub const fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the minimum query length
    #[must_use]
    pub const fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Limit the number of selected items
    #[must_use]
    pub const fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Clear query and results after each selection
    #[must_use]
    pub const fn with_clear_on_add(mut self, clear_on_add: bool) -> Self {
        self.clear_on_add = clear_on_add;
        self
    }

    /// Effective debounce delay; zero falls back to the default
    #[must_use]
    pub const fn delay(&self) -> Duration {
        if self.delay_ms == 0 {
            Duration::from_millis(DEFAULT_DELAY_MS)
        } else {
            Duration::from_millis(self.delay_ms)
        }
    }

    /// Effective minimum query length; zero falls back to the default
    #[must_use]
    pub const fn effective_min_chars(&self) -> usize {
        if self.min_chars == 0 {
            DEFAULT_MIN_CHARS
        } else {
            self.min_chars
        }
    }
}

const fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

const fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}

/// Everything a host binds to one widget instance
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Search behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Report `required` validity to the host form
    #[serde(default)]
    pub required: bool,

    /// Ignore user interaction and never focus the input
    #[serde(default)]
    pub disabled: bool,

    /// User-facing strings
    #[serde(default)]
    pub translations: Translations,
}

impl WidgetConfig {
    /// Get the path to the default config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("tagsearch").join("config.toml"))
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid TOML or does not match
    /// the configuration schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Load the default config file, falling back to defaults when it is absent
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = WidgetConfig::default();
        assert_eq!(config.search.delay(), Duration::from_millis(400));
        assert_eq!(config.search.effective_min_chars(), 3);
        assert!(config.search.max_items.is_none());
        assert!(!config.search.clear_on_add);
        assert!(!config.required);
        assert!(!config.disabled);
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let search = SearchConfig::default().with_delay_ms(0).with_min_chars(0);
        assert_eq!(search.delay(), Duration::from_millis(DEFAULT_DELAY_MS));
        assert_eq!(search.effective_min_chars(), DEFAULT_MIN_CHARS);
    }

    #[test]
    fn test_from_toml_str() {
        let config = WidgetConfig::from_toml_str(
            r#"
            required = true

            [search]
            delay_ms = 150
            min_chars = 2
            max_items = 5
            clear_on_add = true

            [translations]
            maximum_reached = "that's enough"
            "#,
        )
        .unwrap();

        assert!(config.required);
        assert_eq!(config.search.delay(), Duration::from_millis(150));
        assert_eq!(config.search.effective_min_chars(), 2);
        assert_eq!(config.search.max_items, Some(5));
        assert!(config.search.clear_on_add);
        assert_eq!(config.translations.maximum_reached(), "that's enough");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = WidgetConfig::from_toml_str("[search]\nmax_items = 1\n").unwrap();
        assert_eq!(config.search.delay_ms, DEFAULT_DELAY_MS);
        assert_eq!(config.search.min_chars, DEFAULT_MIN_CHARS);
        assert_eq!(config.search.max_items, Some(1));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = WidgetConfig::from_toml_str("[search]\ndelay_ms = \"soon\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = WidgetConfig {
            search: SearchConfig::default().with_max_items(3),
            required: true,
            ..WidgetConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = WidgetConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
