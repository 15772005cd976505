//! Terminal configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! newline_mode = "add-cr-to-lf"
//! tab_size = 8
//!
//! [bell]
//! enabled = true
//! duration_ms = 150
//!
//! [transcript]
//! line_numbers = true
//! timestamps = false
//!
//! [bounds]
//! rows = 24
//! cols = 80
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Coordinates, DEFAULT_TAB_SIZE};
use crate::error::{Error, Result};
use crate::transcript::TranscriptOptions;

/// How CR and LF complete each other
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum NewLineMode {
    /// CR and LF do exactly one thing each
    #[default]
    Strict,
    /// LF also returns to column 0
    AddCrToLf,
    /// CR also starts a new line
    AddLfToCr,
}

/// Bell settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BellConfig {
    pub enabled: bool,
    pub duration_ms: u64,
}

impl Default for BellConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 150,
        }
    }
}

/// Initial viewport size, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundsConfig {
    pub rows: u16,
    pub cols: u16,
}

impl BoundsConfig {
    /// Largest addressable position, `(rows - 1, cols - 1)`
    pub fn to_bounds(self) -> Coordinates {
        Coordinates::new(
            usize::from(self.rows.saturating_sub(1)),
            usize::from(self.cols.saturating_sub(1)),
        )
    }
}

/// Core terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub newline_mode: NewLineMode,
    pub tab_size: usize,
    pub bell: BellConfig,
    pub transcript: TranscriptOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsConfig>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            newline_mode: NewLineMode::Strict,
            tab_size: DEFAULT_TAB_SIZE,
            bell: BellConfig::default(),
            transcript: TranscriptOptions::default(),
            bounds: None,
        }
    }
}

impl TerminalConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = TerminalConfig::default();
        assert_eq!(config.newline_mode, NewLineMode::Strict);
        assert_eq!(config.tab_size, 4);
        assert!(config.bell.enabled);
        assert_eq!(config.bell.duration_ms, 150);
        assert!(config.bounds.is_none());
        assert!(config.transcript.timestamps);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = TerminalConfig::from_toml_str("").unwrap();
        assert_eq!(config, TerminalConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
newline_mode = "add-lf-to-cr"
tab_size = 8

[bell]
enabled = false

[transcript]
timestamps = false

[bounds]
rows = 30
cols = 100
"#;
        let config = TerminalConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.newline_mode, NewLineMode::AddLfToCr);
        assert_eq!(config.tab_size, 8);
        assert!(!config.bell.enabled);
        // unspecified fields keep their defaults
        assert_eq!(config.bell.duration_ms, 150);
        assert!(!config.transcript.timestamps);
        assert!(config.transcript.line_numbers);
        assert_eq!(
            config.bounds.unwrap().to_bounds(),
            Coordinates::new(29, 99)
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = TerminalConfig::from_toml_str("newline_mode = \"sometimes\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TerminalConfig {
            newline_mode: NewLineMode::AddCrToLf,
            bounds: Some(BoundsConfig { rows: 10, cols: 40 }),
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("add-cr-to-lf"));
        assert_eq!(TerminalConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "newline_mode = \"add-cr-to-lf\"").unwrap();
        let config = TerminalConfig::load(file.path()).unwrap();
        assert_eq!(config.newline_mode, NewLineMode::AddCrToLf);

        let err = TerminalConfig::load("/nonexistent/serial-term.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_zero_sized_bounds() {
        let bounds = BoundsConfig { rows: 0, cols: 0 };
        assert_eq!(bounds.to_bounds(), Coordinates::new(0, 0));
    }
}
