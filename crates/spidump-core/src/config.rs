//! TOML configuration
//!
//! All fields are optional; the defaults match a typical logic analyzer CSV
//! export with an active-low chip-select:
//!
//! ```toml
//! [capture]
//! cs_active_high = false
//!
//! [capture.columns]
//! time = "Time[s]"
//! cs = "CS"
//! clk = "CLK"
//! mosi = "MOSI"
//! miso = "MISO"
//!
//! [decoder]
//! count_dummy_cycles = false
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::decoder::DummyCycles;
use crate::error::ConfigError;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Capture file layout
    pub capture: CaptureConfig,
    /// Decoder behavior
    pub decoder: DecoderConfig,
}

/// Capture file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Header names of the capture columns
    pub columns: ColumnNames,
    /// Chip-select is asserted when high instead of low
    pub cs_active_high: bool,
}

/// Header names of the capture columns
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    /// Timestamp column, in seconds
    pub time: String,
    /// Chip-select column
    pub cs: String,
    /// Clock column
    pub clk: String,
    /// Host to flash data column
    pub mosi: String,
    /// Flash to host data column
    pub miso: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            time: "Time[s]".into(),
            cs: "CS".into(),
            clk: "CLK".into(),
            mosi: "MOSI".into(),
            miso: "MISO".into(),
        }
    }
}

/// Decoder behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Let dummy bytes count down the dummy phase so the data phase of
    /// commands with dummy cycles is decoded
    pub count_dummy_cycles: bool,
}

impl DecoderConfig {
    /// Dummy cycle policy selected by this config
    pub fn dummy_cycles(&self) -> DummyCycles {
        if self.count_dummy_cycles {
            DummyCycles::Counted
        } else {
            DummyCycles::Held
        }
    }
}

impl Config {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.capture.columns.cs, "CS");
        assert!(!config.capture.cs_active_high);
        assert_eq!(config.decoder.dummy_cycles(), DummyCycles::Held);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            [capture]
            cs_active_high = true

            [capture.columns]
            cs = "nCS"
            miso = "IO1"

            [decoder]
            count_dummy_cycles = true
            "#,
        )
        .unwrap();

        assert!(config.capture.cs_active_high);
        assert_eq!(config.capture.columns.cs, "nCS");
        assert_eq!(config.capture.columns.miso, "IO1");
        assert_eq!(config.capture.columns.clk, "CLK");
        assert_eq!(config.decoder.dummy_cycles(), DummyCycles::Counted);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml_str("[decoder]\nquad = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_toml_file("/nonexistent/spidump.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
