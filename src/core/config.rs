//! Raw wheel configuration document and file loading
//!
//! The document is decoded as-is, without interpreting any field. Values are
//! kept untyped and all checks happen in [`crate::wheel::validate`], so a
//! malformed sequence, a wrongly typed position or an unknown symbol shows up as
//! a field-specific diagnostic rather than a decode error.
//!
//! ```toml
//! sequence = [41, 19, 13, 49, ...]
//! cardinalProgression = "NWSE"
//! northPosition = "11|10"
//! eastPosition = "36|25"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{Result, WheelError};
use crate::core::types::Cardinal;

/// Configuration document as supplied by the caller
///
/// Only unknown keys are rejected while decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawConfig {
    /// Candidate gate ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinal_progression: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub north_position: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub east_position: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub south_position: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub west_position: Option<Value>,
}

impl RawConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Position value supplied for a cardinal, if any
    pub fn position(&self, cardinal: Cardinal) -> Option<&Value> {
        match cardinal {
            Cardinal::North => self.north_position.as_ref(),
            Cardinal::East => self.east_position.as_ref(),
            Cardinal::South => self.south_position.as_ref(),
            Cardinal::West => self.west_position.as_ref(),
        }
    }

    pub fn set_position(&mut self, cardinal: Cardinal, position: Option<Value>) {
        let slot = match cardinal {
            Cardinal::North => &mut self.north_position,
            Cardinal::East => &mut self.east_position,
            Cardinal::South => &mut self.south_position,
            Cardinal::West => &mut self.west_position,
        };
        *slot = position;
    }
}

/// Load a configuration document from a `.toml` or `.json` file
pub fn load_config(path: &Path) -> Result<RawConfig> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let config = match extension.as_deref() {
        Some("toml") => RawConfig::from_toml_str(&content)?,
        Some("json") => RawConfig::from_json_str(&content)?,
        _ => return Err(WheelError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!("Loaded wheel configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_document_keys_are_camel_case() {
        let config = RawConfig::from_toml_str(
            r#"
            sequence = [1, 2, 3]
            cardinalProgression = "NESW"
            northPosition = "1|2"
            westPosition = "3"
            "#,
        )
        .unwrap();

        assert_eq!(config.sequence, Some(serde_json::json!([1, 2, 3])));
        assert_eq!(config.cardinal_progression, Some(Value::from("NESW")));
        assert_eq!(config.position(Cardinal::North), Some(&Value::from("1|2")));
        assert_eq!(config.position(Cardinal::East), None);
        assert_eq!(config.position(Cardinal::West), Some(&Value::from("3")));
    }

    #[test]
    fn test_sequence_shape_is_not_checked_while_decoding() {
        let config = RawConfig::from_json_str(r#"{"sequence": "not a list"}"#).unwrap();
        assert_eq!(config.sequence, Some(serde_json::json!("not a list")));
        assert!(config.north_position.is_none());
    }

    #[test]
    fn test_wrongly_typed_fields_still_decode() {
        let config = RawConfig::from_json_str(
            r#"{"cardinalProgression": 4, "northPosition": 10, "sequence": [1]}"#,
        )
        .unwrap();
        assert_eq!(config.cardinal_progression, Some(serde_json::json!(4)));
        assert_eq!(config.position(Cardinal::North), Some(&serde_json::json!(10)));

        let config = RawConfig::from_toml_str("northPosition = 10\neastPosition = true").unwrap();
        assert_eq!(config.north_position, Some(serde_json::json!(10)));
        assert_eq!(config.east_position, Some(serde_json::json!(true)));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = RawConfig::from_json_str(r#"{"northPos": "1|2"}"#);
        assert!(matches!(result, Err(WheelError::SerdeError(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = std::env::temp_dir().join("gate_wheel_config_test.yaml");
        fs::write(&dir, "sequence: []").unwrap();
        let result = load_config(&dir);
        assert!(matches!(result, Err(WheelError::UnsupportedFormat(_))));
        let _ = fs::remove_file(&dir);
    }
}
