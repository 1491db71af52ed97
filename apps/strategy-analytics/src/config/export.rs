//! Export output settings.

use serde::{Deserialize, Serialize};

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Field delimiter, a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Directory for exported files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            output_dir: default_output_dir(),
        }
    }
}

impl ExportConfig {
    /// Delimiter as a byte, `None` unless it is exactly one ASCII character.
    #[must_use]
    pub fn delimiter_byte(&self) -> Option<u8> {
        super::delimiter_byte(&self.delimiter)
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_output_dir() -> String {
    "exports".to_string()
}
