//! Input data location and loader limits.

use serde::{Deserialize, Serialize};

/// Data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding one file per strategy.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// File extension of strategy files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Maximum number of data rows accepted per file.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Accept files with a header but no rows.
    #[serde(default)]
    pub allow_empty: bool,
    /// Field delimiter of strategy files, a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extension: default_extension(),
            max_rows: default_max_rows(),
            allow_empty: false,
            delimiter: default_delimiter(),
        }
    }
}

impl DataConfig {
    /// Delimiter as a byte, `None` unless it is exactly one ASCII character.
    #[must_use]
    pub fn delimiter_byte(&self) -> Option<u8> {
        super::delimiter_byte(&self.delimiter)
    }
}

fn default_directory() -> String {
    "data".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_extension() -> String {
    "csv".to_string()
}

const fn default_max_rows() -> usize {
    crate::records::DEFAULT_MAX_ROWS
}
