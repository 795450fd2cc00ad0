//! Configuration for huff-compress

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompressError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Buffer capacity for file readers and writers.
    pub io_buffer_size: usize,
    /// Inputs larger than this many bytes are refused.
    pub max_input_size: u64,
    /// Delete a half-written output file when an operation fails.
    pub discard_partial_output: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            io_buffer_size: 65536,
            max_input_size: 1024 * 1024 * 1024, // 1 GiB
            discard_partial_output: true,
        }
    }
}

impl CompressionConfig {
    /// Buffer capacity actually used; a zero setting would read nothing.
    pub fn buffer_capacity(&self) -> usize {
        self.io_buffer_size.max(1)
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompressError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| CompressError::Config(format!("{}: {}", path.display(), e)))
    }
}
