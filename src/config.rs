//! Configuration for shannon-fano

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Capacity of the buffered reader/writer put around every stream.
    pub io_buffer_size: usize,
    /// Largest non-seekable input that will be held in memory for the second pass.
    pub max_buffered_input: u64,
    /// Reject non-zero padding bits and bytes following the last code.
    pub strict_trailing: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            io_buffer_size: 64 * 1024,
            max_buffered_input: 1024 * 1024 * 1024, // 1 GiB
            strict_trailing: true,
        }
    }
}

impl CodecConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CodecError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.io_buffer_size == 0 {
            return Err(CodecError::Config("io_buffer_size must be non-zero".into()));
        }
        Ok(())
    }
}
