//! Configuration for huffstat

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HuffmanError, Result};

/// Which byte values count as symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AlphabetPolicy {
    /// Every byte value 0..=255 is a symbol.
    Full,
    /// Only bytes below `limit` are recognized.
    Bounded { limit: u16, on_overflow: OverflowPolicy },
}

/// What to do with a byte outside a bounded alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Fail the scan with `AlphabetOverflow`.
    Reject,
    /// Count the byte anyway and log a warning.
    Extend,
}

impl AlphabetPolicy {
    /// Returns true if `byte` is inside the recognized range.
    pub fn contains(&self, byte: u8) -> bool {
        match *self {
            AlphabetPolicy::Full => true,
            AlphabetPolicy::Bounded { limit, .. } => u16::from(byte) < limit,
        }
    }
}

/// How the encoded bitstream is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One ASCII '0' or '1' per bit.
    Text,
    /// Bits packed MSB-first into bytes, zero padded.
    Packed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoderConfig {
    pub alphabet: AlphabetPolicy,
    pub baseline_bits_per_symbol: u32,
    pub max_input_size: usize,
    pub output_format: OutputFormat,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            alphabet: AlphabetPolicy::Full,
            baseline_bits_per_symbol: 8,
            max_input_size: 100 * 1024 * 1024, // 100 MB
            output_format: OutputFormat::Text,
        }
    }
}

impl CoderConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CoderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.baseline_bits_per_symbol == 0 {
            return Err(HuffmanError::InvalidInput(
                "baseline_bits_per_symbol must be positive".into(),
            ));
        }
        if let AlphabetPolicy::Bounded { limit, .. } = self.alphabet {
            if limit == 0 || limit > 256 {
                return Err(HuffmanError::InvalidInput(format!(
                    "alphabet limit must be in 1..=256, got {limit}"
                )));
            }
        }
        Ok(())
    }
}
