//! Error types for huffstat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("empty input: no symbols to build a tree from")]
    EmptyInput,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("byte 0x{byte:02x} at offset {position} is outside the alphabet (limit {limit})")]
    AlphabetOverflow { byte: u8, limit: u16, position: usize },

    #[error("symbol frequencies overflow a 64-bit counter")]
    FrequencyOverflow,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
