//! huffstat: Huffman code construction and compression statistics.
//!
//! The pipeline runs strictly in one direction:
//! - [`frequency`] counts each distinct byte of the input
//! - [`tree`] merges the two lightest nodes until a single root remains
//! - [`code`] walks the tree to assign each byte its bit string
//! - [`encoder`] and [`report`] consume the tables to produce the bitstream
//!   and the statistics
//!
//! [`HuffmanCoder`] wires the stages together under a [`CoderConfig`].

pub mod code;
pub mod config;
pub mod encoder;
pub mod entropy;
pub mod error;
pub mod frequency;
pub mod report;
pub mod tree;

use std::io::Read;

use tracing::info;

pub use crate::code::{generate_code_table, Code, CodeTable};
pub use crate::config::{AlphabetPolicy, CoderConfig, OutputFormat, OverflowPolicy};
pub use crate::encoder::{encode, EncodedBits};
pub use crate::error::{HuffmanError, Result};
pub use crate::frequency::{build_frequency_table, build_frequency_table_with, FrequencyTable};
pub use crate::report::{CompressionReport, ReportEntry};
pub use crate::tree::{build_huffman_tree, HuffmanNode};

/// Everything produced for one input.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub frequencies: FrequencyTable,
    pub tree: HuffmanNode,
    pub codes: CodeTable,
    pub encoded: EncodedBits,
    pub report: CompressionReport,
}

/// Runs the full pipeline under one configuration.
pub struct HuffmanCoder {
    config: CoderConfig,
}

impl Default for HuffmanCoder {
    fn default() -> Self {
        Self::new(CoderConfig::default())
    }
}

impl HuffmanCoder {
    pub fn new(config: CoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// Build the tables for `data`, encode it and summarize the result.
    pub fn analyze(&self, data: &[u8]) -> Result<Analysis> {
        self.config.validate()?;
        self.check_size(data.len())?;
        let frequencies = build_frequency_table_with(data, &self.config.alphabet)?;
        self.finish(data, frequencies)
    }

    /// Read all of `reader` and analyze it. The reader is dropped before
    /// the tree is built.
    pub fn analyze_reader<R: Read>(&self, reader: R) -> Result<Analysis> {
        let limit = self.config.max_input_size as u64;
        let mut data = Vec::new();
        // one extra byte distinguishes "exactly at the limit" from "over it"
        reader.take(limit.saturating_add(1)).read_to_end(&mut data)?;
        self.analyze(&data)
    }

    /// Build only the code table, without encoding.
    pub fn code_table(&self, data: &[u8]) -> Result<CodeTable> {
        self.config.validate()?;
        self.check_size(data.len())?;
        let frequencies = build_frequency_table_with(data, &self.config.alphabet)?;
        let tree = build_huffman_tree(&frequencies)?;
        generate_code_table(Some(&tree))
    }

    /// Count `reader` in a single streaming pass and build its code table.
    /// The input is never held in memory as a whole.
    pub fn code_table_from_reader<R: Read>(&self, reader: R) -> Result<(FrequencyTable, CodeTable)> {
        self.config.validate()?;
        let frequencies = FrequencyTable::from_reader(reader, &self.config.alphabet)?;
        let tree = build_huffman_tree(&frequencies)?;
        let codes = generate_code_table(Some(&tree))?;
        Ok((frequencies, codes))
    }

    fn check_size(&self, len: usize) -> Result<()> {
        if len > self.config.max_input_size {
            return Err(HuffmanError::InvalidInput(format!(
                "input of {len} bytes exceeds the limit of {} bytes",
                self.config.max_input_size
            )));
        }
        Ok(())
    }

    fn finish(&self, data: &[u8], frequencies: FrequencyTable) -> Result<Analysis> {
        let tree = build_huffman_tree(&frequencies)?;
        let codes = generate_code_table(Some(&tree))?;
        let encoded = encode(data, &codes)?;
        let report =
            CompressionReport::new(&frequencies, &codes, self.config.baseline_bits_per_symbol)?;
        info!(
            symbols = report.total_symbols,
            distinct = report.distinct_symbols,
            bits_per_symbol = report.bits_per_symbol,
            savings = report.savings_percent,
            "huffman analysis complete"
        );
        Ok(Analysis {
            frequencies,
            tree,
            codes,
            encoded,
            report,
        })
    }
}
