//! Compression statistics
//!
//! Summarizes a code table against the frequencies it was built from: per
//! symbol codes, average bits per symbol and estimated savings over a fixed
//! baseline width.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::code::CodeTable;
use crate::entropy::shannon_entropy;
use crate::error::Result;
use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub symbol: u8,
    pub frequency: u64,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub total_symbols: u64,
    pub distinct_symbols: usize,
    pub encoded_bits: u64,
    pub bits_per_symbol: f64,
    pub baseline_bits_per_symbol: u32,
    /// Percent saved relative to the baseline; negative if the code is wider.
    pub savings_percent: f64,
    pub entropy_bits: f64,
    pub entries: Vec<ReportEntry>,
}

impl CompressionReport {
    /// Summarize `codes` against `frequencies`. Fails with
    /// [`HuffmanError::FrequencyOverflow`] if the encoded bit count does not
    /// fit in a `u64`.
    ///
    /// [`HuffmanError::FrequencyOverflow`]: crate::error::HuffmanError::FrequencyOverflow
    pub fn new(frequencies: &FrequencyTable, codes: &CodeTable, baseline_bits: u32) -> Result<Self> {
        let entries: Vec<ReportEntry> = frequencies
            .iter()
            .filter_map(|(symbol, frequency)| {
                codes.get(symbol).map(|code| ReportEntry {
                    symbol,
                    frequency,
                    code: code.to_string(),
                })
            })
            .collect();

        let encoded_bits = codes.weighted_length(frequencies)?;
        let bits_per_symbol = codes.average_bits(frequencies)?;
        let savings_percent = if frequencies.is_empty() {
            0.0
        } else {
            (1.0 - bits_per_symbol / f64::from(baseline_bits)) * 100.0
        };

        Ok(Self {
            input: None,
            output: None,
            total_symbols: frequencies.total(),
            distinct_symbols: frequencies.len(),
            encoded_bits,
            bits_per_symbol,
            baseline_bits_per_symbol: baseline_bits,
            savings_percent,
            entropy_bits: shannon_entropy(frequencies),
            entries,
        })
    }

    /// Attach the input and output names shown in the header line.
    pub fn with_files(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self.output = Some(output.into());
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Truncate toward negative infinity at `places` decimals.
fn floor_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).floor() / scale
}

fn glyph(symbol: u8) -> String {
    std::ascii::escape_default(symbol).to_string()
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(input), Some(output)) = (&self.input, &self.output) {
            writeln!(f, "Input: {input}, Output: {output}")?;
        }
        writeln!(f, "Total Characters: {}", self.total_symbols)?;
        writeln!(f, "Distinct symbols: {}", self.distinct_symbols)?;
        writeln!(f, "Bits per character: {:.2}", floor_to(self.bits_per_symbol, 2))?;
        writeln!(f, "Estimated savings: {:.1}%", floor_to(self.savings_percent, 1))?;
        writeln!(f, "Entropy: {:.2} bits", floor_to(self.entropy_bits, 2))?;
        writeln!(f)?;
        writeln!(f, "char : frequency : bits")?;
        for entry in &self.entries {
            writeln!(f, "{} : {} : {}", glyph(entry.symbol), entry.frequency, entry.code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::generate_code_table;
    use crate::error::HuffmanError;
    use crate::frequency::build_frequency_table;
    use crate::tree::build_huffman_tree;

    fn report_for(data: &[u8]) -> CompressionReport {
        let freq = build_frequency_table(data);
        let root = build_huffman_tree(&freq).unwrap();
        let codes = generate_code_table(Some(&root)).unwrap();
        CompressionReport::new(&freq, &codes, 8).unwrap()
    }

    #[test]
    fn test_two_symbol_report() {
        let report = report_for(b"aaaab");
        assert_eq!(report.total_symbols, 5);
        assert_eq!(report.distinct_symbols, 2);
        assert_eq!(report.encoded_bits, 5);
        assert_eq!(report.bits_per_symbol, 1.0);
        assert_eq!(report.savings_percent, 87.5);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].symbol, b'a');
        assert_eq!(report.entries[0].code, "1");
    }

    #[test]
    fn test_display_layout() {
        let text = report_for(b"aaaab").with_files("in.txt", "out.txt").to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Input: in.txt, Output: out.txt");
        assert_eq!(lines[1], "Total Characters: 5");
        assert_eq!(lines[2], "Distinct symbols: 2");
        assert_eq!(lines[3], "Bits per character: 1.00");
        assert_eq!(lines[4], "Estimated savings: 87.5%");
        assert!(text.contains("char : frequency : bits\na : 4 : 1\nb : 1 : 0\n"));
    }

    #[test]
    fn test_display_truncates() {
        // a:2 b:1 c:1 -> 6 bits over 4 symbols = 1.5; savings 81.25 -> 81.2
        let text = report_for(b"aabc").to_string();
        assert!(text.contains("Bits per character: 1.50"));
        assert!(text.contains("Estimated savings: 81.2%"));
    }

    #[test]
    fn test_non_printable_escaped() {
        let text = report_for(b"\n\n\x00").to_string();
        assert!(text.contains("\\n : 2 : "));
        assert!(text.contains("\\x00 : 1 : "));
    }

    #[test]
    fn test_json() {
        let json = report_for(b"aaaab").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_symbols"], 5);
        assert_eq!(value["entries"][1]["code"], "0");
        assert!(value.get("input").is_none());
    }

    #[test]
    fn test_distinct_symbols_shown() {
        let text = report_for(b"the quick brown fox").to_string();
        assert!(text.contains("Distinct symbols: 16\n"));
    }

    #[test]
    fn test_overflowing_bit_count_is_an_error() {
        let third = u64::MAX / 3;
        let freq = FrequencyTable::from_counts([(0, third), (1, third), (2, third)]).unwrap();
        let root = build_huffman_tree(&freq).unwrap();
        let codes = generate_code_table(Some(&root)).unwrap();
        assert!(matches!(
            CompressionReport::new(&freq, &codes, 8),
            Err(HuffmanError::FrequencyOverflow)
        ));
    }

    #[test]
    fn test_floor_to_negative() {
        assert_eq!(floor_to(-12.34, 1), -12.4);
        assert_eq!(floor_to(1.999, 2), 1.99);
    }
}
