//! Code table generation
//!
//! Walks a Huffman tree and records the root-to-leaf path of every symbol.
//! A left edge is a 0 bit, a right edge a 1 bit.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanNode;

/// A non-empty variable-length code. Leading zeros are significant: `01`
/// and `1` are distinct codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub(crate) fn new(bits: Vec<bool>) -> Self {
        debug_assert!(!bits.is_empty());
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// True if `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    fn pop(&mut self) {
        self.bits.pop();
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from symbol to its code, in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Derive the code table of a tree. A lone leaf gets the code `0`.
    pub fn from_tree(root: &HuffmanNode) -> Self {
        let mut codes = BTreeMap::new();
        if let HuffmanNode::Leaf { symbol, .. } = root {
            codes.insert(*symbol, Code::new(vec![false]));
        } else {
            let mut path = Code { bits: Vec::new() };
            collect(root, &mut path, &mut codes);
        }
        let table = Self { codes };
        debug!(
            symbols = table.len(),
            max_len = table.max_code_len(),
            "generated code table"
        );
        table
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Σ frequency × code length over all symbols in `frequencies`.
    ///
    /// Symbols without a code contribute nothing. Fails with
    /// [`HuffmanError::FrequencyOverflow`] if the sum does not fit in a `u64`.
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> Result<u64> {
        frequencies
            .iter()
            .filter_map(|(s, f)| self.get(s).map(|c| (f, c.len() as u64)))
            .try_fold(0u64, |acc, (f, len)| {
                f.checked_mul(len).and_then(|bits| acc.checked_add(bits))
            })
            .ok_or(HuffmanError::FrequencyOverflow)
    }

    /// Expected code length in bits per input symbol.
    pub fn average_bits(&self, frequencies: &FrequencyTable) -> Result<f64> {
        let total = frequencies.total();
        if total == 0 {
            return Ok(0.0);
        }
        Ok(self.weighted_length(frequencies)? as f64 / total as f64)
    }

    /// Checks that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // in sorted order a prefix always sorts directly before some extension of it
        let mut sorted: Vec<&[bool]> = self.codes.values().map(Code::bits).collect();
        sorted.sort();
        sorted.windows(2).all(|w| !w[1].starts_with(w[0]))
    }
}

fn collect(node: &HuffmanNode, path: &mut Code, codes: &mut BTreeMap<u8, Code>) {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, path.clone());
        }
        HuffmanNode::Internal { left, right, .. } => {
            path.push(false);
            collect(left, path, codes);
            path.pop();
            path.push(true);
            collect(right, path, codes);
            path.pop();
        }
    }
}

/// Generate the code table for `root`.
///
/// Fails with [`HuffmanError::InvalidInput`] when there is no root.
pub fn generate_code_table(root: Option<&HuffmanNode>) -> Result<CodeTable> {
    let root = root.ok_or_else(|| HuffmanError::InvalidInput("no tree root".into()))?;
    Ok(CodeTable::from_tree(root))
}
