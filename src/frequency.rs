//! Symbol frequency counting
//!
//! Scans a byte sequence and counts occurrences of each distinct byte value.

use std::collections::BTreeMap;
use std::io::{BufReader, Read};

use tracing::{debug, warn};

use crate::config::{AlphabetPolicy, OverflowPolicy};
use crate::error::{HuffmanError, Result};

/// Occurrence counts for every distinct byte in a source.
///
/// Every key has a count of at least one. Iteration is in ascending
/// symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Repeated symbols are summed. A zero count is rejected since every
    /// symbol in a table must occur at least once.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = BTreeMap::new();
        for (symbol, count) in counts {
            if count == 0 {
                return Err(HuffmanError::InvalidInput(format!(
                    "symbol 0x{symbol:02x} has a zero count"
                )));
            }
            let entry = table.entry(symbol).or_insert(0u64);
            *entry = entry
                .checked_add(count)
                .ok_or(HuffmanError::FrequencyOverflow)?;
        }
        let table = Self { counts: table };
        table.checked_total()?;
        Ok(table)
    }

    /// Count the bytes produced by `reader`.
    ///
    /// The reader is consumed and dropped before returning, on success and
    /// on error alike.
    pub fn from_reader<R: Read>(reader: R, policy: &AlphabetPolicy) -> Result<Self> {
        let mut counts = [0u64; 256];
        let mut position = 0usize;
        let mut buf = [0u8; 8192];
        let mut reader = BufReader::new(reader);
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            count_into(&mut counts, &buf[..n], position, policy)?;
            position += n;
        }
        Ok(Self::from_array(&counts))
    }

    fn from_array(counts: &[u64; 256]) -> Self {
        let counts: BTreeMap<u8, u64> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (i as u8, c))
            .collect();
        let table = Self { counts };
        debug!(
            distinct = table.len(),
            total = table.total(),
            "built frequency table"
        );
        table
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the scanned input.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    fn checked_total(&self) -> Result<u64> {
        self.counts
            .values()
            .try_fold(0u64, |acc, &c| acc.checked_add(c))
            .ok_or(HuffmanError::FrequencyOverflow)
    }

    /// `(symbol, count)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    pub fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
        self.counts.keys().copied()
    }
}

fn count_into(
    counts: &mut [u64; 256],
    bytes: &[u8],
    offset: usize,
    policy: &AlphabetPolicy,
) -> Result<()> {
    for (i, &b) in bytes.iter().enumerate() {
        if !policy.contains(b) {
            if let AlphabetPolicy::Bounded { limit, on_overflow } = *policy {
                match on_overflow {
                    OverflowPolicy::Reject => {
                        return Err(HuffmanError::AlphabetOverflow {
                            byte: b,
                            limit,
                            position: offset + i,
                        })
                    }
                    OverflowPolicy::Extend => {
                        // only the first occurrence of each byte is worth a warning
                        if counts[b as usize] == 0 {
                            warn!(byte = b, limit, position = offset + i, "byte outside alphabet, extending");
                        }
                    }
                }
            }
        }
        counts[b as usize] += 1;
    }
    Ok(())
}

/// Count every distinct byte in `bytes`. Empty input yields an empty table.
pub fn build_frequency_table(bytes: &[u8]) -> FrequencyTable {
    let mut counts = [0u64; 256];
    for &b in bytes {
        counts[b as usize] += 1;
    }
    FrequencyTable::from_array(&counts)
}

/// Like [`build_frequency_table`], applying an alphabet policy.
pub fn build_frequency_table_with(bytes: &[u8], policy: &AlphabetPolicy) -> Result<FrequencyTable> {
    let mut counts = [0u64; 256];
    count_into(&mut counts, bytes, 0, policy)?;
    Ok(FrequencyTable::from_array(&counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_exact() {
        let table = build_frequency_table(b"aaaab");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(b'a'), Some(4));
        assert_eq!(table.get(b'b'), Some(1));
        assert_eq!(table.get(b'c'), None);
        assert_eq!(table.total(), 5);
    }

    #[test]
    fn test_empty_input() {
        let table = build_frequency_table(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_all_bytes() {
        let data: Vec<u8> = (0..=255).collect();
        let table = build_frequency_table(&data);
        assert_eq!(table.len(), 256);
        assert!(table.iter().all(|(_, c)| c == 1));
    }

    #[test]
    fn test_iteration_ascending() {
        let table = build_frequency_table(b"zyxzyz");
        let symbols: Vec<u8> = table.symbols().collect();
        assert_eq!(symbols, vec![b'x', b'y', b'z']);
    }

    #[test]
    fn test_from_reader_matches_slice() {
        let data = "hello world ".repeat(1000);
        let from_reader =
            FrequencyTable::from_reader(data.as_bytes(), &AlphabetPolicy::Full).unwrap();
        assert_eq!(from_reader, build_frequency_table(data.as_bytes()));
    }

    #[test]
    fn test_bounded_reject() {
        let policy = AlphabetPolicy::Bounded {
            limit: 128,
            on_overflow: OverflowPolicy::Reject,
        };
        let result = build_frequency_table_with(b"ab\xffc", &policy);
        match result {
            Err(HuffmanError::AlphabetOverflow { byte, limit, position }) => {
                assert_eq!(byte, 0xff);
                assert_eq!(limit, 128);
                assert_eq!(position, 2);
            }
            other => panic!("expected AlphabetOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_bounded_reject_reports_stream_offset() {
        let policy = AlphabetPolicy::Bounded {
            limit: 128,
            on_overflow: OverflowPolicy::Reject,
        };
        let mut data = vec![b'a'; 10_000];
        data.push(0x80);
        let result = FrequencyTable::from_reader(&data[..], &policy);
        assert!(matches!(
            result,
            Err(HuffmanError::AlphabetOverflow { position: 10_000, .. })
        ));
    }

    #[test]
    fn test_bounded_extend_keeps_symbol() {
        let policy = AlphabetPolicy::Bounded {
            limit: 128,
            on_overflow: OverflowPolicy::Extend,
        };
        let table = build_frequency_table_with(b"a\xff\xff", &policy).unwrap();
        assert_eq!(table.get(0xff), Some(2));
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_from_counts_rejects_zero() {
        let result = FrequencyTable::from_counts([(b'a', 3), (b'b', 0)]);
        assert!(matches!(result, Err(HuffmanError::InvalidInput(_))));
    }

    #[test]
    fn test_from_counts_overflow() {
        let result = FrequencyTable::from_counts([(b'a', u64::MAX), (b'b', 1)]);
        assert!(matches!(result, Err(HuffmanError::FrequencyOverflow)));
    }

    #[test]
    fn test_from_counts_sums_duplicates() {
        let table = FrequencyTable::from_counts([(b'a', 3), (b'a', 2)]).unwrap();
        assert_eq!(table.get(b'a'), Some(5));
    }
}
