//! Shannon entropy of a symbol distribution

use crate::frequency::FrequencyTable;

/// Entropy in bits per symbol. No prefix code can average fewer bits.
pub fn shannon_entropy(table: &FrequencyTable) -> f64 {
    let total = table.total();
    if total == 0 {
        return 0.0;
    }
    let len = total as f64;
    let mut entropy = 0.0;
    for (_, f) in table.iter() {
        let p = f as f64 / len;
        entropy -= p * p.log2();
    }
    entropy
}
