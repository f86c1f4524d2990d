//! Bitstream encoding under a code table

use std::io::Write;

use bitstream_io::{BigEndian, BitWrite, BitWriter};
use tracing::debug;

use crate::code::CodeTable;
use crate::error::{HuffmanError, Result};

/// An encoded bit sequence with its exact length.
///
/// Bits are packed MSB-first; the final byte is zero padded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBits {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl EncodedBits {
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bit at `index`, or `None` past the end.
    pub fn bit(&self, index: u64) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        let byte = self.bytes[(index / 8) as usize];
        Some(byte & (0x80 >> (index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_len).filter_map(move |i| self.bit(i))
    }

    /// The bits as ASCII `'0'`/`'1'` characters.
    pub fn to_bit_string(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }

    /// Write one ASCII digit per bit.
    pub fn write_text<W: Write>(&self, mut out: W) -> Result<()> {
        let mut line = Vec::with_capacity(4096);
        for bit in self.iter() {
            line.push(if bit { b'1' } else { b'0' });
            if line.len() == line.capacity() {
                out.write_all(&line)?;
                line.clear();
            }
        }
        out.write_all(&line)?;
        out.flush()?;
        Ok(())
    }

    /// Write the packed bytes.
    pub fn write_packed<W: Write>(&self, mut out: W) -> Result<()> {
        out.write_all(&self.bytes)?;
        out.flush()?;
        Ok(())
    }
}

/// Encode `data` with `codes`.
///
/// Every byte of `data` must have a code; a missing one fails with
/// [`HuffmanError::InvalidInput`].
pub fn encode(data: &[u8], codes: &CodeTable) -> Result<EncodedBits> {
    let mut writer = BitWriter::endian(Vec::with_capacity(data.len() / 2), BigEndian);
    let mut bit_len = 0u64;

    for (pos, &b) in data.iter().enumerate() {
        let code = codes.get(b).ok_or_else(|| {
            HuffmanError::InvalidInput(format!("byte 0x{b:02x} at offset {pos} has no code"))
        })?;
        for &bit in code.bits() {
            writer.write_bit(bit)?;
        }
        bit_len += code.len() as u64;
    }
    writer.byte_align()?;

    let bytes = writer.into_writer();
    debug!(input = data.len(), bits = bit_len, bytes = bytes.len(), "encoded bitstream");
    Ok(EncodedBits { bytes, bit_len })
}
