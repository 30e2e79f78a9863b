use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use super::BitWriter;
use crate::error::Error;

/// An ordered, length-tagged sequence of bits.
///
/// Bits are stored most significant bit first in a byte vector. The
/// length is authoritative: storage bits past it are always zero, so
/// two sequences with equal bits compare equal regardless of how they
/// were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSequence {
    bytes: Vec<u8>,
    len: usize,
}

const fn bytes_for_bits(bit_count: usize) -> usize {
    bit_count / 8 + (bit_count % 8 != 0) as usize
}

const fn bit_mask(index: usize) -> u8 {
    0b1000_0000 >> (index % 8)
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes_for_bits(bit_capacity)),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            // the push above guarantees a byte for this index
            self.bytes[self.len / 8] |= bit_mask(self.len);
        }
        self.len += 1;
    }

    /// Appends the `length` low bits of `pattern`, most significant first.
    pub fn push_bits(&mut self, pattern: u64, length: u32) {
        for shift in (0..length).rev() {
            self.push((pattern >> shift) & 1 == 1);
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & bit_mask(index) != 0)
    }

    pub fn iter(&self) -> BitIterator<'_> {
        BitIterator {
            sequence: self,
            index: 0,
        }
    }

    /// Shortens the sequence to `len` bits, no-op if it is already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.bytes.truncate(bytes_for_bits(len));
        self.len = len;
        self.clear_padding();
    }

    /// Builds a sequence from padded storage.
    ///
    /// Only the first `bit_length` bits are taken; any storage past them,
    /// whether whole bytes or the padding of the last byte, is ignored.
    pub fn from_padded_bytes(bytes: &[u8], bit_length: usize) -> crate::Result<Self> {
        let available_bits = bytes.len() * 8;
        if bit_length > available_bits {
            return Err(Error::BitLengthExceedsStorage {
                bit_length,
                available_bits,
            });
        }
        let mut sequence = Self {
            bytes: bytes[..bytes_for_bits(bit_length)].to_vec(),
            len: bit_length,
        };
        sequence.clear_padding();
        Ok(sequence)
    }

    /// The backing bytes, zero padded to the next byte boundary.
    pub fn as_padded_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_padded_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Writes the padded bytes through a [`BitWriter`] and flushes it.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut bit_writer = BitWriter::new(writer);
        bit_writer.write_bits(&self.bytes, self.len)?;
        bit_writer.flush()
    }

    /// Reads exactly the bytes holding `bit_length` bits.
    pub fn read_from<R: Read>(reader: &mut R, bit_length: usize) -> io::Result<Self> {
        let mut bytes = vec![0; bytes_for_bits(bit_length)];
        reader.read_exact(&mut bytes)?;
        let mut sequence = Self {
            bytes,
            len: bit_length,
        };
        sequence.clear_padding();
        Ok(sequence)
    }

    fn clear_padding(&mut self) {
        let used_in_last_byte = self.len % 8;
        if used_in_last_byte != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= !(0xFF >> used_in_last_byte);
            }
        }
    }
}

pub struct BitIterator<'a> {
    sequence: &'a BitSequence,
    index: usize,
}

impl Iterator for BitIterator<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        let bit = self.sequence.get(self.index)?;
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequence.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIterator<'_> {}

impl<'a> IntoIterator for &'a BitSequence {
    type Item = bool;
    type IntoIter = BitIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<bool> for BitSequence {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut sequence = Self::new();
        sequence.extend(iter);
        sequence
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitSequence {
    type Err = Error;

    /// Parses a textual sequence of '0' and '1' characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sequence = Self::with_capacity(s.len());
        for (index, character) in s.chars().enumerate() {
            match character {
                '0' => sequence.push(false),
                '1' => sequence.push(true),
                _ => return Err(Error::InvalidBitCharacter { character, index }),
            }
        }
        Ok(sequence)
    }
}
