//! Bit-level reader with bounded operations.

use crate::error::{BitError, BitResult};

/// A bit-level reader for decoding packed replay data.
///
/// Bits are consumed least-significant-first within each byte, matching the
/// replay wire format. All read operations are bounds-checked and return
/// errors on failure. The reader never panics on malformed input.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.bit_pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Reads a single bit as a boolean.
    pub fn read_bit(&mut self) -> BitResult<bool> {
        if self.bits_remaining() == 0 {
            return Err(BitError::EndOfBuffer {
                requested: 1,
                available: 0,
            });
        }
        let byte_idx = self.bit_pos / 8;
        let bit_idx = self.bit_pos % 8;
        let bit = (self.data[byte_idx] >> bit_idx) & 1;
        self.bit_pos += 1;
        Ok(bit == 1)
    }

    /// Reads up to 64 bits as an unsigned integer, low bits first.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(0);
        }
        if bits as usize > self.bits_remaining() {
            return Err(BitError::EndOfBuffer {
                requested: bits as usize,
                available: self.bits_remaining(),
            });
        }

        let mut value = 0u64;
        for i in 0..bits {
            value |= u64::from(self.read_bit()?) << i;
        }
        Ok(value)
    }

    /// Reads up to 64 bits as a sign-extended two's-complement integer.
    pub fn read_signed_bits(&mut self, bits: u8) -> BitResult<i64> {
        let raw = self.read_bits(bits)?;
        if bits == 0 || bits == 64 {
            return Ok(raw as i64);
        }
        let sign = 1u64 << (bits - 1);
        Ok((raw ^ sign).wrapping_sub(sign) as i64)
    }

    /// Reads a 32-bit IEEE float sent verbatim.
    pub fn read_f32(&mut self) -> BitResult<f32> {
        let raw = self.read_bits(32)?;
        Ok(f32::from_bits(raw as u32))
    }

    /// Reads `len` bytes; the stream need not be byte-aligned.
    pub fn read_bytes(&mut self, len: usize) -> BitResult<Vec<u8>> {
        let needed = len.saturating_mul(8);
        if needed > self.bits_remaining() {
            return Err(BitError::EndOfBuffer {
                requested: needed,
                available: self.bits_remaining(),
            });
        }
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.read_bits(8)? as u8);
        }
        Ok(out)
    }
}
