//! Bit-level writer for encoding packed replay data.

use crate::error::{BitError, BitResult};

/// A bit-level writer mirroring [`BitReader`](crate::BitReader).
///
/// Bits are emitted least-significant-first within each byte. Writes are
/// accumulated in an internal buffer; call [`finish`](Self::finish) to get
/// the final byte buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// The accumulated bytes.
    bytes: Vec<u8>,
    /// Current byte being filled (not yet pushed to `bytes`).
    current_byte: u8,
    /// Number of bits written to `current_byte` (0-7).
    bit_count: u8,
}

impl BitWriter {
    /// Creates a new empty `BitWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `BitWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            current_byte: 0,
            bit_count: 0,
        }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub fn bits_written(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, value: bool) {
        if value {
            self.current_byte |= 1 << self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.bytes.push(self.current_byte);
            self.current_byte = 0;
            self.bit_count = 0;
        }
    }

    /// Writes up to 64 bits from an unsigned integer, low bits first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`.
    /// Returns [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(());
        }
        if bits < 64 && value >= (1u64 << bits) {
            return Err(BitError::ValueOutOfRange { value, bits });
        }

        for i in 0..bits {
            self.write_bit((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Writes up to 64 bits from a signed integer in two's complement.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::SignedOutOfRange`] if `value` doesn't fit in
    /// `bits` as a signed quantity.
    pub fn write_signed_bits(&mut self, value: i64, bits: u8) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(());
        }
        if bits < 64 {
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            if value < min || value > max {
                return Err(BitError::SignedOutOfRange { value, bits });
            }
        }
        let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        for i in 0..bits {
            self.write_bit((value as u64 & mask) >> i & 1 == 1);
        }
        Ok(())
    }

    /// Writes a 32-bit IEEE float verbatim.
    pub fn write_f32(&mut self, value: f32) {
        // 32 bits of a u32 always fit; the error path is unreachable.
        let _ = self.write_bits(u64::from(value.to_bits()), 32);
    }

    /// Writes raw bytes; the stream need not be byte-aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let _ = self.write_bits(u64::from(byte), 8);
        }
    }

    /// Finishes writing and returns the byte buffer.
    ///
    /// If the last byte is incomplete, its unused high bits are zero.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.current_byte);
        }
        self.bytes
    }
}
