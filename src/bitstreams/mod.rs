use serde::{Serialize, Deserialize};

use crate::error::CodecError;

/// A packed, byte-aligned bitstream.
///
/// `written_bits` is the logical length of the stream; the low-order bits of the
/// last byte past that length carry no information.
#[derive(Serialize, Clone, Eq, PartialEq, Debug)]
pub struct BinaryWriter {
    pub os: Box<[u8]>,
    pub written_bits: usize,
}

impl BinaryWriter {
    /// Packs a (possibly lazy) sequence of binary decisions, most significant bit first.
    pub fn pack<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut builder = BinaryWriterBuilder::new();
        builder.extend(bits);
        builder.build()
    }

    pub fn len(&self) -> usize {
        self.os.len()
    }

    pub fn is_empty(&self) -> bool {
        self.os.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.os.into_vec()
    }
}

pub struct BinaryWriterBuilder {
    os: Vec<u8>,
    pub written_bits: usize,
    pub current: u64,
    pub free: usize,
}

impl Default for BinaryWriterBuilder {
    fn default() -> Self {
        BinaryWriterBuilder {
            os: Vec::default(),
            written_bits: 0,
            current: 0,
            free: 8,
        }
    }
}

impl BinaryWriterBuilder {
    pub fn build(mut self) -> BinaryWriter {
        if self.free < 8 {
            self.write(self.current);
        }

        BinaryWriter {
            os: self.os.into_boxed_slice(),
            written_bits: self.written_bits,
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn write(&mut self, b: u64) {
        self.os.push(b as u8);
    }

    #[inline(always)]
    pub fn write_in_current(&mut self, b: u64, len: u64) -> u64 {
        debug_assert!(len as usize <= self.free);

        self.free -= len as usize;
        self.current |= (b & ((1 << len) - 1)) << self.free;

        if self.free == 0 {
            self.write(self.current);
            self.free = 8;
            self.current = 0;
        }

        self.written_bits += len as usize;
        len
    }

    #[inline(always)]
    pub fn push_bit(&mut self, bit: bool) -> u64 {
        self.write_in_current(bit as u64, 1)
    }

    /// Writes the `len` lowest bits of `x`, most significant first.
    #[inline(always)]
    pub fn push_bits(&mut self, x: u64, len: u64) -> u64 {
        assert!(len <= 64, "Cannot write {} bits from an integer", len);

        let mut left = len;
        while left != 0 {
            let take = left.min(self.free as u64);
            left -= take;
            self.write_in_current(x >> left, take);
        }

        len
    }
}

impl Extend<bool> for BinaryWriterBuilder {
    fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
        for bit in iter {
            self.push_bit(bit);
        }
    }
}

/// Bit-at-a-time reader over a byte buffer, most significant bit first.
///
/// The cursor is the pair (`position`, `bit_index`): the byte being read and the
/// bit inside it, counting down from 7.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct BinaryReader {
    is: Box<[u8]>,
    pub position: usize,
    pub bit_index: u8,
    pub read_bits: usize,
}

impl BinaryReader {
    pub fn new(input_stream: Box<[u8]>) -> Self {
        Self::with_cursor(input_stream, 0, 7)
    }

    pub fn with_cursor(input_stream: Box<[u8]>, position: usize, bit_index: u8) -> Self {
        assert!(bit_index < 8, "Bit index {} is outside of a byte", bit_index);

        BinaryReader {
            is: input_stream,
            position,
            bit_index,
            read_bits: 0,
        }
    }

    #[inline(always)]
    pub fn set_position(&mut self, pos: u64) {
        self.position = pos as usize >> 3;
        self.bit_index = 7 - (pos & 7) as u8;
    }

    #[inline(always)]
    pub fn bit_position(&self) -> usize {
        (self.position << 3) + (7 - self.bit_index as usize)
    }

    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.is.len()
    }

    pub fn len(&self) -> usize {
        self.is.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is.is_empty()
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Result<bool, CodecError> {
        if self.is_exhausted() {
            return Err(CodecError::TruncatedStream { read_bits: self.read_bits });
        }

        let bit = (self.is[self.position] >> self.bit_index) & 1 == 1;

        if self.bit_index == 0 {
            self.bit_index = 7;
            self.position += 1;
        } else {
            self.bit_index -= 1;
        }

        self.read_bits += 1;
        Ok(bit)
    }

    /// Reads `len` bits as an unsigned integer, most significant bit first.
    #[inline(always)]
    pub fn read_int(&mut self, len: u64) -> Result<u64, CodecError> {
        assert!(len <= 64, "Cannot read {} bits into an integer", len);

        let mut x = 0u64;
        for _ in 0..len {
            x = (x << 1) | self.read_bit()? as u64;
        }

        Ok(x)
    }
}

impl Iterator for BinaryReader {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_bit().ok()
    }
}

#[cfg(test)]
mod tests;
