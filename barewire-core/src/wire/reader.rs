//! Sequential wire input over a borrowed byte slice.

use super::{primitives, varint};
use crate::error::{BareError, Result};

/// A cursor over a borrowed byte slice.
///
/// Every `read_*` consumes from the current position and advances it;
/// running off the end of the input is a `Decoding` error. The reader
/// never copies the underlying bytes except where the decoded value
/// itself is owned (strings, blobs).
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Create a reader at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current read position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Check if the input is exhausted.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn require(&self, width: usize) -> Result<()> {
        if self.remaining() < width {
            return Err(BareError::decoding(format!(
                "truncated input: need {} bytes at position {}, {} remaining",
                width,
                self.pos,
                self.remaining()
            )));
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        let value = self.buf[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.require(2)?;
        let value = primitives::read_u16(self.buf, self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        let value = primitives::read_u32(self.buf, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.require(8)?;
        let value = primitives::read_u64(self.buf, self.pos)?;
        self.pos += 8;
        Ok(value)
    }

    /// Read an i8.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a little-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read a little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a little-endian i64.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Read an f32 from its exact bit pattern.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Read an f64 from its exact bit pattern.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a bool; only `0x00` and `0x01` are accepted.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            other => Err(BareError::decoding(format!(
                "invalid bool byte 0x{:02x}",
                other
            ))),
        }
    }

    /// Read a ULEB128-encoded unsigned value.
    pub fn read_uvarint(&mut self) -> Result<u64> {
        let (value, pos) = varint::decode_uvarint(self.buf, self.pos)?;
        self.pos = pos;
        Ok(value)
    }

    /// Read a zigzag ULEB128-encoded signed value.
    pub fn read_ivarint(&mut self) -> Result<i64> {
        let (value, pos) = varint::decode_ivarint(self.buf, self.pos)?;
        self.pos = pos;
        Ok(value)
    }

    /// Borrow the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.require(count)?;
        let slice = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    /// Read a length-prefixed byte blob into an owned vector.
    pub fn read_data(&mut self) -> Result<Vec<u8>> {
        let length = self.read_length()?;
        Ok(self.read_bytes(length)?.to_vec())
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// The length prefix is read exactly once; ill-formed UTF-8 is a
    /// `Decoding` error.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_length()?;
        let bytes = self.read_bytes(length)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| BareError::decoding(format!("invalid UTF-8 in string: {}", e)))
    }

    fn read_length(&mut self) -> Result<usize> {
        let length = self.read_uvarint()?;
        usize::try_from(length)
            .map_err(|_| BareError::decoding(format!("length prefix {} exceeds address space", length)))
    }
}
