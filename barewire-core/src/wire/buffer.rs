//! Sequential wire output into an owned, growable byte buffer.

use super::varint;
use crate::error::{BareError, Result};

/// Default cap on a wire buffer: 64 MB.
pub const DEFAULT_BUFFER_LIMIT: usize = 64 * 1024 * 1024;

/// An owned growable byte buffer with a tracked write position.
///
/// Every `write_*` appends at the current position and advances it; the
/// buffer grows on demand up to its limit, and writes past the limit fail
/// with an `Encoding` error. The caller owns the bytes; nothing in the
/// codec retains a reference after `into_bytes`.
#[derive(Debug, Clone)]
pub struct WireBuffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl WireBuffer {
    /// Create an empty buffer with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_BUFFER_LIMIT)
    }

    /// Create an empty buffer with an explicit byte limit.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    /// Current write position (equals the number of bytes written).
    #[must_use]
    pub fn position(&self) -> usize {
        self.bytes.len()
    }

    /// The written bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, yielding the written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn ensure(&mut self, additional: usize) -> Result<()> {
        let requested = self.bytes.len().checked_add(additional);
        match requested {
            Some(total) if total <= self.limit => Ok(()),
            _ => Err(BareError::encoding(format!(
                "buffer limit exceeded: requested {} more bytes at position {}, limit {}",
                additional,
                self.bytes.len(),
                self.limit
            ))),
        }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.ensure(1)?;
        self.bytes.push(value);
        Ok(())
    }

    /// Append a little-endian u16.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Append a little-endian u32.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Append a little-endian u64.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Append an i8.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_u8(value as u8)
    }

    /// Append a little-endian i16.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_u16(value as u16)
    }

    /// Append a little-endian i32.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_u32(value as u32)
    }

    /// Append a little-endian i64.
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_u64(value as u64)
    }

    /// Append an f32 as its exact bit pattern.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    /// Append an f64 as its exact bit pattern.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    /// Append a bool as `0x00` or `0x01`.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Append a ULEB128-encoded unsigned value.
    pub fn write_uvarint(&mut self, value: u64) -> Result<()> {
        self.ensure(varint::uvarint_len(value))?;
        varint::encode_uvarint(value, &mut self.bytes);
        Ok(())
    }

    /// Append a zigzag ULEB128-encoded signed value.
    pub fn write_ivarint(&mut self, value: i64) -> Result<()> {
        self.write_uvarint(varint::zigzag_encode(value))
    }

    /// Append a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_data(value.as_bytes())
    }

    /// Append a length-prefixed byte blob.
    pub fn write_data(&mut self, value: &[u8]) -> Result<()> {
        self.write_uvarint(value.len() as u64)?;
        self.write_bytes(value)
    }
}

impl Default for WireBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_tracks_every_write() {
        let mut buf = WireBuffer::new();
        assert_eq!(buf.position(), 0);
        buf.write_u8(1).unwrap();
        assert_eq!(buf.position(), 1);
        buf.write_u32(2).unwrap();
        assert_eq!(buf.position(), 5);
        buf.write_uvarint(300).unwrap();
        assert_eq!(buf.position(), 7);
    }

    #[test]
    fn u32_bytes_are_little_endian() {
        let mut buf = WireBuffer::new();
        buf.write_u32(0x1234_5678).unwrap();
        assert_eq!(buf.into_bytes(), vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn string_is_length_prefixed_utf8() {
        let mut buf = WireBuffer::new();
        buf.write_string("hi").unwrap();
        assert_eq!(buf.into_bytes(), vec![0x02, 0x68, 0x69]);
    }

    #[test]
    fn limit_overflow_is_an_encoding_error() {
        let mut buf = WireBuffer::with_limit(4);
        buf.write_u32(7).unwrap();
        let err = buf.write_u8(1).unwrap_err();
        assert_eq!(err.code(), "E102");
        // Nothing was appended by the failing write.
        assert_eq!(buf.position(), 4);
    }

    #[test]
    fn varint_write_respects_the_limit() {
        let mut buf = WireBuffer::with_limit(1);
        assert!(buf.write_uvarint(127).is_ok());

        let mut buf = WireBuffer::with_limit(1);
        let err = buf.write_uvarint(128).unwrap_err();
        assert_eq!(err.code(), "E102");
        assert_eq!(buf.position(), 0);
    }
}
