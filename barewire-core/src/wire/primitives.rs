//! Little-endian byte packing for fixed-width primitives.
//!
//! All reads and writes take an explicit starting index and do not advance
//! any cursor; [`super::reader::WireReader`] and the typed view layer their
//! own position tracking on top. Floats are serialized as the little-endian
//! bit pattern of the underlying integer, so every bit pattern round-trips
//! exactly, NaN payloads included.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{BareError, Result};

#[inline]
fn check(buf: &[u8], at: usize, width: usize) -> Result<()> {
    let end = at.checked_add(width);
    match end {
        Some(end) if end <= buf.len() => Ok(()),
        _ => Err(BareError::OutOfBounds {
            offset: at,
            length: buf.len(),
        }),
    }
}

/// Read a u8 at `at`.
#[inline]
pub fn read_u8(buf: &[u8], at: usize) -> Result<u8> {
    check(buf, at, 1)?;
    Ok(buf[at])
}

/// Read a little-endian u16 at `at`.
#[inline]
pub fn read_u16(buf: &[u8], at: usize) -> Result<u16> {
    check(buf, at, 2)?;
    Ok(LittleEndian::read_u16(&buf[at..]))
}

/// Read a little-endian u32 at `at`.
#[inline]
pub fn read_u32(buf: &[u8], at: usize) -> Result<u32> {
    check(buf, at, 4)?;
    Ok(LittleEndian::read_u32(&buf[at..]))
}

/// Read a little-endian u64 at `at`.
#[inline]
pub fn read_u64(buf: &[u8], at: usize) -> Result<u64> {
    check(buf, at, 8)?;
    Ok(LittleEndian::read_u64(&buf[at..]))
}

/// Read an i8 at `at`.
#[inline]
pub fn read_i8(buf: &[u8], at: usize) -> Result<i8> {
    Ok(read_u8(buf, at)? as i8)
}

/// Read a little-endian i16 at `at`.
#[inline]
pub fn read_i16(buf: &[u8], at: usize) -> Result<i16> {
    Ok(read_u16(buf, at)? as i16)
}

/// Read a little-endian i32 at `at`.
#[inline]
pub fn read_i32(buf: &[u8], at: usize) -> Result<i32> {
    Ok(read_u32(buf, at)? as i32)
}

/// Read a little-endian i64 at `at`.
#[inline]
pub fn read_i64(buf: &[u8], at: usize) -> Result<i64> {
    Ok(read_u64(buf, at)? as i64)
}

/// Read an f32 at `at` from its exact bit pattern.
#[inline]
pub fn read_f32(buf: &[u8], at: usize) -> Result<f32> {
    Ok(f32::from_bits(read_u32(buf, at)?))
}

/// Read an f64 at `at` from its exact bit pattern.
#[inline]
pub fn read_f64(buf: &[u8], at: usize) -> Result<f64> {
    Ok(f64::from_bits(read_u64(buf, at)?))
}

/// Read a bool at `at`; only `0x00` and `0x01` are accepted.
#[inline]
pub fn read_bool(buf: &[u8], at: usize) -> Result<bool> {
    match read_u8(buf, at)? {
        0x00 => Ok(false),
        0x01 => Ok(true),
        other => Err(BareError::decoding(format!(
            "invalid bool byte 0x{:02x}",
            other
        ))),
    }
}

/// Write a u8 at `at`.
#[inline]
pub fn write_u8(buf: &mut [u8], at: usize, value: u8) -> Result<()> {
    check(buf, at, 1)?;
    buf[at] = value;
    Ok(())
}

/// Write a little-endian u16 at `at`.
#[inline]
pub fn write_u16(buf: &mut [u8], at: usize, value: u16) -> Result<()> {
    check(buf, at, 2)?;
    LittleEndian::write_u16(&mut buf[at..], value);
    Ok(())
}

/// Write a little-endian u32 at `at`.
#[inline]
pub fn write_u32(buf: &mut [u8], at: usize, value: u32) -> Result<()> {
    check(buf, at, 4)?;
    LittleEndian::write_u32(&mut buf[at..], value);
    Ok(())
}

/// Write a little-endian u64 at `at`.
#[inline]
pub fn write_u64(buf: &mut [u8], at: usize, value: u64) -> Result<()> {
    check(buf, at, 8)?;
    LittleEndian::write_u64(&mut buf[at..], value);
    Ok(())
}

/// Write an i8 at `at`.
#[inline]
pub fn write_i8(buf: &mut [u8], at: usize, value: i8) -> Result<()> {
    write_u8(buf, at, value as u8)
}

/// Write a little-endian i16 at `at`.
#[inline]
pub fn write_i16(buf: &mut [u8], at: usize, value: i16) -> Result<()> {
    write_u16(buf, at, value as u16)
}

/// Write a little-endian i32 at `at`.
#[inline]
pub fn write_i32(buf: &mut [u8], at: usize, value: i32) -> Result<()> {
    write_u32(buf, at, value as u32)
}

/// Write a little-endian i64 at `at`.
#[inline]
pub fn write_i64(buf: &mut [u8], at: usize, value: i64) -> Result<()> {
    write_u64(buf, at, value as u64)
}

/// Write an f32 at `at` as its exact bit pattern.
#[inline]
pub fn write_f32(buf: &mut [u8], at: usize, value: f32) -> Result<()> {
    write_u32(buf, at, value.to_bits())
}

/// Write an f64 at `at` as its exact bit pattern.
#[inline]
pub fn write_f64(buf: &mut [u8], at: usize, value: f64) -> Result<()> {
    write_u64(buf, at, value.to_bits())
}

/// Write a bool at `at` as `0x00` or `0x01`.
#[inline]
pub fn write_bool(buf: &mut [u8], at: usize, value: bool) -> Result<()> {
    write_u8(buf, at, u8::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_little_endian_bytes() {
        let mut buf = [0u8; 4];
        write_u32(&mut buf, 0, 0x1234_5678).unwrap();
        assert_eq!(buf, [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(read_u32(&buf, 0).unwrap(), 0x1234_5678);
    }

    #[test]
    fn integer_round_trips_at_extremes() {
        let mut buf = [0u8; 8];
        for v in [0u16, 1, 0x7fff, 0x8000, u16::MAX] {
            write_u16(&mut buf, 0, v).unwrap();
            assert_eq!(read_u16(&buf, 0).unwrap(), v);
        }
        for v in [i32::MIN, -1, 0, 1, i32::MAX] {
            write_i32(&mut buf, 0, v).unwrap();
            assert_eq!(read_i32(&buf, 0).unwrap(), v);
        }
        for v in [u64::MAX, 0, 0x0102_0304_0506_0708] {
            write_u64(&mut buf, 0, v).unwrap();
            assert_eq!(read_u64(&buf, 0).unwrap(), v);
        }
        for v in [i64::MIN, i64::MAX, -1] {
            write_i64(&mut buf, 0, v).unwrap();
            assert_eq!(read_i64(&buf, 0).unwrap(), v);
        }
    }

    #[test]
    fn reads_at_nonzero_index_do_not_advance() {
        let mut buf = [0u8; 12];
        write_u32(&mut buf, 3, 0xdead_beef).unwrap();
        assert_eq!(read_u32(&buf, 3).unwrap(), 0xdead_beef);
        // Surrounding bytes untouched.
        assert_eq!(buf[0..3], [0, 0, 0]);
        assert_eq!(buf[7..], [0, 0, 0, 0, 0]);
    }

    #[test]
    fn float_bit_patterns_round_trip_exactly() {
        let mut buf = [0u8; 8];
        // Canonical values, signed zero, infinities, subnormals, and NaN
        // payloads must all survive bit-for-bit.
        let patterns32 = [
            0x0000_0000u32, // +0.0
            0x8000_0000,    // -0.0
            0x3f80_0000,    // 1.0
            0x7f80_0000,    // +inf
            0xff80_0000,    // -inf
            0x7fc0_0001,    // quiet NaN with payload
            0x7f80_0001,    // signaling NaN
            0x0000_0001,    // smallest subnormal
        ];
        for bits in patterns32 {
            write_f32(&mut buf, 0, f32::from_bits(bits)).unwrap();
            assert_eq!(read_f32(&buf, 0).unwrap().to_bits(), bits);
        }

        let patterns64 = [
            0x0000_0000_0000_0000u64,
            0x8000_0000_0000_0000,
            0x3ff0_0000_0000_0000, // 1.0
            0x7ff0_0000_0000_0000, // +inf
            0x7ff8_dead_beef_0001, // quiet NaN with payload
            0x7ff0_0000_0000_0001, // signaling NaN
            0x0000_0000_0000_0001, // smallest subnormal
        ];
        for bits in patterns64 {
            write_f64(&mut buf, 0, f64::from_bits(bits)).unwrap();
            assert_eq!(read_f64(&buf, 0).unwrap().to_bits(), bits);
        }
    }

    #[test]
    fn bool_accepts_only_zero_and_one() {
        assert!(!read_bool(&[0x00], 0).unwrap());
        assert!(read_bool(&[0x01], 0).unwrap());

        let err = read_bool(&[0x02], 0).unwrap_err();
        assert_eq!(err.code(), "E101");
    }

    #[test]
    fn out_of_bounds_reads_are_rejected() {
        let buf = [0u8; 3];
        let err = read_u32(&buf, 0).unwrap_err();
        assert_eq!(err.code(), "E202");

        let err = read_u8(&buf, 3).unwrap_err();
        assert_eq!(err.code(), "E202");

        // Offset arithmetic must not wrap.
        let err = read_u64(&buf, usize::MAX).unwrap_err();
        assert_eq!(err.code(), "E202");
    }
}
