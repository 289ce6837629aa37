//! Base-128 variable-length integers.
//!
//! Each byte carries seven value bits, least significant group first. The high
//! bit is set on every byte except the last:
//!
//! | Value        | Encoding           |
//! |--------------|--------------------|
//! | 0            | `[0x00]`           |
//! | 127          | `[0x7F]`           |
//! | 128          | `[0x80, 0x01]`     |
//! | 300          | `[0xAC, 0x02]`     |
//! | `u32::MAX`   | `[0xFF; 4] ++ [0x0F]` |
//!
//! Signed columns are written as the two's-complement bit pattern of the value,
//! so a negative `i32` always takes five bytes and a negative `i64` ten.
//!
//! Used for row length prefixes, string length prefixes and the `int`, `uint`,
//! `long`, `ulong` and `id` column types.

/// Maximum encoded length of a 32-bit varint.
pub const MAX_LEN_U32: usize = 5;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_LEN_U64: usize = 10;

/// Errors raised while decoding a varint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VarintError {
    /// The buffer ended while the continuation bit was still set.
    #[error("varint truncated after {read} bytes")]
    Truncated { read: usize },

    /// The encoded value does not fit the requested width.
    #[error("varint overflows {bits} bits")]
    Overflow { bits: u32 },
}

/// Number of bytes `value` occupies once encoded.
pub fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Appends `value` to `buf`.
pub fn write_u64(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Appends `value` to `buf`.
#[inline]
pub fn write_u32(buf: &mut Vec<u8>, value: u32) {
    write_u64(buf, u64::from(value));
}

/// Decodes a 32-bit varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_u32(buf: &[u8]) -> Result<(u32, usize), VarintError> {
    let mut value = 0u32;
    let mut shift = 0u32;

    for (i, &byte) in buf.iter().enumerate() {
        // Fifth byte holds the top four bits and must terminate.
        if shift == 28 && byte > 0x0F {
            return Err(VarintError::Overflow { bits: 32 });
        }

        value |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    Err(VarintError::Truncated { read: buf.len() })
}

/// Decodes a 64-bit varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_u64(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in buf.iter().enumerate() {
        // Tenth byte holds the top bit and must terminate.
        if shift == 63 && byte > 0x01 {
            return Err(VarintError::Overflow { bits: 64 });
        }

        value |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    Err(VarintError::Truncated { read: buf.len() })
}
