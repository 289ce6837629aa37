//! Bounds-checked cursor over one encoded row.
//!
//! [`RowReader`] is handed to each column codec's `read` in turn. Every read
//! validates that the bytes are present inside the row before consuming them;
//! running off the end of the row is a fatal [`DecodeError::UnexpectedEnd`].

use crate::decoder::DecodeError;
use crate::varint;

/// Cursor over the bytes of a single row.
#[derive(Debug, Clone)]
pub struct RowReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> RowReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset from the start of the row.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left unread.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consumes `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.position,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    /// Consumes exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Reads a strict boolean byte (`0` or `1`).
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let offset = self.position;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(DecodeError::InvalidBool { offset, byte }),
        }
    }

    pub fn read_varint_u32(&mut self) -> Result<u32, DecodeError> {
        let offset = self.position;
        let (value, read) = varint::read_u32(&self.data[self.position..])
            .map_err(|source| DecodeError::Varint { offset, source })?;
        self.position += read;
        Ok(value)
    }

    pub fn read_varint_u64(&mut self) -> Result<u64, DecodeError> {
        let offset = self.position;
        let (value, read) = varint::read_u64(&self.data[self.position..])
            .map_err(|source| DecodeError::Varint { offset, source })?;
        self.position += read;
        Ok(value)
    }

    /// Reads a varint byte length followed by that many UTF-8 bytes.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_varint_u32()? as usize;
        let offset = self.position;
        let bytes = self.read_bytes(len)?;
        core::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    /// Reads one UTF-8 encoded scalar value (1 to 4 bytes).
    pub fn read_char(&mut self) -> Result<char, DecodeError> {
        let offset = self.position;
        let lead = *self.data.get(self.position).ok_or(DecodeError::UnexpectedEnd {
            offset,
            needed: 1,
            remaining: 0,
        })?;
        let width = match lead {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(DecodeError::InvalidUtf8 { offset }),
        };
        let bytes = self.read_bytes(width)?;
        core::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or(DecodeError::InvalidUtf8 { offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_primitives() {
        let data = [0x01, 0x02, 0x00, 0x00, 0x48, 0x41];
        let mut reader = RowReader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x0201);
        assert_eq!(reader.read_u16().unwrap(), 0);
        assert_eq!(reader.read_u16().unwrap(), 0x4148);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_past_end_is_unexpected_end() {
        let data = [0x00, 0x00];
        let mut reader = RowReader::new(&data);
        let err = reader.read_f32().unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedEnd {
                offset: 0,
                needed: 4,
                remaining: 2
            }
        );
        // A failed read does not move the cursor.
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn reads_prefixed_string() {
        let data = [5, b'S', b'c', b'o', b'u', b't'];
        let mut reader = RowReader::new(&data);
        assert_eq!(reader.read_string().unwrap(), "Scout");
        assert!(reader.is_empty());
    }

    #[test]
    fn string_length_past_end_fails() {
        let data = [9, b'a', b'b'];
        let mut reader = RowReader::new(&data);
        assert!(matches!(
            reader.read_string(),
            Err(DecodeError::UnexpectedEnd { needed: 9, .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let data = [2, 0xC3, 0x28];
        let mut reader = RowReader::new(&data);
        assert_eq!(reader.read_string(), Err(DecodeError::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn reads_multibyte_char() {
        let mut buf = [0u8; 4];
        let encoded = 'é'.encode_utf8(&mut buf).as_bytes().to_vec();
        let mut reader = RowReader::new(&encoded);
        assert_eq!(reader.read_char().unwrap(), 'é');
        assert!(reader.is_empty());
    }

    #[test]
    fn bool_must_be_zero_or_one() {
        let mut reader = RowReader::new(&[1, 0, 2]);
        assert!(reader.read_bool().unwrap());
        assert!(!reader.read_bool().unwrap());
        assert_eq!(
            reader.read_bool(),
            Err(DecodeError::InvalidBool { offset: 2, byte: 2 })
        );
    }
}
