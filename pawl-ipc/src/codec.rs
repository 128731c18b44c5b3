//! Binary wire primitives
//!
//! Strings are length-prefixed with a 7-bit varint byte count followed by
//! UTF-8 bytes; booleans are one byte; integers are 32-bit little-endian;
//! collections are an `i32` count followed by that many entries. These match
//! at both ends by construction; there is no self-description on the wire.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::WireError;

/// Longest legal varint length prefix (5 bytes covers a u32)
const MAX_VARINT_BYTES: usize = 5;

/// Sequential writer for wire values
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length-prefixed UTF-8 string
    pub fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as u32);
        self.buf.put_slice(value.as_bytes());
    }

    /// Absent strings encode as empty; the distinction does not survive the
    /// wire.
    pub fn write_opt_string(&mut self, value: Option<&str>) {
        self.write_string(value.unwrap_or(""));
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    /// Collection count, encoded as `i32`
    pub fn write_count(&mut self, count: usize) -> Result<(), WireError> {
        let count = i32::try_from(count).map_err(|_| WireError::CollectionTooLarge(count))?;
        self.write_i32(count);
        Ok(())
    }

    fn write_varint(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.put_u8(byte);
                return;
            }
            self.buf.put_u8(byte | 0x80);
        }
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Sequential reader for wire values
#[derive(Debug)]
pub struct WireReader {
    buf: Bytes,
}

impl WireReader {
    pub fn new(bytes: Bytes) -> Self {
        Self { buf: bytes }
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(bytes))
    }

    pub fn read_string(&mut self) -> Result<String, WireError> {
        let len = self.read_varint()? as usize;
        if self.buf.remaining() < len {
            return Err(WireError::UnexpectedEof);
        }
        let raw = self.buf.split_to(len);
        String::from_utf8(raw.to_vec()).map_err(|_| WireError::InvalidUtf8)
    }

    /// Empty strings read back as `None`; see [`WireWriter::write_opt_string`]
    pub fn read_opt_string(&mut self) -> Result<Option<String>, WireError> {
        let value = self.read_string()?;
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    /// Any nonzero byte reads as true
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        if self.buf.remaining() < 1 {
            return Err(WireError::UnexpectedEof);
        }
        Ok(self.buf.get_u8())
    }

    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        if self.buf.remaining() < 4 {
            return Err(WireError::UnexpectedEof);
        }
        Ok(self.buf.get_i32_le())
    }

    pub fn read_count(&mut self) -> Result<usize, WireError> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| WireError::NegativeCount(count))
    }

    fn read_varint(&mut self) -> Result<u32, WireError> {
        let mut value = 0u32;
        let mut shift = 0;
        for _ in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
        Err(WireError::LengthOverflow)
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }
}
