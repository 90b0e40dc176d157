//! Sequential primitive reader over an in-memory byte buffer.
//!
//! The byte order is fixed when the reader is constructed. The only exception
//! is [`ByteReader::read_signature`], which always decodes big-endian so a
//! format can validate its magic value before its body byte order applies.

use thiserror::Error;

/// Raised when a read or seek needs more bytes than the buffer holds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unexpected end of data at offset {offset}: requested {requested} bytes, {available} available")]
pub struct ReadError {
    pub offset: usize,
    pub requested: usize,
    pub available: usize,
}

/// Byte order used for multi-byte reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Cursor over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            pos: 0,
            endian,
        }
    }

    pub fn little_endian(data: &'a [u8]) -> Self {
        Self::new(data, Endian::Little)
    }

    pub fn big_endian(data: &'a [u8]) -> Self {
        Self::new(data, Endian::Big)
    }

    /// Current absolute position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], ReadError> {
        if count > self.remaining() {
            return Err(ReadError {
                offset: self.pos,
                requested: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a 32-bit magic value, always big-endian.
    pub fn read_signature(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Big => i32::from_be_bytes(bytes),
            Endian::Little => i32::from_le_bytes(bytes),
        })
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Big => f32::from_be_bytes(bytes),
            Endian::Little => f32::from_le_bytes(bytes),
        })
    }

    /// Read an IEEE 754 half-precision float, widened to `f32`.
    pub fn read_f16(&mut self) -> Result<f32, ReadError> {
        Ok(half::f16::from_bits(self.read_u16()?).to_f32())
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.take(1)?[0])
    }

    /// Read one byte and scale it into `0.0..=1.0`.
    pub fn read_unorm8(&mut self) -> Result<f32, ReadError> {
        Ok(f32::from(self.read_u8()?) / 255.0)
    }

    /// Read a zero-terminated string. Invalid UTF-8 is replaced, not rejected.
    ///
    /// The terminator is consumed but not included in the result.
    pub fn read_cstring(&mut self) -> Result<String, ReadError> {
        let rest = &self.data[self.pos..];
        let len = rest.iter().position(|&b| b == 0).ok_or(ReadError {
            offset: self.pos,
            requested: rest.len() + 1,
            available: rest.len(),
        })?;
        let bytes = self.take(len)?;
        self.pos += 1;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read exactly `length` bytes as a string, replacing invalid UTF-8.
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String, ReadError> {
        Ok(String::from_utf8_lossy(self.take(length)?).into_owned())
    }

    /// Move the cursor by `delta` bytes, forwards or backwards.
    pub fn seek_relative(&mut self, delta: i64) -> Result<(), ReadError> {
        let target = i64::try_from(self.pos)
            .ok()
            .and_then(|pos| pos.checked_add(delta))
            .and_then(|target| usize::try_from(target).ok());
        match target {
            Some(target) => self.seek_absolute(target),
            None => Err(ReadError {
                offset: self.pos,
                requested: delta.unsigned_abs() as usize,
                available: if delta < 0 { self.pos } else { self.remaining() },
            }),
        }
    }

    /// Move the cursor to an absolute position. The end of the buffer is a valid target.
    pub fn seek_absolute(&mut self, position: usize) -> Result<(), ReadError> {
        if position > self.data.len() {
            return Err(ReadError {
                offset: self.pos,
                requested: position - self.pos,
                available: self.remaining(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Skip `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<(), ReadError> {
        self.take(count).map(|_| ())
    }
}
