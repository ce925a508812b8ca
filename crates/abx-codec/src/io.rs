//! Primitive binary I/O for the ABX wire format.
//!
//! [`DataOutput`] owns the interned-string pool on the write side;
//! [`DataInput`] rebuilds the same pool on the read side and supports a
//! one-byte peek so the deserializer can detect the end of an attribute run.

use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::{AbxError, AbxResult};
use crate::token::{INTERN_NEW, MAX_LENGTH};

const INITIAL_POOL_CAPACITY: usize = 64;

pub struct DataOutput<W: Write> {
    writer: W,
    pool: HashMap<String, u16>,
    interned: Vec<String>,
}

impl<W: Write> DataOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pool: HashMap::with_capacity(INITIAL_POOL_CAPACITY),
            interned: Vec::with_capacity(INITIAL_POOL_CAPACITY),
        }
    }

    pub fn write_byte(&mut self, value: u8) -> AbxResult<()> {
        self.writer.write_all(&[value])?;
        Ok(())
    }

    pub fn write_short(&mut self, value: u16) -> AbxResult<()> {
        self.writer.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_int(&mut self, value: i32) -> AbxResult<()> {
        self.writer.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_long(&mut self, value: i64) -> AbxResult<()> {
        self.writer.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_float(&mut self, value: f32) -> AbxResult<()> {
        self.writer.write_all(&value.to_bits().to_be_bytes())?;
        Ok(())
    }

    pub fn write_double(&mut self, value: f64) -> AbxResult<()> {
        self.writer.write_all(&value.to_bits().to_be_bytes())?;
        Ok(())
    }

    /// Length-prefixed UTF-8 string.
    pub fn write_utf(&mut self, s: &str) -> AbxResult<()> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_LENGTH {
            return Err(AbxError::StringTooLong { len: bytes.len() });
        }
        self.write_short(bytes.len() as u16)?;
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Pool-interned string: an index for repeats, inline for first use.
    ///
    /// Indices stop at `INTERN_NEW - 1`; once the pool is full, new strings
    /// are emitted inline every time instead of wrapping into bogus indices.
    pub fn write_interned_utf(&mut self, s: &str) -> AbxResult<()> {
        if let Some(&index) = self.pool.get(s) {
            self.write_short(index)?;
        } else {
            self.write_short(INTERN_NEW)?;
            self.write_utf(s)?;
            if self.interned.len() < INTERN_NEW as usize {
                let index = self.interned.len() as u16;
                self.pool.insert(s.to_string(), index);
                self.interned.push(s.to_string());
            }
        }
        Ok(())
    }

    pub fn write_raw(&mut self, data: &[u8]) -> AbxResult<()> {
        self.writer.write_all(data)?;
        Ok(())
    }

    pub fn flush(&mut self) -> AbxResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct DataInput<R: Read> {
    reader: R,
    interned: Vec<String>,
    peeked: Option<u8>,
}

impl<R: Read> DataInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            interned: Vec::with_capacity(INITIAL_POOL_CAPACITY),
            peeked: None,
        }
    }

    pub fn read_byte(&mut self) -> AbxResult<u8> {
        if let Some(byte) = self.peeked.take() {
            return Ok(byte);
        }
        let mut buf = [0u8; 1];
        self.reader
            .read_exact(&mut buf)
            .map_err(|_| AbxError::UnexpectedEof("byte"))?;
        Ok(buf[0])
    }

    pub fn peek_byte(&mut self) -> AbxResult<u8> {
        if let Some(byte) = self.peeked {
            return Ok(byte);
        }
        let byte = self.read_byte()?;
        self.peeked = Some(byte);
        Ok(byte)
    }

    fn read_exact_into(&mut self, buf: &mut [u8], what: &'static str) -> AbxResult<()> {
        let start = if let Some(byte) = self.peeked.take() {
            buf[0] = byte;
            1
        } else {
            0
        };
        self.reader
            .read_exact(&mut buf[start..])
            .map_err(|_| AbxError::UnexpectedEof(what))?;
        Ok(())
    }

    pub fn read_short(&mut self) -> AbxResult<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_into(&mut buf, "short")?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_int(&mut self) -> AbxResult<i32> {
        let mut buf = [0u8; 4];
        self.read_exact_into(&mut buf, "int")?;
        Ok(i32::from_be_bytes(buf))
    }

    pub fn read_long(&mut self) -> AbxResult<i64> {
        let mut buf = [0u8; 8];
        self.read_exact_into(&mut buf, "long")?;
        Ok(i64::from_be_bytes(buf))
    }

    pub fn read_float(&mut self) -> AbxResult<f32> {
        Ok(f32::from_bits(self.read_int()? as u32))
    }

    pub fn read_double(&mut self) -> AbxResult<f64> {
        Ok(f64::from_bits(self.read_long()? as u64))
    }

    pub fn read_utf(&mut self) -> AbxResult<String> {
        let length = self.read_short()?;
        let mut buf = vec![0u8; length as usize];
        if length > 0 {
            self.read_exact_into(&mut buf, "UTF string")?;
        }
        String::from_utf8(buf).map_err(|e| AbxError::Utf8(e.utf8_error()))
    }

    pub fn read_interned_utf(&mut self) -> AbxResult<String> {
        let index = self.read_short()?;
        if index == INTERN_NEW {
            let s = self.read_utf()?;
            self.interned.push(s.clone());
            Ok(s)
        } else {
            self.interned
                .get(index as usize)
                .cloned()
                .ok_or(AbxError::InvalidInternedIndex(index))
        }
    }

    pub fn read_bytes(&mut self, length: u16) -> AbxResult<Vec<u8>> {
        let mut buf = vec![0u8; length as usize];
        if length > 0 {
            self.read_exact_into(&mut buf, "bytes")?;
        }
        Ok(buf)
    }
}
