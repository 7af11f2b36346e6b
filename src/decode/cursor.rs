//! Bounded byte reader over an input buffer.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io;

use super::leb128;

/// A cursor over a borrowed byte slice.
///
/// All reads advance the position. Running off the end of the input is a
/// recoverable failure (`UnexpectedEof`), not a panic.
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Cursor<'a> {
        Cursor { bytes, pos: 0 }
    }

    // Basic operations --------------------------------------------------------

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn has_at_least(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    pub fn skip(&mut self, len: usize) {
        self.pos += len;
    }

    pub fn read_byte(&mut self) -> Result<u8, io::Error> {
        match self.bytes.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no more bytes to read",
            )),
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], io::Error> {
        if !self.has_at_least(len) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "not enough bytes to read",
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    // Fixed-width little-endian reads -----------------------------------------

    pub fn read_u8(&mut self) -> Result<u8, io::Error> {
        self.read_byte()
    }

    pub fn read_u32(&mut self) -> Result<u32, io::Error> {
        let mut rdr = io::Cursor::new(self.read_bytes(4)?);
        rdr.read_u32::<LittleEndian>()
    }

    pub fn read_u64(&mut self) -> Result<u64, io::Error> {
        let mut rdr = io::Cursor::new(self.read_bytes(8)?);
        rdr.read_u64::<LittleEndian>()
    }

    pub fn read_f32(&mut self) -> Result<f32, io::Error> {
        let mut rdr = io::Cursor::new(self.read_bytes(4)?);
        rdr.read_f32::<LittleEndian>()
    }

    pub fn read_f64(&mut self) -> Result<f64, io::Error> {
        let mut rdr = io::Cursor::new(self.read_bytes(8)?);
        rdr.read_f64::<LittleEndian>()
    }

    // LEB128 reads ------------------------------------------------------------

    pub fn read_vu32(&mut self) -> Result<u32, io::Error> {
        leb128::read_vu32(self)
    }

    pub fn read_vu64(&mut self) -> Result<u64, io::Error> {
        leb128::read_vu64(self)
    }

    pub fn read_vs32(&mut self) -> Result<i32, io::Error> {
        leb128::read_vs32(self)
    }

    pub fn read_vs64(&mut self) -> Result<i64, io::Error> {
        leb128::read_vs64(self)
    }
}
