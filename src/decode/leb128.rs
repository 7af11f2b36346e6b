//! LEB128 variable-length integer decoding.
//!
//! Each byte contributes 7 bits, low groups first; the high bit is a
//! continuation flag. Overlong encodings (leading `0x80` groups that could
//! fit in fewer bytes) are accepted. The terminating byte is still checked:
//! for unsigned values its unused upper bits must be zero, for signed values
//! they must all equal the sign bit. More than `ceil(N/7)` groups is a
//! decode error, as is running out of input.

use std::io;

use super::cursor::Cursor;

pub fn read_vu32(cursor: &mut Cursor<'_>) -> Result<u32, io::Error> {
    read_vu(cursor, 32).map(|v| v as u32)
}

pub fn read_vu64(cursor: &mut Cursor<'_>) -> Result<u64, io::Error> {
    read_vu(cursor, 64)
}

pub fn read_vs32(cursor: &mut Cursor<'_>) -> Result<i32, io::Error> {
    read_vs(cursor, 32).map(|v| v as i32)
}

pub fn read_vs64(cursor: &mut Cursor<'_>) -> Result<i64, io::Error> {
    read_vs(cursor, 64)
}

fn malformed() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "malformed LEB128 encoding")
}

fn read_vu(cursor: &mut Cursor<'_>, bits: u32) -> Result<u64, io::Error> {
    let max_groups = (bits + 6) / 7;
    let mut result: u64 = 0;

    for group in 0..max_groups {
        let byte = cursor.read_byte()?;
        let low = byte & 0x7f;
        let shift = group * 7;
        result |= u64::from(low) << shift;
        if byte & 0x80 != 0 {
            continue;
        }
        // The unused upper bits of the terminating group must be zero.
        if shift + 7 > bits && low >> (bits - shift) != 0 {
            return Err(malformed());
        }
        return Ok(result);
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "LEB128 encoding exceeds bit width",
    ))
}

fn read_vs(cursor: &mut Cursor<'_>, bits: u32) -> Result<i64, io::Error> {
    let max_groups = (bits + 6) / 7;
    let mut result: i64 = 0;
    let mut shift = 0u32;

    for group in 0..max_groups {
        let byte = cursor.read_byte()?;
        let low = byte & 0x7f;
        result |= i64::from(low).wrapping_shl(shift);
        shift += 7;
        if byte & 0x80 != 0 {
            continue;
        }
        if shift < 64 && byte & 0x40 != 0 {
            result |= -1i64 << shift;
        }
        // The unused upper bits of the terminating group must all equal the
        // sign bit.
        let sign_consistent = if bits == 32 {
            i64::from(result as i32) == result
        } else {
            group < max_groups - 1 || low == 0x00 || low == 0x7f
        };
        if !sign_consistent {
            return Err(malformed());
        }
        return Ok(result);
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "LEB128 encoding exceeds bit width",
    ))
}
