//! WebAssembly value representation

use std::fmt;

/// An untagged 64-bit value cell.
///
/// One cell represents any of the four MVP value types; the instruction
/// being executed decides which view to take. Validation guarantees every
/// view matches the type that was stored, so the cell carries no tag.
///
/// Writing a 32-bit view zeroes the upper 32 bits, so the `i64` view of a
/// freshly pushed `i32` is the zero-extended value.
#[derive(Clone, Copy, Default)]
pub struct Value(u64);

impl Value {
    /// The low 32 bits, sign-interpreted.
    pub fn as_i32(self) -> i32 {
        self.0 as u32 as i32
    }

    /// The low 32 bits.
    pub fn as_u32(self) -> u32 {
        self.0 as u32
    }

    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// The low 32 bits reinterpreted as a float.
    pub fn as_f32(self) -> f32 {
        f32::from_bits(self.0 as u32)
    }

    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value(u64::from(v as u32))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Value {
        Value(u64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value(v as u64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Value {
        Value(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Value {
        Value(u64::from(v.to_bits()))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value(v.to_bits())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value(u64::from(v))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value(0x{:016x})", self.0)
    }
}
