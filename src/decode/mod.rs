//! Binary decoding primitives.
//!
//! The binary parser that turns a `.wasm` byte stream into a validated
//! [`Module`](crate::module::Module) lives outside this crate, but it is fed
//! by the primitives here: a bounded [`Cursor`] over raw bytes with
//! fixed-width little-endian reads, and the LEB128 variable-length integer
//! decoders in [`leb128`].
//!
//! Decode failures are `std::io::Error`s: `UnexpectedEof` when the input is
//! exhausted mid-value, `InvalidData` for malformed encodings. They are never
//! raised during execution -- validation has completed by then.

pub mod cursor;
pub mod leb128;

pub use cursor::Cursor;
