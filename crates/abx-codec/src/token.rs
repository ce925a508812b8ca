//! ABX wire-format constants (binary XML format version 0).
//!
//! Every event in the stream is one token byte: the event kind in the low
//! nibble, type information for the payload in the high nibble. Multi-byte
//! values are big-endian; strings are u16-length-prefixed UTF-8; interned
//! strings are u16 pool indices, with [`INTERN_NEW`] introducing a new entry.

/// Magic header: `"ABX\0"`.
pub const MAGIC: [u8; 4] = [0x41, 0x42, 0x58, 0x00];

// Event kinds (low nibble).
pub const START_DOCUMENT: u8 = 0;
pub const END_DOCUMENT: u8 = 1;
pub const START_TAG: u8 = 2;
pub const END_TAG: u8 = 3;
pub const TEXT: u8 = 4;
pub const CDSECT: u8 = 5;
pub const ENTITY_REF: u8 = 6;
pub const IGNORABLE_WHITESPACE: u8 = 7;
pub const PROCESSING_INSTRUCTION: u8 = 8;
pub const COMMENT: u8 = 9;
pub const DOCDECL: u8 = 10;
pub const ATTRIBUTE: u8 = 15;

// Payload types (high nibble).
pub const TYPE_NULL: u8 = 1 << 4;
pub const TYPE_STRING: u8 = 2 << 4;
pub const TYPE_STRING_INTERNED: u8 = 3 << 4;
pub const TYPE_BYTES_HEX: u8 = 4 << 4;
pub const TYPE_BYTES_BASE64: u8 = 5 << 4;
pub const TYPE_INT: u8 = 6 << 4;
pub const TYPE_INT_HEX: u8 = 7 << 4;
pub const TYPE_LONG: u8 = 8 << 4;
pub const TYPE_LONG_HEX: u8 = 9 << 4;
pub const TYPE_FLOAT: u8 = 10 << 4;
pub const TYPE_DOUBLE: u8 = 11 << 4;
pub const TYPE_BOOLEAN_TRUE: u8 = 12 << 4;
pub const TYPE_BOOLEAN_FALSE: u8 = 13 << 4;

/// Maximum length of a string or byte array (u16 length prefix).
pub const MAX_LENGTH: usize = u16::MAX as usize;

/// Interned-string index marker: a new pool entry follows inline.
pub const INTERN_NEW: u16 = 0xFFFF;

/// Event kind of a token byte.
#[inline]
pub fn event(token: u8) -> u8 {
    token & 0x0F
}

/// Payload type of a token byte.
#[inline]
pub fn type_info(token: u8) -> u8 {
    token & 0xF0
}
