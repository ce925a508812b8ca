use thiserror::Error;

use crate::token;

#[derive(Debug, Error)]
pub enum AbxError {
    #[error("invalid ABX magic: expected {expected:02X?}, got {actual:02X?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    #[error("unexpected end of stream while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("invalid interned string index: {0}")]
    InvalidInternedIndex(u16),

    #[error("unknown attribute type: {0:#04x}")]
    UnknownAttributeType(u8),

    #[error("string too long: {len} bytes (max {max})", max = token::MAX_LENGTH)]
    StringTooLong { len: usize },

    #[error("binary value too long: {len} bytes (max {max})", max = token::MAX_LENGTH)]
    BytesTooLong { len: usize },

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("XML syntax error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for AbxError {
    fn from(err: quick_xml::Error) -> Self {
        AbxError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for AbxError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        AbxError::Xml(err.to_string())
    }
}

pub type AbxResult<T> = Result<T, AbxError>;
