//! ABX-to-XML deserialization.
//!
//! Reads the token stream and writes XML text directly, escaping entities on
//! the way out. Typed attributes are rendered in their canonical text forms:
//! `-1` stays decimal in the hex integer types, whole floats and doubles keep
//! one fractional digit, byte arrays render as hex or base64.

use std::fmt::Write as _;
use std::io::{Read, Write};

use base64::Engine;

use abx_tree::escape_xml;

use crate::error::{AbxError, AbxResult};
use crate::io::DataInput;
use crate::token;

const PROLOGUE: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

struct AbxDeserializer<R: Read, W: Write> {
    input: DataInput<R>,
    out: W,
}

/// Decode an ABX stream, writing the XML text rendition to `writer`.
pub fn decode<R: Read, W: Write>(mut reader: R, writer: W) -> AbxResult<()> {
    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|_| AbxError::UnexpectedEof("magic header"))?;
    if magic != token::MAGIC {
        return Err(AbxError::InvalidMagic {
            expected: token::MAGIC,
            actual: magic,
        });
    }

    let mut de = AbxDeserializer {
        input: DataInput::new(reader),
        out: writer,
    };
    de.run()
}

/// Decode an in-memory ABX buffer to an XML string.
pub fn decode_to_string(data: &[u8]) -> AbxResult<String> {
    let mut out = Vec::new();
    decode(data, &mut out)?;
    String::from_utf8(out).map_err(|e| AbxError::Utf8(e.utf8_error()))
}

impl<R: Read, W: Write> AbxDeserializer<R, W> {
    fn run(&mut self) -> AbxResult<()> {
        self.out.write_all(PROLOGUE)?;
        loop {
            // A stream that simply stops at a token boundary after the last
            // complete event is accepted; truncation inside an event is not.
            let tok = match self.input.read_byte() {
                Ok(tok) => tok,
                Err(AbxError::UnexpectedEof(_)) => break,
                Err(e) => return Err(e),
            };
            if !self.process_token(tok)? {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Handle one event token; returns `false` at END_DOCUMENT.
    fn process_token(&mut self, tok: u8) -> AbxResult<bool> {
        let type_info = token::type_info(tok);

        match token::event(tok) {
            token::START_DOCUMENT => Ok(true),
            token::END_DOCUMENT => Ok(false),
            token::START_TAG => {
                let name = self.input.read_interned_utf()?;
                self.out.write_all(b"<")?;
                self.out.write_all(name.as_bytes())?;

                // Attribute tokens belong to the open tag; anything else
                // closes it.
                while let Ok(next) = self.input.peek_byte() {
                    if token::event(next) != token::ATTRIBUTE {
                        break;
                    }
                    let attr_tok = self.input.read_byte()?;
                    self.process_attribute(attr_tok)?;
                }

                self.out.write_all(b">")?;
                Ok(true)
            }
            token::END_TAG => {
                let name = self.input.read_interned_utf()?;
                self.out.write_all(b"</")?;
                self.out.write_all(name.as_bytes())?;
                self.out.write_all(b">")?;
                Ok(true)
            }
            token::TEXT => {
                if type_info == token::TYPE_STRING {
                    let text = self.input.read_utf()?;
                    if !text.is_empty() {
                        self.out.write_all(escape_xml(&text).as_bytes())?;
                    }
                }
                Ok(true)
            }
            token::CDSECT => {
                if type_info == token::TYPE_STRING {
                    let text = self.input.read_utf()?;
                    self.out.write_all(b"<![CDATA[")?;
                    self.out.write_all(text.as_bytes())?;
                    self.out.write_all(b"]]>")?;
                }
                Ok(true)
            }
            token::COMMENT => {
                if type_info == token::TYPE_STRING {
                    let text = self.input.read_utf()?;
                    self.out.write_all(b"<!--")?;
                    self.out.write_all(text.as_bytes())?;
                    self.out.write_all(b"-->")?;
                }
                Ok(true)
            }
            token::PROCESSING_INSTRUCTION => {
                if type_info == token::TYPE_STRING {
                    let text = self.input.read_utf()?;
                    self.out.write_all(b"<?")?;
                    self.out.write_all(text.as_bytes())?;
                    self.out.write_all(b"?>")?;
                }
                Ok(true)
            }
            token::DOCDECL => {
                if type_info == token::TYPE_STRING {
                    let text = self.input.read_utf()?;
                    self.out.write_all(b"<!DOCTYPE ")?;
                    self.out.write_all(text.as_bytes())?;
                    self.out.write_all(b">")?;
                }
                Ok(true)
            }
            token::ENTITY_REF => {
                if type_info == token::TYPE_STRING {
                    let text = self.input.read_utf()?;
                    self.out.write_all(b"&")?;
                    self.out.write_all(text.as_bytes())?;
                    self.out.write_all(b";")?;
                }
                Ok(true)
            }
            token::IGNORABLE_WHITESPACE => {
                if type_info == token::TYPE_STRING {
                    let text = self.input.read_utf()?;
                    self.out.write_all(text.as_bytes())?;
                }
                Ok(true)
            }
            other => {
                tracing::warn!(token = other, "skipping unknown event token");
                Ok(true)
            }
        }
    }

    fn process_attribute(&mut self, tok: u8) -> AbxResult<()> {
        let name = self.input.read_interned_utf()?;

        self.out.write_all(b" ")?;
        self.out.write_all(name.as_bytes())?;
        self.out.write_all(b"=\"")?;

        let mut value = String::new();
        match token::type_info(tok) {
            token::TYPE_STRING => {
                let s = self.input.read_utf()?;
                value.push_str(&escape_xml(&s));
            }
            token::TYPE_STRING_INTERNED => {
                let s = self.input.read_interned_utf()?;
                value.push_str(&escape_xml(&s));
            }
            token::TYPE_INT => {
                let _ = write!(value, "{}", self.input.read_int()?);
            }
            token::TYPE_INT_HEX => {
                let v = self.input.read_int()?;
                if v == -1 {
                    value.push_str("-1");
                } else {
                    let _ = write!(value, "{:x}", v as u32);
                }
            }
            token::TYPE_LONG => {
                let _ = write!(value, "{}", self.input.read_long()?);
            }
            token::TYPE_LONG_HEX => {
                let v = self.input.read_long()?;
                if v == -1 {
                    value.push_str("-1");
                } else {
                    let _ = write!(value, "{:x}", v as u64);
                }
            }
            token::TYPE_FLOAT => {
                let v = self.input.read_float()?;
                push_decimal(&mut value, v.fract() == 0.0 && v.is_finite(), v);
            }
            token::TYPE_DOUBLE => {
                let v = self.input.read_double()?;
                push_decimal(&mut value, v.fract() == 0.0 && v.is_finite(), v);
            }
            token::TYPE_BOOLEAN_TRUE => value.push_str("true"),
            token::TYPE_BOOLEAN_FALSE => value.push_str("false"),
            token::TYPE_BYTES_HEX => {
                let len = self.input.read_short()?;
                let bytes = self.input.read_bytes(len)?;
                value.push_str(&hex::encode(bytes));
            }
            token::TYPE_BYTES_BASE64 => {
                let len = self.input.read_short()?;
                let bytes = self.input.read_bytes(len)?;
                value.push_str(&base64::engine::general_purpose::STANDARD.encode(bytes));
            }
            other => return Err(AbxError::UnknownAttributeType(other)),
        }

        self.out.write_all(value.as_bytes())?;
        self.out.write_all(b"\"")?;
        Ok(())
    }
}

/// Whole finite values keep one fractional digit (`2` renders as `2.0`).
fn push_decimal<T: std::fmt::Display>(out: &mut String, whole: bool, value: T) {
    if whole {
        let _ = write!(out, "{value:.1}");
    } else {
        let _ = write!(out, "{value}");
    }
}
