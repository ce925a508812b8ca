//! XML document tree model for abxkit.
//!
//! Provides an ElementTree-style document model: each [`Element`] carries a
//! tag, an attribute map, the text before its first child, the tail after its
//! closing tag, and an ordered list of children. The parser builds this model
//! from XML text; the writer serializes it back.
//!
//! # Key Types
//!
//! - [`Element`] — One structural unit of a document
//! - [`parse_str`] / [`parse_file`] — Build an element tree from XML text
//! - [`write_xml`] / [`write_xml_pretty`] — Serialize an element tree
//! - [`ParseError`] — Parse-boundary failures

pub mod element;
pub mod error;
pub mod parser;
pub mod writer;

pub use element::Element;
pub use error::{ParseError, ParseResult};
pub use parser::{parse_file, parse_str};
pub use writer::{escape_xml, write_xml, write_xml_pretty, xml_to_string_pretty};
