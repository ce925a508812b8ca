//! XML-to-ABX serialization.
//!
//! [`AbxSerializer`] is the low-level token writer; [`encode_str`] and
//! [`encode_file`] stream quick-xml events into it. Attribute values are
//! type-detected on the way in: `true`/`false` become boolean tokens, short
//! space-free values are interned, everything else is a plain string.

use std::io::Write;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

use crate::error::{AbxError, AbxResult};
use crate::io::DataOutput;
use crate::token::*;

/// Values below this length without spaces go to the interned pool.
const INTERN_VALUE_LIMIT: usize = 50;

#[derive(Clone, Copy, Debug)]
pub struct EncodeOptions {
    /// Emit whitespace-only text as IGNORABLE_WHITESPACE tokens instead of
    /// dropping it.
    pub preserve_whitespace: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            preserve_whitespace: true,
        }
    }
}

/// Low-level ABX token writer.
pub struct AbxSerializer<W: Write> {
    out: DataOutput<W>,
}

impl<W: Write> AbxSerializer<W> {
    /// Create a serializer and emit the magic header.
    pub fn new(writer: W) -> AbxResult<Self> {
        let mut out = DataOutput::new(writer);
        out.write_raw(&MAGIC)?;
        Ok(Self { out })
    }

    fn write_text_token(&mut self, event: u8, text: &str) -> AbxResult<()> {
        self.out.write_byte(event | TYPE_STRING)?;
        self.out.write_utf(text)
    }

    pub fn start_document(&mut self) -> AbxResult<()> {
        self.out.write_byte(START_DOCUMENT | TYPE_NULL)
    }

    pub fn end_document(&mut self) -> AbxResult<()> {
        self.out.write_byte(END_DOCUMENT | TYPE_NULL)?;
        self.out.flush()
    }

    pub fn start_tag(&mut self, name: &str) -> AbxResult<()> {
        self.out.write_byte(START_TAG | TYPE_STRING_INTERNED)?;
        self.out.write_interned_utf(name)
    }

    pub fn end_tag(&mut self, name: &str) -> AbxResult<()> {
        self.out.write_byte(END_TAG | TYPE_STRING_INTERNED)?;
        self.out.write_interned_utf(name)
    }

    pub fn attribute(&mut self, name: &str, value: &str) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_STRING)?;
        self.out.write_interned_utf(name)?;
        self.out.write_utf(value)
    }

    pub fn attribute_interned(&mut self, name: &str, value: &str) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_STRING_INTERNED)?;
        self.out.write_interned_utf(name)?;
        self.out.write_interned_utf(value)
    }

    pub fn attribute_boolean(&mut self, name: &str, value: bool) -> AbxResult<()> {
        let type_bits = if value {
            TYPE_BOOLEAN_TRUE
        } else {
            TYPE_BOOLEAN_FALSE
        };
        self.out.write_byte(ATTRIBUTE | type_bits)?;
        self.out.write_interned_utf(name)
    }

    pub fn attribute_int(&mut self, name: &str, value: i32) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_INT)?;
        self.out.write_interned_utf(name)?;
        self.out.write_int(value)
    }

    pub fn attribute_int_hex(&mut self, name: &str, value: i32) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_INT_HEX)?;
        self.out.write_interned_utf(name)?;
        self.out.write_int(value)
    }

    pub fn attribute_long(&mut self, name: &str, value: i64) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_LONG)?;
        self.out.write_interned_utf(name)?;
        self.out.write_long(value)
    }

    pub fn attribute_long_hex(&mut self, name: &str, value: i64) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_LONG_HEX)?;
        self.out.write_interned_utf(name)?;
        self.out.write_long(value)
    }

    pub fn attribute_float(&mut self, name: &str, value: f32) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_FLOAT)?;
        self.out.write_interned_utf(name)?;
        self.out.write_float(value)
    }

    pub fn attribute_double(&mut self, name: &str, value: f64) -> AbxResult<()> {
        self.out.write_byte(ATTRIBUTE | TYPE_DOUBLE)?;
        self.out.write_interned_utf(name)?;
        self.out.write_double(value)
    }

    pub fn attribute_bytes_hex(&mut self, name: &str, value: &[u8]) -> AbxResult<()> {
        if value.len() > MAX_LENGTH {
            return Err(AbxError::BytesTooLong { len: value.len() });
        }
        self.out.write_byte(ATTRIBUTE | TYPE_BYTES_HEX)?;
        self.out.write_interned_utf(name)?;
        self.out.write_short(value.len() as u16)?;
        self.out.write_raw(value)
    }

    pub fn attribute_bytes_base64(&mut self, name: &str, value: &[u8]) -> AbxResult<()> {
        if value.len() > MAX_LENGTH {
            return Err(AbxError::BytesTooLong { len: value.len() });
        }
        self.out.write_byte(ATTRIBUTE | TYPE_BYTES_BASE64)?;
        self.out.write_interned_utf(name)?;
        self.out.write_short(value.len() as u16)?;
        self.out.write_raw(value)
    }

    pub fn text(&mut self, text: &str) -> AbxResult<()> {
        self.write_text_token(TEXT, text)
    }

    pub fn cdata(&mut self, text: &str) -> AbxResult<()> {
        self.write_text_token(CDSECT, text)
    }

    pub fn comment(&mut self, text: &str) -> AbxResult<()> {
        self.write_text_token(COMMENT, text)
    }

    pub fn processing_instruction(&mut self, target: &str, data: Option<&str>) -> AbxResult<()> {
        let full = match data {
            Some(data) if !data.is_empty() => format!("{target} {data}"),
            _ => target.to_string(),
        };
        self.write_text_token(PROCESSING_INSTRUCTION, &full)
    }

    pub fn docdecl(&mut self, text: &str) -> AbxResult<()> {
        self.write_text_token(DOCDECL, text)
    }

    /// Unresolved entity reference, stored by name (without `&` and `;`).
    pub fn entity_ref(&mut self, name: &str) -> AbxResult<()> {
        self.write_text_token(ENTITY_REF, name)
    }

    pub fn ignorable_whitespace(&mut self, text: &str) -> AbxResult<()> {
        self.write_text_token(IGNORABLE_WHITESPACE, text)
    }
}

/// Encode an XML document from a string into ABX.
pub fn encode_str<W: Write>(xml: &str, writer: W, options: EncodeOptions) -> AbxResult<()> {
    let mut reader = Reader::from_str(xml);
    let mut serializer = AbxSerializer::new(writer)?;
    serializer.start_document()?;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                warn_on_namespaced_tag(&name);
                serializer.start_tag(&name)?;
                write_attributes(&mut serializer, &e)?;
            }
            Event::Empty(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                warn_on_namespaced_tag(&name);
                serializer.start_tag(&name)?;
                write_attributes(&mut serializer, &e)?;
                serializer.end_tag(&name)?;
            }
            Event::End(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                serializer.end_tag(&name)?;
            }
            Event::Text(e) => match e.unescape() {
                Ok(text) => write_text(&mut serializer, &text, options)?,
                // Custom entities make unescape fail; split them out as
                // ENTITY_REF tokens and encode the surrounding text normally.
                Err(quick_xml::Error::EscapeError(_)) => {
                    let raw = std::str::from_utf8(&e)?;
                    write_text_with_entity_refs(&mut serializer, raw, options)?;
                }
                Err(e) => return Err(e.into()),
            },
            Event::CData(e) => {
                let text = std::str::from_utf8(&e)?;
                serializer.cdata(text)?;
            }
            Event::Comment(e) => {
                let text = std::str::from_utf8(&e)?;
                serializer.comment(text)?;
            }
            Event::PI(e) => {
                let target = std::str::from_utf8(e.target())?;
                let content = e.content();
                let data = if content.is_empty() {
                    None
                } else {
                    Some(std::str::from_utf8(content)?)
                };
                serializer.processing_instruction(target, data)?;
            }
            Event::Decl(decl) => {
                if let Some(enc) = decl.encoding() {
                    let enc = enc?;
                    let enc = std::str::from_utf8(enc.as_ref())?;
                    if !enc.eq_ignore_ascii_case("utf-8") {
                        warn!(encoding = enc, "non-UTF-8 encoding declared; output is UTF-8");
                    }
                }
            }
            Event::DocType(e) => {
                let text = std::str::from_utf8(&e)?;
                serializer.docdecl(text)?;
            }
            Event::Eof => break,
        }
    }

    serializer.end_document()
}

/// Encode an XML document from a file into ABX.
pub fn encode_file<W: Write>(path: impl AsRef<Path>, writer: W, options: EncodeOptions) -> AbxResult<()> {
    let xml = std::fs::read_to_string(path)?;
    encode_str(&xml, writer, options)
}

fn write_attributes<W: Write>(
    serializer: &mut AbxSerializer<W>,
    e: &quick_xml::events::BytesStart<'_>,
) -> AbxResult<()> {
    for attr in e.attributes() {
        let attr = attr?;
        let name = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?;

        if name.starts_with("xmlns") || name.contains(':') {
            warn!(attribute = %name, "namespace declarations and prefixes are not preserved");
        }

        write_typed_attribute(serializer, &name, &value)?;
    }
    Ok(())
}

/// Pick the most compact wire type the value can round-trip through.
fn write_typed_attribute<W: Write>(
    serializer: &mut AbxSerializer<W>,
    name: &str,
    value: &str,
) -> AbxResult<()> {
    if value == "true" || value == "false" {
        serializer.attribute_boolean(name, value == "true")
    } else if value.len() < INTERN_VALUE_LIMIT && !value.contains(' ') {
        serializer.attribute_interned(name, value)
    } else {
        serializer.attribute(name, value)
    }
}

fn write_text<W: Write>(
    serializer: &mut AbxSerializer<W>,
    text: &str,
    options: EncodeOptions,
) -> AbxResult<()> {
    if is_whitespace_only(text) {
        if options.preserve_whitespace {
            serializer.ignorable_whitespace(text)?;
        }
        Ok(())
    } else {
        serializer.text(text)
    }
}

/// Encode raw text that failed wholesale unescaping. Predefined and numeric
/// references still resolve into the surrounding text; anything else becomes
/// an ENTITY_REF token by name.
fn write_text_with_entity_refs<W: Write>(
    serializer: &mut AbxSerializer<W>,
    raw: &str,
    options: EncodeOptions,
) -> AbxResult<()> {
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        let (before, reference) = rest.split_at(amp);
        if !before.is_empty() {
            write_text(serializer, before, options)?;
        }
        let semi = reference
            .find(';')
            .ok_or_else(|| AbxError::Xml("unterminated entity reference".to_string()))?;
        match quick_xml::escape::unescape(&reference[..=semi]) {
            Ok(resolved) => write_text(serializer, &resolved, options)?,
            Err(_) => serializer.entity_ref(&reference[1..semi])?,
        }
        rest = &reference[semi + 1..];
    }
    if !rest.is_empty() {
        write_text(serializer, rest, options)?;
    }
    Ok(())
}

fn warn_on_namespaced_tag(name: &str) {
    if name.contains(':') {
        warn!(element = %name, "namespace prefixes are not preserved");
    }
}

fn is_whitespace_only(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token;

    fn encode(xml: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_str(xml, &mut buf, EncodeOptions::default()).unwrap();
        buf
    }

    #[test]
    fn output_starts_with_magic_and_start_document() {
        let buf = encode("<a/>");
        assert_eq!(&buf[0..4], &token::MAGIC);
        assert_eq!(buf[4], token::START_DOCUMENT | token::TYPE_NULL);
    }

    #[test]
    fn output_ends_with_end_document() {
        let buf = encode("<a/>");
        assert_eq!(buf[buf.len() - 1], token::END_DOCUMENT | token::TYPE_NULL);
    }

    #[test]
    fn empty_element_emits_start_and_end_tag() {
        let buf = encode("<a/>");
        // magic(4) start_doc(1) then START_TAG token
        assert_eq!(buf[5], token::START_TAG | token::TYPE_STRING_INTERNED);
    }

    #[test]
    fn boolean_attribute_detection() {
        let buf = encode(r#"<a flag="true" off="false"/>"#);
        assert!(buf.contains(&(token::ATTRIBUTE | token::TYPE_BOOLEAN_TRUE)));
        assert!(buf.contains(&(token::ATTRIBUTE | token::TYPE_BOOLEAN_FALSE)));
    }

    #[test]
    fn long_values_are_plain_strings() {
        let long_value = "x".repeat(60);
        let xml = format!(r#"<a v="{long_value}"/>"#);
        let buf = encode(&xml);
        assert!(buf.contains(&(token::ATTRIBUTE | token::TYPE_STRING)));
    }

    #[test]
    fn spaced_values_are_plain_strings() {
        let buf = encode(r#"<a v="two words"/>"#);
        assert!(buf.contains(&(token::ATTRIBUTE | token::TYPE_STRING)));
    }

    #[test]
    fn repeated_tags_shrink_via_interning() {
        let one = encode("<item/>");
        let many = encode("<item><item/><item/><item/></item>");
        // Each repeat costs one tag token + a 2-byte pool index for start and
        // end, far less than re-encoding the name.
        let per_extra = (many.len() - one.len()) / 3;
        assert!(per_extra <= 8, "per-extra cost was {per_extra}");
    }

    #[test]
    fn whitespace_dropped_when_collapsing() {
        let xml = "<a>\n  <b/>\n</a>";
        let preserved = encode(xml);
        let mut collapsed = Vec::new();
        encode_str(
            xml,
            &mut collapsed,
            EncodeOptions {
                preserve_whitespace: false,
            },
        )
        .unwrap();
        assert!(collapsed.len() < preserved.len());
        assert!(!collapsed.contains(&(token::IGNORABLE_WHITESPACE | token::TYPE_STRING)));
    }

    #[test]
    fn custom_entities_become_entity_ref_tokens() {
        let buf = encode("<a>x &copyright; y</a>");
        assert!(buf.contains(&(token::ENTITY_REF | token::TYPE_STRING)));
        let needle = b"copyright";
        assert!(buf.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn predefined_entities_still_resolve_next_to_custom_ones() {
        let buf = encode("<a>a &amp; b &custom; c</a>");
        assert!(buf.contains(&(token::ENTITY_REF | token::TYPE_STRING)));
        let needle = b"a & b ";
        assert!(buf.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn unterminated_entity_is_an_error() {
        let mut buf = Vec::new();
        let err = encode_str("<a>broken &custom</a>", &mut buf, EncodeOptions::default());
        assert!(err.is_err());
    }

    #[test]
    fn entities_are_stored_unescaped() {
        let buf = encode("<a>x &amp; y</a>");
        // The raw text payload holds the literal ampersand, not the entity.
        let needle = b"x & y";
        assert!(buf.windows(needle.len()).any(|w| w == needle));
    }
}
