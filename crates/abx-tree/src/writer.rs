//! Serialize an [`Element`] tree back to XML text.
//!
//! Two forms: [`write_xml`] emits the tree exactly (text and tails verbatim,
//! no added whitespace); [`write_xml_pretty`] emits an indented rendition for
//! generated documents and human inspection.

use std::borrow::Cow;
use std::io::Write;

use crate::element::Element;
use crate::error::ParseResult;

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Escape the five XML entities in text or attribute content.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text
        .bytes()
        .any(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\''))
    {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Write the tree verbatim: text and tail content exactly as stored.
pub fn write_xml<W: Write>(root: &Element, mut writer: W) -> ParseResult<()> {
    writer.write_all(DECLARATION.as_bytes())?;
    write_element(root, &mut writer)?;
    Ok(())
}

/// Write the tree with two-space indentation, one element per line.
///
/// Tails are dropped and text is emitted inline, so the pretty form is only
/// semantically faithful for trees without mixed content (generated documents
/// never have any).
pub fn write_xml_pretty<W: Write>(root: &Element, mut writer: W) -> ParseResult<()> {
    writer.write_all(DECLARATION.as_bytes())?;
    writer.write_all(b"\n")?;
    write_element_pretty(root, &mut writer, 0)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Pretty-print to an owned string.
pub fn xml_to_string_pretty(root: &Element) -> ParseResult<String> {
    let mut buf = Vec::new();
    write_xml_pretty(root, &mut buf)?;
    // The writer only ever emits UTF-8.
    Ok(String::from_utf8(buf).expect("writer produced invalid UTF-8"))
}

fn write_open_tag<W: Write>(el: &Element, writer: &mut W, self_close: bool) -> ParseResult<()> {
    writer.write_all(b"<")?;
    writer.write_all(el.tag.as_bytes())?;
    for (name, value) in &el.attributes {
        writer.write_all(b" ")?;
        writer.write_all(name.as_bytes())?;
        writer.write_all(b"=\"")?;
        writer.write_all(escape_xml(value).as_bytes())?;
        writer.write_all(b"\"")?;
    }
    writer.write_all(if self_close { b"/>" } else { b">" })?;
    Ok(())
}

fn write_element<W: Write>(el: &Element, writer: &mut W) -> ParseResult<()> {
    let empty = el.children.is_empty() && el.text.is_none();
    write_open_tag(el, writer, empty)?;
    if !empty {
        if let Some(text) = &el.text {
            writer.write_all(escape_xml(text).as_bytes())?;
        }
        for child in &el.children {
            write_element(child, writer)?;
        }
        writer.write_all(b"</")?;
        writer.write_all(el.tag.as_bytes())?;
        writer.write_all(b">")?;
    }
    if let Some(tail) = &el.tail {
        writer.write_all(escape_xml(tail).as_bytes())?;
    }
    Ok(())
}

fn write_element_pretty<W: Write>(el: &Element, writer: &mut W, depth: usize) -> ParseResult<()> {
    let indent = "  ".repeat(depth);
    writer.write_all(indent.as_bytes())?;

    if el.children.is_empty() && el.text.is_none() {
        write_open_tag(el, writer, true)?;
        return Ok(());
    }

    write_open_tag(el, writer, false)?;
    if let Some(text) = &el.text {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            writer.write_all(escape_xml(trimmed).as_bytes())?;
        }
    }
    if !el.children.is_empty() {
        for child in &el.children {
            writer.write_all(b"\n")?;
            write_element_pretty(child, writer, depth + 1)?;
        }
        writer.write_all(b"\n")?;
        writer.write_all(indent.as_bytes())?;
    }
    writer.write_all(b"</")?;
    writer.write_all(el.tag.as_bytes())?;
    writer.write_all(b">")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn verbatim_preserves_text_and_tail() {
        let input = "<a>before<b/>after</a>";
        let el = parse_str(input).unwrap();
        let mut out = Vec::new();
        write_xml(&el, &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert_eq!(xml, format!("{DECLARATION}{input}"));
    }

    #[test]
    fn verbatim_escapes_entities() {
        let el = Element::new("m").with_attr("v", "a&b").with_text("x < y");
        let mut out = Vec::new();
        write_xml(&el, &mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("v=\"a&amp;b\""));
        assert!(xml.contains(">x &lt; y<"));
    }

    #[test]
    fn pretty_output_reparses_to_equal_structure() {
        let el = Element::new("order")
            .with_attr("id", "7")
            .with_child(Element::new("item").with_text("widget"))
            .with_child(Element::new("item").with_text("gadget"));

        let pretty = xml_to_string_pretty(&el).unwrap();
        let reparsed = parse_str(&pretty).unwrap();

        assert_eq!(reparsed.tag, "order");
        assert_eq!(reparsed.attr("id"), Some("7"));
        assert_eq!(reparsed.children.len(), 2);
        assert_eq!(reparsed.children[0].text.as_deref(), Some("widget"));
    }

    #[test]
    fn pretty_indents_nested_elements() {
        let el = Element::new("a").with_child(Element::new("b").with_child(Element::new("c")));
        let pretty = xml_to_string_pretty(&el).unwrap();
        assert!(pretty.contains("\n  <b>"));
        assert!(pretty.contains("\n    <c/>"));
    }

    #[test]
    fn escape_passthrough_borrows() {
        assert!(matches!(escape_xml("plain text"), Cow::Borrowed(_)));
        assert_eq!(escape_xml("a\"b"), "a&quot;b");
    }
}
