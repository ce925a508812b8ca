//! Parse XML text into an [`Element`] tree.
//!
//! Built on quick-xml events. Text and CDATA sections are assembled into the
//! ElementTree text/tail slots; comments, processing instructions, the XML
//! declaration, and DOCTYPE do not appear in the tree.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::element::Element;
use crate::error::{ParseError, ParseResult};

/// Parse a complete XML document from a string.
pub fn parse_str(xml: &str) -> ParseResult<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                stack.push(element_from_start(&e)?);
            }
            Event::Empty(e) => {
                let el = element_from_start(&e)?;
                close_element(&mut stack, &mut root, el)?;
            }
            Event::End(e) => {
                let el = stack.pop().ok_or_else(|| {
                    ParseError::UnexpectedClosingTag(
                        String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    )
                })?;
                close_element(&mut stack, &mut root, el)?;
            }
            Event::Text(e) => {
                let content = e.unescape()?;
                append_content(&mut stack, &content);
            }
            Event::CData(e) => {
                let content = std::str::from_utf8(&e)?.to_string();
                append_content(&mut stack, &content);
            }
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    let root = root.ok_or(ParseError::EmptyDocument)?;
    debug!(elements = root.subtree_size(), "parsed document");
    Ok(root)
}

/// Parse a complete XML document from a file.
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<Element> {
    let xml = std::fs::read_to_string(path)?;
    parse_str(&xml)
}

fn element_from_start(e: &BytesStart<'_>) -> ParseResult<Element> {
    let tag = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut element = Element::new(tag);
    for attr in e.attributes() {
        let attr = attr?;
        let name = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.insert(name, value);
    }
    Ok(element)
}

/// Attach a finished element to its parent, or install it as the root.
/// A second top-level element is malformed: quick-xml does not reject it,
/// so the check lives here.
fn close_element(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    el: Element,
) -> ParseResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_none() => *root = Some(el),
        None => return Err(ParseError::TrailingContent(el.tag)),
    }
    Ok(())
}

/// Route character content to the open element's text or the last closed
/// sibling's tail. Content outside the root element is discarded.
fn append_content(stack: &mut [Element], content: &str) {
    if let Some(top) = stack.last_mut() {
        let slot = match top.children.last_mut() {
            Some(last_child) => &mut last_child.tail,
            None => &mut top.text,
        };
        match slot {
            Some(existing) => existing.push_str(content),
            None => *slot = Some(content.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_element() {
        let el = parse_str(r#"<user id="1" name="ada"/>"#).unwrap();
        assert_eq!(el.tag, "user");
        assert_eq!(el.attr("id"), Some("1"));
        assert_eq!(el.attr("name"), Some("ada"));
        assert!(el.children.is_empty());
        assert!(el.text.is_none());
    }

    #[test]
    fn text_and_tail_assembly() {
        let el = parse_str("<a>before<b/>between<c/>after</a>").unwrap();
        assert_eq!(el.text.as_deref(), Some("before"));
        assert_eq!(el.children[0].tag, "b");
        assert_eq!(el.children[0].tail.as_deref(), Some("between"));
        assert_eq!(el.children[1].tag, "c");
        assert_eq!(el.children[1].tail.as_deref(), Some("after"));
    }

    #[test]
    fn nested_children_in_order() {
        let el = parse_str("<r><a/><b><c/></b><a/></r>").unwrap();
        let tags: Vec<&str> = el.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, ["a", "b", "a"]);
        assert_eq!(el.children[1].children[0].tag, "c");
    }

    #[test]
    fn entities_unescaped_in_text_and_attributes() {
        let el = parse_str(r#"<m v="a&amp;b">x &lt; y</m>"#).unwrap();
        assert_eq!(el.attr("v"), Some("a&b"));
        assert_eq!(el.text.as_deref(), Some("x < y"));
    }

    #[test]
    fn cdata_contributes_to_text() {
        let el = parse_str("<m><![CDATA[1 < 2]]></m>").unwrap();
        assert_eq!(el.text.as_deref(), Some("1 < 2"));
    }

    #[test]
    fn declaration_and_comments_ignored() {
        let el = parse_str(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- note --><r><!-- inner --><a/></r>",
        )
        .unwrap();
        assert_eq!(el.tag, "r");
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn whitespace_is_preserved_in_tree() {
        let el = parse_str("<r>\n  <a/>\n</r>").unwrap();
        assert_eq!(el.text.as_deref(), Some("\n  "));
        assert_eq!(el.children[0].tail.as_deref(), Some("\n"));
    }

    #[test]
    fn empty_document_is_an_error() {
        let err = parse_str("   ").unwrap_err();
        assert!(matches!(err, ParseError::EmptyDocument));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(parse_str("<a><b></a>").is_err());
    }

    #[test]
    fn second_root_element_is_an_error() {
        let err = parse_str("<a/><b/>").unwrap_err();
        assert!(matches!(err, ParseError::TrailingContent(tag) if tag == "b"));
    }

    #[test]
    fn second_root_after_closed_tree_is_an_error() {
        assert!(parse_str("<a><c/></a>\n<b>text</b>").is_err());
    }

    #[test]
    fn parse_file_missing_is_io_error() {
        let err = parse_file("/nonexistent/input.xml").unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }

    #[test]
    fn parse_file_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        std::fs::write(&path, "<r a=\"1\"><c>t</c></r>").unwrap();
        let el = parse_file(&path).unwrap();
        assert_eq!(el.tag, "r");
        assert_eq!(el.children[0].text.as_deref(), Some("t"));
    }
}
