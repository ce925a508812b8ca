use std::collections::BTreeMap;

/// One structural unit of a parsed XML document.
///
/// Follows the ElementTree data model: `text` is the content directly inside
/// the element before its first child, `tail` is the content after the
/// element's closing tag and before the next sibling (or the parent's close).
/// Child order is significant; attribute iteration order is not, but the
/// `BTreeMap` keeps names sorted so diff emission is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with the given tag and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: set one attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: set the tail content.
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Total number of elements in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Element::subtree_size).sum::<usize>()
    }

    /// Depth of this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Element::depth)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain() {
        let el = Element::new("user")
            .with_attr("id", "42")
            .with_text("hello")
            .with_child(Element::new("address"));

        assert_eq!(el.tag, "user");
        assert_eq!(el.attr("id"), Some("42"));
        assert_eq!(el.text.as_deref(), Some("hello"));
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn subtree_size_counts_all_nodes() {
        let el = Element::new("a")
            .with_child(Element::new("b").with_child(Element::new("c")))
            .with_child(Element::new("d"));
        assert_eq!(el.subtree_size(), 4);
        assert_eq!(el.depth(), 3);
    }

    #[test]
    fn attr_missing_is_none() {
        let el = Element::new("n").with_attr("a", "");
        assert_eq!(el.attr("a"), Some(""));
        assert_eq!(el.attr("b"), None);
    }
}
