use thiserror::Error;

/// Errors produced while parsing XML into an element tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML syntax error: {0}")]
    Syntax(String),

    #[error("invalid UTF-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("closing tag without matching open: </{0}>")]
    UnexpectedClosingTag(String),

    #[error("document has no root element")]
    EmptyDocument,

    #[error("content after the root element: <{0}>")]
    TrailingContent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Syntax(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Syntax(err.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
