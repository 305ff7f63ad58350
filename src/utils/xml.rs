//! Streaming XML helpers shared by the document readers
//!
//! All readers work on `quick_xml::Reader<&[u8]>` and match elements by
//! local name, so default and prefixed namespaces are handled alike.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt;
use thiserror::Error;

/// Failure while reading an XML document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The document is not well-formed
    #[error("{0}")]
    Malformed(String),

    /// The document ended inside an open element
    #[error("unexpected end of document")]
    UnexpectedEof,
}

/// Wrap any quick-xml failure
pub fn malformed(err: impl fmt::Display) -> XmlError {
    XmlError::Malformed(err.to_string())
}

/// A reader over an in-memory document with surrounding whitespace trimmed
pub fn reader(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader
}

/// Lowercased local name of an element
pub fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_lowercase()
}

/// Unescaped value of the attribute whose local name is `name`
pub fn attribute(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Collect the text and CDATA content of the current element up to its end
/// tag. Nested markup is traversed and only its text is kept.
pub fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(malformed)?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => return Err(XmlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(text)
}

/// Consume and discard the subtree of an element whose start tag was just read
pub fn skip(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<(), XmlError> {
    reader.read_to_end(e.name()).map(|_| ()).map_err(malformed)
}
