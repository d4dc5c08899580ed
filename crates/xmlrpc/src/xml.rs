//! Structural XML parsing on top of quick-xml.
//!
//! Builds an owned element tree from the response bytes and offers the
//! small path-query surface the decoder needs: first-match and
//! all-matches lookup along `/`-separated child names. No namespaces,
//! no attributes, no semantic checks — shape validation is the
//! decoder's job.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::XmlError;

/// One parsed element: tag name, accumulated character data, and child
/// elements in document order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Element {
        Element {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Character data directly inside this element, entities resolved.
    /// Whitespace is preserved as-is.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn children(&self) -> &[Element] {
        &self.children
    }

    /// All descendants reachable by following `path` child names from
    /// this element, in document order.
    pub(crate) fn find_all<'a>(&'a self, path: &str) -> Vec<&'a Element> {
        let mut current: Vec<&Element> = vec![self];
        for segment in path.split('/') {
            let mut next = Vec::new();
            for element in current {
                for child in &element.children {
                    if child.name == segment {
                        next.push(child);
                    }
                }
            }
            if next.is_empty() {
                return Vec::new();
            }
            current = next;
        }
        current
    }

    /// First match of [`find_all`](Element::find_all), if any.
    pub(crate) fn find(&self, path: &str) -> Option<&Element> {
        self.find_all(path).into_iter().next()
    }
}

/// A parsed document. Queries start at the top-level elements, so the
/// first path segment names the document root.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Document {
    // Virtual container above the root element(s); its name is unused.
    root: Element,
}

impl Document {
    /// Parses `data` into an element tree.
    ///
    /// Declarations, processing instructions, comments and doctypes are
    /// skipped; text and CDATA accumulate on the innermost open
    /// element. Any well-formedness violation fails the parse.
    pub(crate) fn parse(data: &[u8]) -> Result<Document, XmlError> {
        let text = std::str::from_utf8(data)?;
        let mut reader = Reader::from_str(text);
        let mut root = Element::new(String::new());
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    stack.push(Element::new(name));
                }
                Event::Empty(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    attach(&mut root, &mut stack, Element::new(name));
                }
                Event::End(_) => {
                    // Tag-name mismatches are caught by the reader.
                    let element = stack.pop().ok_or(XmlError::UnexpectedEof)?;
                    attach(&mut root, &mut stack, element);
                }
                Event::Text(t) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(c.as_ref()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::UnexpectedEof);
        }
        Ok(Document { root })
    }

    pub(crate) fn find(&self, path: &str) -> Option<&Element> {
        self.root.find(path)
    }
}

fn attach(root: &mut Element, stack: &mut [Element], element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => root.children.push(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let doc = Document::parse(b"<a><b><c>x</c><c>y</c></b></a>").expect("parse");
        let matches = doc.find("a").expect("a").find_all("b/c");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text(), "x");
        assert_eq!(matches[1].text(), "y");
        assert_eq!(doc.find("a/b/c").expect("first").text(), "x");
        assert!(doc.find("a/z").is_none());
    }

    #[test]
    fn element_queries_are_relative_to_children() {
        let doc = Document::parse(b"<a><b><c>x</c></b></a>").expect("parse");
        let b = doc.find("a/b").expect("b");
        assert_eq!(b.find("c").expect("c").text(), "x");
        assert!(b.find("b").is_none());
        assert_eq!(b.children().len(), 1);
    }

    #[test]
    fn resolves_entities_and_cdata() {
        let doc = Document::parse(b"<a>x &amp; <![CDATA[<y>]]></a>").expect("parse");
        assert_eq!(doc.find("a").expect("a").text(), "x & <y>");
    }

    #[test]
    fn preserves_text_whitespace() {
        let doc = Document::parse(b"<a> 1 </a>").expect("parse");
        assert_eq!(doc.find("a").expect("a").text(), " 1 ");
    }

    #[test]
    fn skips_declaration_and_comments() {
        let doc = Document::parse(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><!-- hi --><a><b/></a>",
        )
        .expect("parse");
        assert!(doc.find("a/b").is_some());
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(
            Document::parse(b"<a><b></a></b>"),
            Err(XmlError::Parse(_))
        ));
    }

    #[test]
    fn rejects_unclosed_document() {
        let result = Document::parse(b"<a><b>");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(matches!(
            Document::parse(&[b'<', b'a', b'>', 0xff, 0xfe]),
            Err(XmlError::Utf8(_))
        ));
    }
}
