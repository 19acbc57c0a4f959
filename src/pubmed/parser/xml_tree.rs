//! Minimal element tree built from `quick_xml::Reader` events
//!
//! One `<PubmedArticle>` block is small, so it is read fully into memory and the
//! field extractors query it by path instead of tracking reader state.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};

use super::preprocessing::decode_entities;
use crate::error::{PubMedError, Result};

#[derive(Debug, Clone, PartialEq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct XmlElement {
    pub name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Parse `xml` and return its root element
    ///
    /// Mismatched end tags and truncated documents are errors.
    pub fn parse(xml: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(Self::from_start(e)),
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        PubMedError::XmlError("Unexpected closing tag".to_string())
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(element)),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.children.push(XmlNode::Text(decode_text(e)));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        current.children.push(XmlNode::Text(text));
                    }
                }
                Ok(Event::Eof) => {
                    return Err(PubMedError::XmlError(match stack.last() {
                        Some(open) => format!("Unexpected end of document inside <{}>", open.name),
                        None => "Document has no root element".to_string(),
                    }));
                }
                Err(e) => {
                    return Err(PubMedError::XmlError(format!(
                        "Malformed XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }
    }

    fn from_start(e: &BytesStart) -> XmlElement {
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                (key, value)
            })
            .collect();

        XmlElement {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements named `name`, in document order
    pub fn children<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter_map(move |node| match node {
            XmlNode::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// First direct child element named `name`
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children(name).next()
    }

    /// First element reached by following `/`-separated child names
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// Every element matching the `/`-separated path, in document order
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        path.split('/').fold(vec![self], |current, segment| {
            current
                .into_iter()
                .flat_map(|element| element.children(segment))
                .collect()
        })
    }

    /// All descendant text concatenated; child tags are dropped, their text kept
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// Unescape a text node; undeclared entities (e.g. `&nbsp;`) fall back to the
/// crate's own decoder, which leaves unknown references untouched
fn decode_text(e: &BytesText) -> String {
    match e.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => decode_entities(&String::from_utf8_lossy(e)).into_owned(),
    }
}
