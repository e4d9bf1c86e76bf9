//! XML serialization of assessment documents.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, XmlError};
use crate::tree::{Document, Element, Namespace, Node};

/// Write a document as UTF-8 XML with a declaration and two-space indentation.
///
/// Fails with [`XmlError::InvalidCharacter`] before anything is written when
/// a value holds a character outside the XML 1.0 `Char` production.
pub fn write_document<W: Write>(document: &Document, writer: W) -> Result<()> {
    check_element(document.root())?;
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut xml, document.root(), document.declarations())?;
    Ok(())
}

/// Serialize a document to a string.
pub fn to_xml_string(document: &Document) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(document, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

impl Document {
    /// Serialize this document to a string.
    pub fn to_xml_string(&self) -> Result<String> {
        to_xml_string(self)
    }

    /// Write this document to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write_document(self, writer)
    }
}

fn write_element<W: Write>(
    xml: &mut Writer<W>,
    element: &Element,
    declarations: &[Namespace],
) -> Result<()> {
    let name = element.qualified_name();
    let mut start = BytesStart::new(name.as_str());
    for namespace in declarations {
        let attribute = format!("xmlns:{}", namespace.prefix);
        start.push_attribute((attribute.as_str(), namespace.uri));
    }
    for (key, value) in element.attributes() {
        start.push_attribute((key, value));
    }

    if element.text().is_empty() && element.children().is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    if !element.text().is_empty() {
        xml.write_event(Event::Text(BytesText::new(element.text())))?;
    }
    for child in element.children() {
        match child {
            Node::Element(child) => write_element(xml, child, &[])?,
            Node::Comment(text) => {
                xml.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
        }
    }
    xml.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

fn check_element(element: &Element) -> Result<()> {
    check_value(element.text(), || format!("text of {}", element.qualified_name()))?;
    for (key, value) in element.attributes() {
        check_value(value, || {
            format!("attribute '{key}' of {}", element.qualified_name())
        })?;
    }
    for child in element.children() {
        match child {
            Node::Element(child) => check_element(child)?,
            Node::Comment(text) => check_value(text, || {
                format!("comment in {}", element.qualified_name())
            })?,
        }
    }
    Ok(())
}

fn check_value(value: &str, location: impl FnOnce() -> String) -> Result<()> {
    match value.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(XmlError::InvalidCharacter {
            location: location(),
            code: u32::from(c),
        }),
        None => Ok(()),
    }
}

/// `Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
