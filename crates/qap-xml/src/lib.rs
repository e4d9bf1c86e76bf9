//! XNAT assessment documents for QAP results.
//!
//! - [`DocumentBuilder`]: places each metric of a normalized record into the
//!   document according to the selected schema's partition table
//! - [`Document`] / [`Element`]: the in-memory tree the builder produces
//! - [`write_document`] / [`to_xml_string`]: UTF-8 serialization via `quick-xml`

mod builder;
mod error;
mod tree;
mod writer;

pub use builder::{DEFAULT_AUTHOR, DEFAULT_GENERATOR, DocumentBuilder, build_document};
pub use error::{Result, XmlError};
pub use tree::{Document, Element, Namespace, Node};
pub use writer::{to_xml_string, write_document};
