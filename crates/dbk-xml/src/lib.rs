//! Incremental XML stream writer.
//!
//! This crate provides the [`XmlStreamWriter`] trait, the narrow interface a
//! document builder uses to emit markup one primitive at a time, and
//! [`XmlWriter`], an implementation on top of `quick-xml`.
//!
//! # Architecture
//!
//! Start tags are held pending until the next primitive arrives, so attributes
//! and namespace declarations can be added after the element is started.
//! Optional indentation is applied only between element-only content, and
//! never inside elements selected by a [`WhitespacePolicy`].
//!
//! # Example
//!
//! ```
//! use dbk_xml::{XmlStreamWriter, XmlWriter};
//!
//! let mut writer = XmlWriter::new(Vec::new());
//! writer.write_start_element("para").unwrap();
//! writer.write_attribute("id", "intro").unwrap();
//! writer.write_characters("a < b").unwrap();
//! writer.write_end_document().unwrap();
//!
//! let xml = String::from_utf8(writer.into_inner()).unwrap();
//! assert_eq!(xml, r#"<para id="intro">a &lt; b</para>"#);
//! ```

mod policy;
mod writer;

pub use policy::WhitespacePolicy;
pub use writer::XmlWriter;

use std::io;

/// Low-level character-stream writer for XML output.
///
/// Every method writes incrementally; nothing is buffered beyond the
/// currently pending start tag.
pub trait XmlStreamWriter {
    /// Start a new element. Attributes may follow until the next content.
    fn write_start_element(&mut self, name: &str) -> io::Result<()>;

    /// Close the innermost open element.
    fn write_end_element(&mut self) -> io::Result<()>;

    /// Write an element with no content. Attributes may follow.
    fn write_empty_element(&mut self, name: &str) -> io::Result<()>;

    /// Add an attribute to the pending start tag.
    fn write_attribute(&mut self, name: &str, value: &str) -> io::Result<()>;

    /// Declare a namespace on the pending start tag. An empty prefix
    /// declares the default namespace.
    fn write_namespace(&mut self, prefix: &str, uri: &str) -> io::Result<()>;

    /// Write escaped character data.
    fn write_characters(&mut self, text: &str) -> io::Result<()>;

    /// Write a literal block verbatim. The payload may contain markup.
    fn write_literal(&mut self, literal: &str) -> io::Result<()>;

    /// Write an entity reference, `name` without the surrounding `&` and `;`.
    fn write_entity_ref(&mut self, name: &str) -> io::Result<()>;

    /// Close every open element and flush the underlying sink.
    fn write_end_document(&mut self) -> io::Result<()>;
}
