//! Event-driven DocBook document builder.
//!
//! This crate turns a stream of semantic document events (headings, blocks,
//! inline spans, text, entities, links, images) into well-formed DocBook
//! markup. It does not parse source markup; an external walker drives the
//! [`DocBookBuilder`] one event at a time.
//!
//! # Architecture
//!
//! - [`DocBookBuilder`]: the orchestrator, the only type the producer uses
//! - Block nesting engine: stack of open blocks with lazily opened wrappers
//!   (`para` inside list items, `varlistentry` inside definition lists)
//! - Section depth manager: `chapter`/`section` nesting driven by heading levels
//! - Span, entity and image mappers: fixed translation tables
//! - Glossary: acronyms collected during the build and flushed as an appendix
//!
//! Output goes through the [`dbk_xml::XmlStreamWriter`] trait, so any writer
//! implementation can be plugged in.
//!
//! # Example
//!
//! ```
//! use dbk_builder::{Attributes, BlockKind, DocBookBuilder};
//! use dbk_config::Config;
//!
//! let mut builder = DocBookBuilder::for_output(Vec::new(), &Config::default());
//! builder.begin_document().unwrap();
//! builder.begin_block(BlockKind::BulletedList, &Attributes::default()).unwrap();
//! builder.begin_block(BlockKind::ListItem, &Attributes::default()).unwrap();
//! builder.acronym("API", "Application Programming Interface").unwrap();
//! builder.end_block().unwrap();
//! builder.end_block().unwrap();
//! builder.end_document().unwrap();
//!
//! let xml = String::from_utf8(builder.into_inner().into_inner()).unwrap();
//! assert!(xml.contains("<listitem><para><glossterm>API</glossterm></para></listitem>"));
//! assert!(xml.contains(r#"<appendix id="glossary">"#));
//! ```

mod attributes;
mod block;
mod builder;
mod css;
mod entity;
mod error;
mod glossary;
mod heading;
mod span;
mod style;
mod util;

pub use attributes::Attributes;
pub use block::{Admonition, BlockKind};
pub use builder::DocBookBuilder;
pub use error::BuildError;
pub use span::SpanKind;
