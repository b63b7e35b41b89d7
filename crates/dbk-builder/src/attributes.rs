//! Attributes attached to block, span, heading and image events.

use std::io;

use dbk_xml::XmlStreamWriter;

/// Attributes supplied by the event producer.
///
/// Only `id` and `language` are copied onto output elements; the other
/// fields steer how an event is rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Element identifier, written as `id`.
    pub id: Option<String>,
    /// Content language, written as `language`.
    pub language: Option<String>,
    /// Title for admonition blocks.
    pub title: Option<String>,
    /// Whitespace separated CSS classes.
    pub css_class: Option<String>,
    /// Inline CSS declarations.
    pub css_style: Option<String>,
    /// Link target for `link` spans.
    pub href: Option<String>,
}

impl Attributes {
    /// Create empty attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }

    #[must_use]
    pub fn with_css_style(mut self, css_style: impl Into<String>) -> Self {
        self.css_style = Some(css_style.into());
        self
    }

    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Write `id` and `language` onto the pending start tag.
    pub(crate) fn write_common<W: XmlStreamWriter>(&self, writer: &mut W) -> io::Result<()> {
        if let Some(id) = &self.id {
            writer.write_attribute("id", id)?;
        }
        if let Some(language) = &self.language {
            writer.write_attribute("language", language)?;
        }
        Ok(())
    }
}
