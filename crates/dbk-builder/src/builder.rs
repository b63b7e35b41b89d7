//! Event-driven DocBook document builder.

use std::io;

use dbk_config::{Config, DOCBOOK_NAMESPACE};
use dbk_xml::{WhitespacePolicy, XmlStreamWriter, XmlWriter};

use crate::attributes::Attributes;
use crate::block::{BlockFrame, BlockKind, BlockStack};
use crate::entity::{self, Glyph};
use crate::error::BuildError;
use crate::glossary::Glossary;
use crate::heading::SectionStack;
use crate::span::{FALLBACK, SpanKind};
use crate::style::{self, ImageSize};
use crate::util::resolve_url;

/// Builds one DocBook document from a stream of semantic events.
///
/// The builder is the only object the event producer talks to. Each event
/// is written to the underlying [`XmlStreamWriter`] immediately; the builder
/// keeps just enough state to close every element it opens exactly once and
/// in order:
///
/// - a stack of open sections driven by heading levels,
/// - a stack of open blocks with lazily opened wrapper elements,
/// - the acronyms used so far, written as a glossary appendix at the end.
///
/// Content arriving outside of any block is placed in an implicit
/// paragraph, and blocks arriving before any heading get an implicit empty
/// level-1 section. Headings inside a block open their sections inside it;
/// those sections close when the block ends.
///
/// # Example
///
/// ```
/// use dbk_builder::{Attributes, BlockKind, DocBookBuilder};
/// use dbk_xml::XmlWriter;
///
/// let mut builder = DocBookBuilder::new(XmlWriter::new(Vec::new()));
/// builder.begin_document().unwrap();
/// builder.begin_heading(1, &Attributes::default()).unwrap();
/// builder.characters("Intro").unwrap();
/// builder.end_heading().unwrap();
/// builder.begin_block(BlockKind::Paragraph, &Attributes::default()).unwrap();
/// builder.characters("Hello").unwrap();
/// builder.end_block().unwrap();
/// builder.end_document().unwrap();
///
/// let xml = String::from_utf8(builder.into_inner().into_inner()).unwrap();
/// assert_eq!(
///     xml,
///     r#"<chapter xmlns="http://docbook.org/ns/docbook"><title>Intro</title><para>Hello</para></chapter>"#
/// );
/// ```
pub struct DocBookBuilder<W: XmlStreamWriter> {
    writer: W,
    sections: SectionStack,
    blocks: BlockStack,
    glossary: Glossary,
    automatic_glossary: bool,
    base_url: Option<String>,
    in_title: bool,
    /// Number of blocks open when the current title started.
    title_blocks: usize,
}

impl<W: io::Write> DocBookBuilder<XmlWriter<W>> {
    /// Create a builder writing to `out`, configured from `config`.
    ///
    /// Indentation and whitespace preservation come from `[output]`.
    #[must_use]
    pub fn for_output(out: W, config: &Config) -> Self {
        let mut writer = XmlWriter::new(out).with_policy(WhitespacePolicy::from_patterns(
            &config.output.preserve_whitespace,
        ));
        if config.output.indent {
            writer = writer.with_indent(config.output.indent_width);
        }
        Self::with_config(writer, config)
    }
}

impl<W: XmlStreamWriter> DocBookBuilder<W> {
    /// Create a builder with the default namespace and automatic glossary.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sections: SectionStack::new(DOCBOOK_NAMESPACE.to_owned()),
            blocks: BlockStack::default(),
            glossary: Glossary::default(),
            automatic_glossary: true,
            base_url: None,
            in_title: false,
            title_blocks: 0,
        }
    }

    /// Create a builder using the namespace, glossary and link settings of
    /// `config`.
    #[must_use]
    pub fn with_config(writer: W, config: &Config) -> Self {
        Self::new(writer)
            .with_namespace(config.output.namespace.clone())
            .with_automatic_glossary(config.glossary.automatic)
            .with_base_url(config.links.base_url.clone())
    }

    /// Set the namespace declared on the first `chapter`.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.sections = SectionStack::new(namespace.into());
        self
    }

    /// Enable or disable the generated glossary appendix.
    #[must_use]
    pub fn with_automatic_glossary(mut self, enabled: bool) -> Self {
        self.automatic_glossary = enabled;
        self
    }

    /// Resolve relative image URLs against `base_url`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Namespace declared on the first `chapter`.
    pub fn namespace(&self) -> &str {
        self.sections.namespace()
    }

    /// Whether a glossary appendix is generated for used acronyms.
    pub fn automatic_glossary(&self) -> bool {
        self.automatic_glossary
    }

    /// Definition currently recorded for an acronym.
    pub fn acronym_definition(&self, term: &str) -> Option<&str> {
        self.glossary.definition(term)
    }

    /// Current section depth.
    pub fn section_depth(&self) -> usize {
        self.sections.depth()
    }

    /// Number of open blocks, including an implicit paragraph.
    pub fn block_depth(&self) -> usize {
        self.blocks.len()
    }

    /// Borrow the underlying writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the builder and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Reset per-document transient state. Writes nothing.
    pub fn begin_document(&mut self) -> Result<(), BuildError> {
        self.in_title = false;
        self.title_blocks = 0;
        self.sections.reset_namespace();
        Ok(())
    }

    /// Close the document: open blocks, titles and sections, then the
    /// glossary.
    pub fn end_document(&mut self) -> Result<(), BuildError> {
        if self.in_title {
            while self.blocks.len() > self.title_blocks {
                let frame = self.close_block()?;
                tracing::debug!(kind = %frame.kind(), "Closed unterminated block in title");
            }
            self.writer.write_end_element()?;
            self.in_title = false;
        }
        self.close_open_blocks()?;
        self.sections.close_to(&mut self.writer, 0)?;

        if self
            .glossary
            .flush(&mut self.writer, self.automatic_glossary)?
        {
            tracing::debug!("Wrote glossary appendix");
        }

        self.writer.write_end_document()?;
        Ok(())
    }

    /// Start a heading of `level`, opening or closing sections as needed,
    /// and open its `title`. Level 0 closes every section.
    ///
    /// A title still open is closed first. Inside a block element, sections
    /// opened before the block stay open; a heading no deeper than the
    /// block's section writes only its title.
    pub fn begin_heading(&mut self, level: usize, attrs: &Attributes) -> Result<(), BuildError> {
        if self.in_title {
            tracing::debug!(level, "Heading inside an open title, closing title");
            self.end_heading()?;
        }
        self.close_implicit_paragraph()?;
        self.blocks.close_wrapper_for_heading(&mut self.writer)?;

        let floor = self.blocks.section_floor();
        if floor > 0 && level <= floor {
            tracing::debug!(level, floor, "Heading not deeper than enclosing block");
        }
        self.sections
            .close_to(&mut self.writer, level.saturating_sub(1).max(floor))?;
        self.sections.open_to(&mut self.writer, level, attrs)?;
        self.writer.write_start_element("title")?;
        self.in_title = true;
        self.title_blocks = self.blocks.len();
        Ok(())
    }

    /// Close the `title` opened by [`begin_heading`](Self::begin_heading).
    ///
    /// Blocks started inside the title must be ended first.
    pub fn end_heading(&mut self) -> Result<(), BuildError> {
        if !self.in_title || self.blocks.len() > self.title_blocks {
            return Err(BuildError::Unbalanced("end_heading"));
        }
        self.writer.write_end_element()?;
        self.in_title = false;
        Ok(())
    }

    /// Start a block. Inside an open heading title the block becomes part
    /// of the title.
    pub fn begin_block(&mut self, kind: BlockKind, attrs: &Attributes) -> Result<(), BuildError> {
        self.close_implicit_paragraph()?;
        if kind == BlockKind::DefinitionTerm
            && let Some(len) = self.blocks.definition_list_len()
        {
            while self.blocks.len() > len {
                let frame = self.close_block()?;
                tracing::debug!(kind = %frame.kind(), "Closed unterminated block before definition term");
            }
        }
        self.open_block(kind, attrs, false)
    }

    /// Close the innermost block, and any sections opened inside it.
    ///
    /// Blocks opened before the current heading title cannot be ended
    /// until the title is.
    pub fn end_block(&mut self) -> Result<(), BuildError> {
        self.close_implicit_paragraph()?;
        if self.in_title && self.blocks.len() <= self.title_blocks {
            return Err(BuildError::Unbalanced("end_block"));
        }
        self.close_block()?;
        Ok(())
    }

    /// Start an inline span. Spans are not tracked; every call must be
    /// paired with exactly one [`end_span`](Self::end_span).
    pub fn begin_span(&mut self, kind: &SpanKind, attrs: &Attributes) -> Result<(), BuildError> {
        self.prepare_content()?;
        match kind.element() {
            Some(element) => {
                self.writer.write_start_element(element.name)?;
                if let Some(role) = element.role {
                    self.writer.write_attribute("role", role)?;
                }
            }
            None if *kind == SpanKind::Link => {
                let href = attrs.href.as_deref().unwrap_or("#");
                match href.strip_prefix('#') {
                    Some(anchor) => {
                        self.writer.write_start_element("link")?;
                        if !anchor.is_empty() {
                            self.writer.write_attribute("linkend", anchor)?;
                        }
                    }
                    None => {
                        self.writer.write_start_element("ulink")?;
                        self.writer.write_attribute("url", href)?;
                    }
                }
            }
            None => {
                tracing::warn!(kind = %kind, "No DocBook mapping for span, using {}", FALLBACK.name);
                self.writer.write_start_element(FALLBACK.name)?;
            }
        }
        attrs.write_common(&mut self.writer)?;
        Ok(())
    }

    /// Close the innermost span.
    pub fn end_span(&mut self) -> Result<(), BuildError> {
        self.writer.write_end_element()?;
        Ok(())
    }

    /// Write escaped character data.
    pub fn characters(&mut self, text: &str) -> Result<(), BuildError> {
        self.prepare_content()?;
        self.writer.write_characters(text)?;
        Ok(())
    }

    /// Write a literal payload verbatim. It may contain markup.
    pub fn characters_unescaped(&mut self, literal: &str) -> Result<(), BuildError> {
        self.prepare_content()?;
        self.writer.write_literal(literal)?;
        Ok(())
    }

    /// Write a character entity reference such as `nbsp` or `#8212`.
    pub fn entity_reference(&mut self, entity: &str) -> Result<(), BuildError> {
        self.prepare_content()?;
        match entity::resolve(entity)? {
            Glyph::Literal(ch) => {
                let mut buf = [0; 4];
                self.writer.write_characters(ch.encode_utf8(&mut buf))?;
            }
            Glyph::Reference(reference) => self.writer.write_entity_ref(reference)?,
        }
        Ok(())
    }

    /// Record an acronym for the glossary and write its term.
    pub fn acronym(&mut self, term: &str, definition: &str) -> Result<(), BuildError> {
        self.prepare_content()?;
        self.glossary.record(term, definition);
        self.writer.write_start_element("glossterm")?;
        self.writer.write_characters(term)?;
        self.writer.write_end_element()?;
        Ok(())
    }

    /// Write a link with text content.
    ///
    /// `#` alone writes only the text, `#name` an internal `link` and any
    /// other target an external `ulink`.
    pub fn link(&mut self, attrs: &Attributes, href: &str, text: &str) -> Result<(), BuildError> {
        self.prepare_content()?;
        self.write_link(attrs, href, |builder| {
            builder.writer.write_characters(text)?;
            Ok(())
        })
    }

    /// Write a link whose content is an inline image.
    pub fn image_link(
        &mut self,
        link_attrs: &Attributes,
        image_attrs: &Attributes,
        href: &str,
        image_url: &str,
    ) -> Result<(), BuildError> {
        self.prepare_content()?;
        self.write_link(link_attrs, href, |builder| {
            builder.write_image(image_attrs, image_url, true)
        })
    }

    /// Write an image. A CSS class token `inline` selects an inline
    /// media object.
    pub fn image(&mut self, attrs: &Attributes, url: &str) -> Result<(), BuildError> {
        self.prepare_content()?;
        let inline = attrs
            .css_class
            .as_deref()
            .is_some_and(style::is_inline_class);
        self.write_image(attrs, url, inline)
    }

    /// Write a line break. DocBook has no element for it, so a newline is
    /// written instead.
    pub fn line_break(&mut self) -> Result<(), BuildError> {
        self.prepare_content()?;
        self.writer.write_characters("\n")?;
        Ok(())
    }

    fn open_block(
        &mut self,
        kind: BlockKind,
        attrs: &Attributes,
        implicit: bool,
    ) -> Result<(), BuildError> {
        if self.sections.depth() == 0 && !self.in_title {
            tracing::debug!(kind = %kind, "Block before any heading, opening implicit section");
            self.begin_heading(1, &Attributes::default())?;
            self.end_heading()?;
        }
        let section_depth = self.sections.depth();
        self.blocks
            .open(&mut self.writer, kind, attrs, implicit, section_depth)
    }

    /// Close sections opened inside the innermost block, then the block.
    fn close_block(&mut self) -> Result<BlockFrame, BuildError> {
        self.blocks.close_top_wrapper(&mut self.writer)?;
        if let Some(depth) = self.blocks.top_section_depth()
            && self.sections.depth() > depth
        {
            tracing::debug!(depth, "Closing sections opened inside block");
            self.sections.close_to(&mut self.writer, depth)?;
        }
        self.blocks.close(&mut self.writer)
    }

    fn close_implicit_paragraph(&mut self) -> Result<(), BuildError> {
        if self.blocks.top_is_implicit() {
            self.close_block()?;
        }
        Ok(())
    }

    fn close_open_blocks(&mut self) -> Result<(), BuildError> {
        self.close_implicit_paragraph()?;
        while !self.blocks.is_empty() {
            let frame = self.close_block()?;
            tracing::debug!(kind = %frame.kind(), "Closed unterminated block");
        }
        Ok(())
    }

    /// Make sure content lands inside an open block.
    ///
    /// Heading titles take content as is, unless a block was started inside
    /// the title. Elsewhere, content with no open block gets an implicit
    /// paragraph, and the innermost block's deferred wrapper is opened.
    fn prepare_content(&mut self) -> Result<(), BuildError> {
        if self.in_title && self.blocks.len() == self.title_blocks {
            return Ok(());
        }
        if self.blocks.is_empty() {
            tracing::debug!("Content outside of any block, opening implicit paragraph");
            self.open_block(BlockKind::Paragraph, &Attributes::default(), true)?;
        }
        self.blocks.open_content_wrapper(&mut self.writer)?;
        Ok(())
    }

    fn write_link(
        &mut self,
        attrs: &Attributes,
        href: &str,
        content: impl FnOnce(&mut Self) -> Result<(), BuildError>,
    ) -> Result<(), BuildError> {
        match href.strip_prefix('#') {
            Some("") => return content(self),
            Some(anchor) => {
                self.writer.write_start_element("link")?;
                self.writer.write_attribute("linkend", anchor)?;
            }
            None => {
                self.writer.write_start_element("ulink")?;
                self.writer.write_attribute("url", href)?;
            }
        }
        attrs.write_common(&mut self.writer)?;
        content(self)?;
        self.writer.write_end_element()?;
        Ok(())
    }

    fn write_image(&mut self, attrs: &Attributes, url: &str, inline: bool) -> Result<(), BuildError> {
        let fileref = resolve_url(self.base_url.as_deref(), url);

        self.writer.write_start_element(if inline {
            "inlinemediaobject"
        } else {
            "mediaobject"
        })?;
        attrs.write_common(&mut self.writer)?;
        self.writer.write_start_element("imageobject")?;
        self.writer.write_empty_element("imagedata")?;
        self.writer.write_attribute("fileref", &fileref)?;

        match attrs.css_style.as_deref().and_then(style::image_size) {
            Some(ImageSize::Scale(scale)) => self.writer.write_attribute("scale", scale)?,
            Some(ImageSize::Dimensions { width, depth }) => {
                self.writer.write_attribute("width", width)?;
                if let Some(depth) = depth {
                    self.writer.write_attribute("depth", depth)?;
                }
            }
            None => {}
        }

        self.writer.write_end_element()?; // imageobject
        self.writer.write_end_element()?; // mediaobject
        Ok(())
    }
}
