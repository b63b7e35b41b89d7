//! `quick-xml` backed implementation of [`XmlStreamWriter`].

use std::io::{self, Write};

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::XmlStreamWriter;
use crate::policy::WhitespacePolicy;

/// Start tag waiting for attributes.
struct Pending {
    start: BytesStart<'static>,
    empty: bool,
}

/// Bookkeeping for one element that has been started but not closed.
struct OpenElement {
    name: String,
    has_text: bool,
    has_children: bool,
    preserve: bool,
}

/// XML writer over any [`io::Write`] sink.
///
/// Elements closed without any content are written as empty tags
/// (`<title/>`). When indentation is enabled, a newline and indentation are
/// inserted before child elements and closing tags of elements that hold no
/// character data. Elements matched by the [`WhitespacePolicy`], and all of
/// their descendants, are never reformatted.
pub struct XmlWriter<W: Write> {
    inner: quick_xml::Writer<W>,
    pending: Option<Pending>,
    open: Vec<OpenElement>,
    policy: WhitespacePolicy,
    indent: Option<usize>,
    wrote_root: bool,
}

impl<W: Write> XmlWriter<W> {
    /// Create a compact writer using the DocBook whitespace policy.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner: quick_xml::Writer::new(inner),
            pending: None,
            open: Vec::new(),
            policy: WhitespacePolicy::default(),
            indent: None,
            wrote_root: false,
        }
    }

    /// Indent nested elements by `width` spaces per level.
    #[must_use]
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Replace the whitespace preservation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: WhitespacePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Consume the writer and return the underlying sink.
    ///
    /// A pending start tag that was never followed by another primitive is
    /// lost; call [`XmlStreamWriter::write_end_document`] first.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        if let Some(pending) = self.pending.take() {
            let event = if pending.empty {
                Event::Empty(pending.start)
            } else {
                Event::Start(pending.start)
            };
            self.inner.write_event(event)?;
        }
        Ok(())
    }

    /// Prepare the stream for a new child element of the innermost open one.
    fn begin_child(&mut self) -> io::Result<()> {
        self.flush_pending()?;
        let indent = match self.open.last_mut() {
            Some(parent) => {
                parent.has_children = true;
                !parent.has_text && !parent.preserve
            }
            None => std::mem::replace(&mut self.wrote_root, true),
        };
        if indent {
            self.write_indent(self.open.len())?;
        }
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) -> io::Result<()> {
        let Some(width) = self.indent else {
            return Ok(());
        };
        let mut whitespace = String::with_capacity(1 + depth * width);
        whitespace.push('\n');
        whitespace.extend(std::iter::repeat_n(' ', depth * width));
        self.inner
            .write_event(Event::Text(BytesText::from_escaped(whitespace)))
    }

    fn mark_text(&mut self) {
        if let Some(element) = self.open.last_mut() {
            element.has_text = true;
        }
    }

    fn write_raw_text(&mut self, escaped: &str) -> io::Result<()> {
        self.flush_pending()?;
        self.mark_text();
        if escaped.is_empty() {
            return Ok(());
        }
        self.inner
            .write_event(Event::Text(BytesText::from_escaped(escaped)))
    }
}

impl<W: Write> XmlStreamWriter for XmlWriter<W> {
    fn write_start_element(&mut self, name: &str) -> io::Result<()> {
        self.begin_child()?;
        let preserve = self.open.last().is_some_and(|parent| parent.preserve)
            || self.policy.preserves(name);
        self.open.push(OpenElement {
            name: name.to_owned(),
            has_text: false,
            has_children: false,
            preserve,
        });
        self.pending = Some(Pending {
            start: BytesStart::new(name.to_owned()),
            empty: false,
        });
        Ok(())
    }

    fn write_end_element(&mut self) -> io::Result<()> {
        let Some(element) = self.open.pop() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no open element to close",
            ));
        };

        match self.pending.take() {
            // The element being closed received no content at all.
            Some(Pending { start, empty: false }) => {
                return self.inner.write_event(Event::Empty(start));
            }
            Some(Pending { start, empty: true }) => {
                self.inner.write_event(Event::Empty(start))?;
            }
            None => {}
        }

        if element.has_children && !element.has_text && !element.preserve {
            self.write_indent(self.open.len())?;
        }
        self.inner
            .write_event(Event::End(BytesEnd::new(element.name)))
    }

    fn write_empty_element(&mut self, name: &str) -> io::Result<()> {
        self.begin_child()?;
        self.pending = Some(Pending {
            start: BytesStart::new(name.to_owned()),
            empty: true,
        });
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> io::Result<()> {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.start.push_attribute((name, value));
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("attribute `{name}` written outside of a start tag"),
            )),
        }
    }

    fn write_namespace(&mut self, prefix: &str, uri: &str) -> io::Result<()> {
        if prefix.is_empty() {
            self.write_attribute("xmlns", uri)
        } else {
            self.write_attribute(&format!("xmlns:{prefix}"), uri)
        }
    }

    fn write_characters(&mut self, text: &str) -> io::Result<()> {
        let escaped = partial_escape(text);
        self.write_raw_text(&escaped)
    }

    fn write_literal(&mut self, literal: &str) -> io::Result<()> {
        self.write_raw_text(literal)
    }

    fn write_entity_ref(&mut self, name: &str) -> io::Result<()> {
        self.write_raw_text(&format!("&{name};"))
    }

    fn write_end_document(&mut self) -> io::Result<()> {
        self.flush_pending()?;
        while !self.open.is_empty() {
            self.write_end_element()?;
        }
        self.inner.get_mut().flush()
    }
}
