//! Section depth management.

use std::io;

use dbk_xml::XmlStreamWriter;

use crate::attributes::Attributes;

/// One open sectioning element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HeadingFrame {
    level: usize,
}

/// Stack of open sectioning elements.
///
/// Depth 1 is a `chapter`, deeper levels are nested `section`s. Levels on the
/// stack are always `1..=depth` without gaps.
#[derive(Debug)]
pub(crate) struct SectionStack {
    frames: Vec<HeadingFrame>,
    namespace: String,
    namespace_written: bool,
}

impl SectionStack {
    pub(crate) fn new(namespace: String) -> Self {
        Self {
            frames: Vec::new(),
            namespace,
            namespace_written: false,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Allow the namespace declaration to be written again.
    pub(crate) fn reset_namespace(&mut self) {
        self.namespace_written = false;
    }

    /// Close sections until at most `level` remain open.
    pub(crate) fn close_to<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
        level: usize,
    ) -> io::Result<()> {
        while self.frames.len() > level {
            writer.write_end_element()?;
            self.frames.pop();
        }
        Ok(())
    }

    /// Open sections until `level` are open.
    ///
    /// Only the section at `level` receives `attrs`; intermediate levels
    /// opened on the way are bare.
    pub(crate) fn open_to<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
        level: usize,
        attrs: &Attributes,
    ) -> io::Result<()> {
        while self.frames.len() < level {
            let depth = self.frames.len() + 1;
            if depth == 1 {
                writer.write_start_element("chapter")?;
                if !self.namespace_written {
                    writer.write_namespace("", &self.namespace)?;
                    self.namespace_written = true;
                }
            } else {
                writer.write_start_element("section")?;
            }
            if depth == level {
                attrs.write_common(writer)?;
            }
            self.frames.push(HeadingFrame { level: depth });
        }
        debug_assert!(
            self.frames
                .iter()
                .enumerate()
                .all(|(i, frame)| frame.level == i + 1)
        );
        Ok(())
    }
}
