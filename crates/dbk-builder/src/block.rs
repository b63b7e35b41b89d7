//! Block kinds and the block nesting engine.
//!
//! Every open block is a [`BlockFrame`] on a stack whose order is the live
//! element nesting. A frame remembers how many elements its start opened and
//! owns at most one group of wrapper elements that are opened lazily:
//!
//! - list items and definition items wrap their content in a `para` that is
//!   opened by the first content event and closed again when a child block
//!   starts, so nested lists never end up inside a paragraph;
//! - definition lists own the `varlistentry` around each term/item group,
//!   opened by every definition term.
//!
//! Closing a frame undoes exactly what was opened for it, wrappers first.

use std::fmt;
use std::io;
use std::str::FromStr;

use dbk_xml::XmlStreamWriter;

use crate::attributes::Attributes;
use crate::error::BuildError;

/// Callout flavour of an admonition block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Admonition {
    Information,
    Note,
    Warning,
    Tip,
    Panel,
}

impl Admonition {
    fn element(self) -> &'static str {
        match self {
            Self::Information => "important",
            // DocBook has nothing closer to a panel.
            Self::Note | Self::Panel => "note",
            Self::Warning => "warning",
            Self::Tip => "tip",
        }
    }
}

/// Abstract block kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    BulletedList,
    NumericList,
    DefinitionList,
    DefinitionTerm,
    DefinitionItem,
    Paragraph,
    Code,
    Preformatted,
    Quote,
    ListItem,
    Table,
    TableRow,
    TableCellHeader,
    TableCellNormal,
    Admonition(Admonition),
    /// Transparent grouping; opens no element.
    Div,
    Footnote,
}

impl BlockKind {
    /// Canonical kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BulletedList => "bulleted-list",
            Self::NumericList => "numeric-list",
            Self::DefinitionList => "definition-list",
            Self::DefinitionTerm => "definition-term",
            Self::DefinitionItem => "definition-item",
            Self::Paragraph => "paragraph",
            Self::Code => "code",
            Self::Preformatted => "preformatted",
            Self::Quote => "quote",
            Self::ListItem => "list-item",
            Self::Table => "table",
            Self::TableRow => "table-row",
            Self::TableCellHeader => "table-cell-header",
            Self::TableCellNormal => "table-cell-normal",
            Self::Admonition(Admonition::Information) => "information",
            Self::Admonition(Admonition::Note) => "note",
            Self::Admonition(Admonition::Warning) => "warning",
            Self::Admonition(Admonition::Tip) => "tip",
            Self::Admonition(Admonition::Panel) => "panel",
            Self::Div => "div",
            Self::Footnote => "footnote",
        }
    }

    fn layout(self) -> BlockLayout {
        let element = match self {
            Self::BulletedList => "itemizedlist",
            Self::NumericList => "orderedlist",
            Self::DefinitionList => {
                return BlockLayout {
                    element: Some("variablelist"),
                    wrappers: &["varlistentry"],
                    opens_on_content: false,
                    ..BlockLayout::default()
                };
            }
            Self::DefinitionTerm => "term",
            Self::DefinitionItem | Self::ListItem => {
                return BlockLayout {
                    element: Some("listitem"),
                    wrappers: &["para"],
                    opens_on_content: true,
                    closes_wrapper_on_child_block: true,
                    ..BlockLayout::default()
                };
            }
            Self::Paragraph | Self::Footnote => "para",
            Self::Code => "programlisting",
            Self::Preformatted => "literallayout",
            Self::Quote => "blockquote",
            Self::Table => "informaltable",
            Self::TableRow => "tr",
            Self::TableCellHeader => "th",
            Self::TableCellNormal => "td",
            Self::Admonition(admonition) => {
                return BlockLayout {
                    element: Some(admonition.element()),
                    allows_title: true,
                    ..BlockLayout::default()
                };
            }
            Self::Div => return BlockLayout::default(),
        };
        BlockLayout {
            element: Some(element),
            ..BlockLayout::default()
        }
    }
}

impl FromStr for BlockKind {
    type Err = BuildError;

    /// Parse a block kind name. Case and `_`/`-` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "bulleted-list" => Self::BulletedList,
            "numeric-list" => Self::NumericList,
            "definition-list" => Self::DefinitionList,
            "definition-term" => Self::DefinitionTerm,
            "definition-item" => Self::DefinitionItem,
            "paragraph" => Self::Paragraph,
            "code" => Self::Code,
            "preformatted" => Self::Preformatted,
            "quote" => Self::Quote,
            "list-item" => Self::ListItem,
            "table" => Self::Table,
            "table-row" => Self::TableRow,
            "table-cell-header" => Self::TableCellHeader,
            "table-cell-normal" => Self::TableCellNormal,
            "information" => Self::Admonition(Admonition::Information),
            "note" => Self::Admonition(Admonition::Note),
            "warning" => Self::Admonition(Admonition::Warning),
            "tip" => Self::Admonition(Admonition::Tip),
            "panel" => Self::Admonition(Admonition::Panel),
            "div" => Self::Div,
            "footnote" => Self::Footnote,
            _ => return Err(BuildError::UnknownBlockKind(s.to_owned())),
        };
        Ok(kind)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output shape of a block kind.
#[derive(Clone, Copy, Debug, Default)]
struct BlockLayout {
    element: Option<&'static str>,
    wrappers: &'static [&'static str],
    opens_on_content: bool,
    allows_title: bool,
    closes_wrapper_on_child_block: bool,
}

/// State of a frame's wrapper elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wrapper {
    NotNeeded,
    Closed,
    Open,
}

/// One open block.
#[derive(Debug)]
pub(crate) struct BlockFrame {
    kind: BlockKind,
    element_count: usize,
    wrappers: &'static [&'static str],
    wrapper: Wrapper,
    opens_on_content: bool,
    closes_wrapper_on_child_block: bool,
    implicit: bool,
    /// Section depth when the block was opened.
    section_depth: usize,
}

impl BlockFrame {
    fn open_wrapper<W: XmlStreamWriter>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.wrapper == Wrapper::Closed {
            for name in self.wrappers {
                writer.write_start_element(name)?;
            }
            self.wrapper = Wrapper::Open;
        }
        Ok(())
    }

    fn close_wrapper<W: XmlStreamWriter>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.wrapper == Wrapper::Open {
            for _ in self.wrappers {
                writer.write_end_element()?;
            }
            self.wrapper = Wrapper::Closed;
        }
        Ok(())
    }

    pub(crate) fn kind(&self) -> BlockKind {
        self.kind
    }
}

/// Stack of open blocks.
#[derive(Debug, Default)]
pub(crate) struct BlockStack {
    frames: Vec<BlockFrame>,
}

impl BlockStack {
    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the innermost block was opened by the builder itself.
    pub(crate) fn top_is_implicit(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.implicit)
    }

    /// Section depth below which headings may not close sections.
    ///
    /// Sections opened inside a block element must close before it does.
    /// Element-less frames (`div`) do not constrain headings.
    pub(crate) fn section_floor(&self) -> usize {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.element_count > 0)
            .map_or(0, |frame| frame.section_depth)
    }

    /// Section depth recorded by the innermost frame, if it wrote an element.
    pub(crate) fn top_section_depth(&self) -> Option<usize> {
        self.frames
            .last()
            .filter(|frame| frame.element_count > 0)
            .map(|frame| frame.section_depth)
    }

    /// Close the open wrapper of the innermost block element so a heading
    /// can start sections directly inside that element.
    pub(crate) fn close_wrapper_for_heading<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
    ) -> io::Result<()> {
        match self
            .frames
            .iter_mut()
            .rev()
            .find(|frame| frame.element_count > 0)
        {
            Some(frame) => frame.close_wrapper(writer),
            None => Ok(()),
        }
    }

    /// Close the innermost frame's open wrapper, keeping the frame.
    pub(crate) fn close_top_wrapper<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
    ) -> io::Result<()> {
        match self.frames.last_mut() {
            Some(frame) => frame.close_wrapper(writer),
            None => Ok(()),
        }
    }

    /// Number of frames up to and including the nearest definition list.
    pub(crate) fn definition_list_len(&self) -> Option<usize> {
        self.frames
            .iter()
            .rposition(|frame| frame.kind == BlockKind::DefinitionList)
            .map(|index| index + 1)
    }

    /// Open a block at `section_depth` and push its frame.
    pub(crate) fn open<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
        kind: BlockKind,
        attrs: &Attributes,
        implicit: bool,
        section_depth: usize,
    ) -> Result<(), BuildError> {
        let layout = kind.layout();

        if kind == BlockKind::DefinitionTerm {
            self.start_definition_entry(writer)?;
        }

        let element_count = match layout.element {
            Some(element) => {
                if let Some(parent) = self.frames.last_mut()
                    && parent.closes_wrapper_on_child_block
                {
                    parent.close_wrapper(writer)?;
                }

                writer.write_start_element(element)?;
                attrs.write_common(writer)?;

                if layout.allows_title
                    && let Some(title) = &attrs.title
                {
                    writer.write_start_element("title")?;
                    writer.write_characters(title)?;
                    writer.write_end_element()?;
                }
                1
            }
            None => 0,
        };

        self.frames.push(BlockFrame {
            kind,
            element_count,
            wrappers: layout.wrappers,
            wrapper: if layout.wrappers.is_empty() {
                Wrapper::NotNeeded
            } else {
                Wrapper::Closed
            },
            opens_on_content: layout.opens_on_content,
            closes_wrapper_on_child_block: layout.closes_wrapper_on_child_block,
            implicit,
            section_depth,
        });
        Ok(())
    }

    /// Pop the innermost frame and close everything it opened.
    pub(crate) fn close<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
    ) -> Result<BlockFrame, BuildError> {
        let mut frame = self
            .frames
            .pop()
            .ok_or(BuildError::Unbalanced("end_block"))?;
        frame.close_wrapper(writer)?;
        for _ in 0..frame.element_count {
            writer.write_end_element()?;
        }
        Ok(frame)
    }

    /// Open the innermost frame's content wrapper if it is waiting for content.
    pub(crate) fn open_content_wrapper<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
    ) -> io::Result<()> {
        match self.frames.last_mut() {
            Some(frame) if frame.opens_on_content => frame.open_wrapper(writer),
            _ => Ok(()),
        }
    }

    /// Replace the `varlistentry` of the nearest definition list.
    ///
    /// Blocks still open inside that list (an unterminated term or item) are
    /// closed first so the entry can be closed without breaking nesting.
    fn start_definition_entry<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
    ) -> Result<(), BuildError> {
        let index = self
            .frames
            .iter()
            .rposition(|frame| frame.kind == BlockKind::DefinitionList)
            .ok_or(BuildError::OrphanDefinitionTerm)?;

        while self.frames.len() > index + 1 {
            let frame = self.close(writer)?;
            tracing::debug!(kind = %frame.kind, "Closed unterminated block before definition term");
        }

        let list = &mut self.frames[index];
        list.close_wrapper(writer)?;
        list.open_wrapper(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbk_xml::XmlWriter;
    use pretty_assertions::assert_eq;

    fn render(f: impl FnOnce(&mut BlockStack, &mut XmlWriter<Vec<u8>>)) -> String {
        let mut stack = BlockStack::default();
        let mut writer = XmlWriter::new(Vec::new());
        f(&mut stack, &mut writer);
        assert!(stack.is_empty(), "frames left open: {:?}", stack.frames);
        writer.write_end_document().unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn open(stack: &mut BlockStack, writer: &mut XmlWriter<Vec<u8>>, kind: BlockKind) {
        stack
            .open(writer, kind, &Attributes::default(), false, 1)
            .unwrap();
    }

    fn text(stack: &mut BlockStack, writer: &mut XmlWriter<Vec<u8>>, text: &str) {
        stack.open_content_wrapper(writer).unwrap();
        writer.write_characters(text).unwrap();
    }

    fn close(stack: &mut BlockStack, writer: &mut XmlWriter<Vec<u8>>) {
        stack.close(writer).unwrap();
    }

    #[test]
    fn test_list_item_wrapper_opens_on_content() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::BulletedList);
            open(s, w, BlockKind::ListItem);
            text(s, w, "one");
            text(s, w, " two");
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            "<itemizedlist><listitem><para>one two</para></listitem></itemizedlist>"
        );
    }

    #[test]
    fn test_sibling_items_do_not_share_wrapper() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::NumericList);
            open(s, w, BlockKind::ListItem);
            text(s, w, "a");
            close(s, w);
            open(s, w, BlockKind::ListItem);
            text(s, w, "b");
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            "<orderedlist><listitem><para>a</para></listitem><listitem><para>b</para></listitem></orderedlist>"
        );
    }

    #[test]
    fn test_child_block_closes_item_wrapper() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::BulletedList);
            open(s, w, BlockKind::ListItem);
            text(s, w, "outer");
            open(s, w, BlockKind::BulletedList);
            open(s, w, BlockKind::ListItem);
            text(s, w, "inner");
            close(s, w);
            close(s, w);
            text(s, w, "after");
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            concat!(
                "<itemizedlist><listitem><para>outer</para>",
                "<itemizedlist><listitem><para>inner</para></listitem></itemizedlist>",
                "<para>after</para></listitem></itemizedlist>"
            )
        );
    }

    #[test]
    fn test_definition_list_entries() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::DefinitionList);
            open(s, w, BlockKind::DefinitionTerm);
            text(s, w, "t1");
            close(s, w);
            open(s, w, BlockKind::DefinitionItem);
            text(s, w, "d1");
            close(s, w);
            open(s, w, BlockKind::DefinitionTerm);
            text(s, w, "t2");
            close(s, w);
            open(s, w, BlockKind::DefinitionItem);
            text(s, w, "d2");
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            concat!(
                "<variablelist>",
                "<varlistentry><term>t1</term><listitem><para>d1</para></listitem></varlistentry>",
                "<varlistentry><term>t2</term><listitem><para>d2</para></listitem></varlistentry>",
                "</variablelist>"
            )
        );
    }

    #[test]
    fn test_consecutive_terms_share_no_entry() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::DefinitionList);
            open(s, w, BlockKind::DefinitionTerm);
            text(s, w, "t1");
            close(s, w);
            open(s, w, BlockKind::DefinitionTerm);
            text(s, w, "t2");
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            concat!(
                "<variablelist>",
                "<varlistentry><term>t1</term></varlistentry>",
                "<varlistentry><term>t2</term></varlistentry>",
                "</variablelist>"
            )
        );
    }

    #[test]
    fn test_unterminated_term_closed_by_next_term() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::DefinitionList);
            open(s, w, BlockKind::DefinitionTerm);
            text(s, w, "t1");
            open(s, w, BlockKind::DefinitionTerm);
            text(s, w, "t2");
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            concat!(
                "<variablelist>",
                "<varlistentry><term>t1</term></varlistentry>",
                "<varlistentry><term>t2</term></varlistentry>",
                "</variablelist>"
            )
        );
    }

    #[test]
    fn test_orphan_definition_term() {
        let mut stack = BlockStack::default();
        let mut writer = XmlWriter::new(Vec::new());
        let err = stack
            .open(
                &mut writer,
                BlockKind::DefinitionTerm,
                &Attributes::default(),
                false,
                1,
            )
            .unwrap_err();
        assert!(matches!(err, BuildError::OrphanDefinitionTerm));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_div_is_transparent() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::Quote);
            open(s, w, BlockKind::Div);
            open(s, w, BlockKind::Paragraph);
            text(s, w, "x");
            close(s, w);
            close(s, w);
            close(s, w);
        });
        assert_eq!(xml, "<blockquote><para>x</para></blockquote>");
    }

    #[test]
    fn test_admonition_title_and_attributes() {
        let xml = render(|s, w| {
            let attrs = Attributes::new().with_id("n1").with_title("Heads up");
            s.open(w, BlockKind::Admonition(Admonition::Warning), &attrs, false, 1)
                .unwrap();
            open(s, w, BlockKind::Paragraph);
            text(s, w, "careful");
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            r#"<warning id="n1"><title>Heads up</title><para>careful</para></warning>"#
        );
    }

    #[test]
    fn test_title_ignored_for_non_admonitions() {
        let xml = render(|s, w| {
            let attrs = Attributes::new().with_title("ignored");
            s.open(w, BlockKind::Paragraph, &attrs, false, 1).unwrap();
            text(s, w, "x");
            close(s, w);
        });
        assert_eq!(xml, "<para>x</para>");
    }

    #[test]
    fn test_admonition_elements() {
        let cases = [
            (Admonition::Information, "important"),
            (Admonition::Note, "note"),
            (Admonition::Warning, "warning"),
            (Admonition::Tip, "tip"),
            (Admonition::Panel, "note"),
        ];
        for (admonition, element) in cases {
            assert_eq!(
                BlockKind::Admonition(admonition).layout().element,
                Some(element)
            );
        }
    }

    #[test]
    fn test_table_structure() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::Table);
            open(s, w, BlockKind::TableRow);
            open(s, w, BlockKind::TableCellHeader);
            text(s, w, "h");
            close(s, w);
            open(s, w, BlockKind::TableCellNormal);
            text(s, w, "d");
            close(s, w);
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            "<informaltable><tr><th>h</th><td>d</td></tr></informaltable>"
        );
    }

    #[test]
    fn test_empty_item_closes_only_its_element() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::BulletedList);
            open(s, w, BlockKind::ListItem);
            close(s, w);
            close(s, w);
        });
        assert_eq!(xml, "<itemizedlist><listitem/></itemizedlist>");
    }

    #[test]
    fn test_close_empty_stack() {
        let mut stack = BlockStack::default();
        let mut writer = XmlWriter::new(Vec::new());
        let err = stack.close(&mut writer).unwrap_err();
        assert!(matches!(err, BuildError::Unbalanced("end_block")));
    }

    #[test]
    fn test_section_floor_skips_element_less_frames() {
        let xml = render(|s, w| {
            assert_eq!(s.section_floor(), 0);
            s.open(w, BlockKind::Quote, &Attributes::default(), false, 2)
                .unwrap();
            s.open(w, BlockKind::Div, &Attributes::default(), false, 3)
                .unwrap();
            assert_eq!(s.section_floor(), 2);
            assert_eq!(s.top_section_depth(), None);
            close(s, w);
            assert_eq!(s.top_section_depth(), Some(2));
            close(s, w);
        });
        assert_eq!(xml, "<blockquote/>");
    }

    #[test]
    fn test_heading_closes_wrapper_below_div() {
        let xml = render(|s, w| {
            open(s, w, BlockKind::BulletedList);
            open(s, w, BlockKind::ListItem);
            text(s, w, "a");
            open(s, w, BlockKind::Div);
            s.close_wrapper_for_heading(w).unwrap();
            w.write_start_element("title").unwrap();
            w.write_end_element().unwrap();
            close(s, w);
            text(s, w, "b");
            s.close_top_wrapper(w).unwrap();
            close(s, w);
            close(s, w);
        });
        assert_eq!(
            xml,
            "<itemizedlist><listitem><para>a</para><title/><para>b</para></listitem></itemizedlist>"
        );
    }

    #[test]
    fn test_definition_list_len() {
        let mut stack = BlockStack::default();
        let mut writer = XmlWriter::new(Vec::new());
        assert_eq!(stack.definition_list_len(), None);
        open(&mut stack, &mut writer, BlockKind::Quote);
        open(&mut stack, &mut writer, BlockKind::DefinitionList);
        open(&mut stack, &mut writer, BlockKind::DefinitionTerm);
        assert_eq!(stack.definition_list_len(), Some(2));
    }

    #[test]
    fn test_parse_kind_names() {
        assert_eq!(
            "LIST_ITEM".parse::<BlockKind>().unwrap(),
            BlockKind::ListItem
        );
        assert_eq!(
            "panel".parse::<BlockKind>().unwrap(),
            BlockKind::Admonition(Admonition::Panel)
        );
        let err = "sidebar".parse::<BlockKind>().unwrap_err();
        assert!(matches!(err, BuildError::UnknownBlockKind(name) if name == "sidebar"));
    }

    #[test]
    fn test_kind_names_roundtrip() {
        let kinds = [
            BlockKind::BulletedList,
            BlockKind::DefinitionItem,
            BlockKind::TableCellHeader,
            BlockKind::Admonition(Admonition::Information),
            BlockKind::Footnote,
        ];
        for kind in kinds {
            assert_eq!(kind.to_string().parse::<BlockKind>().unwrap(), kind);
        }
    }
}
