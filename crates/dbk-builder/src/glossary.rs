//! Acronym collection and the generated glossary appendix.

use std::collections::BTreeMap;
use std::io;

use dbk_xml::XmlStreamWriter;

/// Acronyms used in the current document.
///
/// Each term keeps the longest definition seen for it, measured in UTF-16
/// code units; on equal length the first one stays. Terms are ordered by
/// ordinal string comparison.
#[derive(Debug, Default)]
pub(crate) struct Glossary {
    entries: BTreeMap<String, String>,
}

impl Glossary {
    pub(crate) fn record(&mut self, term: &str, definition: &str) {
        match self.entries.get_mut(term) {
            Some(existing) => {
                if utf16_len(definition) > utf16_len(existing) {
                    definition.clone_into(existing);
                }
            }
            None => {
                self.entries.insert(term.to_owned(), definition.to_owned());
            }
        }
    }

    pub(crate) fn definition(&self, term: &str) -> Option<&str> {
        self.entries.get(term).map(String::as_str)
    }

    /// Write the glossary appendix when `enabled` and clear the table.
    ///
    /// Returns whether an appendix was written.
    pub(crate) fn flush<W: XmlStreamWriter>(
        &mut self,
        writer: &mut W,
        enabled: bool,
    ) -> io::Result<bool> {
        let entries = std::mem::take(&mut self.entries);
        if !enabled || entries.is_empty() {
            return Ok(false);
        }

        writer.write_start_element("appendix")?;
        writer.write_attribute("id", "glossary")?;
        writer.write_start_element("title")?;
        writer.write_attribute("id", "glossary-end")?;
        writer.write_characters("Glossary")?;
        writer.write_end_element()?; // title
        writer.write_start_element("glosslist")?;

        for (term, definition) in &entries {
            writer.write_start_element("glossentry")?;
            writer.write_start_element("glossterm")?;
            writer.write_characters(term)?;
            writer.write_end_element()?; // glossterm
            writer.write_start_element("glossdef")?;
            writer.write_start_element("para")?;
            writer.write_characters(definition)?;
            writer.write_end_element()?; // para
            writer.write_end_element()?; // glossdef
            writer.write_end_element()?; // glossentry
        }

        writer.write_end_element()?; // glosslist
        writer.write_end_element()?; // appendix
        Ok(true)
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
