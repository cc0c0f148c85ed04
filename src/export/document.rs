use quick_xml::Writer as XmlWriter;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::constants::{DOC_ELEMENT, FIELD_ELEMENT};
use crate::error::Result;

/// Serialises one `<doc>` element into memory.
///
/// A document is rendered completely before any of it reaches a batch file,
/// so an aborted run never leaves half a record behind.
pub(crate) struct DocumentWriter {
    writer: XmlWriter<Vec<u8>>,
    fields: usize,
}

impl DocumentWriter {
    pub(crate) fn new() -> Result<Self> {
        let mut writer = XmlWriter::new(Vec::with_capacity(1024));
        writer.write_event(Event::Start(BytesStart::new(DOC_ELEMENT)))?;
        writer.get_mut().push(b'\n');
        Ok(Self { writer, fields: 0 })
    }

    /// Write a field whose value still needs escaping.
    pub(crate) fn field_text(&mut self, name: &str, value: &str) -> Result<()> {
        self.field(name, BytesText::new(value))
    }

    /// Write a field whose value has already been sanitized.
    pub(crate) fn field_escaped(&mut self, name: &str, value: &str) -> Result<()> {
        self.field(name, BytesText::from_escaped(value))
    }

    fn field(&mut self, name: &str, text: BytesText<'_>) -> Result<()> {
        self.writer.write_event(Event::Start(
            BytesStart::new(FIELD_ELEMENT).with_attributes([("name", name)]),
        ))?;
        self.writer.write_event(Event::Text(text))?;
        self.writer
            .write_event(Event::End(BytesEnd::new(FIELD_ELEMENT)))?;
        self.writer.get_mut().push(b'\n');
        self.fields += 1;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<Vec<u8>> {
        self.writer
            .write_event(Event::End(BytesEnd::new(DOC_ELEMENT)))?;
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub(crate) fn field_count(&self) -> usize {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fields_in_order() {
        let mut doc = DocumentWriter::new().expect("doc");
        doc.field_text("lid", "urn:a&b").expect("field");
        doc.field_escaped("title", "R&amp;D").expect("field");
        assert_eq!(doc.field_count(), 2);
        let xml = String::from_utf8(doc.finish().expect("finish")).expect("utf8");
        assert_eq!(
            xml,
            "<doc>\n\
             <field name=\"lid\">urn:a&amp;b</field>\n\
             <field name=\"title\">R&amp;D</field>\n\
             </doc>\n"
        );
    }
}
