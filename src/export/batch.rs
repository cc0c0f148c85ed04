use std::io::Write;

use quick_xml::Writer as XmlWriter;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::constants::BATCH_ROOT_ELEMENT;
use crate::error::{ExportError, Result};

/// One open batch file: `<add>`, a run of documents, `</add>`.
///
/// [`BatchWriter::finish`] writes the closing marker. A writer dropped
/// without `finish` (the run aborted) still writes the marker, best effort,
/// and logs a warning; its contents end at the last complete document.
pub(crate) struct BatchWriter<W: Write> {
    writer: Option<XmlWriter<W>>,
    sequence: usize,
    documents: usize,
}

impl<W: Write> BatchWriter<W> {
    pub(crate) fn open(sink: W, sequence: usize) -> Result<Self> {
        let mut writer = XmlWriter::new(sink);
        writer.write_event(Event::Start(BytesStart::new(BATCH_ROOT_ELEMENT)))?;
        writer.get_mut().write_all(b"\n").map_err(sink_error)?;
        Ok(Self {
            writer: Some(writer),
            sequence,
            documents: 0,
        })
    }

    pub(crate) fn write_document(&mut self, document: &[u8]) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(ExportError::sink_write("batch file already closed"));
        };
        writer.get_mut().write_all(document).map_err(sink_error)?;
        self.documents += 1;
        Ok(())
    }

    /// Close the container and flush. Returns the number of documents written.
    pub(crate) fn finish(mut self) -> Result<usize> {
        if let Some(writer) = self.writer.take() {
            close(writer)?;
        }
        tracing::info!(
            sequence = self.sequence,
            documents = self.documents,
            "closed batch file"
        );
        Ok(self.documents)
    }
}

impl<W: Write> Drop for BatchWriter<W> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            tracing::warn!(
                sequence = self.sequence,
                documents = self.documents,
                "closing batch file of an aborted run; treat it as incomplete"
            );
            if let Err(err) = close(writer) {
                tracing::warn!(sequence = self.sequence, error = %err, "failed to close batch file");
            }
        }
    }
}

fn close<W: Write>(mut writer: XmlWriter<W>) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(BATCH_ROOT_ELEMENT)))?;
    let sink = writer.get_mut();
    sink.write_all(b"\n").map_err(sink_error)?;
    sink.flush().map_err(sink_error)
}

fn sink_error(err: std::io::Error) -> ExportError {
    ExportError::sink_write(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_writes_container() {
        let mut out = Vec::new();
        {
            let mut batch = BatchWriter::open(&mut out, 1).expect("open");
            batch.write_document(b"<doc>\n</doc>\n").expect("write");
            assert_eq!(batch.finish().expect("finish"), 1);
        }
        assert_eq!(out, b"<add>\n<doc>\n</doc>\n</add>\n");
    }

    #[test]
    fn drop_without_finish_still_closes() {
        let mut out = Vec::new();
        {
            let _batch = BatchWriter::open(&mut out, 3).expect("open");
        }
        assert_eq!(out, b"<add>\n</add>\n");
    }
}
