//! Destinations for batch files and the missing-context report.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_FILE_PREFIX, DEFAULT_REPORT_FILE_NAME};
use crate::error::{ExportError, Result};
use crate::types::ExportOptions;

/// Opens the writers an export run needs.
pub trait SinkFactory {
    type Batch: Write;
    type Report: Write;

    /// Open batch file number `sequence` (1-based).
    fn open_batch(&mut self, sequence: usize) -> Result<Self::Batch>;

    /// Open the missing-context report. Called once, after the last batch.
    fn open_report(&mut self) -> Result<Self::Report>;
}

/// Writes `{prefix}.{n}.xml` files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    output_dir: PathBuf,
    file_prefix: String,
    report_path: PathBuf,
    batch_paths: Vec<PathBuf>,
}

impl DirectorySink {
    /// The report defaults to `missing_context.csv` inside `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let report_path = output_dir.join(DEFAULT_REPORT_FILE_NAME);
        Self {
            output_dir,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            report_path,
            batch_paths: Vec::new(),
        }
    }

    /// A sink named by `options.file_prefix`.
    #[must_use]
    pub fn from_options(output_dir: impl Into<PathBuf>, options: &ExportOptions) -> Self {
        Self::new(output_dir).with_file_prefix(options.file_prefix.clone())
    }

    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    #[must_use]
    pub fn batch_path(&self, sequence: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}.{sequence}.xml", self.file_prefix))
    }

    #[must_use]
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Batch files opened so far, in sequence order.
    #[must_use]
    pub fn batch_paths(&self) -> &[PathBuf] {
        &self.batch_paths
    }
}

impl SinkFactory for DirectorySink {
    type Batch = BufWriter<fs_err::File>;
    type Report = BufWriter<fs_err::File>;

    fn open_batch(&mut self, sequence: usize) -> Result<Self::Batch> {
        let path = self.batch_path(sequence);
        let file = fs_err::File::create(&path)
            .map_err(|err| ExportError::sink_write(err.to_string()))?;
        tracing::info!(path = %path.display(), "writing solr doc");
        self.batch_paths.push(path);
        Ok(BufWriter::new(file))
    }

    fn open_report(&mut self) -> Result<Self::Report> {
        let file = fs_err::File::create(&self.report_path)
            .map_err(|err| ExportError::sink_write(err.to_string()))?;
        tracing::info!(path = %self.report_path.display(), "writing missing context");
        Ok(BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_paths_are_numbered_from_one() {
        let dir = tempfile::tempdir().expect("tmp");
        let mut sink = DirectorySink::new(dir.path()).with_file_prefix("docs");
        let mut first = sink.open_batch(1).expect("open");
        first.write_all(b"<add>\n</add>\n").expect("write");
        drop(first);

        assert_eq!(sink.batch_paths(), [dir.path().join("docs.1.xml")]);
        assert!(dir.path().join("docs.1.xml").exists());
        assert_eq!(sink.report_path(), dir.path().join("missing_context.csv"));
    }

    #[test]
    fn prefix_taken_from_options() {
        let dir = tempfile::tempdir().expect("tmp");
        let options = ExportOptions::builder()
            .file_prefix("custom")
            .build()
            .expect("options");
        let sink = DirectorySink::from_options(dir.path(), &options);
        assert_eq!(sink.batch_path(2), dir.path().join("custom.2.xml"));
    }

    #[test]
    fn missing_directory_is_a_sink_error() {
        let dir = tempfile::tempdir().expect("tmp");
        let mut sink = DirectorySink::new(dir.path().join("absent"));
        let err = sink.open_batch(1).unwrap_err();
        assert!(matches!(err, ExportError::SinkWrite { .. }));
    }
}
