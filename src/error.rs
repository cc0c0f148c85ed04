//! Error types shared across the exporter.

use std::borrow::Cow;

/// Errors that abort an export run.
///
/// Resolution misses are not errors; they are routed to
/// [`crate::MissingContext`] and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The identifier table is unreadable or lacks a required column.
    #[error("failed to load identifier table: {reason}")]
    DataLoad { reason: Cow<'static, str> },

    /// The upstream record stream failed or produced an unparseable record.
    #[error("record source failed: {reason}")]
    RecordSource { reason: Cow<'static, str> },

    /// Writing a batch file or the missing-context report failed.
    #[error("failed to write output: {reason}")]
    SinkWrite { reason: Cow<'static, str> },

    #[error("invalid export options: {reason}")]
    InvalidOptions { reason: Cow<'static, str> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub(crate) fn data_load(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::DataLoad {
            reason: reason.into(),
        }
    }

    pub(crate) fn record_source(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::RecordSource {
            reason: reason.into(),
        }
    }

    pub(crate) fn sink_write(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::SinkWrite {
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for ExportError {
    fn from(err: quick_xml::Error) -> Self {
        Self::sink_write(format!("xml serialisation failed: {err}"))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExportError>;
