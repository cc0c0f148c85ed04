//! Builder-style options controlling an export run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    CURRENT_FILE_HOST, DEFAULT_BATCH_SIZE, DEFAULT_FILE_PREFIX, DEFAULT_SKIP_FIELDS,
    LEGACY_FILE_HOST,
};
use crate::error::{ExportError, Result};

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

fn default_legacy_file_host() -> String {
    LEGACY_FILE_HOST.to_string()
}

fn default_current_file_host() -> String {
    CURRENT_FILE_HOST.to_string()
}

fn default_skip_fields() -> Vec<String> {
    DEFAULT_SKIP_FIELDS.iter().map(ToString::to_string).collect()
}

/// Tunable options for one export run.
///
/// `package_id` is generated once when the options are built and stamped on
/// every document of the run; a restarted run builds new options and so gets
/// a new package id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Documents per batch file.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "Uuid::new_v4")]
    pub package_id: Uuid,
    /// Batch file name prefix, applied by [`DirectorySink::from_options`].
    ///
    /// [`DirectorySink::from_options`]: crate::DirectorySink::from_options
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// `file_ref_url` values starting with this host are rewritten.
    #[serde(default = "default_legacy_file_host")]
    pub legacy_file_host: String,
    #[serde(default = "default_current_file_host")]
    pub current_file_host: String,
    /// Fields dropped from every document.
    #[serde(default = "default_skip_fields")]
    pub skip_fields: Vec<String>,
    /// Also write the raw legacy name of a reference field under its own
    /// field name, after the resolved identifier and facet.
    #[serde(default)]
    pub keep_legacy_reference_values: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            package_id: Uuid::new_v4(),
            file_prefix: default_file_prefix(),
            legacy_file_host: default_legacy_file_host(),
            current_file_host: default_current_file_host(),
            skip_fields: default_skip_fields(),
            keep_legacy_reference_values: false,
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn builder() -> ExportOptionsBuilder {
        ExportOptionsBuilder::default()
    }

    /// Load options from a JSON file. Missing keys take their defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs_err::read(path.as_ref())?;
        let options: Self = serde_json::from_slice(&bytes).map_err(|err| {
            ExportError::InvalidOptions {
                reason: format!("{}: {err}", path.as_ref().display()).into(),
            }
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ExportError::InvalidOptions {
                reason: "batch_size must be non-zero".into(),
            });
        }
        if self.file_prefix.is_empty() {
            return Err(ExportError::InvalidOptions {
                reason: "file_prefix must not be empty".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_skipped(&self, field: &str) -> bool {
        self.skip_fields.iter().any(|skip| skip == field)
    }

    /// Rewrite the legacy host prefix of a file reference URL.
    #[must_use]
    pub fn rewrite_file_url<'a>(&self, url: &'a str) -> std::borrow::Cow<'a, str> {
        if self.legacy_file_host.is_empty() {
            return url.into();
        }
        match url.strip_prefix(self.legacy_file_host.as_str()) {
            Some(rest) => format!("{}{rest}", self.current_file_host).into(),
            None => url.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ExportOptionsBuilder {
    inner: ExportOptions,
}

impl ExportOptionsBuilder {
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.inner.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn package_id(mut self, package_id: Uuid) -> Self {
        self.inner.package_id = package_id;
        self
    }

    #[must_use]
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.file_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn file_host_rewrite(
        mut self,
        legacy: impl Into<String>,
        current: impl Into<String>,
    ) -> Self {
        self.inner.legacy_file_host = legacy.into();
        self.inner.current_file_host = current.into();
        self
    }

    #[must_use]
    pub fn skip_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.skip_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn push_skip_field(mut self, field: impl Into<String>) -> Self {
        self.inner.skip_fields.push(field.into());
        self
    }

    #[must_use]
    pub fn keep_legacy_reference_values(mut self, keep: bool) -> Self {
        self.inner.keep_legacy_reference_values = keep;
        self
    }

    pub fn build(self) -> Result<ExportOptions> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_exporter() {
        let options = ExportOptions::default();
        assert_eq!(options.batch_size, 1000);
        assert_eq!(options.file_prefix, "solr_doc_deprecated");
        assert!(options.is_skipped("score"));
        assert!(options.is_skipped("search_id"));
        assert!(!options.is_skipped("title"));
        assert!(!options.keep_legacy_reference_values);
    }

    #[test]
    fn package_id_differs_between_runs() {
        assert_ne!(
            ExportOptions::default().package_id,
            ExportOptions::default().package_id
        );
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = ExportOptions::builder().batch_size(0).build().unwrap_err();
        assert!(matches!(err, ExportError::InvalidOptions { .. }));
    }

    #[test]
    fn rewrites_only_the_legacy_prefix() {
        let options = ExportOptions::default();
        assert_eq!(
            options.rewrite_file_url("http://starbase.jpl.nasa.gov/mro/data/x.img"),
            "https://pds.nasa.gov/data/mro/data/x.img"
        );
        assert_eq!(
            options.rewrite_file_url("ftp://mirror/http://starbase.jpl.nasa.gov"),
            "ftp://mirror/http://starbase.jpl.nasa.gov"
        );
    }

    #[test]
    fn json_options_fill_defaults() {
        let dir = tempfile::tempdir().expect("tmp");
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"batch_size": 25, "skip_fields": []}"#).expect("write");

        let options = ExportOptions::from_json_path(&path).expect("load");
        assert_eq!(options.batch_size, 25);
        assert!(options.skip_fields.is_empty());
        assert_eq!(options.file_prefix, "solr_doc_deprecated");
    }
}
