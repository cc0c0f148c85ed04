use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of context product a legacy reference field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceCategory {
    Investigation,
    InstrumentHost,
    Instrument,
    Target,
}

impl ReferenceCategory {
    pub const ALL: [Self; 4] = [
        Self::Investigation,
        Self::InstrumentHost,
        Self::Instrument,
        Self::Target,
    ];

    /// Legacy record field holding the free-text name.
    #[must_use]
    pub fn source_field(self) -> &'static str {
        match self {
            Self::Investigation => "investigation_name",
            Self::InstrumentHost => "instrument_host_name",
            Self::Instrument => "instrument_name",
            Self::Target => "target_name",
        }
    }

    /// Output field carrying the resolved identifier. Also the
    /// `reference_type` column of the missing-context report.
    #[must_use]
    pub fn ref_field(self) -> &'static str {
        match self {
            Self::Investigation => "investigation_ref",
            Self::InstrumentHost => "instrument_host_ref",
            Self::Instrument => "instrument_ref",
            Self::Target => "target_ref",
        }
    }

    /// Output field carrying the display name of the resolved identifier.
    #[must_use]
    pub fn facet_field(self) -> &'static str {
        match self {
            Self::Investigation => "facet_investigation_name",
            Self::InstrumentHost => "facet_instrument_host_name",
            Self::Instrument => "facet_instrument_name",
            Self::Target => "facet_target_name",
        }
    }

    #[must_use]
    pub fn from_source_field(field: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.source_field() == field)
    }
}

impl fmt::Display for ReferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ref_field())
    }
}

/// One canonical identifier a legacy reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReference {
    /// Canonical identifier, sanitized for element text.
    pub identifier: String,
    /// Canonical display name, sanitized; absent when the table has no name
    /// for the identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_fields_round_trip() {
        for category in ReferenceCategory::ALL {
            assert_eq!(
                ReferenceCategory::from_source_field(category.source_field()),
                Some(category)
            );
        }
        assert_eq!(ReferenceCategory::from_source_field("data_set_id"), None);
    }

    #[test]
    fn display_uses_report_label() {
        assert_eq!(ReferenceCategory::Target.to_string(), "target_ref");
        assert_eq!(
            ReferenceCategory::InstrumentHost.facet_field(),
            "facet_instrument_host_name"
        );
    }
}
