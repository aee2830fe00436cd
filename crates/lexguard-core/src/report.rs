//! Canonical compliance report, independent of which upload produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{Category, FeatureRecord, LawProvisionRecord};

/// What kind of document was uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Feature,
    Law,
}

impl ReportKind {
    /// Wire discriminator used by the backend (`"feature"` / `"law"`).
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Feature => "feature",
            ReportKind::Law => "law",
        }
    }

    /// Parse the wire discriminator. Anything else is unrecognised.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "feature" => Some(ReportKind::Feature),
            "law" => Some(ReportKind::Law),
            _ => None,
        }
    }

    /// Category of the analysed records.
    pub fn primary_category(self) -> Category {
        match self {
            ReportKind::Feature => Category::Feature,
            ReportKind::Law => Category::Provision,
        }
    }

    /// Category of the conflicts: always the opposite of the primary records.
    pub fn conflict_category(self) -> Category {
        match self {
            ReportKind::Feature => Category::Provision,
            ReportKind::Law => Category::Feature,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record flagged by the backend as potentially incompatible with the upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "record", rename_all = "lowercase")]
pub enum ConflictEntry {
    Provision(LawProvisionRecord),
    Feature(FeatureRecord),
}

impl ConflictEntry {
    pub fn category(&self) -> Category {
        match self {
            ConflictEntry::Provision(_) => Category::Provision,
            ConflictEntry::Feature(_) => Category::Feature,
        }
    }

    pub fn reasoning(&self) -> Option<&str> {
        match self {
            ConflictEntry::Provision(p) => p.reasoning.as_deref(),
            ConflictEntry::Feature(f) => f.reasoning.as_deref(),
        }
    }
}

/// The analysed records of an upload. Only one side is ever populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum PrimaryRecords {
    #[serde(rename = "feature")]
    Features(Vec<FeatureRecord>),
    #[serde(rename = "law")]
    Provisions(Vec<LawProvisionRecord>),
}

impl PrimaryRecords {
    pub fn len(&self) -> usize {
        match self {
            PrimaryRecords::Features(v) => v.len(),
            PrimaryRecords::Provisions(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalized result of one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub primary: PrimaryRecords,
    pub conflicts: Vec<ConflictEntry>,
    pub message: String,
    pub success: bool,
}

/// Headline counters shown under every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub primary_count: usize,
    pub conflict_count: usize,
    pub success: bool,
}

impl ReportData {
    pub fn kind(&self) -> ReportKind {
        match self.primary {
            PrimaryRecords::Features(_) => ReportKind::Feature,
            PrimaryRecords::Provisions(_) => ReportKind::Law,
        }
    }

    /// Analysed features; empty for law reports.
    pub fn features(&self) -> &[FeatureRecord] {
        match &self.primary {
            PrimaryRecords::Features(v) => v,
            PrimaryRecords::Provisions(_) => &[],
        }
    }

    /// Analysed provisions; empty for feature reports.
    pub fn provisions(&self) -> &[LawProvisionRecord] {
        match &self.primary {
            PrimaryRecords::Provisions(v) => v,
            PrimaryRecords::Features(_) => &[],
        }
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            primary_count: self.primary.len(),
            conflict_count: self.conflicts.len(),
            success: self.success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn law_report() -> ReportData {
        ReportData {
            primary: PrimaryRecords::Provisions(vec![LawProvisionRecord::default()]),
            conflicts: vec![
                ConflictEntry::Feature(FeatureRecord::default()),
                ConflictEntry::Feature(FeatureRecord::default()),
            ],
            message: "law uploaded successfully".into(),
            success: true,
        }
    }

    #[test]
    fn categories_are_opposite() {
        for kind in [ReportKind::Feature, ReportKind::Law] {
            assert_ne!(kind.primary_category(), kind.conflict_category());
        }
    }

    #[test]
    fn wire_discriminator() {
        assert_eq!(ReportKind::from_wire("feature"), Some(ReportKind::Feature));
        assert_eq!(ReportKind::from_wire("law"), Some(ReportKind::Law));
        assert_eq!(ReportKind::from_wire("Law"), None);
        assert_eq!(ReportKind::Law.to_string(), "law");
    }

    #[test]
    fn kind_follows_primary_records() {
        let report = law_report();
        assert_eq!(report.kind(), ReportKind::Law);
        assert_eq!(report.provisions().len(), 1);
        assert!(report.features().is_empty());
    }

    #[test]
    fn summary_tracks_live_data() {
        let mut report = law_report();
        assert_eq!(
            report.summary(),
            ReportSummary {
                primary_count: 1,
                conflict_count: 2,
                success: true,
            }
        );
        report.conflicts.pop();
        assert_eq!(report.summary().conflict_count, 1);
    }

    #[test]
    fn conflict_entry_serialises_with_category_tag() {
        let entry = ConflictEntry::Feature(FeatureRecord {
            feature_title: "Auto-tracking".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["category"], "feature");
        assert_eq!(json["record"]["feature_title"], "Auto-tracking");
    }
}
