//! Core types for LexGuard: feature and law provision records, the canonical
//! compliance report, and the normalizer that builds it from backend payloads.

pub mod catalog;
pub mod normalize;
pub mod record;
pub mod report;

pub use catalog::{FeatureQuery, ProvisionQuery, distinct};
pub use normalize::{
    NormalizeError, RedirectReason, ReportEntry, enter_report, normalize, normalize_str,
};
pub use record::{Category, FeatureRecord, LawProvisionRecord, RecordId};
pub use report::{ConflictEntry, PrimaryRecords, ReportData, ReportKind, ReportSummary};
