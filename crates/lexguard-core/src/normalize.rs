//! Response normalizer: turns the two backend upload shapes into one [`ReportData`].
//!
//! A feature upload answers with
//!
//! ```json
//! { "success": true,
//!   "response": { "type": "feature", "features": [...],
//!                 "conflict": [ { "201": [provision, ...] }, ... ],
//!                 "message": "..." } }
//! ```
//!
//! and a law upload with the same envelope carrying `"type": "law"`,
//! `provisions` instead of `features`, and features inside `conflict`.
//!
//! Normalization branches only on `response.type`. Optional arrays default to
//! empty; anything structurally wrong is rejected as a whole.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::record::{FeatureRecord, LawProvisionRecord};
use crate::report::{ConflictEntry, PrimaryRecords, ReportData, ReportKind};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no `response` object")]
    MissingResponse,
    #[error("`response.type` is missing")]
    MissingKind,
    #[error("unrecognised report type {0:?}")]
    UnknownKind(String),
    #[error("field `{field}` is malformed: {source}")]
    Field {
        field: &'static str,
        source: serde_json::Error,
    },
    #[error("conflict group {index} ({label:?}) is malformed: {source}")]
    MalformedConflict {
        index: usize,
        label: String,
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    response: Option<Value>,
}

/// Normalize a parsed backend payload.
pub fn normalize(raw: &Value) -> Result<ReportData, NormalizeError> {
    normalize_owned(raw.clone())
}

/// Parse and normalize a backend payload held as text.
pub fn normalize_str(raw: &str) -> Result<ReportData, NormalizeError> {
    let value: Value = serde_json::from_str(raw)?;
    normalize_owned(value)
}

fn normalize_owned(raw: Value) -> Result<ReportData, NormalizeError> {
    let envelope: Envelope = serde_json::from_value(raw)?;
    let mut response = match envelope.response {
        Some(Value::Object(map)) => map,
        _ => return Err(NormalizeError::MissingResponse),
    };

    let kind = match response.get("type") {
        Some(Value::String(s)) => {
            ReportKind::from_wire(s).ok_or_else(|| NormalizeError::UnknownKind(s.clone()))?
        }
        Some(Value::Null) | None => return Err(NormalizeError::MissingKind),
        Some(other) => return Err(NormalizeError::UnknownKind(other.to_string())),
    };

    let message: String = take_optional(&mut response, "message")?.unwrap_or_default();
    let groups: Vec<Map<String, Value>> =
        take_optional(&mut response, "conflict")?.unwrap_or_default();

    let (primary, conflicts) = match kind {
        ReportKind::Feature => {
            let features: Vec<FeatureRecord> =
                take_optional(&mut response, "features")?.unwrap_or_default();
            let conflicts =
                flatten_conflicts::<LawProvisionRecord>(groups, ConflictEntry::Provision)?;
            (PrimaryRecords::Features(features), conflicts)
        }
        ReportKind::Law => {
            let provisions: Vec<LawProvisionRecord> =
                take_optional(&mut response, "provisions")?.unwrap_or_default();
            let conflicts = flatten_conflicts::<FeatureRecord>(groups, ConflictEntry::Feature)?;
            (PrimaryRecords::Provisions(provisions), conflicts)
        }
    };

    debug!(
        kind = %kind,
        primary = primary.len(),
        conflicts = conflicts.len(),
        "normalized upload response"
    );

    Ok(ReportData {
        primary,
        conflicts,
        message,
        success: envelope.success.unwrap_or(false),
    })
}

/// Remove `key` from `obj` and decode it. Absent and `null` both yield `None`.
fn take_optional<T: DeserializeOwned>(
    obj: &mut Map<String, Value>,
    key: &'static str,
) -> Result<Option<T>, NormalizeError> {
    match obj.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v)
            .map(Some)
            .map_err(|source| NormalizeError::Field { field: key, source }),
    }
}

/// Concatenate every group's records in outer order, then key order, then
/// array order, tagging each with its category.
fn flatten_conflicts<C: DeserializeOwned>(
    groups: Vec<Map<String, Value>>,
    tag: fn(C) -> ConflictEntry,
) -> Result<Vec<ConflictEntry>, NormalizeError> {
    let mut conflicts = Vec::new();
    for (index, group) in groups.into_iter().enumerate() {
        for (label, records) in group {
            let records: Vec<C> = serde_json::from_value(records).map_err(|source| {
                NormalizeError::MalformedConflict {
                    index,
                    label: label.clone(),
                    source,
                }
            })?;
            conflicts.extend(records.into_iter().map(tag));
        }
    }
    Ok(conflicts)
}

/// Why the report view could not be shown.
#[derive(Debug)]
pub enum RedirectReason {
    /// No upload result was handed over.
    MissingResult,
    /// The handed-over result could not be normalized.
    Malformed(NormalizeError),
}

/// Outcome of entering the report view.
///
/// The view either has a complete report to show or sends the user back to
/// the upload start. There is no partial state in between.
#[derive(Debug)]
pub enum ReportEntry {
    Ready(ReportData),
    RedirectToUpload(RedirectReason),
}

/// Enter the report view with the most recent raw upload result, if any.
pub fn enter_report(stored: Option<&str>) -> ReportEntry {
    let Some(raw) = stored else {
        warn!("no upload result available, redirecting to upload");
        return ReportEntry::RedirectToUpload(RedirectReason::MissingResult);
    };
    match normalize_str(raw) {
        Ok(report) => ReportEntry::Ready(report),
        Err(e) => {
            warn!(error = %e, "upload result is malformed, redirecting to upload");
            ReportEntry::RedirectToUpload(RedirectReason::Malformed(e))
        }
    }
}
