//! Feature and law provision records as served by the analysis backend.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a stored record.
///
/// The backend emits numeric ids (`101`), hand-curated law data uses string
/// codes (`"CCPA-1"`). Both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Text(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// Which side of a compliance check a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Feature,
    Provision,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Feature => f.write_str("feature"),
            Category::Provision => f.write_str("law provision"),
        }
    }
}

/// A product capability checked for legal conflicts.
///
/// `reasoning` is only populated when the feature is reported as a conflict
/// of an uploaded law.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub feature_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub feature_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub feature_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub feature_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub reference_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// An atomic clause of a law or regulation.
///
/// The backend serialises the identifier as `id`; `provision_id` is accepted
/// as well. `reasoning` is only populated when the provision is reported as a
/// conflict of an uploaded feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LawProvisionRecord {
    #[serde(rename = "id", alias = "provision_id", deserialize_with = "null_as_default")]
    pub provision_id: RecordId,
    #[serde(deserialize_with = "null_as_default")]
    pub provision_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provision_body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provision_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub law_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub relevant_labels: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub reference_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Backend rows may carry `null` for unset columns; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_from_backend_json() {
        let json = r#"{
            "feature_id": 101,
            "feature_title": "Login Feature",
            "feature_description": "Secure login with multi-factor authentication",
            "feature_type": "Security",
            "project_name": "Auth System",
            "reference_file": "feature_dataset/0000 - gamma j.pdf",
            "project_id": 1001,
            "reasoning": "Multi-factor authentication enhances security"
        }"#;
        let parsed: FeatureRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.feature_id, RecordId::Number(101));
        assert_eq!(parsed.project_id.to_string(), "1001");
        assert_eq!(
            parsed.reasoning.as_deref(),
            Some("Multi-factor authentication enhances security")
        );
    }

    #[test]
    fn provision_accepts_id_and_provision_id() {
        let by_id: LawProvisionRecord =
            serde_json::from_str(r#"{"id": 1, "provision_title": "Section 1"}"#).unwrap();
        let by_alias: LawProvisionRecord =
            serde_json::from_str(r#"{"provision_id": "CCPA-1", "provision_title": "Sec"}"#)
                .unwrap();
        assert_eq!(by_id.provision_id, RecordId::Number(1));
        assert_eq!(by_alias.provision_id, RecordId::Text("CCPA-1".into()));
    }

    #[test]
    fn relevant_labels_are_a_set() {
        let parsed: LawProvisionRecord = serde_json::from_str(
            r#"{"id": 2, "relevant_labels": ["privacy", "consent", "privacy"]}"#,
        )
        .unwrap();
        let labels: Vec<&str> = parsed.relevant_labels.iter().map(|s| s.as_str()).collect();
        assert_eq!(labels, vec!["consent", "privacy"]);
    }

    #[test]
    fn null_fields_default() {
        let parsed: LawProvisionRecord = serde_json::from_str(
            r#"{"id": 3, "region": null, "relevant_labels": null, "reasoning": null}"#,
        )
        .unwrap();
        assert_eq!(parsed.region, "");
        assert!(parsed.relevant_labels.is_empty());
        assert!(parsed.reasoning.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let parsed: FeatureRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.feature_title, "");
        assert!(parsed.reasoning.is_none());
    }

    #[test]
    fn reasoning_omitted_when_absent() {
        let record = LawProvisionRecord {
            provision_id: "GDPR-6".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("reasoning"));
        assert!(json.contains(r#""id":"GDPR-6""#));
    }
}
