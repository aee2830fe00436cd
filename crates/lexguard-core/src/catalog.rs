//! Search and facet filters for the feature and law provision catalogs.
//!
//! Search is a case-insensitive substring match over the record's text
//! fields; facets are exact matches. An unset filter matches everything.

use crate::record::{FeatureRecord, LawProvisionRecord};

#[derive(Debug, Clone, Default)]
pub struct FeatureQuery {
    pub search: Option<String>,
    pub feature_type: Option<String>,
    pub project: Option<String>,
}

impl FeatureQuery {
    pub fn matches(&self, feature: &FeatureRecord) -> bool {
        if let Some(term) = needle(&self.search)
            && ![
                &feature.feature_title,
                &feature.feature_description,
                &feature.project_name,
            ]
            .iter()
            .any(|field| contains_ci(field, &term))
        {
            return false;
        }
        facet(&self.feature_type, &feature.feature_type)
            && facet(&self.project, &feature.project_name)
    }

    pub fn apply<'a>(&self, features: &'a [FeatureRecord]) -> Vec<&'a FeatureRecord> {
        features.iter().filter(|f| self.matches(f)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionQuery {
    pub search: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub law_code: Option<String>,
}

impl ProvisionQuery {
    pub fn matches(&self, provision: &LawProvisionRecord) -> bool {
        if let Some(term) = needle(&self.search) {
            let text_hit = [
                &provision.provision_title,
                &provision.provision_body,
                &provision.provision_code,
                &provision.country,
                &provision.region,
                &provision.law_code,
            ]
            .iter()
            .any(|field| contains_ci(field, &term));
            let label_hit = provision
                .relevant_labels
                .iter()
                .any(|label| contains_ci(label, &term));
            if !text_hit && !label_hit {
                return false;
            }
        }
        facet(&self.country, &provision.country)
            && facet(&self.region, &provision.region)
            && facet(&self.law_code, &provision.law_code)
    }

    pub fn apply<'a>(&self, provisions: &'a [LawProvisionRecord]) -> Vec<&'a LawProvisionRecord> {
        provisions.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct values of one field, in first-seen order.
pub fn distinct<'a, T>(records: &'a [T], field: impl Fn(&'a T) -> &'a str) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in records.iter().map(field) {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Lowercased search term, or `None` when blank.
fn needle(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn facet(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().is_none_or(|f| f == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    fn features() -> Vec<FeatureRecord> {
        vec![
            FeatureRecord {
                feature_id: RecordId::Number(1),
                feature_title: "Login Feature".into(),
                feature_description: "Allows users to log in securely".into(),
                feature_type: "Security".into(),
                project_name: "Auth System".into(),
                ..Default::default()
            },
            FeatureRecord {
                feature_id: RecordId::Number(2),
                feature_title: "Signup Feature".into(),
                feature_description: "Allows new users to register".into(),
                feature_type: "Onboarding".into(),
                project_name: "Auth System".into(),
                ..Default::default()
            },
            FeatureRecord {
                feature_id: RecordId::Number(3),
                feature_title: "Auto-tracking".into(),
                feature_description: "Automatic user behavior tracking".into(),
                feature_type: "Analytics".into(),
                project_name: "Insights".into(),
                ..Default::default()
            },
        ]
    }

    fn provisions() -> Vec<LawProvisionRecord> {
        vec![
            LawProvisionRecord {
                provision_id: RecordId::Number(1),
                provision_title: "Section 1".into(),
                provision_body: "Users must consent before data collection".into(),
                country: "SG".into(),
                region: "APAC".into(),
                law_code: "PDPA-201".into(),
                relevant_labels: ["consent".to_string(), "privacy".to_string()].into(),
                ..Default::default()
            },
            LawProvisionRecord {
                provision_id: "CCPA-1".into(),
                provision_title: "Right to know".into(),
                provision_body: "Consumers may request disclosure".into(),
                country: "USA".into(),
                region: "California".into(),
                law_code: "CCPA".into(),
                relevant_labels: ["data".to_string()].into(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn empty_query_matches_all() {
        let all = features();
        assert_eq!(FeatureQuery::default().apply(&all).len(), 3);
    }

    #[test]
    fn feature_search_is_case_insensitive() {
        let all = features();
        let query = FeatureQuery {
            search: Some("TRACKING".into()),
            ..Default::default()
        };
        let hits = query.apply(&all);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].feature_title, "Auto-tracking");
    }

    #[test]
    fn feature_search_covers_project_name() {
        let all = features();
        let query = FeatureQuery {
            search: Some("auth sys".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(&all).len(), 2);
    }

    #[test]
    fn feature_facets_are_exact() {
        let all = features();
        let query = FeatureQuery {
            feature_type: Some("Security".into()),
            project: Some("Auth System".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(&all).len(), 1);

        let partial = FeatureQuery {
            feature_type: Some("Secur".into()),
            ..Default::default()
        };
        assert!(partial.apply(&all).is_empty());
    }

    #[test]
    fn blank_search_is_ignored() {
        let all = features();
        let query = FeatureQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(&all).len(), 3);
    }

    #[test]
    fn provision_search_hits_labels() {
        let all = provisions();
        let query = ProvisionQuery {
            search: Some("Privacy".into()),
            ..Default::default()
        };
        let hits = query.apply(&all);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].law_code, "PDPA-201");
    }

    #[test]
    fn provision_facets_combine() {
        let all = provisions();
        let query = ProvisionQuery {
            country: Some("USA".into()),
            region: Some("California".into()),
            law_code: Some("CCPA".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(&all).len(), 1);

        let mismatch = ProvisionQuery {
            country: Some("USA".into()),
            region: Some("APAC".into()),
            ..Default::default()
        };
        assert!(mismatch.apply(&all).is_empty());
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let all = features();
        assert_eq!(
            distinct(&all, |f| f.project_name.as_str()),
            vec!["Auth System", "Insights"]
        );
        assert_eq!(
            distinct(&all, |f| f.feature_type.as_str()),
            vec!["Security", "Onboarding", "Analytics"]
        );
    }
}
