//! Catalog list views for stored features and law provisions.

use std::io::{self, Write};

use lexguard_core::{FeatureRecord, LawProvisionRecord};

use crate::screen::{write_feature_card, write_provision_card};

/// Print the filtered feature catalog with a `Showing N of M` footer.
pub fn write_feature_list(
    w: &mut impl Write,
    shown: &[&FeatureRecord],
    total: usize,
) -> io::Result<()> {
    writeln!(w, "=== Features ===")?;
    if shown.is_empty() {
        writeln!(w, "No features match the current filters.")?;
    }
    for f in shown {
        write_feature_card(w, f)?;
    }
    writeln!(w)?;
    writeln!(w, "Showing {} of {} features", shown.len(), total)
}

/// Print the filtered law provision catalog with a `Showing N of M` footer.
pub fn write_provision_list(
    w: &mut impl Write,
    shown: &[&LawProvisionRecord],
    total: usize,
) -> io::Result<()> {
    writeln!(w, "=== Law Provisions ===")?;
    if shown.is_empty() {
        writeln!(w, "No law provisions match the current filters.")?;
    }
    for p in shown {
        write_provision_card(w, p)?;
    }
    writeln!(w)?;
    writeln!(w, "Showing {} of {} law provisions", shown.len(), total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexguard_core::{FeatureQuery, ProvisionQuery, RecordId};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn feature_list_footer_counts_filtered_rows() {
        let all = vec![
            FeatureRecord {
                feature_id: RecordId::Number(1),
                feature_title: "Login Feature".into(),
                feature_type: "Security".into(),
                ..Default::default()
            },
            FeatureRecord {
                feature_id: RecordId::Number(2),
                feature_title: "Signup Feature".into(),
                feature_type: "Onboarding".into(),
                ..Default::default()
            },
        ];
        let query = FeatureQuery {
            feature_type: Some("Security".into()),
            ..Default::default()
        };
        let shown = query.apply(&all);
        let out = render(|w| write_feature_list(w, &shown, all.len()));
        assert!(out.contains("#1 Login Feature"));
        assert!(!out.contains("Signup Feature"));
        assert!(out.ends_with("Showing 1 of 2 features\n"));
    }

    #[test]
    fn empty_provision_list_says_so() {
        let all = vec![LawProvisionRecord {
            provision_id: RecordId::Text("CCPA-1".into()),
            country: "USA".into(),
            ..Default::default()
        }];
        let query = ProvisionQuery {
            country: Some("SG".into()),
            ..Default::default()
        };
        let shown = query.apply(&all);
        let out = render(|w| write_provision_list(w, &shown, all.len()));
        assert!(out.contains("No law provisions match the current filters."));
        assert!(out.contains("Showing 0 of 1 law provisions"));
    }
}
