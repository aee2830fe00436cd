//! Terminal view of a compliance report.
//!
//! Renders a [`ReportData`] as a status banner, a card per analysed record,
//! a card per conflict, and summary counters. Sections with nothing to show
//! are omitted entirely.

use std::io::{self, Write};

use lexguard_core::{
    Category, ConflictEntry, FeatureRecord, LawProvisionRecord, ReportData, ReportKind,
};

/// Shown in place of missing reasoning on conflicting features.
pub const FEATURE_REASONING_FALLBACK: &str = "No specific reasoning provided.";

const LABEL_WIDTH: usize = 20;

// ── Wording ──

pub fn subtitle(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Feature => "Feature analysis against existing laws",
        ReportKind::Law => "Law analysis against existing features",
    }
}

pub fn banner_title(has_conflicts: bool) -> &'static str {
    if has_conflicts {
        "Compliance Issues Found"
    } else {
        "No Compliance Issues"
    }
}

/// One-line explanation under the banner, with the conflict count pluralised.
pub fn banner_detail(report: &ReportData) -> String {
    let count = report.conflicts.len();
    if count == 0 {
        return "Your submission appears to be compliant with all applicable regulations."
            .to_string();
    }
    let noun = match (report.kind().conflict_category(), count > 1) {
        (Category::Provision, false) => "law provision",
        (Category::Provision, true) => "law provisions",
        (Category::Feature, false) => "feature",
        (Category::Feature, true) => "features",
    };
    format!("Found {count} potential {noun} that require attention.")
}

pub fn primary_heading(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Feature => "Analyzed Features",
        ReportKind::Law => "Analyzed Law Provisions",
    }
}

pub fn conflict_heading(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Feature => "Conflicting Law Provisions",
        ReportKind::Law => "Affected Features",
    }
}

pub fn primary_count_label(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Feature => "Features analyzed",
        ReportKind::Law => "Provisions analyzed",
    }
}

/// Reasoning to display for a conflict, if its panel is shown at all.
///
/// The panel only appears for entries of the report's conflict category,
/// since that is the side the backend computed reasoning for. Features fall
/// back to a canned sentence; provisions have no fallback.
pub fn conflict_reasoning(entry: &ConflictEntry, kind: ReportKind) -> Option<&str> {
    if entry.category() != kind.conflict_category() {
        return None;
    }
    match entry {
        ConflictEntry::Feature(f) => {
            Some(f.reasoning.as_deref().unwrap_or(FEATURE_REASONING_FALLBACK))
        }
        ConflictEntry::Provision(p) => p.reasoning.as_deref(),
    }
}

pub fn feature_heading(f: &FeatureRecord) -> String {
    format!("#{} {}", f.feature_id, f.feature_title)
}

pub fn provision_heading(p: &LawProvisionRecord) -> String {
    if p.law_code.is_empty() {
        p.provision_title.clone()
    } else {
        format!("{} / {}", p.law_code, p.provision_title)
    }
}

// ── Public API ──

/// Write the full report view.
pub fn write_report(w: &mut impl Write, report: &ReportData) -> io::Result<()> {
    let kind = report.kind();

    writeln!(w, "=== Compliance Report ===")?;
    writeln!(w, "{}", subtitle(kind))?;
    if !report.message.is_empty() {
        writeln!(w, "{}", report.message)?;
    }
    writeln!(w)?;

    let marker = if report.has_conflicts() { "[!]" } else { "[ok]" };
    writeln!(w, "{marker} {}", banner_title(report.has_conflicts()))?;
    writeln!(w, "    {}", banner_detail(report))?;
    writeln!(w)?;

    if !report.primary.is_empty() {
        writeln!(w, "{} ({})", primary_heading(kind), report.primary.len())?;
        for f in report.features() {
            write_feature_card(w, f)?;
        }
        for p in report.provisions() {
            write_provision_card(w, p)?;
        }
        writeln!(w)?;
    }

    if report.has_conflicts() {
        writeln!(w, "{} ({})", conflict_heading(kind), report.conflicts.len())?;
        for entry in &report.conflicts {
            match entry {
                ConflictEntry::Provision(p) => write_provision_card(w, p)?,
                ConflictEntry::Feature(f) => write_feature_card(w, f)?,
            }
            if let Some(reasoning) = conflict_reasoning(entry, kind) {
                field(w, "reasoning", reasoning)?;
            }
        }
        writeln!(w)?;
    }

    let summary = report.summary();
    writeln!(w, "Summary")?;
    field(w, primary_count_label(kind), &summary.primary_count.to_string())?;
    field(w, "Conflicts found", &summary.conflict_count.to_string())?;
    field(
        w,
        "Status",
        if summary.success { "success" } else { "failed" },
    )?;
    Ok(())
}

/// Render the report view into a string.
///
/// Writes into an in-memory buffer, whose `io::Write` impl never errors.
pub fn render_screen(report: &ReportData) -> String {
    render_to_string(|buf| write_report(buf, report))
}

fn render_to_string(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
    let mut buf = Vec::new();
    let _ = write(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

// ── Cards ──

pub(crate) fn write_feature_card(w: &mut impl Write, f: &FeatureRecord) -> io::Result<()> {
    writeln!(w, "  {}", feature_heading(f))?;
    field(w, "type", &f.feature_type)?;
    field(w, "project", &project_label(f))?;
    field(w, "description", &f.feature_description)?;
    field(w, "reference", &f.reference_file)?;
    Ok(())
}

pub(crate) fn write_provision_card(w: &mut impl Write, p: &LawProvisionRecord) -> io::Result<()> {
    writeln!(w, "  {}", provision_heading(p))?;
    field(w, "provision id", &p.provision_id.to_string())?;
    field(w, "code", &p.provision_code)?;
    field(w, "jurisdiction", &jurisdiction(p))?;
    field(w, "text", &p.provision_body)?;
    let labels: Vec<&str> = p.relevant_labels.iter().map(|s| s.as_str()).collect();
    field(w, "labels", &labels.join(", "))?;
    field(w, "reference", &p.reference_file)?;
    Ok(())
}

// ── Helpers ──

pub fn jurisdiction(p: &LawProvisionRecord) -> String {
    match (p.country.is_empty(), p.region.is_empty()) {
        (false, false) => format!("{} - {}", p.country, p.region),
        (false, true) => p.country.clone(),
        (true, false) => p.region.clone(),
        (true, true) => String::new(),
    }
}

/// `name (id)`, or whichever of the two is set.
pub fn project_label(f: &FeatureRecord) -> String {
    let id = f.project_id.to_string();
    match (f.project_name.is_empty(), id.is_empty()) {
        (false, false) => format!("{} ({id})", f.project_name),
        (false, true) => f.project_name.clone(),
        (true, false) => id,
        (true, true) => String::new(),
    }
}

/// One aligned `label value` row; empty values are skipped.
fn field(w: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    writeln!(w, "    {:<width$} {}", label, value, width = LABEL_WIDTH)
}
