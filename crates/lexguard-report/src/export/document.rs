//! Self-contained export document with inline styles.
//!
//! Built directly from [`ReportData`], independent of the terminal view, so
//! the exported layout stays fixed whatever happens to the screen output.

use chrono::NaiveDate;
use lexguard_core::{ConflictEntry, FeatureRecord, LawProvisionRecord, ReportData};

use crate::screen::{
    banner_detail, banner_title, conflict_heading, conflict_reasoning, feature_heading,
    jurisdiction, primary_count_label, primary_heading, project_label, provision_heading,
    subtitle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const INK: Rgb = Rgb(17, 24, 39);
    pub const MUTED: Rgb = Rgb(75, 85, 99);
    pub const DANGER: Rgb = Rgb(153, 27, 27);
    pub const DANGER_BG: Rgb = Rgb(254, 242, 242);
    pub const OK: Rgb = Rgb(22, 101, 52);
    pub const OK_BG: Rgb = Rgb(240, 253, 244);
    pub const PANEL_BG: Rgb = Rgb(243, 244, 246);
}

/// Inline style of one block, in CSS pixels at 1x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub indent: f32,
    pub space_before: f32,
    pub background: Option<Rgb>,
}

impl Style {
    const fn new(size: f32, bold: bool, color: Rgb) -> Self {
        Self {
            size,
            bold,
            color,
            indent: 0.0,
            space_before: 0.0,
            background: None,
        }
    }

    pub const TITLE: Style = Style::new(24.0, true, Rgb::INK);
    pub const SUBTITLE: Style = Style::new(14.0, false, Rgb::MUTED);
    pub const HEADING: Style = Style {
        space_before: 18.0,
        ..Style::new(18.0, true, Rgb::INK)
    };
    pub const CARD_TITLE: Style = Style {
        space_before: 10.0,
        indent: 8.0,
        ..Style::new(13.0, true, Rgb::INK)
    };
    pub const FIELD: Style = Style {
        indent: 16.0,
        ..Style::new(11.0, false, Rgb::MUTED)
    };
    pub const REASONING: Style = Style {
        indent: 16.0,
        space_before: 4.0,
        background: Some(Rgb::PANEL_BG),
        ..Style::new(11.0, false, Rgb::INK)
    };

    fn banner(has_conflicts: bool, bold: bool) -> Style {
        let (color, background) = if has_conflicts {
            (Rgb::DANGER, Rgb::DANGER_BG)
        } else {
            (Rgb::OK, Rgb::OK_BG)
        };
        Style {
            background: Some(background),
            space_before: if bold { 16.0 } else { 0.0 },
            ..Style::new(if bold { 15.0 } else { 12.0 }, bold, color)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub text: String,
    pub style: Style,
}

/// Ordered blocks of the exported report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportDocument {
    pub blocks: Vec<Block>,
}

impl ExportDocument {
    pub fn build(report: &ReportData, generated_on: NaiveDate) -> Self {
        let kind = report.kind();
        let mut doc = ExportDocument::default();

        doc.push("Compliance Report", Style::TITLE);
        doc.push(subtitle(kind), Style::SUBTITLE);
        doc.push(
            format!("Generated on {}", generated_on.format("%Y-%m-%d")),
            Style::SUBTITLE,
        );
        if !report.message.is_empty() {
            doc.push(&report.message, Style::SUBTITLE);
        }

        let has_conflicts = report.has_conflicts();
        doc.push(banner_title(has_conflicts), Style::banner(has_conflicts, true));
        doc.push(banner_detail(report), Style::banner(has_conflicts, false));

        if !report.primary.is_empty() {
            doc.push(
                format!("{} ({})", primary_heading(kind), report.primary.len()),
                Style::HEADING,
            );
            for f in report.features() {
                doc.feature_card(f);
            }
            for p in report.provisions() {
                doc.provision_card(p);
            }
        }

        if has_conflicts {
            doc.push(
                format!("{} ({})", conflict_heading(kind), report.conflicts.len()),
                Style::HEADING,
            );
            for entry in &report.conflicts {
                match entry {
                    ConflictEntry::Provision(p) => doc.provision_card(p),
                    ConflictEntry::Feature(f) => doc.feature_card(f),
                }
                if let Some(reasoning) = conflict_reasoning(entry, kind) {
                    doc.push(format!("Reasoning: {reasoning}"), Style::REASONING);
                }
            }
        }

        let summary = report.summary();
        doc.push("Summary", Style::HEADING);
        doc.field(primary_count_label(kind), &summary.primary_count.to_string());
        doc.field("Conflicts found", &summary.conflict_count.to_string());
        doc.field("Status", if summary.success { "Success" } else { "Failed" });

        doc
    }

    fn push(&mut self, text: impl Into<String>, style: Style) {
        self.blocks.push(Block {
            text: text.into(),
            style,
        });
    }

    fn field(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.push(format!("{label}: {value}"), Style::FIELD);
        }
    }

    fn feature_card(&mut self, f: &FeatureRecord) {
        self.push(feature_heading(f), Style::CARD_TITLE);
        self.field("Type", &f.feature_type);
        self.field("Project", &project_label(f));
        self.field("Description", &f.feature_description);
        self.field("Reference", &f.reference_file);
    }

    fn provision_card(&mut self, p: &LawProvisionRecord) {
        self.push(provision_heading(p), Style::CARD_TITLE);
        self.field("Provision ID", &p.provision_id.to_string());
        self.field("Code", &p.provision_code);
        self.field("Jurisdiction", &jurisdiction(p));
        self.field("Text", &p.provision_body);
        let labels: Vec<&str> = p.relevant_labels.iter().map(|s| s.as_str()).collect();
        self.field("Labels", &labels.join(", "));
        self.field("Reference", &p.reference_file);
    }
}
