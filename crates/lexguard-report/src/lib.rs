//! Rendering layer: terminal report and catalog views, static PDF export.

pub mod catalog;
pub mod export;
pub mod screen;

pub use catalog::{write_feature_list, write_provision_list};
pub use export::{ExportError, export_filename, export_pdf, render_pdf};
pub use screen::{render_screen, write_report};
