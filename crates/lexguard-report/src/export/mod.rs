//! Static PDF export of a compliance report.
//!
//! Pipeline: [`ExportDocument::build`] → [`rasterize`] at 2x on a white
//! canvas → [`paginate`] into A4 bands → [`assemble_pdf`]. The result is
//! written through a temporary file in the output directory that is only
//! persisted once the whole document has been produced.

pub mod document;
pub mod paginate;
pub mod pdf;
pub mod raster;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use lexguard_core::{ReportData, ReportKind};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

pub use document::ExportDocument;
pub use paginate::{PageBand, a4_page_height, paginate};
pub use pdf::assemble_pdf;
pub use raster::{Canvas, RasterOptions, rasterize};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot save export to {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A rendered PDF and its page count.
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// `compliance-report-<kind>-<YYYY-MM-DD>.pdf`
pub fn export_filename(kind: ReportKind, date: NaiveDate) -> String {
    format!("compliance-report-{}-{}.pdf", kind, date.format("%Y-%m-%d"))
}

/// Run the whole export pipeline in memory.
pub fn render_pdf(report: &ReportData, generated_on: NaiveDate) -> RenderedPdf {
    let doc = ExportDocument::build(report, generated_on);
    let canvas = rasterize(&doc, &RasterOptions::default());
    let bands = paginate(canvas.height, a4_page_height(canvas.width));
    RenderedPdf {
        bytes: assemble_pdf(&canvas, &bands),
        pages: bands.len(),
    }
}

/// Export `report` into `out_dir` and return the written path.
///
/// Rendering runs on a blocking task. On any failure the temporary file is
/// removed and nothing is left in `out_dir`.
pub async fn export_pdf(
    report: &ReportData,
    out_dir: &Path,
    generated_on: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let report = report.clone();
    let out_dir = out_dir.to_path_buf();
    tokio::task::spawn_blocking(move || write_export(&report, &out_dir, generated_on)).await?
}

fn write_export(
    report: &ReportData,
    out_dir: &Path,
    generated_on: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let rendered = render_pdf(report, generated_on);
    let target = out_dir.join(export_filename(report.kind(), generated_on));

    let mut staged = NamedTempFile::new_in(out_dir)?;
    staged.write_all(&rendered.bytes)?;
    staged.as_file().sync_all()?;
    staged
        .persist(&target)
        .map_err(|e| ExportError::Persist {
            path: target.clone(),
            source: e.error,
        })?;

    info!(
        path = %target.display(),
        pages = rendered.pages,
        bytes = rendered.bytes.len(),
        "exported report"
    );
    Ok(target)
}
