//! Assembles paginated canvas bands into a PDF file.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::document::Rgb;
use super::paginate::PageBand;
use super::raster::{Canvas, TextRun};

/// A4 in PostScript points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const FONT_REGULAR_ID: Ref = Ref::new(3);
const FONT_BOLD_ID: Ref = Ref::new(4);
const INFO_ID: Ref = Ref::new(5);
const FIRST_PAGE_ID: i32 = 10;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

/// Baseline offset from the top of a run, relative to font size.
const BASELINE: f32 = 1.0;

/// Render one A4 page per band. Each text run lands on the page holding its
/// top edge, which [`rasterize`](super::raster::rasterize) keeps clear of page
/// breaks; background fills are drawn on every page they overlap.
pub fn assemble_pdf(canvas: &Canvas, bands: &[PageBand]) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let k = points_per_pixel(canvas);

    let page_ids: Vec<Ref> = (0..bands.len())
        .map(|i| Ref::new(FIRST_PAGE_ID + 2 * i as i32))
        .collect();

    pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
    pdf.pages(PAGE_TREE_ID)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.type1_font(FONT_REGULAR_ID)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(FONT_BOLD_ID)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.document_info(INFO_ID)
        .title(TextStr("Compliance Report"))
        .producer(TextStr("lexguard"));

    for (band, &page_id) in bands.iter().zip(&page_ids) {
        let content_id = Ref::new(page_id.get() + 1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, A4_WIDTH_PT, A4_HEIGHT_PT));
        page.parent(PAGE_TREE_ID);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(FONT_REGULAR, FONT_REGULAR_ID)
            .pair(FONT_BOLD, FONT_BOLD_ID);
        page.finish();

        let content = page_content(canvas, band, k);
        pdf.stream(content_id, &content);
    }

    pdf.finish()
}

fn page_content(canvas: &Canvas, band: &PageBand, k: f32) -> Vec<u8> {
    let mut content = Content::new();
    let band_top = band.top as f32;
    let band_bottom = band_top + band.height as f32;
    // Canvas y (relative to the band) to PDF y (from the page bottom).
    let to_pdf_y = |canvas_y: f32| A4_HEIGHT_PT - (canvas_y - band_top) * k;

    set_fill(&mut content, canvas.background);
    content.rect(0.0, 0.0, A4_WIDTH_PT, A4_HEIGHT_PT);
    content.fill_nonzero();

    for fill in &canvas.fills {
        let fill_bottom = fill.top + fill.height;
        if fill_bottom <= band_top || fill.top >= band_bottom {
            continue;
        }
        set_fill(&mut content, fill.color);
        content.rect(
            fill.x * k,
            to_pdf_y(fill_bottom),
            fill.width * k,
            fill.height * k,
        );
        content.fill_nonzero();
    }

    for (run, baseline) in placed_runs(canvas, band, k) {
        let font = if run.bold { FONT_BOLD } else { FONT_REGULAR };
        let encoded = win_ansi(&run.text);
        set_fill(&mut content, run.color);
        content.begin_text();
        content.set_font(font, run.size * k);
        content.next_line(run.x * k, baseline);
        content.show(Str(&encoded));
        content.end_text();
    }

    content.finish()
}

/// Text runs drawn on `band`, each with its baseline in PDF points from the
/// page bottom.
pub(crate) fn placed_runs<'a>(
    canvas: &'a Canvas,
    band: &PageBand,
    k: f32,
) -> impl Iterator<Item = (&'a TextRun, f32)> {
    let band_top = band.top as f32;
    let band_bottom = band_top + band.height as f32;
    canvas
        .runs
        .iter()
        .filter(move |run| run.top >= band_top && run.top < band_bottom && !run.text.is_empty())
        .map(move |run| {
            let baseline = A4_HEIGHT_PT - (run.top + run.size * BASELINE - band_top) * k;
            (run, baseline)
        })
}

/// PDF points per canvas pixel when the canvas spans the page width.
pub(crate) fn points_per_pixel(canvas: &Canvas) -> f32 {
    A4_WIDTH_PT / canvas.width.max(1) as f32
}

fn set_fill(content: &mut Content, Rgb(r, g, b): Rgb) {
    content.set_fill_rgb(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    );
}

/// Encode for the standard fonts' WinAnsi encoding. Latin-1 maps directly;
/// anything outside it becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}
