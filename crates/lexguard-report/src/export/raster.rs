//! Lays an [`ExportDocument`] out on a fixed-width canvas.
//!
//! The canvas is a vector stand-in for a bitmap: every line of text becomes
//! a positioned run and every block background a filled rectangle, all in
//! canvas pixels at the chosen upscale factor. A line that would cross an A4
//! page break is moved below the top margin of the next page, so cutting the
//! canvas into bands never splits text.

use std::borrow::Cow;

use super::document::{ExportDocument, Rgb};
use super::paginate::a4_page_height;

/// A4 width in CSS pixels at 96 dpi.
pub const BASE_WIDTH_PX: u32 = 794;

/// Line height relative to font size.
const LINE_HEIGHT: f32 = 1.4;
/// Average Helvetica advance relative to font size.
const REGULAR_ADVANCE: f32 = 0.5;
const BOLD_ADVANCE: f32 = 0.55;
/// Inner padding of blocks with a background.
const PANEL_PADDING: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub scale: f32,
    pub width_px: u32,
    pub margin_px: f32,
    pub background: Rgb,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            width_px: BASE_WIDTH_PX,
            margin_px: 40.0,
            background: Rgb::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub top: f32,
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

/// Laid-out document, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub fills: Vec<Fill>,
    pub runs: Vec<TextRun>,
}

pub fn rasterize(doc: &ExportDocument, opts: &RasterOptions) -> Canvas {
    let scale = opts.scale;
    let width = (opts.width_px as f32 * scale).round() as u32;
    let margin = opts.margin_px * scale;
    let content_width = width as f32 - 2.0 * margin;
    let page_height = a4_page_height(width).get() as f32;

    let mut fills = Vec::new();
    let mut runs = Vec::new();
    let mut y = margin;

    for block in &doc.blocks {
        let style = &block.style;
        let size = style.size * scale;
        let line_height = size * LINE_HEIGHT;
        let padding = if style.background.is_some() {
            PANEL_PADDING * scale
        } else {
            0.0
        };
        let x = margin + style.indent * scale + padding;
        let available = (content_width - style.indent * scale - 2.0 * padding).max(size);
        let advance = size * if style.bold { BOLD_ADVANCE } else { REGULAR_ADVANCE };
        let max_chars = ((available / advance).floor() as usize).max(1);

        y += style.space_before * scale;
        let block_top = keep_on_page(y, padding + line_height, page_height, margin);

        let mut line_top = block_top + padding;
        for line in wrap(&block.text, max_chars) {
            line_top = keep_on_page(line_top, line_height, page_height, margin);
            runs.push(TextRun {
                x,
                top: line_top,
                size,
                bold: style.bold,
                color: style.color,
                text: line,
            });
            line_top += line_height;
        }
        let block_bottom = line_top + padding;

        if let Some(color) = style.background {
            fills.push(Fill {
                x: margin + style.indent * scale,
                top: block_top,
                width: content_width - style.indent * scale,
                height: block_bottom - block_top,
                color,
            });
        }
        y = block_bottom;
    }

    Canvas {
        width,
        height: (y + margin).ceil() as u32,
        background: opts.background,
        fills,
        runs,
    }
}

/// Start a box of `height` at `top`, or at the top margin of the next page
/// when it would cross a page break.
fn keep_on_page(top: f32, height: f32, page_height: f32, page_margin: f32) -> f32 {
    let page_end = ((top / page_height).floor() + 1.0) * page_height;
    if top + height <= page_end {
        top
    } else {
        page_end + page_margin
    }
}

/// Greedy word wrap on character counts. Words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let options = textwrap::Options::new(max_chars)
        .break_words(true)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(text, options)
        .into_iter()
        .map(Cow::into_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::document::{Block, Style};

    fn doc(texts: &[&str]) -> ExportDocument {
        ExportDocument {
            blocks: texts
                .iter()
                .map(|t| Block {
                    text: t.to_string(),
                    style: Style::FIELD,
                })
                .collect(),
        }
    }

    #[test]
    fn wrap_keeps_short_lines() {
        assert_eq!(
            wrap("User data must be encrypted", 80),
            vec!["User data must be encrypted"]
        );
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap("Users must consent to terms", 12),
            vec!["Users must", "consent to", "terms"]
        );
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_blank_text_as_one_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn canvas_is_upscaled_with_white_background() {
        let canvas = rasterize(&doc(&["Status: Success"]), &RasterOptions::default());
        assert_eq!(canvas.width, 1588);
        assert_eq!(canvas.background, Rgb::WHITE);
        assert_eq!(canvas.runs.len(), 1);
        assert_eq!(canvas.runs[0].size, 22.0);
    }

    #[test]
    fn height_grows_with_content() {
        let opts = RasterOptions::default();
        let short = rasterize(&doc(&["one"]), &opts);
        let long = rasterize(&doc(&["one"; 200]), &opts);
        assert!(long.height > short.height);
        assert_eq!(long.runs.len(), 200);
        let last = long.runs.last().unwrap();
        assert!((last.top as u32) < long.height);
    }

    #[test]
    fn runs_are_top_to_bottom() {
        let canvas = rasterize(&doc(&["a", "b", "c"]), &RasterOptions::default());
        let tops: Vec<f32> = canvas.runs.iter().map(|r| r.top).collect();
        assert!(tops.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn lines_never_straddle_a_page_break() {
        let opts = RasterOptions::default();
        let canvas = rasterize(&doc(&["Users must consent before data collection"; 400]), &opts);
        let page = a4_page_height(canvas.width).get() as f32;
        assert!(canvas.height as f32 > 3.0 * page);
        for run in &canvas.runs {
            let page_end = ((run.top / page).floor() + 1.0) * page;
            assert!(
                run.top + run.size * LINE_HEIGHT <= page_end,
                "{:?} crosses {page_end}",
                run
            );
        }
    }

    #[test]
    fn pushed_lines_restart_below_the_top_margin() {
        let opts = RasterOptions::default();
        let canvas = rasterize(&doc(&["line"; 400]), &opts);
        let page = a4_page_height(canvas.width).get() as f32;
        let margin = opts.margin_px * opts.scale;
        let first_on_page_two = canvas.runs.iter().find(|r| r.top >= page).unwrap();
        assert_eq!(first_on_page_two.top, page + margin);
    }

    #[test]
    fn background_blocks_produce_fills() {
        let document = ExportDocument {
            blocks: vec![Block {
                text: "Reasoning: Consent ensures lawful processing".into(),
                style: Style::REASONING,
            }],
        };
        let canvas = rasterize(&document, &RasterOptions::default());
        assert_eq!(canvas.fills.len(), 1);
        assert!(canvas.fills[0].top <= canvas.runs[0].top);
    }
}
