//! Page layout estimation.
//!
//! The native host has no rendering engine, so block heights are
//! approximated: each block's markup is wrapped to a fixed column width and
//! every wrapped line costs one line height, every image a fixed height.
//! Blocks are stacked vertically in document order, like a single-column
//! blog.

use tracing::warn;
use waymark_core::config::AppConfig;

/// Headings are drawn at roughly twice the body line height.
pub const TITLE_LINE_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub line_height: f64,
    pub chars_per_line: usize,
    pub image_height: f64,
    pub article_gap: f64,
    pub title_top: f64,
    pub title_margin_bottom: f64,
}

impl From<&AppConfig> for LayoutMetrics {
    fn from(config: &AppConfig) -> Self {
        LayoutMetrics {
            line_height: config.line_height_px.max(1.0),
            chars_per_line: config.chars_per_line.clamp(20, 400),
            image_height: config.image_height_px.max(0.0),
            article_gap: config.article_gap_px.max(0.0),
            title_top: config.title_top_px.max(0.0),
            title_margin_bottom: config.title_margin_bottom_px,
        }
    }
}

/// Document-space vertical extent of a laid-out element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub top: f64,
    pub bottom: f64,
}

/// Number of lines `fragment` occupies once rendered as wrapped text.
pub fn wrapped_line_count(fragment: &str, chars_per_line: usize) -> usize {
    match html2text::from_read(fragment.as_bytes(), chars_per_line) {
        Ok(text) => text.trim_end().lines().count(),
        Err(err) => {
            warn!(chars_per_line, "html2text failed, estimating from length: {err}");
            fragment.chars().count().div_ceil(chars_per_line.max(1))
        }
    }
}

pub fn block_height(lines: usize, images: usize, metrics: &LayoutMetrics) -> f64 {
    lines.max(1) as f64 * metrics.line_height + images as f64 * metrics.image_height
}

/// Stack `heights` from `start`, separated by `gap`.
pub fn stack_blocks(heights: &[f64], start: f64, gap: f64) -> Vec<Block> {
    let mut cursor = start;
    heights
        .iter()
        .map(|height| {
            let block = Block {
                top: cursor,
                bottom: cursor + height.max(0.0),
            };
            cursor = block.bottom + gap;
            block
        })
        .collect()
}
