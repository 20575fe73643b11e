//! A rendered blog page loaded from disk.
//!
//! The HTML is parsed once with `scraper`; the title and every article get a
//! block from [`crate::layout`]. Scrolling and resizing only move the
//! viewport over those fixed blocks.

use crate::layout::{Block, LayoutMetrics, TITLE_LINE_SCALE, block_height, stack_blocks, wrapped_line_count};
use anyhow::{Context, Result, anyhow};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use waymark_core::config::AppConfig;
use waymark_core::dom::{DomSurface, Rect};

/// Read and parse an HTML file.
pub fn read_page(path: &Path) -> Result<Html> {
    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let html = Html::parse_document(&data);
    if !html.errors.is_empty() {
        debug!(
            path = %path.display(),
            errors = html.errors.len(),
            "HTML parsed with recoverable errors"
        );
    }
    Ok(html)
}

pub struct RenderedPage<'a> {
    html: &'a Html,
    blocks: Vec<(ElementRef<'a>, Block)>,
    title: Option<ElementRef<'a>>,
    title_margin_bottom: f64,
    document_height: f64,
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl<'a> RenderedPage<'a> {
    /// Lay out the title and the articles matched by the configured selector.
    pub fn layout(html: &'a Html, config: &AppConfig) -> Result<Self> {
        let metrics = LayoutMetrics::from(config);
        let article_selector = Selector::parse(&config.article_selector)
            .map_err(|err| anyhow!("Invalid article selector {:?}: {err:?}", config.article_selector))?;
        let image_selector =
            Selector::parse("img").map_err(|err| anyhow!("Invalid image selector: {err:?}"))?;

        let mut blocks = Vec::new();
        let mut cursor = metrics.title_top;

        let title = find_by_id(html, &config.title_id);
        match title {
            Some(title) => {
                let lines = wrapped_line_count(&title.inner_html(), metrics.chars_per_line);
                let height = lines.max(1) as f64 * metrics.line_height * TITLE_LINE_SCALE;
                let block = Block {
                    top: cursor,
                    bottom: cursor + height,
                };
                cursor = block.bottom + metrics.title_margin_bottom.max(0.0);
                blocks.push((title, block));
            }
            None => warn!(title_id = %config.title_id, "Page has no title element"),
        }

        let articles: Vec<ElementRef<'a>> = html.select(&article_selector).collect();
        let heights: Vec<f64> = articles
            .iter()
            .map(|article| {
                let lines = wrapped_line_count(&article.inner_html(), metrics.chars_per_line);
                let images = article.select(&image_selector).count();
                block_height(lines, images, &metrics)
            })
            .collect();
        let article_blocks = stack_blocks(&heights, cursor, metrics.article_gap);
        let document_height = article_blocks
            .last()
            .map(|block| block.bottom)
            .unwrap_or(cursor)
            + metrics.article_gap;
        blocks.extend(articles.into_iter().zip(article_blocks));

        info!(
            articles = heights.len(),
            document_height,
            "Laid out page"
        );

        Ok(RenderedPage {
            html,
            blocks,
            title,
            title_margin_bottom: metrics.title_margin_bottom,
            document_height,
            scroll_y: 0.0,
            viewport_width: config.viewport_width.max(0.0),
            viewport_height: config.viewport_height.max(0.0),
        })
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Scroll like a browser would: clamped to the scrollable range.
    pub fn scroll_to(&mut self, y: f64) -> f64 {
        let y = if y.is_finite() { y } else { 0.0 };
        self.scroll_y = y.clamp(0.0, self.max_scroll());
        self.scroll_y
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.scroll_to(self.scroll_y);
    }

    /// Document-space top of the block holding the element with `id`.
    pub fn anchor_top(&self, id: &str) -> Option<f64> {
        let element = find_by_id(self.html, id)?;
        self.block_of(&element).map(|block| block.top)
    }

    /// The element's own block, or the block of its nearest laid-out
    /// ancestor.
    fn block_of(&self, element: &ElementRef<'a>) -> Option<Block> {
        self.own_block(element).or_else(|| {
            element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find_map(|ancestor| self.own_block(&ancestor))
        })
    }

    fn own_block(&self, element: &ElementRef<'a>) -> Option<Block> {
        self.blocks
            .iter()
            .find(|(candidate, _)| candidate == element)
            .map(|(_, block)| *block)
    }
}

fn find_by_id<'a>(html: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    html.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().id() == Some(id))
}

impl<'a> DomSurface for RenderedPage<'a> {
    type Element = ElementRef<'a>;

    fn query_selector_all(&self, selector: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(err) => {
                warn!(selector, "Invalid selector: {err:?}");
                Vec::new()
            }
        }
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef<'a>> {
        find_by_id(self.html, id)
    }

    fn attribute(&self, element: &ElementRef<'a>, name: &str) -> Option<String> {
        element.value().attr(name).map(str::to_string)
    }

    fn bounding_client_rect(&self, element: &ElementRef<'a>) -> Rect {
        self.block_of(element)
            .map(|block| Rect::new(block.top - self.scroll_y, block.bottom - self.scroll_y))
            .unwrap_or_default()
    }

    fn margin_bottom(&self, element: &ElementRef<'a>) -> f64 {
        if self.title.as_ref() == Some(element) {
            self.title_margin_bottom
        } else {
            0.0
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}
