//! Decides which article the reader is currently looking at.

use crate::dom::{Article, Articles, DomSurface, Rect};

/// Share of the viewport height above which an article title counts as read.
pub const DEFAULT_SCROLL_LIMIT_RATIO: f64 = 2.0 / 3.0;

pub fn scroll_limit(viewport_height: f64, ratio: f64) -> f64 {
    viewport_height.max(0.0) * ratio
}

/// Core heuristic over a document-order sequence of `(item, box)` pairs.
///
/// A title at or below the top edge (but above `limit`) wins immediately.
/// Otherwise the last article whose body still reaches into the viewport is
/// kept. Iteration stops at the first article starting below `limit`, since
/// articles are stacked in render order.
pub fn detect<T>(items: impl IntoIterator<Item = (T, Rect)>, limit: f64) -> Option<T> {
    let mut current = None;

    for (item, rect) in items {
        if rect.top > limit {
            break;
        }
        if rect.top >= 0.0 {
            return Some(item);
        }
        if rect.bottom >= 0.0 {
            current = Some(item);
        }
    }

    current
}

/// Run [`detect`] over the page's articles. The limit is recomputed from the
/// live viewport height on every call.
pub fn detect_current_article<'a, D: DomSurface>(
    articles: &'a Articles<'_, D>,
    ratio: f64,
) -> Option<Article<'a, D>> {
    let limit = scroll_limit(articles.dom().viewport_height(), ratio);
    detect(
        articles
            .iter()
            .map(|article| (article, article.bounding_box())),
        limit,
    )
}
