//! Resolves the current article to a marker and decides when to pan.

use crate::detector::detect_current_article;
use crate::dom::{Articles, DomSurface};
use crate::markers::{Marker, MarkerRegistry};
use crate::timer::{Debouncer, Timer, TimerHandle};
use std::time::Duration;
use tracing::{debug, trace};

/// Marker shown on first load.
///
/// Falls back from the current article to the next article with a marker,
/// then to the first marker on the page.
pub fn resolve_initial_marker<'r, D: DomSurface>(
    articles: &Articles<'_, D>,
    registry: &'r MarkerRegistry,
    scroll_limit_ratio: f64,
) -> Option<&'r Marker> {
    let marker_of = |index: Option<String>| index.and_then(|index| registry.lookup(&index));

    let current = detect_current_article(articles, scroll_limit_ratio);
    if let Some(article) = current {
        if let Some(marker) = marker_of(article.index()) {
            return Some(marker);
        }
        if let Some(marker) = articles
            .after(article.ordinal())
            .find_map(|later| marker_of(later.index()))
        {
            debug!(
                from = article.ordinal(),
                index = %marker.index,
                "Current article has no marker; using next located article"
            );
            return Some(marker);
        }
    }

    articles
        .iter()
        .find_map(|article| marker_of(article.index()))
}

/// Result of handling one scroll event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// A pan to this marker is (re)scheduled.
    Scheduled { index: String, handle: TimerHandle },
    /// The resolved marker is already on screen and nothing is pending.
    AlreadyShown { index: String },
    /// No current article, or it has no marker.
    NoMarker,
}

/// Debounced pan state for one page session.
#[derive(Debug, Clone)]
pub struct PanCoordinator {
    debouncer: Debouncer,
    scroll_limit_ratio: f64,
    pending_target: Option<String>,
    last_shown: Option<String>,
}

impl PanCoordinator {
    pub fn new(debounce: Duration, scroll_limit_ratio: f64) -> Self {
        PanCoordinator {
            debouncer: Debouncer::new(debounce),
            scroll_limit_ratio,
            pending_target: None,
            last_shown: None,
        }
    }

    pub fn scroll_limit_ratio(&self) -> f64 {
        self.scroll_limit_ratio
    }

    pub fn last_shown(&self) -> Option<&str> {
        self.last_shown.as_deref()
    }

    pub fn pending_target(&self) -> Option<&str> {
        self.pending_target.as_deref()
    }

    /// Record the marker shown by the initial, non-debounced pan.
    pub fn mark_shown(&mut self, index: &str) {
        self.last_shown = Some(index.to_string());
    }

    pub fn on_scroll<D: DomSurface, T: Timer + ?Sized>(
        &mut self,
        articles: &Articles<'_, D>,
        registry: &MarkerRegistry,
        timer: &mut T,
    ) -> ScrollOutcome {
        let marker = detect_current_article(articles, self.scroll_limit_ratio)
            .and_then(|article| article.index())
            .and_then(|index| registry.lookup(&index));
        let Some(marker) = marker else {
            trace!("No marker for current article");
            return ScrollOutcome::NoMarker;
        };

        if self.pending_target.is_none() && self.last_shown.as_deref() == Some(&marker.index) {
            trace!(index = %marker.index, "Marker already shown");
            return ScrollOutcome::AlreadyShown {
                index: marker.index.clone(),
            };
        }

        let handle = self.debouncer.arm(timer);
        self.pending_target = Some(marker.index.clone());
        trace!(index = %marker.index, handle = handle.0, "Scheduled pan");
        ScrollOutcome::Scheduled {
            index: marker.index.clone(),
            handle,
        }
    }

    /// Called when a timer fires; yields the marker index to pan to if the
    /// handle belongs to the pending pan.
    pub fn on_timer(&mut self, handle: TimerHandle) -> Option<String> {
        if !self.debouncer.fire(handle) {
            trace!(handle = handle.0, "Ignoring stale timer");
            return None;
        }
        let target = self.pending_target.take()?;
        self.last_shown = Some(target.clone());
        Some(target)
    }
}
