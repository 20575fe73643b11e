//! The map session: every piece of mutable map state, driven by page events.
//!
//! Events go through a pure-ish reducer that records decisions as
//! [`Effect`]s; the effects are then applied to the viewport. Effects the
//! session cannot perform itself come back to the host as [`HostCommand`]s.

use crate::config::AppConfig;
use crate::dom::{Articles, DomSurface};
use crate::error::BuildError;
use crate::events::PageEvent;
use crate::markers::MarkerRegistry;
use crate::pan::{PanCoordinator, ScrollOutcome, resolve_initial_marker};
use crate::timer::Timer;
use crate::viewport::{Breakpoint, LayoutMode, MapSurface, ViewportController};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Work decided by the reducer.
#[derive(Debug, Clone, PartialEq)]
enum Effect {
    AdjustTop,
    PanTo { index: String, animated: bool },
    ToggleVisibility,
    Navigate { fragment: String },
}

/// Requests the host has to carry out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HostCommand {
    /// Set `location.hash`, scrolling to the anchored post.
    Navigate { fragment: String },
}

pub struct MapSession<M: MapSurface, T: Timer> {
    article_selector: String,
    title_id: String,
    registry: MarkerRegistry,
    viewport: ViewportController<M>,
    coordinator: PanCoordinator,
    timer: T,
}

impl<M: MapSurface, T: Timer> MapSession<M, T> {
    /// Build the registry, create the map and show the initial marker.
    ///
    /// A malformed `data-position` anywhere on the page aborts the session.
    pub fn start<D: DomSurface, B: Breakpoint + ?Sized>(
        config: &AppConfig,
        dom: &D,
        breakpoint: &B,
        timer: T,
    ) -> Result<Self, BuildError> {
        let articles = Articles::query(dom, &config.article_selector);
        let registry = MarkerRegistry::build(&articles)?;
        let viewport = ViewportController::init(&config.map_options(), &registry);
        let mut session = MapSession {
            article_selector: config.article_selector.clone(),
            title_id: config.title_id.clone(),
            registry,
            viewport,
            coordinator: PanCoordinator::new(
                config.pan_debounce(),
                config.effective_scroll_limit_ratio(),
            ),
            timer,
        };

        session.adjust_top(dom, breakpoint);
        session.show_initial_marker(&articles);
        info!(
            markers = session.registry.len(),
            articles = articles.len(),
            "Map session started"
        );
        Ok(session)
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> &ViewportController<M> {
        &self.viewport
    }

    pub fn surface(&self) -> &M {
        self.viewport.surface()
    }

    pub fn coordinator(&self) -> &PanCoordinator {
        &self.coordinator
    }

    pub fn update<D: DomSurface, B: Breakpoint + ?Sized>(
        &mut self,
        event: PageEvent,
        dom: &D,
        breakpoint: &B,
    ) -> Vec<HostCommand> {
        let effects = self.reduce(event, dom);
        effects
            .into_iter()
            .filter_map(|effect| self.run_effect(effect, dom, breakpoint))
            .collect()
    }

    fn reduce<D: DomSurface>(&mut self, event: PageEvent, dom: &D) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            PageEvent::Scrolled | PageEvent::Resized => {
                effects.push(Effect::AdjustTop);
                self.schedule_pan(dom);
            }
            PageEvent::BreakpointChanged { matches } => {
                debug!(compact = matches, "Layout breakpoint changed");
                effects.push(Effect::AdjustTop);
            }
            PageEvent::TimerFired(handle) => {
                if let Some(index) = self.coordinator.on_timer(handle) {
                    effects.push(Effect::PanTo {
                        index,
                        animated: true,
                    });
                }
            }
            PageEvent::MarkerClicked { index } => match self.registry.lookup(&index) {
                Some(marker) => effects.push(Effect::Navigate {
                    fragment: marker.handle.link().to_string(),
                }),
                None => warn!(index = %index, "Click on unknown marker"),
            },
            PageEvent::VisibilityToggled => effects.push(Effect::ToggleVisibility),
        }

        effects
    }

    /// A resize can move articles as much as a scroll does, so both re-run
    /// the debounced pan.
    fn schedule_pan<D: DomSurface>(&mut self, dom: &D) {
        let articles = Articles::query(dom, &self.article_selector);
        match self
            .coordinator
            .on_scroll(&articles, &self.registry, &mut self.timer)
        {
            ScrollOutcome::Scheduled { index, handle } => {
                debug!(index = %index, handle = handle.0, "Pan scheduled");
            }
            ScrollOutcome::AlreadyShown { .. } | ScrollOutcome::NoMarker => {}
        }
    }

    fn run_effect<D: DomSurface, B: Breakpoint + ?Sized>(
        &mut self,
        effect: Effect,
        dom: &D,
        breakpoint: &B,
    ) -> Option<HostCommand> {
        match effect {
            Effect::AdjustTop => {
                self.adjust_top(dom, breakpoint);
                None
            }
            Effect::PanTo { index, animated } => {
                match self.registry.lookup(&index) {
                    Some(marker) => self.viewport.pan_to(marker.coordinate, animated),
                    None => warn!(index = %index, "Pan target vanished from registry"),
                }
                None
            }
            Effect::ToggleVisibility => {
                self.viewport.toggle_visibility();
                None
            }
            Effect::Navigate { fragment } => Some(HostCommand::Navigate { fragment }),
        }
    }

    fn adjust_top<D: DomSurface, B: Breakpoint + ?Sized>(&mut self, dom: &D, breakpoint: &B) {
        let mode = LayoutMode::from_breakpoint(breakpoint);
        self.viewport.adjust_top(dom, mode, &self.title_id);
    }

    fn show_initial_marker<D: DomSurface>(&mut self, articles: &Articles<'_, D>) {
        let ratio = self.coordinator.scroll_limit_ratio();
        match resolve_initial_marker(articles, &self.registry, ratio) {
            Some(marker) => {
                info!(index = %marker.index, coordinate = %marker.coordinate, "Initial marker");
                self.viewport.pan_to(marker.coordinate, false);
                self.coordinator.mark_shown(&marker.index);
            }
            None => debug!("No located article; skipping initial pan"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoCoordinate;
    use crate::test_support::{FakeArticle, FakeDom, FixedBreakpoint, MapCall, RecordingSurface};
    use crate::timer::ManualTimer;
    use std::time::Duration;

    type Session = MapSession<RecordingSurface, ManualTimer>;

    fn travel_page() -> FakeDom {
        let mut dom = FakeDom::new(vec![
            FakeArticle::new(Some("1"), Some("38.7223,-9.1393")).at(100.0, 800.0),
            FakeArticle::new(Some("2"), Some("41.1579,-8.6291")).at(850.0, 1650.0),
            FakeArticle::new(Some("3"), Some("40.4168,-3.7038")).at(1700.0, 2500.0),
            FakeArticle::new(Some("4"), None).at(2550.0, 3300.0),
        ]);
        dom.title = Some((crate::dom::Rect::new(20.0, 80.0), 20.0));
        dom
    }

    fn start(dom: &FakeDom, timer: &ManualTimer) -> Session {
        Session::start(
            &AppConfig::default(),
            dom,
            &FixedBreakpoint(false),
            timer.clone(),
        )
        .expect("session should start")
    }

    fn scroll_to(session: &mut Session, dom: &mut FakeDom, y: f64) -> Vec<HostCommand> {
        dom.scroll_y = y;
        session.update(PageEvent::Scrolled, &*dom, &FixedBreakpoint(false))
    }

    fn fire_due(session: &mut Session, dom: &FakeDom, timer: &ManualTimer, at_ms: u64) {
        for handle in timer.advance_to(Duration::from_millis(at_ms)) {
            session.update(PageEvent::TimerFired(handle), dom, &FixedBreakpoint(false));
        }
    }

    fn animated_pans(session: &Session) -> Vec<[f64; 2]> {
        session
            .surface()
            .pans()
            .into_iter()
            .filter(|(_, animate)| *animate)
            .map(|(lng_lat, _)| lng_lat)
            .collect()
    }

    #[test]
    fn start_attaches_markers_and_pans_without_animation() {
        let dom = travel_page();
        let timer = ManualTimer::new();
        let session = start(&dom, &timer);

        let calls = &session.surface().calls;
        let markers: Vec<&MapCall> = calls
            .iter()
            .filter(|call| matches!(call, MapCall::Marker(_)))
            .collect();
        assert_eq!(markers.len(), 3);
        assert!(calls.contains(&MapCall::PanelTop(100.0)));
        assert_eq!(
            session.surface().pans(),
            vec![(GeoCoordinate::new(38.7223, -9.1393).to_lng_lat(), false)]
        );
        assert_eq!(session.coordinator().last_shown(), Some("1"));
    }

    #[test]
    fn malformed_position_aborts_start() {
        let dom = FakeDom::new(vec![FakeArticle::new(Some("1"), Some("38.7;-9.1"))]);
        let result = Session::start(
            &AppConfig::default(),
            &dom,
            &FixedBreakpoint(false),
            ManualTimer::new(),
        );
        assert!(matches!(result, Err(BuildError::Parse { ordinal: 0, .. })));
    }

    #[test]
    fn rapid_scrolls_pan_once_to_last_position() {
        let mut dom = travel_page();
        let timer = ManualTimer::new();
        let mut session = start(&dom, &timer);

        scroll_to(&mut session, &mut dom, 850.0);
        fire_due(&mut session, &dom, &timer, 100);
        scroll_to(&mut session, &mut dom, 1700.0);
        fire_due(&mut session, &dom, &timer, 200);
        scroll_to(&mut session, &mut dom, 850.0);

        fire_due(&mut session, &dom, &timer, 499);
        assert!(animated_pans(&session).is_empty());

        fire_due(&mut session, &dom, &timer, 500);
        assert_eq!(
            animated_pans(&session),
            vec![GeoCoordinate::new(41.1579, -8.6291).to_lng_lat()]
        );
        assert_eq!(session.coordinator().last_shown(), Some("2"));

        fire_due(&mut session, &dom, &timer, 2_000);
        assert_eq!(animated_pans(&session).len(), 1);
    }

    #[test]
    fn every_scroll_adjusts_the_panel_immediately() {
        let mut dom = travel_page();
        let timer = ManualTimer::new();
        let mut session = start(&dom, &timer);

        scroll_to(&mut session, &mut dom, 40.0);
        assert_eq!(session.viewport().panel_top(), 60.0);
        scroll_to(&mut session, &mut dom, 500.0);
        assert_eq!(session.viewport().panel_top(), 0.0);
        assert_eq!(session.surface().calls.last(), Some(&MapCall::Resize));
    }

    #[test]
    fn scrolling_to_unlocated_article_keeps_last_marker() {
        let mut dom = travel_page();
        let timer = ManualTimer::new();
        let mut session = start(&dom, &timer);

        scroll_to(&mut session, &mut dom, 2550.0);
        fire_due(&mut session, &dom, &timer, 1_000);
        assert!(animated_pans(&session).is_empty());
        assert_eq!(session.coordinator().last_shown(), Some("1"));
    }

    #[test]
    fn breakpoint_change_switches_to_compact_layout() {
        let dom = travel_page();
        let timer = ManualTimer::new();
        let mut session = start(&dom, &timer);
        assert_eq!(session.viewport().panel_top(), 100.0);

        session.update(
            PageEvent::BreakpointChanged { matches: true },
            &dom,
            &FixedBreakpoint(true),
        );
        assert_eq!(session.viewport().panel_top(), 0.0);
    }

    #[test]
    fn marker_click_navigates_to_post_anchor() {
        let dom = travel_page();
        let timer = ManualTimer::new();
        let mut session = start(&dom, &timer);

        let commands = session.update(
            PageEvent::MarkerClicked {
                index: "2".to_string(),
            },
            &dom,
            &FixedBreakpoint(false),
        );
        assert_eq!(
            commands,
            vec![HostCommand::Navigate {
                fragment: "#post-2".to_string()
            }]
        );

        let unknown = session.update(
            PageEvent::MarkerClicked {
                index: "99".to_string(),
            },
            &dom,
            &FixedBreakpoint(false),
        );
        assert!(unknown.is_empty());
    }

    #[test]
    fn resize_that_moves_articles_pans_to_new_current_marker() {
        let mut dom = travel_page();
        let timer = ManualTimer::new();
        let mut session = start(&dom, &timer);

        dom.scroll_y = 850.0;
        dom.viewport_height = 600.0;
        session.update(PageEvent::Resized, &dom, &FixedBreakpoint(false));
        assert_eq!(session.coordinator().pending_target(), Some("2"));

        fire_due(&mut session, &dom, &timer, 300);
        assert_eq!(
            animated_pans(&session),
            vec![GeoCoordinate::new(41.1579, -8.6291).to_lng_lat()]
        );
        let resizes = session
            .surface()
            .calls
            .iter()
            .filter(|call| **call == MapCall::Resize)
            .count();
        assert_eq!(resizes, 2);
    }

    #[test]
    fn page_without_markers_never_pans() {
        let mut dom = FakeDom::new(vec![
            FakeArticle::new(Some("1"), None).at(0.0, 600.0),
            FakeArticle::new(None, None).at(650.0, 1200.0),
        ]);
        let timer = ManualTimer::new();
        let mut session = start(&dom, &timer);
        scroll_to(&mut session, &mut dom, 700.0);
        fire_due(&mut session, &dom, &timer, 1_000);
        assert!(session.surface().pans().is_empty());
    }
}
