//! Native host: replays an event script against a rendered page.
//!
//! Window events go through an [`EventHub`] the way a browser delivers them
//! to listeners; debounce timers run on a [`ManualTimer`] advanced in step
//! with the script. Every map command is recorded with the virtual time it
//! was issued at.

use crate::page::RenderedPage;
use crate::script::{EventScript, ScriptAction};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use waymark_core::config::AppConfig;
use waymark_core::events::{EventHub, EventKind, PageEvent, Subscription};
use waymark_core::markers::{Marker, MarkerHandle};
use waymark_core::notification::{Notification, notification_for_push};
use waymark_core::timer::ManualTimer;
use waymark_core::viewport::{Breakpoint, MapControl, MapSurface, PanOptions};
use waymark_core::{BuildError, HostCommand, MapSession};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum MapCommand {
    Create {
        container: String,
        style: String,
        zoom: f64,
    },
    AddControl {
        control: MapControl,
    },
    AddMarker {
        marker: MarkerHandle,
    },
    Resize,
    PanTo {
        lng_lat: [f64; 2],
        animate: bool,
    },
    SetPanelTop {
        top_px: f64,
    },
    SetVisible {
        visible: bool,
    },
}

/// Map surface that records what a map library would have been asked to do.
#[derive(Debug, Default)]
pub struct RecordingMap {
    commands: Vec<MapCommand>,
}

impl RecordingMap {
    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    fn record(&mut self, command: MapCommand) {
        trace!(?command, "Map command");
        self.commands.push(command);
    }
}

impl MapSurface for RecordingMap {
    fn create(container: &str, style: &str, zoom: f64) -> Self {
        let mut map = RecordingMap::default();
        map.record(MapCommand::Create {
            container: container.to_string(),
            style: style.to_string(),
            zoom,
        });
        map
    }

    fn add_control(&mut self, control: MapControl) {
        self.record(MapCommand::AddControl { control });
    }

    fn add_marker(&mut self, marker: &MarkerHandle) {
        self.record(MapCommand::AddMarker {
            marker: marker.clone(),
        });
    }

    fn resize(&mut self) {
        self.record(MapCommand::Resize);
    }

    fn pan_to(&mut self, lng_lat: [f64; 2], options: PanOptions) {
        self.record(MapCommand::PanTo {
            lng_lat,
            animate: options.animate,
        });
    }

    fn set_panel_top(&mut self, top_px: f64) {
        self.record(MapCommand::SetPanelTop { top_px });
    }

    fn set_visible(&mut self, visible: bool) {
        self.record(MapCommand::SetVisible { visible });
    }
}

/// `(max-width: N px)` evaluated against the current window width.
#[derive(Debug, Clone, Copy)]
pub struct WidthBreakpoint {
    max_width: f64,
    width: f64,
}

impl WidthBreakpoint {
    pub fn new(max_width: f64, width: f64) -> Self {
        WidthBreakpoint { max_width, width }
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }
}

impl Breakpoint for WidthBreakpoint {
    fn matches(&self) -> bool {
        self.width <= self.max_width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub command: MapCommand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Navigation {
    pub at_ms: u64,
    pub fragment: String,
    pub scroll_y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub markers: Vec<Marker>,
    pub timeline: Vec<TimelineEntry>,
    pub navigations: Vec<Navigation>,
    pub notifications: Vec<Notification>,
    pub final_scroll_y: f64,
    pub panel_top: f64,
    pub map_visible: bool,
    pub shown_marker: Option<String>,
}

impl Report {
    /// Animated pans in the order they were issued.
    pub fn animated_pans(&self) -> Vec<(u64, [f64; 2])> {
        self.timeline
            .iter()
            .filter_map(|entry| match entry.command {
                MapCommand::PanTo {
                    lng_lat,
                    animate: true,
                } => Some((entry.at_ms, lng_lat)),
                _ => None,
            })
            .collect()
    }
}

pub struct Host<'a> {
    page: RenderedPage<'a>,
    breakpoint: WidthBreakpoint,
    clock: ManualTimer,
    hub: EventHub,
    queue: Rc<RefCell<VecDeque<PageEvent>>>,
    _subscriptions: Vec<Subscription>,
    session: MapSession<RecordingMap, ManualTimer>,
    timeline: Vec<TimelineEntry>,
    navigations: Vec<Navigation>,
    notifications: Vec<Notification>,
}

impl<'a> Host<'a> {
    /// Start a map session on `page` and subscribe it to window events.
    pub fn start(page: RenderedPage<'a>, config: &AppConfig) -> Result<Self, BuildError> {
        let breakpoint = WidthBreakpoint::new(config.compact_max_width_px, page.viewport_width());
        let clock = ManualTimer::new();
        let session = MapSession::start(config, &page, &breakpoint, clock.clone())?;

        let mut hub = EventHub::new();
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        let subscriptions: Vec<Subscription> = [
            EventKind::Scroll,
            EventKind::Resize,
            EventKind::BreakpointChange,
        ]
        .into_iter()
        .map(|kind| {
            let queue = Rc::clone(&queue);
            hub.subscribe(kind, move |event: &PageEvent| {
                queue.borrow_mut().push_back(event.clone())
            })
        })
        .collect();

        let mut host = Host {
            page,
            breakpoint,
            clock,
            hub,
            queue,
            _subscriptions: subscriptions,
            session,
            timeline: Vec::new(),
            navigations: Vec::new(),
            notifications: Vec::new(),
        };
        host.collect_map_commands();
        Ok(host)
    }

    pub fn session(&self) -> &MapSession<RecordingMap, ManualTimer> {
        &self.session
    }

    /// Replay `script`, then let every pending timer run out.
    pub fn run(mut self, script: &EventScript) -> Report {
        for event in &script.events {
            self.advance_clock(Duration::from_millis(event.at_ms));
            self.apply(&event.action);
        }
        while let Some(deadline) = self.clock.next_deadline() {
            self.advance_clock(deadline);
        }
        self.finish()
    }

    fn now_ms(&self) -> u64 {
        self.clock.now().as_millis() as u64
    }

    /// Fire due timers one deadline at a time so pans scheduled by a timer
    /// callback are honored too.
    fn advance_clock(&mut self, target: Duration) {
        while let Some(deadline) = self.clock.next_deadline() {
            if deadline > target {
                break;
            }
            for handle in self.clock.advance_to(deadline) {
                self.dispatch(PageEvent::TimerFired(handle));
            }
        }
        self.clock.advance_to(target);
    }

    fn apply(&mut self, action: &ScriptAction) {
        debug!(at_ms = self.now_ms(), ?action, "Script action");
        match action {
            ScriptAction::Scroll { y } => {
                self.page.scroll_to(*y);
                self.emit(EventKind::Scroll, PageEvent::Scrolled);
            }
            ScriptAction::Resize { width, height } => {
                let was_compact = self.breakpoint.matches();
                let scroll_before = self.page.scroll_y();
                self.page.resize(*width, *height);
                self.breakpoint.set_width(*width);
                self.emit(EventKind::Resize, PageEvent::Resized);
                if self.page.scroll_y() != scroll_before {
                    self.emit(EventKind::Scroll, PageEvent::Scrolled);
                }
                let matches = self.breakpoint.matches();
                if matches != was_compact {
                    self.emit(
                        EventKind::BreakpointChange,
                        PageEvent::BreakpointChanged { matches },
                    );
                }
            }
            ScriptAction::ClickMarker { index } => self.dispatch(PageEvent::MarkerClicked {
                index: index.clone(),
            }),
            ScriptAction::ToggleMap => self.dispatch(PageEvent::VisibilityToggled),
            ScriptAction::Push { payload } => self.push(payload.as_deref()),
        }
    }

    fn emit(&mut self, kind: EventKind, event: PageEvent) {
        let delivered = self.hub.emit(kind, &event);
        trace!(?kind, delivered, "Emitted window event");
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(event) => self.dispatch(event),
                None => break,
            }
        }
    }

    fn dispatch(&mut self, event: PageEvent) {
        let commands = self.session.update(event, &self.page, &self.breakpoint);
        self.collect_map_commands();
        for command in commands {
            self.run_command(command);
        }
    }

    fn run_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Navigate { fragment } => {
                let id = fragment.trim_start_matches('#');
                match self.page.anchor_top(id) {
                    Some(top) => {
                        let scroll_y = self.page.scroll_to(top);
                        info!(%fragment, scroll_y, "Navigated to post");
                        self.navigations.push(Navigation {
                            at_ms: self.now_ms(),
                            fragment,
                            scroll_y,
                        });
                        self.emit(EventKind::Scroll, PageEvent::Scrolled);
                    }
                    None => warn!(%fragment, "Navigation target not found on page"),
                }
            }
        }
    }

    fn push(&mut self, payload: Option<&str>) {
        match notification_for_push(payload) {
            Ok(Some(notification)) => self.notifications.push(notification),
            Ok(None) => {}
            Err(err) => warn!("Dropping push message: {err}"),
        }
    }

    /// Copy the commands the surface logged since the last call into the
    /// timeline, stamped with the current virtual time.
    fn collect_map_commands(&mut self) {
        let at_ms = self.now_ms();
        let seen = self.timeline.len();
        let fresh = &self.session.surface().commands()[seen..];
        self.timeline.extend(fresh.iter().cloned().map(|command| TimelineEntry {
            at_ms,
            command,
        }));
    }

    fn finish(self) -> Report {
        let report = Report {
            markers: self.session.registry().iter().cloned().collect(),
            timeline: self.timeline,
            navigations: self.navigations,
            notifications: self.notifications,
            final_scroll_y: self.page.scroll_y(),
            panel_top: self.session.viewport().panel_top(),
            map_visible: self.session.viewport().is_visible(),
            shown_marker: self.session.coordinator().last_shown().map(str::to_string),
        };
        info!(
            map_commands = report.timeline.len(),
            navigations = report.navigations.len(),
            notifications = report.notifications.len(),
            "Replay finished"
        );
        report
    }
}
