//! Map surface abstraction and the controller that owns it.

use crate::dom::DomSurface;
use crate::geo::GeoCoordinate;
use crate::markers::{MarkerHandle, MarkerRegistry};
use serde::Serialize;
use tracing::{debug, trace};

/// Controls the map panel exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapControl {
    Navigation,
    VisibilityToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanOptions {
    pub animate: bool,
}

/// The map library boundary.
pub trait MapSurface {
    fn create(container: &str, style: &str, zoom: f64) -> Self
    where
        Self: Sized;

    fn add_control(&mut self, control: MapControl);

    fn add_marker(&mut self, marker: &MarkerHandle);

    /// Re-measure the container after its box changed.
    fn resize(&mut self);

    fn pan_to(&mut self, lng_lat: [f64; 2], options: PanOptions);

    /// Vertical offset of the panel element, in pixels.
    fn set_panel_top(&mut self, top_px: f64);

    fn set_visible(&mut self, visible: bool);
}

/// A width media query, such as `(max-width: 768px)`.
pub trait Breakpoint {
    fn matches(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Narrow screens: the map panel sits at the top edge.
    Compact,
    /// Wide screens: the panel starts below the page title.
    Full,
}

impl LayoutMode {
    pub fn from_breakpoint<B: Breakpoint + ?Sized>(breakpoint: &B) -> Self {
        if breakpoint.matches() {
            LayoutMode::Compact
        } else {
            LayoutMode::Full
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapOptions {
    pub container: String,
    pub style: String,
    pub zoom: f64,
}

/// Sole owner of the map surface; all pans and resizes go through here.
pub struct ViewportController<M: MapSurface> {
    surface: M,
    visible: bool,
    panel_top: f64,
}

impl<M: MapSurface> ViewportController<M> {
    /// Create the surface, attach every marker and wire the controls.
    pub fn init(options: &MapOptions, registry: &MarkerRegistry) -> Self {
        let mut surface = M::create(&options.container, &options.style, options.zoom);
        surface.add_control(MapControl::Navigation);
        surface.add_control(MapControl::VisibilityToggle);
        for marker in registry.iter() {
            marker.handle.add_to(&mut surface);
        }
        debug!(
            container = %options.container,
            zoom = options.zoom,
            markers = registry.len(),
            "Initialized map viewport"
        );
        ViewportController {
            surface,
            visible: true,
            panel_top: 0.0,
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn panel_top(&self) -> f64 {
        self.panel_top
    }

    /// Recompute the panel offset for `mode`, then resize the surface.
    pub fn adjust_top<D: DomSurface>(&mut self, dom: &D, mode: LayoutMode, title_id: &str) -> f64 {
        let top = match mode {
            LayoutMode::Compact => 0.0,
            LayoutMode::Full => match dom.element_by_id(title_id) {
                Some(title) => {
                    let rect = dom.bounding_client_rect(&title);
                    full_layout_top(rect.bottom, dom.margin_bottom(&title))
                }
                None => {
                    debug!(title_id, "Title element missing; pinning map to the top");
                    0.0
                }
            },
        };
        trace!(?mode, top, "Adjusted map top");
        self.panel_top = top;
        self.surface.set_panel_top(top);
        self.surface.resize();
        top
    }

    pub fn pan_to(&mut self, coordinate: GeoCoordinate, animated: bool) {
        debug!(%coordinate, animated, "Panning map");
        self.surface.pan_to(
            coordinate.to_lng_lat(),
            PanOptions { animate: animated },
        );
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.surface.set_visible(self.visible);
        if self.visible {
            self.surface.resize();
        }
        debug!(visible = self.visible, "Toggled map visibility");
        self.visible
    }
}

/// Panel offset in the full layout: just under the title, never above the
/// viewport.
pub fn full_layout_top(title_bottom: f64, title_margin_bottom: f64) -> f64 {
    (title_bottom + title_margin_bottom).max(0.0)
}
