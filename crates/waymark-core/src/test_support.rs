//! In-memory page and map fixtures shared by the unit tests.

use crate::dom::{Articles, DomSurface, INDEX_ATTR, POSITION_ATTR, Rect};
use crate::markers::MarkerHandle;
use crate::viewport::{Breakpoint, MapControl, MapSurface, PanOptions};

pub const ARTICLE_SELECTOR: &str = "article.post";
pub const TITLE_ID: &str = "page-title";

#[derive(Debug, Clone)]
pub struct FakeArticle {
    index: Option<String>,
    position: Option<String>,
    rect: Rect,
}

impl FakeArticle {
    pub fn new(index: Option<&str>, position: Option<&str>) -> Self {
        FakeArticle {
            index: index.map(str::to_string),
            position: position.map(str::to_string),
            rect: Rect::default(),
        }
    }

    /// Document-space box at scroll offset zero.
    pub fn at(mut self, top: f64, bottom: f64) -> Self {
        self.rect = Rect::new(top, bottom);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeElement {
    Article(usize),
    Title,
}

#[derive(Debug, Clone)]
pub struct FakeDom {
    pub articles: Vec<FakeArticle>,
    /// Title box at scroll offset zero and its bottom margin.
    pub title: Option<(Rect, f64)>,
    pub viewport_height: f64,
    pub scroll_y: f64,
}

impl FakeDom {
    pub fn new(articles: Vec<FakeArticle>) -> Self {
        FakeDom {
            articles,
            title: None,
            viewport_height: 900.0,
            scroll_y: 0.0,
        }
    }

    pub fn articles(&self) -> Articles<'_, Self> {
        Articles::query(self, ARTICLE_SELECTOR)
    }

    pub fn scroll_by(&mut self, dy: f64) {
        self.scroll_y += dy;
    }

    fn shifted(&self, rect: Rect) -> Rect {
        Rect::new(rect.top - self.scroll_y, rect.bottom - self.scroll_y)
    }
}

impl DomSurface for FakeDom {
    type Element = FakeElement;

    fn query_selector_all(&self, selector: &str) -> Vec<FakeElement> {
        if selector != ARTICLE_SELECTOR {
            return Vec::new();
        }
        (0..self.articles.len()).map(FakeElement::Article).collect()
    }

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        (id == TITLE_ID && self.title.is_some()).then_some(FakeElement::Title)
    }

    fn attribute(&self, element: &FakeElement, name: &str) -> Option<String> {
        let FakeElement::Article(i) = element else {
            return None;
        };
        let article = self.articles.get(*i)?;
        match name {
            INDEX_ATTR => article.index.clone(),
            POSITION_ATTR => article.position.clone(),
            _ => None,
        }
    }

    fn bounding_client_rect(&self, element: &FakeElement) -> Rect {
        match element {
            FakeElement::Article(i) => self
                .articles
                .get(*i)
                .map(|article| self.shifted(article.rect))
                .unwrap_or_default(),
            FakeElement::Title => self
                .title
                .map(|(rect, _)| self.shifted(rect))
                .unwrap_or_default(),
        }
    }

    fn margin_bottom(&self, element: &FakeElement) -> f64 {
        match (element, self.title) {
            (FakeElement::Title, Some((_, margin))) => margin,
            _ => 0.0,
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    Created { container: String, zoom: f64 },
    Control(MapControl),
    Marker(String),
    Resize,
    Pan { lng_lat: [f64; 2], animate: bool },
    PanelTop(f64),
    Visible(bool),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<MapCall>,
}

impl RecordingSurface {
    pub fn pans(&self) -> Vec<([f64; 2], bool)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MapCall::Pan { lng_lat, animate } => Some((*lng_lat, *animate)),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn create(container: &str, _style: &str, zoom: f64) -> Self {
        RecordingSurface {
            calls: vec![MapCall::Created {
                container: container.to_string(),
                zoom,
            }],
        }
    }

    fn add_control(&mut self, control: MapControl) {
        self.calls.push(MapCall::Control(control));
    }

    fn add_marker(&mut self, marker: &MarkerHandle) {
        self.calls.push(MapCall::Marker(marker.label().to_string()));
    }

    fn resize(&mut self) {
        self.calls.push(MapCall::Resize);
    }

    fn pan_to(&mut self, lng_lat: [f64; 2], options: PanOptions) {
        self.calls.push(MapCall::Pan {
            lng_lat,
            animate: options.animate,
        });
    }

    fn set_panel_top(&mut self, top_px: f64) {
        self.calls.push(MapCall::PanelTop(top_px));
    }

    fn set_visible(&mut self, visible: bool) {
        self.calls.push(MapCall::Visible(visible));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedBreakpoint(pub bool);

impl Breakpoint for FixedBreakpoint {
    fn matches(&self) -> bool {
        self.0
    }
}
