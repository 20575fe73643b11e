//! Read-only view of the rendered page.
//!
//! The core never owns page elements. It queries them through [`DomSurface`],
//! which a browser binding or the native host implements.

pub const INDEX_ATTR: &str = "data-index";
pub const POSITION_ATTR: &str = "data-position";

/// Vertical extent of an element relative to the viewport's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Rect { top, bottom }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The DOM query surface the map view depends on.
pub trait DomSurface {
    type Element: Clone;

    /// All elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Bounding box in viewport coordinates; changes as the page scrolls.
    fn bounding_client_rect(&self, element: &Self::Element) -> Rect;

    /// Computed `margin-bottom` in pixels.
    fn margin_bottom(&self, element: &Self::Element) -> f64;

    /// Visible height of the window.
    fn viewport_height(&self) -> f64;
}

/// Articles of the page, captured in document order.
pub struct Articles<'a, D: DomSurface> {
    dom: &'a D,
    elements: Vec<D::Element>,
}

impl<'a, D: DomSurface> Articles<'a, D> {
    pub fn query(dom: &'a D, selector: &str) -> Self {
        Articles {
            dom,
            elements: dom.query_selector_all(selector),
        }
    }

    pub fn dom(&self) -> &'a D {
        self.dom
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<Article<'_, D>> {
        self.elements.get(ordinal).map(|element| Article {
            dom: self.dom,
            element,
            ordinal,
        })
    }

    /// Lazy document-order sequence; restart by calling again.
    pub fn iter(&self) -> impl Iterator<Item = Article<'_, D>> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(move |(ordinal, element)| Article {
                dom: self.dom,
                element,
                ordinal,
            })
    }

    /// Articles strictly after `ordinal`, in document order.
    pub fn after(&self, ordinal: usize) -> impl Iterator<Item = Article<'_, D>> + '_ {
        self.iter().skip(ordinal.saturating_add(1))
    }
}

/// One article element together with its document-order ordinal.
pub struct Article<'a, D: DomSurface> {
    dom: &'a D,
    element: &'a D::Element,
    ordinal: usize,
}

impl<D: DomSurface> Clone for Article<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: DomSurface> Copy for Article<'_, D> {}

impl<D: DomSurface> std::fmt::Debug for Article<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Article")
            .field("ordinal", &self.ordinal)
            .field("index", &self.index())
            .finish()
    }
}

impl<'a, D: DomSurface> Article<'a, D> {
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn element(&self) -> &'a D::Element {
        self.element
    }

    pub fn index(&self) -> Option<String> {
        self.dom
            .attribute(self.element, INDEX_ATTR)
            .filter(|value| !value.is_empty())
    }

    pub fn position(&self) -> Option<String> {
        self.dom
            .attribute(self.element, POSITION_ATTR)
            .filter(|value| !value.is_empty())
    }

    pub fn bounding_box(&self) -> Rect {
        self.dom.bounding_client_rect(self.element)
    }
}
