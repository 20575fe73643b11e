//! Marker registry built from the articles' `data-position` attributes.

use crate::dom::{Articles, DomSurface};
use crate::error::BuildError;
use crate::geo::{GeoCoordinate, parse_position};
use crate::viewport::MapSurface;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

pub const MARKER_CLASS: &str = "map-marker";

/// Visual marker primitive placed on a map surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerHandle {
    label: String,
    class_name: &'static str,
    link: String,
    lng_lat: [f64; 2],
}

impl MarkerHandle {
    fn for_index(index: &str) -> Self {
        MarkerHandle {
            label: index.to_string(),
            class_name: MARKER_CLASS,
            link: format!("#post-{index}"),
            lng_lat: [0.0, 0.0],
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn class_name(&self) -> &str {
        self.class_name
    }

    /// Fragment the page navigates to when the marker is clicked.
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn set_lng_lat(mut self, lng_lat: [f64; 2]) -> Self {
        self.lng_lat = lng_lat;
        self
    }

    pub fn lng_lat(&self) -> [f64; 2] {
        self.lng_lat
    }

    pub fn add_to<M: MapSurface>(&self, map: &mut M) {
        map.add_marker(self);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub index: String,
    pub coordinate: GeoCoordinate,
    pub handle: MarkerHandle,
}

/// Immutable index -> marker mapping. Iteration follows first insertion.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: IndexMap<String, Marker>,
}

impl MarkerRegistry {
    /// Parse every article's position. The first malformed article aborts
    /// the build.
    pub fn build<D: DomSurface>(articles: &Articles<'_, D>) -> Result<Self, BuildError> {
        let mut markers = IndexMap::new();

        for article in articles.iter() {
            let Some(position) = article.position() else {
                continue;
            };
            let ordinal = article.ordinal();
            let coordinate = parse_position(&position)
                .map_err(|source| BuildError::Parse { ordinal, source })?;
            let index = article
                .index()
                .ok_or_else(|| BuildError::MissingIndex { ordinal, position })?;

            let handle = MarkerHandle::for_index(&index).set_lng_lat(coordinate.to_lng_lat());
            let marker = Marker {
                index: index.clone(),
                coordinate,
                handle,
            };
            if markers.insert(index.clone(), marker).is_some() {
                warn!(index = %index, ordinal, "Duplicate data-index; later article wins");
            } else {
                debug!(index = %index, ordinal, %coordinate, "Registered marker");
            }
        }

        info!(
            articles = articles.len(),
            markers = markers.len(),
            "Built marker registry"
        );
        Ok(MarkerRegistry { markers })
    }

    pub fn lookup(&self, index: &str) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }
}
