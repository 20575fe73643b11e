//! Scroll-synchronized map for a geotagged blog.
//!
//! Articles carrying `data-index` / `data-position` attributes become map
//! markers. As the reader scrolls, [`session::MapSession`] works out which
//! article is being read and pans the map to its marker, debounced so the
//! animated pans do not jitter.
//!
//! The page, the map library, the layout breakpoint and the timer are all
//! reached through traits, so the same session runs in a browser binding or
//! in the native host shipped with this workspace.

pub mod config;
pub mod detector;
pub mod dom;
pub mod error;
pub mod events;
pub mod geo;
pub mod markers;
pub mod notification;
pub mod pan;
pub mod session;
pub mod timer;
pub mod viewport;

#[cfg(test)]
mod test_support;

pub use error::{BuildError, ParseError};
pub use session::{HostCommand, MapSession};
