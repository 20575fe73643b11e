//! Error types raised while building the marker registry.
//!
//! Both kinds abort initialization: a page with a malformed `data-position`
//! renders without a map rather than with a silently incomplete one.

/// A `data-position` value that is not a `"<lat>,<lon>"` pair.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid marker string {raw:?}: expected 2 comma-separated values, found {found}")]
    TokenCount { raw: String, found: usize },

    #[error("invalid coordinates {raw:?}: {token:?} is not a finite number")]
    NotANumber { raw: String, token: String },
}

/// Fatal registry build failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("article #{ordinal}: {source}")]
    Parse {
        ordinal: usize,
        #[source]
        source: ParseError,
    },

    #[error("article #{ordinal} has data-position {position:?} but no data-index")]
    MissingIndex { ordinal: usize, position: String },
}

impl BuildError {
    /// Document-order ordinal of the offending article.
    pub fn ordinal(&self) -> usize {
        match self {
            BuildError::Parse { ordinal, .. } | BuildError::MissingIndex { ordinal, .. } => *ordinal,
        }
    }
}
