//! Geographic coordinates and `data-position` parsing.

use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static POSITION_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("position separator regex should compile"));

/// A finite latitude/longitude pair. No range validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoCoordinate { lat, lon }
    }

    /// Map libraries take coordinates in `[lon, lat]` order.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn from_lng_lat([lon, lat]: [f64; 2]) -> Self {
        GeoCoordinate { lat, lon }
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Parse a `"<lat>,<lon>"` attribute value.
pub fn parse_position(raw: &str) -> Result<GeoCoordinate, ParseError> {
    let tokens: Vec<&str> = POSITION_SEPARATOR.split(raw).collect();
    if tokens.len() != 2 {
        return Err(ParseError::TokenCount {
            raw: raw.to_string(),
            found: tokens.len(),
        });
    }

    let lat = parse_component(raw, tokens[0])?;
    let lon = parse_component(raw, tokens[1])?;
    Ok(GeoCoordinate { lat, lon })
}

fn parse_component(raw: &str, token: &str) -> Result<f64, ParseError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::NotANumber {
            raw: raw.to_string(),
            token: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pair_exactly() {
        let coord = parse_position("48.8566,2.3522").expect("valid position");
        assert_eq!(coord, GeoCoordinate::new(48.8566, 2.3522));
    }

    #[test]
    fn tolerates_whitespace_around_separator() {
        let coord = parse_position(" -33.8688 ,  151.2093 ").expect("valid position");
        assert_eq!(coord.lat, -33.8688);
        assert_eq!(coord.lon, 151.2093);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let coord = parse_position("123.0,-500").expect("range is not validated");
        assert_eq!(coord, GeoCoordinate::new(123.0, -500.0));
    }

    #[test]
    fn rejects_wrong_token_count() {
        for raw in ["48.8566", "1,2,3", ""] {
            let err = parse_position(raw).expect_err("token count must be 2");
            assert!(matches!(err, ParseError::TokenCount { .. }), "{raw}: {err}");
        }
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_tokens() {
        for raw in ["north,2.0", "1.0,east", "12,", "inf,1", "1,NaN"] {
            let err = parse_position(raw).expect_err("token must be a finite number");
            assert!(matches!(err, ParseError::NotANumber { .. }), "{raw}: {err}");
        }
    }

    #[test]
    fn lng_lat_order_swaps_components() {
        let coord = GeoCoordinate::new(10.0, 20.0);
        assert_eq!(coord.to_lng_lat(), [20.0, 10.0]);
        assert_eq!(GeoCoordinate::from_lng_lat(coord.to_lng_lat()), coord);
    }
}
