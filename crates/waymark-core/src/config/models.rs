use crate::viewport::MapOptions;
use serde::Deserialize;
use std::time::Duration;

/// Flat view of every setting; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_container")]
    pub container: String,
    #[serde(default = "crate::config::defaults::default_style")]
    pub style: String,
    #[serde(default = "crate::config::defaults::default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "crate::config::defaults::default_article_selector")]
    pub article_selector: String,
    #[serde(default = "crate::config::defaults::default_title_id")]
    pub title_id: String,
    #[serde(default = "crate::config::defaults::default_scroll_limit_ratio")]
    pub scroll_limit_ratio: f64,
    #[serde(default = "crate::config::defaults::default_pan_debounce_ms")]
    pub pan_debounce_ms: u64,
    #[serde(default = "crate::config::defaults::default_compact_max_width_px")]
    pub compact_max_width_px: f64,
    #[serde(default = "crate::config::defaults::default_line_height_px")]
    pub line_height_px: f64,
    #[serde(default = "crate::config::defaults::default_chars_per_line")]
    pub chars_per_line: usize,
    #[serde(default = "crate::config::defaults::default_image_height_px")]
    pub image_height_px: f64,
    #[serde(default = "crate::config::defaults::default_article_gap_px")]
    pub article_gap_px: f64,
    #[serde(default = "crate::config::defaults::default_title_top_px")]
    pub title_top_px: f64,
    #[serde(default = "crate::config::defaults::default_title_margin_bottom_px")]
    pub title_margin_bottom_px: f64,
    #[serde(default = "crate::config::defaults::default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default = "crate::config::defaults::default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        use crate::config::defaults;
        AppConfig {
            container: defaults::default_container(),
            style: defaults::default_style(),
            zoom: defaults::default_zoom(),
            access_token: String::new(),
            article_selector: defaults::default_article_selector(),
            title_id: defaults::default_title_id(),
            scroll_limit_ratio: defaults::default_scroll_limit_ratio(),
            pan_debounce_ms: defaults::default_pan_debounce_ms(),
            compact_max_width_px: defaults::default_compact_max_width_px(),
            line_height_px: defaults::default_line_height_px(),
            chars_per_line: defaults::default_chars_per_line(),
            image_height_px: defaults::default_image_height_px(),
            article_gap_px: defaults::default_article_gap_px(),
            title_top_px: defaults::default_title_top_px(),
            title_margin_bottom_px: defaults::default_title_margin_bottom_px(),
            viewport_width: defaults::default_viewport_width(),
            viewport_height: defaults::default_viewport_height(),
            log_level: defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            container: self.container.clone(),
            style: self.style.clone(),
            zoom: self.zoom,
        }
    }

    pub fn pan_debounce(&self) -> Duration {
        Duration::from_millis(self.pan_debounce_ms)
    }

    /// Ratio clamped to `(0, 1]`; anything unusable falls back to 2/3.
    pub fn effective_scroll_limit_ratio(&self) -> f64 {
        if self.scroll_limit_ratio.is_finite() && self.scroll_limit_ratio > 0.0 {
            self.scroll_limit_ratio.min(1.0)
        } else {
            crate::detector::DEFAULT_SCROLL_LIMIT_RATIO
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
