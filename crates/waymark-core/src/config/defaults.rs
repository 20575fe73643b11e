pub(crate) fn default_container() -> String {
    "map".to_string()
}

pub(crate) fn default_style() -> String {
    "mapbox://styles/mapbox/streets-v9".to_string()
}

pub(crate) fn default_zoom() -> f64 {
    12.0
}

pub(crate) fn default_article_selector() -> String {
    "article.post".to_string()
}

pub(crate) fn default_title_id() -> String {
    "page-title".to_string()
}

pub(crate) fn default_scroll_limit_ratio() -> f64 {
    crate::detector::DEFAULT_SCROLL_LIMIT_RATIO
}

pub(crate) fn default_pan_debounce_ms() -> u64 {
    300
}

pub(crate) fn default_compact_max_width_px() -> f64 {
    768.0
}

pub(crate) fn default_line_height_px() -> f64 {
    24.0
}

pub(crate) fn default_chars_per_line() -> usize {
    80
}

pub(crate) fn default_image_height_px() -> f64 {
    360.0
}

pub(crate) fn default_article_gap_px() -> f64 {
    48.0
}

pub(crate) fn default_title_top_px() -> f64 {
    32.0
}

pub(crate) fn default_title_margin_bottom_px() -> f64 {
    16.0
}

pub(crate) fn default_viewport_width() -> f64 {
    1280.0
}

pub(crate) fn default_viewport_height() -> f64 {
    800.0
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
