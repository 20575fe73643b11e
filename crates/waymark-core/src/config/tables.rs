use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

/// On-disk layout of `config.toml`: one table per concern.
#[derive(Debug, Clone, Deserialize, serde::Serialize, Default)]
pub(super) struct ConfigTables {
    #[serde(default)]
    map: MapConfig,
    #[serde(default)]
    page: PageConfig,
    #[serde(default)]
    scroll: ScrollConfig,
    #[serde(default)]
    layout: LayoutConfig,
    #[serde(default)]
    viewport: ViewportConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            container: tables.map.container,
            style: tables.map.style,
            zoom: tables.map.zoom,
            access_token: tables.map.access_token,
            article_selector: tables.page.article_selector,
            title_id: tables.page.title_id,
            scroll_limit_ratio: tables.page.scroll_limit_ratio,
            pan_debounce_ms: tables.scroll.pan_debounce_ms,
            compact_max_width_px: tables.layout.compact_max_width_px,
            line_height_px: tables.layout.line_height_px,
            chars_per_line: tables.layout.chars_per_line,
            image_height_px: tables.layout.image_height_px,
            article_gap_px: tables.layout.article_gap_px,
            title_top_px: tables.layout.title_top_px,
            title_margin_bottom_px: tables.layout.title_margin_bottom_px,
            viewport_width: tables.viewport.width,
            viewport_height: tables.viewport.height,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            map: MapConfig {
                container: config.container.clone(),
                style: config.style.clone(),
                zoom: config.zoom,
                access_token: config.access_token.clone(),
            },
            page: PageConfig {
                article_selector: config.article_selector.clone(),
                title_id: config.title_id.clone(),
                scroll_limit_ratio: config.scroll_limit_ratio,
            },
            scroll: ScrollConfig {
                pan_debounce_ms: config.pan_debounce_ms,
            },
            layout: LayoutConfig {
                compact_max_width_px: config.compact_max_width_px,
                line_height_px: config.line_height_px,
                chars_per_line: config.chars_per_line,
                image_height_px: config.image_height_px,
                article_gap_px: config.article_gap_px,
                title_top_px: config.title_top_px,
                title_margin_bottom_px: config.title_margin_bottom_px,
            },
            viewport: ViewportConfig {
                width: config.viewport_width,
                height: config.viewport_height,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct MapConfig {
    #[serde(default = "defaults::default_container")]
    container: String,
    #[serde(default = "defaults::default_style")]
    style: String,
    #[serde(default = "defaults::default_zoom")]
    zoom: f64,
    #[serde(default)]
    access_token: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            container: defaults::default_container(),
            style: defaults::default_style(),
            zoom: defaults::default_zoom(),
            access_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PageConfig {
    #[serde(default = "defaults::default_article_selector")]
    article_selector: String,
    #[serde(default = "defaults::default_title_id")]
    title_id: String,
    #[serde(default = "defaults::default_scroll_limit_ratio")]
    scroll_limit_ratio: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            article_selector: defaults::default_article_selector(),
            title_id: defaults::default_title_id(),
            scroll_limit_ratio: defaults::default_scroll_limit_ratio(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ScrollConfig {
    #[serde(default = "defaults::default_pan_debounce_ms")]
    pan_debounce_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            pan_debounce_ms: defaults::default_pan_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LayoutConfig {
    #[serde(default = "defaults::default_compact_max_width_px")]
    compact_max_width_px: f64,
    #[serde(default = "defaults::default_line_height_px")]
    line_height_px: f64,
    #[serde(default = "defaults::default_chars_per_line")]
    chars_per_line: usize,
    #[serde(default = "defaults::default_image_height_px")]
    image_height_px: f64,
    #[serde(default = "defaults::default_article_gap_px")]
    article_gap_px: f64,
    #[serde(default = "defaults::default_title_top_px")]
    title_top_px: f64,
    #[serde(default = "defaults::default_title_margin_bottom_px")]
    title_margin_bottom_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            compact_max_width_px: defaults::default_compact_max_width_px(),
            line_height_px: defaults::default_line_height_px(),
            chars_per_line: defaults::default_chars_per_line(),
            image_height_px: defaults::default_image_height_px(),
            article_gap_px: defaults::default_article_gap_px(),
            title_top_px: defaults::default_title_top_px(),
            title_margin_bottom_px: defaults::default_title_margin_bottom_px(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ViewportConfig {
    #[serde(default = "defaults::default_viewport_width")]
    width: f64,
    #[serde(default = "defaults::default_viewport_height")]
    height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            width: defaults::default_viewport_width(),
            height: defaults::default_viewport_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
