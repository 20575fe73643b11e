//! Entry point for the native map host.
//!
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Lay out the page, replay the event script and print the report as JSON.

mod host;
mod layout;
mod page;
mod script;

use crate::host::Host;
use crate::page::{RenderedPage, read_page};
use crate::script::{EventScript, load_script};
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};
use waymark_core::config::load_config;

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Time between steps of the default scroll-through tour.
const TOUR_STEP_MS: u64 = 250;

struct Args {
    page: PathBuf,
    script: Option<PathBuf>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        page = %args.page.display(),
        level = %config.log_level,
        "Starting waymark"
    );
    info!(
        container = %config.container,
        style = %config.style,
        zoom = config.zoom,
        debounce_ms = config.pan_debounce_ms,
        "Active map configuration"
    );
    if config.access_token.is_empty() {
        warn!("No map access token configured; a real map would refuse to load tiles");
    }

    let html = read_page(&args.page)?;
    let page = RenderedPage::layout(&html, &config)?;
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => {
            info!("No event script given; scrolling through the page");
            EventScript::scroll_through(page.document_height(), config.viewport_height, TOUR_STEP_MS)
        }
    };

    let host = Host::start(page, &config).context("Map session failed to start")?;
    let report = host.run(&script);
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let page = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Usage: waymark <page.html> [events.toml]"))?;
    if !page.exists() {
        return Err(anyhow!("File not found: {}", page.display()));
    }
    let script = args.next().map(PathBuf::from);
    Ok(Args { page, script })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
