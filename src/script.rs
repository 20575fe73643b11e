//! Scripted reader sessions replayed by the native host.
//!
//! A script is a TOML file with one `[[events]]` table per action:
//!
//! ```toml
//! [[events]]
//! at_ms = 0
//! kind = "scroll"
//! y = 850.0
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScriptAction {
    /// Scroll the window so its top sits at `y`.
    Scroll { y: f64 },
    Resize { width: f64, height: f64 },
    ClickMarker { index: String },
    ToggleMap,
    /// A push message; `payload` is the raw message data, if any.
    Push {
        #[serde(default)]
        payload: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventScript {
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl EventScript {
    /// Events ordered by time; events sharing a timestamp keep file order.
    pub fn sorted(mut self) -> Self {
        self.events.sort_by_key(|event| event.at_ms);
        self
    }

    /// A reader scrolling top to bottom, half a viewport every `step_ms`.
    pub fn scroll_through(document_height: f64, viewport_height: f64, step_ms: u64) -> Self {
        let step = (viewport_height / 2.0).max(1.0);
        let end = (document_height - viewport_height).max(0.0);
        let mut events = Vec::new();
        let mut y = 0.0;
        let mut at_ms = 0;
        loop {
            at_ms += step_ms;
            y = f64::min(y + step, end);
            events.push(ScriptEvent {
                at_ms,
                action: ScriptAction::Scroll { y },
            });
            if y >= end {
                break;
            }
        }
        debug!(events = events.len(), "Generated scroll-through script");
        EventScript { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub fn parse_script(contents: &str) -> Result<EventScript> {
    let script: EventScript = toml::from_str(contents).context("Invalid event script")?;
    Ok(script.sorted())
}

pub fn load_script(path: &Path) -> Result<EventScript> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event script {}", path.display()))?;
    let script = parse_script(&contents)?;
    info!(path = %path.display(), events = script.len(), "Loaded event script");
    Ok(script)
}
