//! Console message routing.
//!
//! Script console output is formatted into a single log line: the source
//! id is scrubbed of the server origin (it is the same for every page) and
//! a few known-noisy messages are dropped entirely.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Severity reported by the engine for a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsoleLevel {
    Info,
    Warning,
    Error,
    /// An engine-specific level outside the common three.
    Other(i32),
}

impl ConsoleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Other(_) => "other",
        }
    }
}

/// Messages containing any of these are noise, not worth a log line.
const NOISE_MARKERS: &[&str] = &["MathJax localStorage", "link preload"];

fn server_base() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.+://[^/]+").unwrap())
}

/// Format one console message, or `None` when it should be dropped.
///
/// Source ids starting with `data` (inline documents) are blanked;
/// others are truncated to 80 chars and stripped of their origin.
pub fn format_console_message(
    level: ConsoleLevel,
    msg: &str,
    line: u32,
    src_id: &str,
) -> Option<String> {
    let src = if src_id.starts_with("data") {
        String::new()
    } else {
        let truncated: String = src_id.chars().take(80).collect();
        server_base().replace(&truncated, "").into_owned()
    };

    let buf = format!("JS {} {}:{} {}", level.as_str(), src, line, msg);
    if NOISE_MARKERS.iter().any(|marker| buf.contains(marker)) {
        return None;
    }
    Some(buf)
}
