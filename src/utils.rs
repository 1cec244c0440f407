use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Configuration required to run the export process.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone)]
pub struct ExportConfig {
    pub target_dir: PathBuf,
    pub boards: Vec<String>,
    pub api_key: String,
    pub api_token: String,
    /// Overrides the public API root; tests point this at a mock server.
    pub api_base: Option<String>,
    pub num_days: u32,
    /// Minimum spacing between API requests.
    pub tick: Duration,
    pub quiet: bool,
}

/// Render a timestamp the way JavaScript's `toUTCString()` does, e.g.
/// `Fri, 15 Mar 2024 12:00:00 GMT`. Exported files depend on this exact
/// shape.
pub fn format_utc(ts: DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
