//! Path helpers

use std::path::PathBuf;

/// Expand `~` and make relative paths absolute against the working
/// directory. Absolute paths pass through unchanged.
///
/// ```text
/// expand_path("~/.flowdash")        // -> /home/user/.flowdash
/// expand_path("data/kpiData.json")  // -> /current/dir/data/kpiData.json
/// expand_path("/srv/kpi.json")      // -> /srv/kpi.json
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}
