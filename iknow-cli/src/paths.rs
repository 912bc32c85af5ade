//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "app";
const ORGANIZATION: &str = "iknow";
const APPLICATION: &str = "iknow";

/// Name of the log file written by the current run.
const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/iknow` or `~/.cache/iknow`
/// - macOS: `~/Library/Caches/app.iknow.iknow`
/// - Windows: `C:\Users\<User>\AppData\Local\iknow\iknow\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/iknow` or `~/.config/iknow`
/// - macOS: `~/Library/Application Support/app.iknow.iknow`
/// - Windows: `C:\Users\<User>\AppData\Roaming\iknow\iknow\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default path of the stored access token.
pub fn token_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("token"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Rotate logs in the cache directory.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    if let Some(cache) = cache_dir() {
        rotate_logs_in(&cache);
    }
}

/// Rename `latest.log` in `dir` to a timestamped name and clean up old logs.
fn rotate_logs_in(dir: &Path) {
    let latest = dir.join(LATEST_LOG);

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = dir.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(dir, MAX_OLD_LOGS);
}

/// Remove old log files, keeping only the most recent `keep`.
fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // oldest first
    logs.sort_by_key(|e| (e.metadata().and_then(|m| m.modified()).ok(), e.file_name()));

    if logs.len() > keep {
        for entry in logs.iter().take(logs.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
