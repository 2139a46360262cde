//! Path helpers for locating local storage.
//!
//! Data lives under the XDG data directory (`$XDG_DATA_HOME/notifeed`), falling
//! back to `~/.local/share/notifeed`.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "notifeed";

/// File name of the key-value store inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

/// Returns the data directory for notifeed storage.
///
/// Falls back to a relative `.notifeed` directory when neither `XDG_DATA_HOME`
/// nor `HOME` is set.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    data_dir_from(
        env::var("XDG_DATA_HOME").ok().as_deref(),
        env::var("HOME").ok().as_deref(),
    )
}

/// Default location of the key-value store file.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    default_data_dir().join(STORAGE_FILE)
}

fn data_dir_from(xdg_data_home: Option<&str>, home: Option<&str>) -> PathBuf {
    match (xdg_data_home.filter(|p| !p.is_empty()), home.filter(|p| !p.is_empty())) {
        (Some(xdg), _) => PathBuf::from(xdg).join(APP_DIR),
        (None, Some(home)) => PathBuf::from(home).join(".local").join("share").join(APP_DIR),
        (None, None) => PathBuf::from(".notifeed"),
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, and every path when `HOME` is unset, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use notifeed::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    expand_tilde_with(path, env::var("HOME").ok().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if path == "~" => home.to_string(),
        Some(home) if path.starts_with("~/") => path.replacen('~', home, 1),
        _ => path.to_string(),
    }
}
