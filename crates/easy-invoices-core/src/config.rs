//! Data-root resolution.

use std::env;
use std::path::PathBuf;

use crate::domain::{InvoiceError, Result};

/// Application directory name under the platform data directory.
pub const APP_NAME: &str = "easy-invoices";

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "EASY_INVOICES_DATA_DIR";

/// Runtime configuration, resolved once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Use `data_dir` when given, otherwise the platform default.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self { data_dir })
    }
}

/// `<platform user-data dir>/easy-invoices`.
///
/// * Linux and other unix: `$XDG_DATA_HOME`, else `~/.local/share`
/// * macOS: `~/Library/Application Support`
/// * Windows: `%APPDATA%`
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(platform_data_dir()?.join(APP_NAME))
}

#[cfg(target_os = "windows")]
fn platform_data_dir() -> Result<PathBuf> {
    non_empty_var("APPDATA")
        .map(PathBuf::from)
        .ok_or_else(|| InvoiceError::Config("APPDATA is not set".to_string()))
}

#[cfg(target_os = "macos")]
fn platform_data_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join("Library").join("Application Support"))
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_data_dir() -> Result<PathBuf> {
    match non_empty_var("XDG_DATA_HOME").map(PathBuf::from) {
        Some(dir) if dir.is_absolute() => Ok(dir),
        _ => Ok(home_dir()?.join(".local").join("share")),
    }
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> Result<PathBuf> {
    non_empty_var("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| InvoiceError::Config("HOME is not set".to_string()))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/invoices"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/invoices"));
    }

    #[test]
    fn test_default_ends_with_app_name() {
        if let Ok(dir) = default_data_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
