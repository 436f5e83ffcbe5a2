//! Centralized directory structure management for the console
//!
//! Directory layout:
//! ```text
//! cosign-console/
//! ├── session.json     # Persisted session entries (token, userId, username)
//! └── logs/            # Rolling console log files
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the console home directory.
pub const HOME_ENV: &str = "COSIGN_CONSOLE_HOME";

const APP_DIR: &str = "cosign-console";
const SESSION_FILE: &str = "session.json";

/// Get the console home directory from environment, platform config dir, or default
pub fn console_home() -> PathBuf {
    // 1. Check environment variable
    if let Ok(val) = std::env::var(HOME_ENV) {
        if !val.trim().is_empty() {
            return PathBuf::from(val);
        }
    }

    // 2. Platform config directory
    if let Some(dir) = dirs::config_dir() {
        return dir.join(APP_DIR);
    }

    // 3. Default fallback
    PathBuf::from(format!(".{}", APP_DIR))
}

/// Persisted session file inside `home`
pub fn session_path(home: &Path) -> PathBuf {
    home.join(SESSION_FILE)
}

/// Log directory inside `home`
pub fn logs_dir(home: &Path) -> PathBuf {
    home.join("logs")
}

/// Ensure a single directory exists
pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

/// Initialize the directory structure under `home`.
/// Call this once at startup before opening the session file.
pub fn init_structure(home: &Path) -> anyhow::Result<PathBuf> {
    ensure_dir(home)?;
    ensure_dir(&logs_dir(home))?;

    let canonical = fs::canonicalize(home).unwrap_or_else(|_| home.to_path_buf());
    info!("Console directory structure initialized at: {:?}", canonical);
    Ok(canonical)
}

/// String-keyed entries as stored on disk.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Entries(pub BTreeMap<String, String>);

/// Load the key/value file at `path`.
///
/// A missing file is an empty map. An unreadable or unparsable file is also
/// treated as empty, with a warning, so a corrupt file never blocks startup.
pub fn load_entries(path: &Path) -> Entries {
    if !path.exists() {
        return Entries::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Entries>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to parse entries file at {:?}: {}", path, e);
                Entries::default()
            }
        },
        Err(e) => {
            warn!("Failed to read entries file at {:?}: {}", path, e);
            Entries::default()
        }
    }
}

/// Write `entries` to `path` atomically (temp file + rename in the same directory).
///
/// An empty map removes the file instead.
pub fn save_entries(path: &Path, entries: &Entries) -> anyhow::Result<()> {
    if entries.0.is_empty() {
        if path.exists() {
            fs::remove_file(path)?;
        }
        return Ok(());
    }

    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Entries path has no parent: {:?}", path))?;
    ensure_dir(parent)?;

    let temp_path = parent.join(format!("tmp_{}", uuid::Uuid::new_v4()));
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(&temp_path, json)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let entries = load_entries(&dir.path().join("nope.json"));
        assert!(entries.0.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = session_path(dir.path());

        let mut entries = Entries::default();
        entries.0.insert("token".into(), "abc".into());
        entries.0.insert("userId".into(), "u-1".into());
        save_entries(&path, &entries).unwrap();

        assert_eq!(load_entries(&path), entries);
        // no temp files left behind
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["session.json".to_string()]);
    }

    #[test]
    fn test_saving_empty_removes_file() {
        let dir = tempdir().unwrap();
        let path = session_path(dir.path());
        let mut entries = Entries::default();
        entries.0.insert("token".into(), "abc".into());
        save_entries(&path, &entries).unwrap();
        assert!(path.exists());

        save_entries(&path, &Entries::default()).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = session_path(dir.path());
        fs::write(&path, "{ malformed json ...").unwrap();
        assert!(load_entries(&path).0.is_empty());
    }

    #[test]
    fn test_init_structure_creates_logs() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("home");
        init_structure(&home).unwrap();
        assert!(logs_dir(&home).is_dir());
    }
}
