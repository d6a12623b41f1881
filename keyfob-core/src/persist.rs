//! State file I/O
//!
//! Loads and saves the application state (accounts plus window geometry)
//! as a single JSON document in the user's configuration directory.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PersistError;
use crate::types::Secret;

/// Default state file name
const STORE_FILE_NAME: &str = "keyfob.json";

fn default_width() -> u32 {
    200
}

fn default_height() -> u32 {
    300
}

/// Complete persisted application state
///
/// The wire names (`resWidth`/`resHeight`) are fixed by existing state
/// files in the field and must not change. Account keys serialize in
/// ascending order because the mapping is a `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Account name to Base32 secret mapping
    #[serde(default)]
    pub accounts: BTreeMap<String, Secret>,

    /// Window width in pixels
    #[serde(rename = "resWidth", default = "default_width")]
    pub width: u32,

    /// Window height in pixels
    #[serde(rename = "resHeight", default = "default_height")]
    pub height: u32,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            accounts: BTreeMap::new(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Load state from a file
///
/// A missing file is the normal first-run case and yields the default
/// state. A file that exists but does not parse is reported as
/// [`PersistError::Malformed`] so the caller can choose between aborting
/// and starting over.
pub fn load(path: &Path) -> Result<PersistedState, PersistError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no state file yet, using defaults");
            return Ok(PersistedState::default());
        }
        Err(e) => return Err(PersistError::Io(e)),
    };

    let state: PersistedState = serde_json::from_str(&contents).map_err(PersistError::Malformed)?;

    debug!(
        path = %path.display(),
        accounts = state.accounts.len(),
        "loaded state file"
    );
    Ok(state)
}

/// Save state to a file, overwriting prior contents in full
///
/// The document is written to a temp file in the same directory and
/// renamed over the target, so readers never see a half-written file.
/// Parent directories are created as needed.
pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(state).map_err(PersistError::Encode)?;

    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;

    debug!(
        path = %path.display(),
        accounts = state.accounts.len(),
        "saved state file"
    );
    Ok(())
}

/// Resolve the default state file path
///
/// Returns `~/.config/keyfob/keyfob.json`, or the value of the
/// `KEYFOB_STORE` environment variable if set.
pub fn default_store_path() -> Result<PathBuf, PersistError> {
    if let Ok(path) = std::env::var("KEYFOB_STORE") {
        return Ok(PathBuf::from(path));
    }

    let home = std::env::var("HOME").map_err(|_| PersistError::NoHome)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("keyfob")
        .join(STORE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_state() -> PersistedState {
        let mut accounts = BTreeMap::new();
        accounts.insert("github".to_string(), Secret::new("JBSWY3DPEHPK3PXP"));
        accounts.insert(
            "mail".to_string(),
            Secret::new("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"),
        );
        PersistedState {
            accounts,
            width: 420,
            height: 640,
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let state = load(&dir.path().join("absent.json")).unwrap();

        assert!(state.accounts.is_empty());
        assert_eq!(state.width, 200);
        assert_eq!(state.height, 300);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyfob.json");

        let original = sample_state();
        save(&path, &original).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("keyfob.json");

        save(&path, &sample_state()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyfob.json");

        save(&path, &sample_state()).unwrap();
        assert!(!dir.path().join(".keyfob.json.tmp").exists());
    }

    #[test]
    fn test_malformed_file_is_a_recoverable_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyfob.json");
        fs::write(&path, "definitely { not json").unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(PersistError::Malformed(_))));
    }

    #[test]
    fn test_empty_file_is_malformed_not_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyfob.json");
        fs::write(&path, "").unwrap();

        assert!(matches!(load(&path), Err(PersistError::Malformed(_))));
    }

    #[test]
    fn test_missing_geometry_keys_default_without_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyfob.json");
        fs::write(&path, r#"{"accounts": {"github": "JBSWY3DPEHPK3PXP"}}"#).unwrap();

        let state = load(&path).unwrap();
        assert_eq!(state.accounts.len(), 1);
        assert_eq!(state.width, 200);
        assert_eq!(state.height, 300);
    }

    #[test]
    fn test_missing_accounts_key_defaults_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyfob.json");
        fs::write(&path, r#"{"resWidth": 640, "resHeight": 480}"#).unwrap();

        let state = load(&path).unwrap();
        assert!(state.accounts.is_empty());
        assert_eq!(state.width, 640);
        assert_eq!(state.height, 480);
    }

    #[test]
    fn test_wire_format_uses_historic_key_names() {
        let json = serde_json::to_string(&sample_state()).unwrap();

        assert!(json.contains("\"accounts\""));
        assert!(json.contains("\"resWidth\""));
        assert!(json.contains("\"resHeight\""));
        assert!(!json.contains("\"width\""));
    }

    #[test]
    fn test_account_keys_serialize_in_ascending_order() {
        let mut accounts = BTreeMap::new();
        accounts.insert("zeta".to_string(), Secret::new("JBSWY3DPEHPK3PXP"));
        accounts.insert("alpha".to_string(), Secret::new("JBSWY3DPEHPK3PXP"));
        let state = PersistedState {
            accounts,
            ..PersistedState::default()
        };

        let json = serde_json::to_string(&state).unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_overwrite_replaces_prior_contents_in_full() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyfob.json");

        save(&path, &sample_state()).unwrap();
        save(&path, &PersistedState::default()).unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.accounts.is_empty());
        assert_eq!(loaded.width, 200);
    }
}
