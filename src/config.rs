//! Persisted settings.
//!
//! Settings are stored as a JSON record with camelCase keys. Missing keys take
//! their defaults and unknown keys are ignored, so older or hand-edited files
//! always load.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StyleResult;

// =============================================================================
// Settings
// =============================================================================

/// User-facing configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Prepend `\displaystyle` to the whole snippet.
    pub front: bool,
    /// Mark the argument of every superscript.
    pub superscript: bool,
    /// Mark the argument of every subscript.
    pub subscript: bool,
    /// Comma-separated command names to mark, e.g. `"frac, binom"`.
    pub additional_function_names: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            front: true,
            superscript: false,
            subscript: false,
            additional_function_names: String::new(),
        }
    }
}

impl Settings {
    /// Decode settings from JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode settings as pretty-printed JSON.
    pub fn to_json(&self) -> StyleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// SettingsStore
// =============================================================================

/// Persistence backend for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Load stored settings, or `None` if nothing was saved yet.
    fn load(&self) -> StyleResult<Option<Settings>>;

    /// Persist settings.
    fn save(&self, settings: &Settings) -> StyleResult<()>;
}

/// Stores settings in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> StyleResult<Option<Settings>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Settings::from_json(&json).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, settings: &Settings) -> StyleResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, settings.to_json()?)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
