// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

/// The preference key for the fade-in duration.
pub const FADE_IN_SECONDS: &str = "fade-in-seconds";
/// The preference key for the fade-out duration.
pub const FADE_OUT_SECONDS: &str = "fade-out-seconds";
/// The default fade duration applied when a preference has never been set.
pub const DEFAULT_FADE_SECONDS: u64 = 2;

/// A small persistent key-value store for user preferences. There is a
/// single writer (the settings surface), so implementations only need to be
/// safe, not contended.
pub trait Store: Send + Sync {
    /// Gets the value for the key, or the default if the key is absent.
    fn get(&self, key: &str, default: u64) -> u64;

    /// Sets and persists the value for the key.
    fn set(&self, key: &str, value: u64) -> Result<(), Box<dyn Error>>;
}

/// A preference store backed by a flat JSON file.
pub struct FileStore {
    /// The file the preferences persist to.
    path: PathBuf,
    /// The in-memory view of the preference file.
    values: Mutex<HashMap<String, u64>>,
}

impl FileStore {
    /// Creates a new file store. An existing preference file is loaded, a
    /// missing one is treated as empty and created on first write.
    pub fn new(path: &Path) -> Result<FileStore, Box<dyn Error>> {
        let values = if path.exists() {
            serde_json::from_str(&fs::read_to_string(path)?)
                .map_err(|e| format!("error parsing preferences {}: {}", path.display(), e))?
        } else {
            HashMap::new()
        };

        Ok(FileStore {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }
}

impl Store for FileStore {
    fn get(&self, key: &str, default: u64) -> u64 {
        let values = self.values.lock().expect("Error getting lock");
        values.get(key).copied().unwrap_or(default)
    }

    fn set(&self, key: &str, value: u64) -> Result<(), Box<dyn Error>> {
        let mut values = self.values.lock().expect("Error getting lock");
        values.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&*values)?)?;

        info!(key = key, value = value, "Persisted preference.");
        Ok(())
    }
}
