//! # Library Manager Module
//!
//! ## Purpose
//! Provides centralized management of the JSON dataset paths of ChemLab: the chemical
//! reference table and the predefined reaction table. Datasets can be switched
//! without recompiling, and paths that do not exist fall back to the bundled data.
//!
//! ## Architecture
//! - **LibraryConfig**: Serializable configuration structure
//! - **LibraryManager**: Core manager with file validation and persistence
//! - **Global Access**: Thread-safe singleton
//! - **Configuration File**: JSON-based persistent storage (library_config.json)
//!
//! ## Configuration Format
//! ```json
//! {
//!   "chemical_base": "data/chemicals.json",
//!   "reaction_base": "data/reactions.json"
//! }
//! ```
//!
//! ## Usage Patterns
//! ```rust
//! use ChemLab::library_manager::with_library_manager;
//!
//! let path = with_library_manager(|manager| manager.chemical_base_path().to_string());
//! assert!(path.ends_with(".json"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Paths of the JSON datasets.
///
/// # Fields
/// * `chemical_base` - array of chemical records
/// * `reaction_base` - array of predefined reactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub chemical_base: String,
    pub reaction_base: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            chemical_base: "data/chemicals.json".to_string(),
            reaction_base: "data/reactions.json".to_string(),
        }
    }
}

/// Loads, saves and updates the dataset configuration.
#[derive(Debug, Clone)]
pub struct LibraryManager {
    config: LibraryConfig,
    config_file: String,
}

impl Default for LibraryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryManager {
    /// Reads "library_config.json" from the current directory, or uses the defaults
    /// when the file is missing or invalid.
    pub fn new() -> Self {
        Self::with_config_file("library_config.json")
    }

    /// Same as `new` with a custom configuration file path
    pub fn with_config_file(config_file: &str) -> Self {
        let config = Self::load_config(config_file).unwrap_or_default();

        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<LibraryConfig, Box<dyn std::error::Error>> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: LibraryConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(LibraryConfig::default())
        }
    }

    /// Writes the configuration to its file. Does nothing under `cargo test`
    /// so the real config file is never polluted.
    pub fn save_config(&self) -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(test)]
        {
            return Ok(());
        }

        #[cfg(not(test))]
        {
            let content = serde_json::to_string_pretty(&self.config)?;
            fs::write(&self.config_file, content)?;
            Ok(())
        }
    }

    pub fn chemical_base_path(&self) -> &str {
        &self.config.chemical_base
    }

    pub fn reaction_base_path(&self) -> &str {
        &self.config.reaction_base
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Switches the chemical table to another file; the file must exist.
    pub fn set_chemical_base(&mut self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        if Path::new(path).exists() {
            self.config.chemical_base = path.to_string();
            self.save_config()?;
            Ok(())
        } else {
            Err(format!("File does not exist: {}", path).into())
        }
    }

    /// Switches the reaction table to another file; the file must exist.
    pub fn set_reaction_base(&mut self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        if Path::new(path).exists() {
            self.config.reaction_base = path.to_string();
            self.save_config()?;
            Ok(())
        } else {
            Err(format!("File does not exist: {}", path).into())
        }
    }

    /// Updates several paths at once: either every file exists and all updates apply,
    /// or nothing changes.
    ///
    /// Keys: "chemical_base", "reaction_base"
    pub fn update_libraries(
        &mut self,
        updates: HashMap<&str, &str>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for (key, path) in &updates {
            if !matches!(*key, "chemical_base" | "reaction_base") {
                return Err(format!("Unknown library key: {}", key).into());
            }
            if !Path::new(path).exists() {
                return Err(format!("File does not exist: {}", path).into());
            }
        }

        for (key, path) in updates {
            match key {
                "chemical_base" => self.config.chemical_base = path.to_string(),
                _ => self.config.reaction_base = path.to_string(),
            }
        }

        self.save_config()?;
        Ok(())
    }

    pub fn get_config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.config = LibraryConfig::default();
        self.save_config()?;
        Ok(())
    }
}

/// Global singleton instance of LibraryManager
static GLOBAL_LIBRARY_MANAGER: OnceLock<Mutex<LibraryManager>> = OnceLock::new();

/// Returns a guard to the global LibraryManager. A poisoned lock is recovered,
/// the configuration it protects stays valid.
pub fn get_library_manager() -> MutexGuard<'static, LibraryManager> {
    GLOBAL_LIBRARY_MANAGER
        .get_or_init(|| Mutex::new(LibraryManager::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs a closure with read-only access to the global LibraryManager.
pub fn with_library_manager<F, R>(f: F) -> R
where
    F: FnOnce(&LibraryManager) -> R,
{
    let manager = get_library_manager();
    f(&*manager)
}

/// Runs a closure with mutable access to the global LibraryManager.
///
/// # Example
/// ```rust
/// use ChemLab::library_manager::with_library_manager_mut;
/// let result = with_library_manager_mut(|manager| manager.set_chemical_base("no_such_file.json"));
/// assert!(result.is_err());
/// ```
pub fn with_library_manager_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut LibraryManager) -> R,
{
    let mut manager = get_library_manager();
    f(&mut *manager)
}
