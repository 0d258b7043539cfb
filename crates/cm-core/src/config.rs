//! Session configuration loaded from JSON

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables of an editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Extension a function's source file must carry (without the dot)
    pub function_extension: String,
    /// Accept an empty Name edit; when false it is rejected like a duplicate
    pub allow_empty_names: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            function_extension: "pyx".to_string(),
            allow_empty_names: true,
        }
    }
}

impl SessionConfig {
    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"allow_empty_names": false}"#).unwrap();
        assert_eq!(config.function_extension, "pyx");
        assert!(!config.allow_empty_names);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("cm_core_config_test.json");
        let config = SessionConfig {
            function_extension: "f90".to_string(),
            allow_empty_names: true,
        };
        config.save(&path).unwrap();
        let loaded = SessionConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }
}
