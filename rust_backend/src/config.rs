//! OB generator configuration file support.
//!
//! ```toml
//! [instrument]
//! name = "GRAVITY"
//! conf_dir = "conf"
//!
//! [p2]
//! username = "52052"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ObError, ObResult};
use crate::instrument::gravity::{Gravity, INSTRUMENT_NAME};
use crate::instrument::VltiInstrument;

/// OB generator configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VltiConfig {
    #[serde(default)]
    pub instrument: InstrumentSettings,
    #[serde(default)]
    pub p2: P2Settings,
}

/// Instrument and lookup table location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSettings {
    #[serde(default = "default_instrument_name")]
    pub name: String,
    /// Directory holding `<name>_rangeTable.json` and `<name>_ditTable.json`.
    #[serde(default = "default_conf_dir")]
    pub conf_dir: PathBuf,
}

/// P2 account settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct P2Settings {
    /// Written into the user comment of every created OB.
    #[serde(default)]
    pub username: String,
}

fn default_instrument_name() -> String {
    INSTRUMENT_NAME.to_string()
}

fn default_conf_dir() -> PathBuf {
    PathBuf::from("conf")
}

impl Default for InstrumentSettings {
    fn default() -> Self {
        Self {
            name: default_instrument_name(),
            conf_dir: default_conf_dir(),
        }
    }
}

impl VltiConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `conf_dir` is resolved against the directory of the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ObResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ObError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if config.instrument.conf_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.instrument.conf_dir = parent.join(&config.instrument.conf_dir);
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ObResult<Self> {
        toml::from_str(content)
            .map_err(|e| ObError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `vlti.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> ObResult<Self> {
        let search_paths = [
            PathBuf::from("vlti.toml"),
            PathBuf::from("rust_backend/vlti.toml"),
            PathBuf::from("../vlti.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                log::debug!("Using configuration {}", path.display());
                return Self::from_file(path);
            }
        }

        Err(ObError::Configuration(
            "No vlti.toml found in standard locations".to_string(),
        ))
    }

    /// Load the configured instrument tables.
    pub fn instrument(&self) -> ObResult<VltiInstrument> {
        VltiInstrument::load(&self.instrument.name, &self.instrument.conf_dir)
    }

    /// GRAVITY OB generator for the configured P2 user.
    pub fn gravity(&self) -> ObResult<Gravity> {
        Gravity::new(self.instrument()?, self.p2.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = VltiConfig::from_toml_str("").unwrap();
        assert_eq!(config.instrument.name, "GRAVITY");
        assert_eq!(config.instrument.conf_dir, PathBuf::from("conf"));
        assert_eq!(config.p2.username, "");
    }

    #[test]
    fn test_parse_error() {
        let err = VltiConfig::from_toml_str("[instrument\nname = 1").unwrap_err();
        assert!(matches!(err, ObError::Configuration(_)));
    }

    #[test]
    fn test_relative_conf_dir_follows_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[instrument]\nconf_dir = \"tables\"\n\n[p2]\nusername = \"jdoe\"").unwrap();

        let config = VltiConfig::from_file(file.path()).unwrap();
        let parent = file.path().parent().unwrap();
        assert_eq!(config.instrument.conf_dir, parent.join("tables"));
        assert_eq!(config.p2.username, "jdoe");
    }

    #[test]
    fn test_loads_instrument_tables() {
        let conf_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("conf");
        let toml = format!(
            "[instrument]\nname = \"GRAVITY\"\nconf_dir = {:?}\n\n[p2]\nusername = \"jdoe\"\n",
            conf_dir.display().to_string()
        );
        let config = VltiConfig::from_toml_str(&toml).unwrap();

        let gravity = config.gravity().unwrap();
        assert_eq!(gravity.username(), "jdoe");
        assert_eq!(gravity.instrument().name(), "GRAVITY");
    }

    #[test]
    fn test_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = VltiConfig::from_toml_str("").unwrap();
        config.instrument.conf_dir = dir.path().to_path_buf();
        let err = config.instrument().unwrap_err();
        assert!(matches!(err, ObError::TableLoad { .. }));
        assert!(err.to_string().contains("GRAVITY_rangeTable.json"));
    }
}
