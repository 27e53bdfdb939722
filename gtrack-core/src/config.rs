use std::env;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DATA_SUBFOLDER, GTRACK_DATA_DIR_ENV};
use crate::errors::{GtrackError, Result};

///
/// Where track stores are read from and written to.
///
/// A config is either loaded from a TOML file:
///
/// ```toml
/// data_dir = "/data/gtrack"
/// ```
///
/// or built from the environment with [`GtrackConfig::from_env`].
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GtrackConfig {
    pub data_dir: PathBuf,
}

impl GtrackConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        GtrackConfig {
            data_dir: data_dir.into(),
        }
    }

    ///
    /// Build a config from `GTRACK_DATA_DIR`, falling back to `~/.gtrack/data`.
    ///
    pub fn from_env() -> Self {
        GtrackConfig::new(get_default_data_dir())
    }
}

impl Default for GtrackConfig {
    fn default() -> Self {
        GtrackConfig::from_env()
    }
}

impl TryFrom<&Path> for GtrackConfig {
    type Error = GtrackError;

    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        let config: GtrackConfig = toml::from_str(&toml_str)?;
        if config.data_dir.as_os_str().is_empty() {
            return Err(GtrackError::Config(format!(
                "data_dir is empty in {}",
                path.display()
            )));
        }
        debug!(
            "Loaded config from {}: data_dir = {}",
            path.display(),
            config.data_dir.display()
        );
        Ok(config)
    }
}

/// Get the default data folder from the environment, if not available then use the home folder
///
/// # Returns
/// - path to the data folder
pub fn get_default_data_dir() -> PathBuf {
    if let Ok(val) = env::var(GTRACK_DATA_DIR_ENV) {
        PathBuf::from(val)
    } else {
        let home = dirs::home_dir().unwrap_or_else(|| {
            warn!("No home directory found, keeping track data under /tmp");
            PathBuf::from("/tmp")
        });
        home.join(DEFAULT_DATA_SUBFOLDER)
    }
}
