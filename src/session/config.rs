//! Session configuration
//!
//! ```toml
//! user_name = "mhturner"
//! rig_name = "Bruker"
//! experimenter = "Max"
//!
//! [rig_config.Bruker]
//! data_directory = "/data/bruker"
//! rig = "Bruker 2P"
//! screen_center = [0.0, 0.0]
//!
//! [rig_config.AODscope]
//! data_directory = "/data/aod"
//! series_counter = "dual"
//! ```

use crate::counter::CounterKind;
use crate::store::DATA_FILE_EXTENSION;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Rig label used when the rig entry does not name one.
pub const DEFAULT_RIG_LABEL: &str = "(rig)";

/// Per-rig settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Where experiment files are written (default: working directory)
    #[serde(default)]
    pub data_directory: Option<PathBuf>,
    /// Rig label stored in every experiment file (default: `(rig)`)
    #[serde(default)]
    pub rig: Option<String>,
    /// Screen center in degrees (default: `[0, 0]`)
    #[serde(default)]
    pub screen_center: Option<[f64; 2]>,
    /// Series numbering policy
    #[serde(default)]
    pub series_counter: CounterKind,
}

impl RigConfig {
    /// Rig label.
    #[must_use]
    pub fn rig_label(&self) -> &str {
        self.rig.as_deref().unwrap_or(DEFAULT_RIG_LABEL)
    }

    /// Screen center, `[0, 0]` if unset.
    #[must_use]
    pub fn screen_center(&self) -> [f64; 2] {
        self.screen_center.unwrap_or([0.0, 0.0])
    }

    /// Data directory, falling back to the process working directory.
    ///
    /// # Errors
    /// `Io` if the working directory cannot be determined
    pub fn data_directory(&self) -> Result<PathBuf> {
        match &self.data_directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// User and rig configuration of an acquisition session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// User whose protocols are run
    #[serde(default)]
    pub user_name: String,
    /// Key of the active rig in `rig_config`
    #[serde(default)]
    pub rig_name: String,
    /// Experimenter recorded in new experiment files
    #[serde(default)]
    pub experimenter: String,
    /// Settings per rig
    #[serde(default)]
    pub rig_config: BTreeMap<String, RigConfig>,
}

impl SessionConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    /// `Config` if the document is malformed
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Config` if it is malformed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Minimal configuration for one rig.
    #[must_use]
    pub fn for_rig(rig_name: impl Into<String>, rig: RigConfig) -> Self {
        let rig_name = rig_name.into();
        Self {
            rig_config: BTreeMap::from([(rig_name.clone(), rig)]),
            rig_name,
            ..Self::default()
        }
    }

    /// Settings of the active rig.
    ///
    /// # Errors
    /// `Config` if `rig_name` has no entry in `rig_config`
    pub fn rig(&self) -> Result<&RigConfig> {
        self.rig_config
            .get(&self.rig_name)
            .ok_or_else(|| Error::Config(format!("no rig_config entry for rig {:?}", self.rig_name)))
    }

    /// Path of the experiment file `name` in the active rig's data directory.
    ///
    /// # Errors
    /// `Config` if the active rig is not configured
    pub fn experiment_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self
            .rig()?
            .data_directory()?
            .join(format!("{name}.{DATA_FILE_EXTENSION}")))
    }
}
