//! Experiment Record - root attributes of an experiment file

use crate::clock;
use crate::store::{Attrs, Tree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root attribute: acquisition date.
pub const DATE_ATTR: &str = "date";
/// Root attribute: file creation time.
pub const INIT_TIME_ATTR: &str = "init_time";
/// Root attribute: directory the file was created in.
pub const DATA_DIRECTORY_ATTR: &str = "data_directory";
/// Root attribute: who ran the experiment.
pub const EXPERIMENTER_ATTR: &str = "experimenter";
/// Root attribute: rig identity.
pub const RIG_ATTR: &str = "rig";

/// Experiment Record represents one experiment file (one acquisition day).
///
/// This is the root of the experiment tree; it is written once when the
/// file is initialized and never changed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentRecord {
    date: String,
    init_time: String,
    data_directory: String,
    experimenter: String,
    rig: String,
}

impl ExperimentRecord {
    /// Create an experiment record stamped with the current date and time.
    ///
    /// # Arguments
    ///
    /// * `data_directory` - Directory holding the experiment file
    /// * `experimenter` - Who is running the experiment
    /// * `rig` - Rig identity
    #[must_use]
    pub fn new(
        data_directory: impl Into<String>,
        experimenter: impl Into<String>,
        rig: impl Into<String>,
    ) -> Self {
        ExperimentRecordBuilder::new(data_directory, experimenter, rig).build()
    }

    /// Create a builder, e.g. to pin the timestamps.
    #[must_use]
    pub fn builder(
        data_directory: impl Into<String>,
        experimenter: impl Into<String>,
        rig: impl Into<String>,
    ) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(data_directory, experimenter, rig)
    }

    /// Acquisition date (`YYYY-MM-DD`).
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// File creation time (`HH:MM:SS`).
    #[must_use]
    pub fn init_time(&self) -> &str {
        &self.init_time
    }

    /// Directory the file was created in.
    #[must_use]
    pub fn data_directory(&self) -> &str {
        &self.data_directory
    }

    /// Experimenter identity.
    #[must_use]
    pub fn experimenter(&self) -> &str {
        &self.experimenter
    }

    /// Rig identity.
    #[must_use]
    pub fn rig(&self) -> &str {
        &self.rig
    }

    /// Write the record as root attributes.
    ///
    /// # Errors
    /// Never in practice; the root always exists.
    pub fn write_to(&self, tree: &mut Tree) -> Result<()> {
        tree.put_attr("/", DATE_ATTR, self.date.as_str())?;
        tree.put_attr("/", INIT_TIME_ATTR, self.init_time.as_str())?;
        tree.put_attr("/", DATA_DIRECTORY_ATTR, self.data_directory.as_str())?;
        tree.put_attr("/", EXPERIMENTER_ATTR, self.experimenter.as_str())?;
        tree.put_attr("/", RIG_ATTR, self.rig.as_str())?;
        Ok(())
    }

    /// Read the record back from root attributes.
    ///
    /// # Errors
    /// `NotFound` if one of the five attributes is missing
    pub fn from_attrs(attrs: &Attrs) -> Result<Self> {
        let get = |key: &str| {
            attrs
                .get(key)
                .map(ToString::to_string)
                .ok_or_else(|| Error::NotFound(format!("experiment attribute {key}")))
        };
        Ok(Self {
            date: get(DATE_ATTR)?,
            init_time: get(INIT_TIME_ATTR)?,
            data_directory: get(DATA_DIRECTORY_ATTR)?,
            experimenter: get(EXPERIMENTER_ATTR)?,
            rig: get(RIG_ATTR)?,
        })
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    date: String,
    init_time: String,
    data_directory: String,
    experimenter: String,
    rig: String,
}

impl ExperimentRecordBuilder {
    /// Create a new builder stamped with the current local time.
    #[must_use]
    pub fn new(
        data_directory: impl Into<String>,
        experimenter: impl Into<String>,
        rig: impl Into<String>,
    ) -> Self {
        let now = clock::now();
        Self {
            date: clock::date(&now),
            init_time: clock::seconds(&now),
            data_directory: data_directory.into(),
            experimenter: experimenter.into(),
            rig: rig.into(),
        }
    }

    /// Set a custom date (useful for re-creating files / testing).
    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Set a custom init time.
    #[must_use]
    pub fn init_time(mut self, init_time: impl Into<String>) -> Self {
        self.init_time = init_time.into();
        self
    }

    /// Build the `ExperimentRecord`.
    #[must_use]
    pub fn build(self) -> ExperimentRecord {
        ExperimentRecord {
            date: self.date,
            init_time: self.init_time,
            data_directory: self.data_directory,
            experimenter: self.experimenter,
            rig: self.rig,
        }
    }
}
