//! Experiment session
//!
//! Drives one experiment file through its lifecycle:
//!
//! ```text
//! NoFile ──initialize/open──> NoFly ──create_fly/select_fly──> FlySelected
//!                                                                  │
//!                               SeriesOpen <──────create_series────┘
//!                                  │  ▲
//!                                  └──┘ create_epoch
//! ```
//!
//! Every write is one store transaction. Lifecycle violations (no file, no
//! fly, no series, duplicate fly id) are logged and returned as recoverable
//! errors before anything is written; storage failures propagate as-is.
//!
//! ## Example
//!
//! ```rust
//! use flylab_data::counter::SeriesCounter;
//! use flylab_data::params::StimParameters;
//! use flylab_data::session::ExperimentSession;
//! use serde_json::json;
//!
//! # fn main() -> flylab_data::Result<()> {
//! # let dir = tempfile::tempdir()?;
//! let mut session = ExperimentSession::new(SeriesCounter::single());
//! session.initialize_experiment_file(dir.path().join("2024-05-01.json"))?;
//!
//! let fly = json!({"fly_id": "fly1", "genotype": "w1118"});
//! session.create_fly(fly.as_object().unwrap())?;
//!
//! let run = json!({"num_epochs": 2, "pre_time": 1.0});
//! let ordinal = session.create_series(run.as_object().unwrap(), &Default::default())?;
//! assert_eq!(ordinal, 1);
//!
//! let stim = json!({"name": "MovingSpot", "color": 0.5});
//! session.create_epoch(1, &StimParameters::from(stim.as_object().unwrap().clone()), &Default::default())?;
//! assert_eq!(session.highest_series_ordinal()?, 1);
//! # Ok(())
//! # }
//! ```

pub mod config;

pub use config::{RigConfig, SessionConfig};

use crate::clock;
use crate::counter::{ScanMode, SeriesCounter};
use crate::experiment::{
    EpochRecord, ExperimentRecord, FlyRecord, NoteRecord, SeriesRecord, EPOCH_TIME_ATTR,
    FLY_ID_KEY, FLY_INIT_TIME_ATTR, RUN_START_TIME_ATTR,
};
use crate::params::{ParamMap, StimParameters};
use crate::store::{layout, RecordStore, Tree};
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Where a session is in the experiment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No experiment file attached, or the attached file is gone
    NoFile,
    /// File attached, no fly selected
    NoFly,
    /// Fly selected, no series created for it yet
    FlySelected,
    /// A series is open for epochs
    SeriesOpen,
}

/// Orchestrates fly, series, epoch and note creation on one experiment file.
#[derive(Debug)]
pub struct ExperimentSession {
    experimenter: String,
    rig: String,
    data_directory: Option<String>,
    store: Option<RecordStore>,
    current_fly: Option<String>,
    current_series: Option<u32>,
    counter: SeriesCounter,
    /// Fly the counter was last synchronized with
    counter_scope: Option<String>,
    /// Id fixed by `set_counter`, honoured by the next series
    pinned_id: Option<u32>,
}

impl ExperimentSession {
    /// Session with the given numbering policy and no file attached.
    #[must_use]
    pub fn new(counter: SeriesCounter) -> Self {
        Self {
            experimenter: String::new(),
            rig: config::DEFAULT_RIG_LABEL.to_string(),
            data_directory: None,
            store: None,
            current_fly: None,
            current_series: None,
            counter,
            counter_scope: None,
            pinned_id: None,
        }
    }

    /// Session for the active rig of a configuration.
    ///
    /// # Errors
    /// `Config` if the active rig is not configured
    pub fn from_config(cfg: &SessionConfig) -> Result<Self> {
        let rig = cfg.rig()?;
        let mut session = Self::new(SeriesCounter::from_kind(rig.series_counter))
            .with_identity(cfg.experimenter.as_str(), rig.rig_label());
        session.data_directory = Some(rig.data_directory()?.display().to_string());
        Ok(session)
    }

    /// Set the experimenter and rig recorded in new experiment files.
    #[must_use]
    pub fn with_identity(mut self, experimenter: impl Into<String>, rig: impl Into<String>) -> Self {
        self.experimenter = experimenter.into();
        self.rig = rig.into();
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if !self.experiment_file_exists() {
            SessionState::NoFile
        } else if self.current_fly.is_none() {
            SessionState::NoFly
        } else if self.current_series.is_none() {
            SessionState::FlySelected
        } else {
            SessionState::SeriesOpen
        }
    }

    /// Path of the attached experiment file.
    #[must_use]
    pub fn experiment_file(&self) -> Option<&Path> {
        self.store.as_ref().map(RecordStore::path)
    }

    /// Whether a file is attached and present on disk.
    #[must_use]
    pub fn experiment_file_exists(&self) -> bool {
        self.store.as_ref().is_some_and(RecordStore::exists)
    }

    /// Selected fly.
    #[must_use]
    pub fn current_fly(&self) -> Option<&str> {
        self.current_fly.as_deref()
    }

    /// Node ordinal of the series epochs are written to.
    #[must_use]
    pub const fn current_series(&self) -> Option<u32> {
        self.current_series
    }

    /// Numbering policy state.
    #[must_use]
    pub const fn counter(&self) -> &SeriesCounter {
        &self.counter
    }

    // ------------------------------------------------------------------
    // File lifecycle
    // ------------------------------------------------------------------

    /// Create a new experiment file at `path` and attach to it.
    ///
    /// If a file already exists there the session still attaches to it (so
    /// the caller can carry on with the existing file after
    /// [`reload_counter`](Self::reload_counter)) and `AlreadyExists` is
    /// returned.
    ///
    /// # Errors
    /// - `AlreadyExists` (recoverable) if the file exists
    /// - `Io` / `Serialization` on storage failure
    pub fn initialize_experiment_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let store = RecordStore::new(path);
        let data_directory = self.data_directory.clone().unwrap_or_else(|| {
            store
                .path()
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        });
        let record = ExperimentRecord::new(data_directory, self.experimenter.as_str(), self.rig.as_str());

        let result = store.initialize(&record);
        self.attach(store);
        match result {
            Ok(()) => self.reload_counter(),
            Err(e) => Err(self.report(e)),
        }
    }

    /// Attach to an existing experiment file and re-derive the counter.
    ///
    /// # Errors
    /// - `NotFound` (recoverable) if there is no file at `path`
    /// - `Io` / `Serialization` on storage failure
    pub fn open_experiment_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let store = RecordStore::new(path);
        if !store.exists() {
            return Err(self.report(Error::NotFound(format!(
                "experiment file {}",
                store.path().display()
            ))));
        }
        self.attach(store);
        self.reload_counter()
    }

    /// Detach from the current file. The counter is kept.
    pub fn close_experiment_file(&mut self) {
        self.store = None;
        self.current_fly = None;
        self.current_series = None;
        self.counter_scope = None;
    }

    fn attach(&mut self, store: RecordStore) {
        tracing::info!(target: "flylab::session", path = %store.path().display(), "experiment file attached");
        self.store = Some(store);
        self.current_fly = None;
        self.current_series = None;
        self.counter_scope = None;
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Create a fly from caller metadata and select it.
    ///
    /// `metadata` must contain a string `fly_id`; every entry is stored as
    /// a fly attribute, next to `init_time`.
    ///
    /// # Errors
    /// - `PreconditionViolation` if no experiment file exists
    /// - `InvalidInput` if `fly_id` is missing, not a string, empty or
    ///   contains `/`
    /// - `AlreadyExists` if a fly with that id exists
    pub fn create_fly(&mut self, metadata: &ParamMap) -> Result<()> {
        let store = self.require_file("initialize a data file before defining a fly")?.clone();
        let fly_id = metadata
            .get(FLY_ID_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                self.report(Error::InvalidInput(format!("fly metadata needs a string {FLY_ID_KEY}")))
            })?;
        if fly_id.is_empty() || fly_id.contains('/') {
            return Err(self.report(Error::InvalidInput(format!(
                "{FLY_ID_KEY} {fly_id:?} is not a valid node name"
            ))));
        }

        let init_time = clock::centiseconds(&clock::now());
        store
            .with_write(|tree| {
                if tree.contains(&layout::fly_path(&fly_id)) {
                    return Err(Error::AlreadyExists {
                        what: "fly",
                        name: fly_id.clone(),
                    });
                }
                let fly = tree.create_child(&layout::flies_path(), &fly_id)?;
                tree.put_attr(&fly, FLY_INIT_TIME_ATTR, init_time.as_str())?;
                for (key, value) in metadata {
                    tree.set_attr(&fly, key, value)?;
                }
                tree.create_child(&fly, layout::EPOCH_RUNS)?;
                Ok(())
            })
            .map_err(|e| self.report(e))?;

        tracing::info!(target: "flylab::session", fly_id = %fly_id, "fly created");
        self.select_fly(fly_id);
        Ok(())
    }

    /// Make `fly_id` the fly that new series belong to.
    ///
    /// No check is made that the fly exists in the file; a series write for
    /// an unknown fly fails with `NotFound`.
    pub fn select_fly(&mut self, fly_id: impl Into<String>) {
        let fly_id = fly_id.into();
        if self.current_fly.as_deref() != Some(fly_id.as_str()) {
            self.current_series = None;
        }
        tracing::debug!(target: "flylab::session", fly_id = %fly_id, "fly selected");
        self.current_fly = Some(fly_id);
    }

    /// Choose which mode counter the next series uses (dual counter only).
    ///
    /// # Errors
    /// `PreconditionViolation` for a single-counter session
    pub fn set_scan_mode(&mut self, mode: ScanMode) -> Result<()> {
        self.counter.set_scan_mode(mode).map_err(|e| self.report(e))
    }

    /// Create the next series for the selected fly and open it for epochs.
    ///
    /// Both parameter maps are stored as series attributes, run parameters
    /// first. Returns the node ordinal (`series_<NNN>`).
    ///
    /// # Errors
    /// - `PreconditionViolation` if no file exists or no fly is selected
    /// - `NotFound` if the selected fly is not in the file
    /// - `AlreadyExists` if the counter points at an existing series
    /// - `InvalidInput` if the ordinal no longer fits three digits
    pub fn create_series(
        &mut self,
        run_parameters: &ParamMap,
        protocol_parameters: &ParamMap,
    ) -> Result<u32> {
        let (store, fly_id) = self.require_fly()?;
        let resync = self.counter_scope.as_deref() != Some(fly_id.as_str());
        let pinned = self.pinned_id;
        let mut counter = self.counter.clone();
        let run_start_time = clock::centiseconds(&clock::now());

        let ordinal = store
            .with_write(|tree| {
                if resync {
                    counter.reload_from_store(tree, Some(fly_id.as_str()))?;
                }
                if let Some(id) = pinned {
                    counter.set(id);
                }
                let ordinal = counter.node_ordinal();
                let series = tree.create_child(
                    &layout::epoch_runs_path(&fly_id),
                    &layout::series_name(ordinal)?,
                )?;
                tree.put_attr(&series, RUN_START_TIME_ATTR, run_start_time.as_str())?;
                for (key, value) in run_parameters.iter().chain(protocol_parameters) {
                    tree.set_attr(&series, key, value)?;
                }
                for group in layout::SERIES_GROUPS {
                    tree.create_child(&series, group)?;
                }
                counter.stamp_acquisition(tree, &tree_path(&series, layout::ACQUISITION))?;
                Ok(ordinal)
            })
            .map_err(|e| self.report(e))?;

        tracing::info!(
            target: "flylab::session",
            fly_id = %fly_id,
            ordinal,
            series_id = counter.next_id(),
            scan_mode = ?counter.scan_mode(),
            "series created"
        );
        counter.advance();
        self.counter = counter;
        self.counter_scope = Some(fly_id);
        self.pinned_id = None;
        self.current_series = Some(ordinal);
        Ok(ordinal)
    }

    /// Write one epoch into the open series.
    ///
    /// `epoch_number` is the 1-based epoch index (epochs completed + 1) and
    /// names the node `epoch_<NNN>`.
    ///
    /// # Errors
    /// - `PreconditionViolation` if no file, no fly, or no open series
    /// - `AlreadyExists` if the epoch was already written
    /// - `InvalidInput` if the number does not fit three digits
    pub fn create_epoch(
        &mut self,
        epoch_number: u32,
        stim_parameters: &StimParameters,
        convenience_parameters: &ParamMap,
    ) -> Result<()> {
        let (store, fly_id) = self.require_fly()?;
        let ordinal = self.current_series.ok_or_else(|| {
            self.report(Error::PreconditionViolation(
                "create a series before writing epochs".to_string(),
            ))
        })?;
        let epoch_time = clock::micros(&clock::now());

        store
            .with_write(|tree| {
                let epochs = layout::series_group_path(&fly_id, ordinal, layout::EPOCHS)?;
                let epoch = tree.create_child(&epochs, &layout::epoch_name(epoch_number)?)?;
                tree.put_attr(&epoch, EPOCH_TIME_ATTR, epoch_time.as_str())?;
                for (key, value) in stim_parameters.attributes() {
                    tree.set_attr(&epoch, &key, value)?;
                }
                for (key, value) in convenience_parameters {
                    tree.set_attr(&epoch, key, value)?;
                }
                Ok(())
            })
            .map_err(|e| self.report(e))?;

        tracing::debug!(target: "flylab::session", fly_id = %fly_id, ordinal, epoch_number, "epoch written");
        Ok(())
    }

    /// Append a free-text note keyed by the current time; returns the key.
    ///
    /// Two notes within the same microsecond share a key and the later one
    /// wins.
    ///
    /// # Errors
    /// `PreconditionViolation` if no experiment file exists
    pub fn add_note(&mut self, text: &str) -> Result<String> {
        let store = self.require_file("initialize a data file before writing a note")?.clone();
        let key = clock::micros(&clock::now());
        store
            .with_write(|tree| tree.put_attr(&layout::notes_path(), &key, text))
            .map_err(|e| self.report(e))?;
        tracing::debug!(target: "flylab::session", key = %key, "note added");
        Ok(key)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Root record of the attached file.
    ///
    /// # Errors
    /// `PreconditionViolation` if no experiment file exists
    pub fn experiment_record(&self) -> Result<ExperimentRecord> {
        self.read(|tree| ExperimentRecord::from_attrs(tree.attrs("/")?))
    }

    /// Metadata of every fly in the file; empty if there is no file.
    ///
    /// # Errors
    /// `Io` / `Serialization` on storage failure
    pub fn list_flies(&self) -> Result<Vec<FlyRecord>> {
        if !self.experiment_file_exists() {
            return Ok(Vec::new());
        }
        self.read(|tree| {
            Ok(tree
                .node(&layout::flies_path())?
                .children()
                .map(|(id, node)| FlyRecord::from_node(id, node))
                .collect())
        })
    }

    /// Series of one fly, in ordinal order.
    ///
    /// # Errors
    /// - `PreconditionViolation` if no experiment file exists
    /// - `NotFound` if the fly is not in the file
    pub fn list_series(&self, fly_id: &str) -> Result<Vec<SeriesRecord>> {
        self.read(|tree| {
            Ok(tree
                .node(&layout::epoch_runs_path(fly_id))?
                .children()
                .filter_map(|(name, node)| SeriesRecord::from_node(fly_id, name, node))
                .collect())
        })
    }

    /// Epochs of one series, in number order.
    ///
    /// # Errors
    /// - `PreconditionViolation` if no experiment file exists
    /// - `NotFound` if the series is not in the file
    pub fn list_epochs(&self, fly_id: &str, ordinal: u32) -> Result<Vec<EpochRecord>> {
        self.read(|tree| {
            Ok(tree
                .node(&layout::series_group_path(fly_id, ordinal, layout::EPOCHS)?)?
                .children()
                .filter_map(|(name, node)| EpochRecord::from_node(name, node))
                .collect())
        })
    }

    /// Notes in time order.
    ///
    /// # Errors
    /// `PreconditionViolation` if no experiment file exists
    pub fn list_notes(&self) -> Result<Vec<NoteRecord>> {
        self.read(|tree| {
            Ok(tree
                .attrs(&layout::notes_path())?
                .iter()
                .map(|(time, text)| NoteRecord::new(time.as_str(), text.to_string()))
                .collect())
        })
    }

    /// Ordinals already used in the counting scope, across all flies.
    ///
    /// # Errors
    /// `PreconditionViolation` if no experiment file exists
    pub fn list_series_ordinals(&self) -> Result<BTreeSet<u32>> {
        self.read(|tree| Ok(self.counter.existing_ordinals(tree)?.into_iter().collect()))
    }

    /// Largest ordinal in the counting scope, 0 if there is none.
    ///
    /// # Errors
    /// `PreconditionViolation` if no experiment file exists
    pub fn highest_series_ordinal(&self) -> Result<u32> {
        Ok(self.list_series_ordinals()?.last().copied().unwrap_or(0))
    }

    // ------------------------------------------------------------------
    // Counter
    // ------------------------------------------------------------------

    /// Id the next series gets within its counting scope.
    #[must_use]
    pub const fn series_count(&self) -> u32 {
        self.counter.next_id()
    }

    /// Skip one id.
    pub fn advance_counter(&mut self) {
        self.counter.advance();
        if self.pinned_id.is_some() {
            self.pinned_id = Some(self.counter.next_id());
        }
    }

    /// Override the next id.
    ///
    /// The value holds for the next series whichever fly it is created
    /// for; [`reload_counter`](Self::reload_counter) discards it.
    pub fn set_counter(&mut self, value: u32) {
        self.counter.set(value);
        self.pinned_id = Some(value);
        tracing::debug!(target: "flylab::session", value, "series counter set");
    }

    /// Re-derive the counter from the file: from the selected fly's series,
    /// or from every fly when none is selected.
    ///
    /// # Errors
    /// `PreconditionViolation` if no experiment file exists
    pub fn reload_counter(&mut self) -> Result<()> {
        let store = self.require_file("no experiment file to reload the series count from")?.clone();
        let fly = self.current_fly.clone();
        let counter = &mut self.counter;
        store.with_read(|tree| counter.reload_from_store(tree, fly.as_deref()))?;
        self.counter_scope = fly;
        self.pinned_id = None;
        Ok(())
    }

    // ------------------------------------------------------------------

    fn read<T>(&self, body: impl FnOnce(&Tree) -> Result<T>) -> Result<T> {
        let store = self.require_file("no experiment file attached")?;
        store.with_read(body)
    }

    fn require_file(&self, context: &str) -> Result<&RecordStore> {
        match &self.store {
            Some(store) if store.exists() => Ok(store),
            _ => Err(self.report(Error::PreconditionViolation(context.to_string()))),
        }
    }

    fn require_fly(&self) -> Result<(RecordStore, String)> {
        let store = self
            .require_file("create a data file and define a fly first")?
            .clone();
        let fly = self.current_fly.clone().ok_or_else(|| {
            self.report(Error::PreconditionViolation(
                "create a data file and define a fly first".to_string(),
            ))
        })?;
        Ok((store, fly))
    }

    #[allow(clippy::unused_self)]
    fn report(&self, err: Error) -> Error {
        if err.is_recoverable() {
            tracing::warn!(target: "flylab::session", error = %err, "operation rejected");
        }
        err
    }
}

fn tree_path(parent: &str, name: &str) -> String {
    crate::store::tree::join(parent, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn map(v: Value) -> ParamMap {
        v.as_object().cloned().unwrap()
    }

    fn session_with_file() -> (tempfile::TempDir, ExperimentSession) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ExperimentSession::new(SeriesCounter::single());
        session
            .initialize_experiment_file(dir.path().join("exp.json"))
            .unwrap();
        (dir, session)
    }

    #[test]
    fn test_state_progression() {
        let mut session = ExperimentSession::new(SeriesCounter::single());
        assert_eq!(session.state(), SessionState::NoFile);

        let dir = tempfile::tempdir().unwrap();
        session.initialize_experiment_file(dir.path().join("exp.json")).unwrap();
        assert_eq!(session.state(), SessionState::NoFly);

        session.create_fly(&map(json!({"fly_id": "fly1"}))).unwrap();
        assert_eq!(session.state(), SessionState::FlySelected);

        session.create_series(&ParamMap::new(), &ParamMap::new()).unwrap();
        assert_eq!(session.state(), SessionState::SeriesOpen);

        session.select_fly("fly2");
        assert_eq!(session.state(), SessionState::FlySelected);

        session.close_experiment_file();
        assert_eq!(session.state(), SessionState::NoFile);
    }

    #[test]
    fn test_fly_without_file() {
        let mut session = ExperimentSession::new(SeriesCounter::single());
        let err = session.create_fly(&map(json!({"fly_id": "fly1"}))).unwrap_err();
        assert!(matches!(err, Error::PreconditionViolation(_)));
        assert!(session.current_fly().is_none());
        assert!(session.list_flies().unwrap().is_empty());
    }

    #[test]
    fn test_fly_needs_string_id() {
        let (_dir, mut session) = session_with_file();
        let err = session.create_fly(&map(json!({"genotype": "w1118"}))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        let err = session.create_fly(&map(json!({"fly_id": 3}))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(session.list_flies().unwrap().is_empty());
    }

    #[test]
    fn test_fly_attributes() {
        let (_dir, mut session) = session_with_file();
        session
            .create_fly(&map(json!({"fly_id": "fly1", "age": 3, "notes": null})))
            .unwrap();

        let flies = session.list_flies().unwrap();
        assert_eq!(flies.len(), 1);
        let fly = &flies[0];
        assert_eq!(fly.fly_id(), "fly1");
        assert_eq!(fly.get("age").and_then(|v| v.as_int()), Some(3));
        assert_eq!(fly.get("notes").and_then(|v| v.as_str()), Some("None"));
        assert_eq!(fly.init_time().map(str::len), Some(11));
    }

    #[test]
    fn test_epoch_without_series() {
        let (_dir, mut session) = session_with_file();
        session.create_fly(&map(json!({"fly_id": "fly1"}))).unwrap();
        let err = session
            .create_epoch(1, &StimParameters::Single(ParamMap::new()), &ParamMap::new())
            .unwrap_err();
        assert!(matches!(err, Error::PreconditionViolation(_)));
    }

    #[test]
    fn test_series_for_unknown_fly() {
        let (_dir, mut session) = session_with_file();
        session.select_fly("ghost");
        let err = session.create_series(&ParamMap::new(), &ParamMap::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(session.series_count(), 1);
        assert!(session.current_series().is_none());
    }

    #[test]
    fn test_set_counter_sticks_for_selected_fly() {
        let (_dir, mut session) = session_with_file();
        session.create_fly(&map(json!({"fly_id": "fly1"}))).unwrap();
        session.set_counter(5);
        let ordinal = session.create_series(&ParamMap::new(), &ParamMap::new()).unwrap();
        assert_eq!(ordinal, 5);
        assert_eq!(session.series_count(), 6);
    }

    #[test]
    fn test_counter_pointing_at_existing_series() {
        let (_dir, mut session) = session_with_file();
        session.create_fly(&map(json!({"fly_id": "fly1"}))).unwrap();
        session.create_series(&ParamMap::new(), &ParamMap::new()).unwrap();
        session.set_counter(1);
        let err = session.create_series(&ParamMap::new(), &ParamMap::new()).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert_eq!(session.series_count(), 1);
    }

    #[test]
    fn test_notes() {
        let (_dir, mut session) = session_with_file();
        let key = session.add_note("fly looks healthy").unwrap();
        let notes = session.list_notes().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].time(), key);
        assert_eq!(notes[0].text(), "fly looks healthy");
    }

    #[test]
    fn test_note_without_file() {
        let mut session = ExperimentSession::new(SeriesCounter::single());
        assert!(matches!(
            session.add_note("x"),
            Err(Error::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ExperimentSession::new(SeriesCounter::single());
        let err = session.open_experiment_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(session.experiment_file().is_none());
    }

    #[test]
    fn test_from_config_records_rig_identity() {
        let dir = tempfile::tempdir().unwrap();
        let rig = RigConfig {
            data_directory: Some(dir.path().to_path_buf()),
            series_counter: crate::counter::CounterKind::Dual,
            ..RigConfig::default()
        };
        let cfg = SessionConfig {
            experimenter: "Max".into(),
            ..SessionConfig::for_rig("AODscope", rig)
        };

        let mut session = ExperimentSession::from_config(&cfg).unwrap();
        assert_eq!(session.counter().scan_mode(), Some(ScanMode::Poi));
        session
            .initialize_experiment_file(cfg.experiment_path("2024-05-01").unwrap())
            .unwrap();

        let record = session.experiment_record().unwrap();
        assert_eq!(record.experimenter(), "Max");
        assert_eq!(record.rig(), config::DEFAULT_RIG_LABEL);
        assert_eq!(record.data_directory(), dir.path().display().to_string());
    }

    #[test]
    fn test_identity_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mut session =
            ExperimentSession::new(SeriesCounter::single()).with_identity("mhturner", "Bruker");
        session.initialize_experiment_file(dir.path().join("exp.json")).unwrap();
        let record = session.experiment_record().unwrap();
        assert_eq!(record.experimenter(), "mhturner");
        assert_eq!(record.rig(), "Bruker");
        assert_eq!(record.data_directory(), dir.path().display().to_string());
    }
}
