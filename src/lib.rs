//! # flylab-data: experiment data store for stimulus/imaging rigs
//!
//! One file per acquisition day, holding a tree of flies, series (epoch
//! runs) and epochs, each with typed attributes, plus free-text notes.
//!
//! ## Layout
//!
//! - [`params`]: caller values → persistable attribute values
//! - [`store`]: the experiment file, scoped read / write transactions
//! - [`counter`]: series numbering (single counter or per-scan-mode)
//! - [`session`]: lifecycle orchestration (file → fly → series → epoch)
//! - [`experiment`]: typed records read back from the tree
//!
//! ## Example
//!
//! ```rust
//! use flylab_data::counter::SeriesCounter;
//! use flylab_data::session::ExperimentSession;
//! use serde_json::json;
//!
//! # fn main() -> flylab_data::Result<()> {
//! # let dir = tempfile::tempdir()?;
//! let mut session = ExperimentSession::new(SeriesCounter::single());
//! session.initialize_experiment_file(dir.path().join("2024-05-01.json"))?;
//! session.create_fly(json!({"fly_id": "fly1"}).as_object().unwrap())?;
//! session.add_note("prep looks good")?;
//!
//! assert_eq!(session.list_flies()?.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod clock;
pub mod counter;
pub mod error;
pub mod experiment;
pub mod params;
pub mod session;
pub mod store;

pub use counter::{CounterKind, ScanMode, SeriesCounter};
pub use error::{Error, Result};
pub use params::{normalize, AttrValue, ParamMap, ParamValue, StimParameters};
pub use session::{ExperimentSession, SessionConfig, SessionState};
pub use store::RecordStore;
