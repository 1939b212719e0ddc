//! Experiment records
//!
//! Typed, read-side views of the experiment tree.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord (1) ──< FlyRecord (N)
//!        │                     │
//!        │                     └──< SeriesRecord (N) ──< EpochRecord (N)
//!        └──< NoteRecord (N)
//! ```

mod epoch_record;
mod experiment_record;
mod fly_record;
mod note_record;
mod series_record;

pub use epoch_record::{EpochRecord, EPOCH_TIME_ATTR};
pub use experiment_record::{
    ExperimentRecord, ExperimentRecordBuilder, DATA_DIRECTORY_ATTR, DATE_ATTR, EXPERIMENTER_ATTR,
    INIT_TIME_ATTR, RIG_ATTR,
};
pub use fly_record::{FlyRecord, FLY_ID_KEY, FLY_INIT_TIME_ATTR};
pub use note_record::NoteRecord;
pub use series_record::{SeriesRecord, RUN_START_TIME_ATTR};
