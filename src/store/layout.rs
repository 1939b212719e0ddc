//! Naming convention of the experiment tree
//!
//! ```text
//! /                                   date, init_time, data_directory, experimenter, rig
//! /Flies/<fly_id>                     metadata..., init_time
//! /Flies/<fly_id>/epoch_runs/series_<NNN>
//!     acquisition
//!     epochs/epoch_<NNN>
//!     rois
//!     stimulus_timing
//! /Notes                              <timestamp> = text
//! ```

use crate::{Error, Result};

/// Container of all flies.
pub const FLIES: &str = "Flies";
/// Container whose attributes are the notes.
pub const NOTES: &str = "Notes";
/// Per-fly container of series.
pub const EPOCH_RUNS: &str = "epoch_runs";
/// Per-series acquisition metadata.
pub const ACQUISITION: &str = "acquisition";
/// Per-series container of epochs.
pub const EPOCHS: &str = "epochs";
/// Per-series regions of interest (filled by analysis tools).
pub const ROIS: &str = "rois";
/// Per-series stimulus timing (filled by analysis tools).
pub const STIMULUS_TIMING: &str = "stimulus_timing";

/// Sub-containers created with every series, in creation order.
pub const SERIES_GROUPS: [&str; 4] = [ACQUISITION, EPOCHS, ROIS, STIMULUS_TIMING];

/// Width of zero-padded ordinals in node names.
pub const ORDINAL_WIDTH: usize = 3;
/// Largest ordinal that still fits [`ORDINAL_WIDTH`] digits.
pub const MAX_ORDINAL: u32 = 999;

const SERIES_PREFIX: &str = "series_";
const EPOCH_PREFIX: &str = "epoch_";

fn padded(prefix: &str, ordinal: u32) -> Result<String> {
    if ordinal > MAX_ORDINAL {
        return Err(Error::InvalidInput(format!(
            "ordinal {ordinal} does not fit {ORDINAL_WIDTH} digits"
        )));
    }
    Ok(format!("{prefix}{ordinal:0width$}", width = ORDINAL_WIDTH))
}

/// `series_007` for ordinal 7.
///
/// # Errors
/// `InvalidInput` if the ordinal exceeds [`MAX_ORDINAL`]
pub fn series_name(ordinal: u32) -> Result<String> {
    padded(SERIES_PREFIX, ordinal)
}

/// `epoch_012` for epoch number 12.
///
/// # Errors
/// `InvalidInput` if the number exceeds [`MAX_ORDINAL`]
pub fn epoch_name(number: u32) -> Result<String> {
    padded(EPOCH_PREFIX, number)
}

/// Numeric suffix after the last `_` of a node name (`series_004` → 4).
#[must_use]
pub fn ordinal_suffix(name: &str) -> Option<u32> {
    name.rsplit('_').next()?.parse().ok()
}

/// `/Flies`
#[must_use]
pub fn flies_path() -> String {
    format!("/{FLIES}")
}

/// `/Notes`
#[must_use]
pub fn notes_path() -> String {
    format!("/{NOTES}")
}

/// `/Flies/<fly_id>`
#[must_use]
pub fn fly_path(fly_id: &str) -> String {
    format!("/{FLIES}/{fly_id}")
}

/// `/Flies/<fly_id>/epoch_runs`
#[must_use]
pub fn epoch_runs_path(fly_id: &str) -> String {
    format!("/{FLIES}/{fly_id}/{EPOCH_RUNS}")
}

/// `/Flies/<fly_id>/epoch_runs/series_<NNN>`
///
/// # Errors
/// `InvalidInput` if the ordinal exceeds [`MAX_ORDINAL`]
pub fn series_path(fly_id: &str, ordinal: u32) -> Result<String> {
    Ok(format!("{}/{}", epoch_runs_path(fly_id), series_name(ordinal)?))
}

/// `/Flies/<fly_id>/epoch_runs/series_<NNN>/<group>`
///
/// # Errors
/// `InvalidInput` if the ordinal exceeds [`MAX_ORDINAL`]
pub fn series_group_path(fly_id: &str, ordinal: u32, group: &str) -> Result<String> {
    Ok(format!("{}/{group}", series_path(fly_id, ordinal)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(series_name(1).unwrap(), "series_001");
        assert_eq!(series_name(42).unwrap(), "series_042");
        assert_eq!(epoch_name(999).unwrap(), "epoch_999");
    }

    #[test]
    fn test_overflow_rejected() {
        let err = series_name(1000).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_padded_names_sort_in_ordinal_order() {
        let mut names: Vec<String> = [10, 2, 100, 1].iter().map(|&n| series_name(n).unwrap()).collect();
        names.sort();
        assert_eq!(names, vec!["series_001", "series_002", "series_010", "series_100"]);
    }

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix("series_004"), Some(4));
        assert_eq!(ordinal_suffix("epoch_120"), Some(120));
        assert_eq!(ordinal_suffix("rois"), None);
    }

    #[test]
    fn test_paths() {
        assert_eq!(fly_path("fly1"), "/Flies/fly1");
        assert_eq!(
            series_group_path("fly1", 3, EPOCHS).unwrap(),
            "/Flies/fly1/epoch_runs/series_003/epochs"
        );
    }
}
