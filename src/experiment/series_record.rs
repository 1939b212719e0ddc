//! Series Record - one epoch run of a fly

use crate::counter::{ScanMode, POI_SCAN_ATTR};
use crate::params::AttrValue;
use crate::store::{layout, Attrs, Node};
use serde::{Deserialize, Serialize};

/// Series attribute: run start time.
pub const RUN_START_TIME_ATTR: &str = "run_start_time";

/// Series Record represents one parameterized acquisition run.
///
/// Run and protocol parameters are flattened into one attribute map, the
/// way they were written when the series was created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesRecord {
    fly_id: String,
    ordinal: u32,
    attrs: Attrs,
    acquisition: Attrs,
    epoch_count: usize,
}

impl SeriesRecord {
    /// Build from a `series_<NNN>` node.
    ///
    /// Returns `None` if the node name carries no ordinal.
    #[must_use]
    pub fn from_node(fly_id: &str, name: &str, node: &Node) -> Option<Self> {
        Some(Self {
            fly_id: fly_id.to_string(),
            ordinal: layout::ordinal_suffix(name)?,
            attrs: node.attrs().clone(),
            acquisition: node
                .child(layout::ACQUISITION)
                .map(|acq| acq.attrs().clone())
                .unwrap_or_default(),
            epoch_count: node
                .child(layout::EPOCHS)
                .map_or(0, |epochs| epochs.child_names().count()),
        })
    }

    /// Owning fly.
    #[must_use]
    pub fn fly_id(&self) -> &str {
        &self.fly_id
    }

    /// Node ordinal (`series_<NNN>`).
    #[must_use]
    pub const fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Run start time, if recorded.
    #[must_use]
    pub fn run_start_time(&self) -> Option<&str> {
        self.attrs.get(RUN_START_TIME_ATTR).and_then(AttrValue::as_str)
    }

    /// Single run/protocol parameter.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// All series attributes.
    #[must_use]
    pub const fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Attributes of the `acquisition` sub-node.
    #[must_use]
    pub const fn acquisition(&self) -> &Attrs {
        &self.acquisition
    }

    /// Scan mode recorded by a dual-counter session.
    #[must_use]
    pub fn scan_mode(&self) -> Option<ScanMode> {
        self.acquisition
            .get(POI_SCAN_ATTR)
            .and_then(AttrValue::as_bool)
            .map(ScanMode::from_flag)
    }

    /// Mode-specific ordinal recorded by a dual-counter session.
    #[must_use]
    pub fn mode_ordinal(&self) -> Option<i64> {
        let mode = self.scan_mode()?;
        self.acquisition.get(mode.count_attr()).and_then(AttrValue::as_int)
    }

    /// Number of epochs written so far.
    #[must_use]
    pub const fn epoch_count(&self) -> usize {
        self.epoch_count
    }
}
