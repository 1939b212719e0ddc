//! Epoch Record - one trial within a series

use crate::params::AttrValue;
use crate::store::{layout, Attrs, Node};
use serde::{Deserialize, Serialize};

/// Epoch attribute: epoch start time.
pub const EPOCH_TIME_ATTR: &str = "epoch_time";

/// Epoch Record: stimulus and convenience parameters of one trial.
///
/// Layered stimulus parameters appear with their `stim<N>_` prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpochRecord {
    number: u32,
    attrs: Attrs,
}

impl EpochRecord {
    /// Build from an `epoch_<NNN>` node.
    ///
    /// Returns `None` if the node name carries no number.
    #[must_use]
    pub fn from_node(name: &str, node: &Node) -> Option<Self> {
        Some(Self {
            number: layout::ordinal_suffix(name)?,
            attrs: node.attrs().clone(),
        })
    }

    /// Epoch number (`epoch_<NNN>`).
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Epoch start time, if recorded.
    #[must_use]
    pub fn epoch_time(&self) -> Option<&str> {
        self.attrs.get(EPOCH_TIME_ATTR).and_then(AttrValue::as_str)
    }

    /// Single parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// All epoch attributes.
    #[must_use]
    pub const fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}
