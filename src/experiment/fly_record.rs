//! Fly Record - subject metadata

use crate::params::AttrValue;
use crate::store::{Attrs, Node};
use serde::{Deserialize, Serialize};

/// Metadata key holding the fly identifier.
pub const FLY_ID_KEY: &str = "fly_id";
/// Fly attribute: creation time.
pub const FLY_INIT_TIME_ATTR: &str = "init_time";

/// Fly Record: the persisted metadata of one fly.
///
/// The attribute map holds everything the caller supplied at creation
/// (including `fly_id`) plus `init_time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlyRecord {
    fly_id: String,
    attrs: Attrs,
}

impl FlyRecord {
    /// Build from a fly node keyed by `fly_id`.
    #[must_use]
    pub fn from_node(fly_id: &str, node: &Node) -> Self {
        Self {
            fly_id: fly_id.to_string(),
            attrs: node.attrs().clone(),
        }
    }

    /// Fly identifier (the node name).
    #[must_use]
    pub fn fly_id(&self) -> &str {
        &self.fly_id
    }

    /// Creation time, if recorded.
    #[must_use]
    pub fn init_time(&self) -> Option<&str> {
        self.attrs.get(FLY_INIT_TIME_ATTR).and_then(AttrValue::as_str)
    }

    /// Single metadata value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Full metadata mapping.
    #[must_use]
    pub const fn metadata(&self) -> &Attrs {
        &self.attrs
    }
}
