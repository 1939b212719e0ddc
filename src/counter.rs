//! Series numbering policies
//!
//! A rig either numbers its series with one running counter, or (scanning
//! microscopes with two acquisition modes) keeps a separate count per mode.
//! The policy is chosen once per session and dispatched through
//! [`SeriesCounter`].
//!
//! Two numbers are involved when a series is created:
//! - the **node ordinal**, used for the `series_<NNN>` node name; unique
//!   within a fly whatever the mode
//! - the **id** ([`SeriesCounter::next_id`]), the ordinal within the
//!   counting scope; for the single counter it is the node ordinal, for the
//!   dual counter it is the active mode's count, recorded under `acquisition`

use crate::store::{layout, Node, Tree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Acquisition attribute: `true` when the series was recorded in POI mode.
pub const POI_SCAN_ATTR: &str = "poi_scan";
/// Acquisition attribute: POI-mode ordinal.
pub const POI_COUNT_ATTR: &str = "poi_count";
/// Acquisition attribute: XYT-mode ordinal.
pub const XYT_COUNT_ATTR: &str = "xyt_count";

/// Which numbering policy a session uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    /// One running counter
    #[default]
    Single,
    /// One counter per scan mode
    Dual,
}

/// Acquisition mode of a dual-counter rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    /// Points-of-interest scan (mode A)
    Poi,
    /// Full-frame XYT scan (mode B)
    Xyt,
}

impl ScanMode {
    /// Mode recorded by a `poi_scan` flag.
    #[must_use]
    pub const fn from_flag(poi_scan: bool) -> Self {
        if poi_scan {
            Self::Poi
        } else {
            Self::Xyt
        }
    }

    /// Value of the `poi_scan` flag for this mode.
    #[must_use]
    pub const fn flag(self) -> bool {
        matches!(self, Self::Poi)
    }

    /// Acquisition attribute holding this mode's ordinal.
    #[must_use]
    pub const fn count_attr(self) -> &'static str {
        match self {
            Self::Poi => POI_COUNT_ATTR,
            Self::Xyt => XYT_COUNT_ATTR,
        }
    }
}

/// One running counter, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleCounter {
    count: u32,
}

impl Default for SingleCounter {
    fn default() -> Self {
        Self { count: 1 }
    }
}

/// Two independent mode counters plus the run ordinal used for node names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualCounter {
    run_count: u32,
    poi_count: u32,
    xyt_count: u32,
    mode: ScanMode,
}

impl DualCounter {
    /// Fresh counters, all at 1, with `mode` active.
    #[must_use]
    pub const fn new(mode: ScanMode) -> Self {
        Self {
            run_count: 1,
            poi_count: 1,
            xyt_count: 1,
            mode,
        }
    }

    const fn active(&self) -> u32 {
        match self.mode {
            ScanMode::Poi => self.poi_count,
            ScanMode::Xyt => self.xyt_count,
        }
    }

    fn active_mut(&mut self) -> &mut u32 {
        match self.mode {
            ScanMode::Poi => &mut self.poi_count,
            ScanMode::Xyt => &mut self.xyt_count,
        }
    }

    /// Current count of the given mode, regardless of which is active.
    #[must_use]
    pub const fn count_for(&self, mode: ScanMode) -> u32 {
        match mode {
            ScanMode::Poi => self.poi_count,
            ScanMode::Xyt => self.xyt_count,
        }
    }
}

/// Series numbering policy of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesCounter {
    /// One running counter
    Single(SingleCounter),
    /// Per-mode counters
    Dual(DualCounter),
}

impl Default for SeriesCounter {
    fn default() -> Self {
        Self::single()
    }
}

impl SeriesCounter {
    /// Single running counter at 1.
    #[must_use]
    pub fn single() -> Self {
        Self::Single(SingleCounter::default())
    }

    /// Dual counter at 1/1, POI mode active.
    #[must_use]
    pub const fn dual() -> Self {
        Self::Dual(DualCounter::new(ScanMode::Poi))
    }

    /// Fresh counter of the given kind.
    #[must_use]
    pub fn from_kind(kind: CounterKind) -> Self {
        match kind {
            CounterKind::Single => Self::single(),
            CounterKind::Dual => Self::dual(),
        }
    }

    /// Which policy this is.
    #[must_use]
    pub const fn kind(&self) -> CounterKind {
        match self {
            Self::Single(_) => CounterKind::Single,
            Self::Dual(_) => CounterKind::Dual,
        }
    }

    /// Ordinal the next series gets within its counting scope.
    #[must_use]
    pub const fn next_id(&self) -> u32 {
        match self {
            Self::Single(c) => c.count,
            Self::Dual(c) => c.active(),
        }
    }

    /// Ordinal used for the next series' node name.
    #[must_use]
    pub const fn node_ordinal(&self) -> u32 {
        match self {
            Self::Single(c) => c.count,
            Self::Dual(c) => c.run_count,
        }
    }

    /// Move past a committed series. Saturates at `u32::MAX`; such an id
    /// is rejected when it is turned into a node name.
    pub fn advance(&mut self) {
        match self {
            Self::Single(c) => c.count = c.count.saturating_add(1),
            Self::Dual(c) => {
                c.run_count = c.run_count.saturating_add(1);
                let active = c.active_mut();
                *active = active.saturating_add(1);
            }
        }
    }

    /// Override the current id (for the dual counter, the active mode's).
    pub fn set(&mut self, value: u32) {
        match self {
            Self::Single(c) => c.count = value,
            Self::Dual(c) => *c.active_mut() = value,
        }
    }

    /// Active scan mode, `None` for the single counter.
    #[must_use]
    pub const fn scan_mode(&self) -> Option<ScanMode> {
        match self {
            Self::Single(_) => None,
            Self::Dual(c) => Some(c.mode),
        }
    }

    /// Select which mode counter the next series uses.
    ///
    /// # Errors
    /// `PreconditionViolation` for the single counter
    pub fn set_scan_mode(&mut self, mode: ScanMode) -> Result<()> {
        match self {
            Self::Single(_) => Err(Error::PreconditionViolation(
                "single series counter has no scan mode".to_string(),
            )),
            Self::Dual(c) => {
                c.mode = mode;
                Ok(())
            }
        }
    }

    /// Re-derive the counters from the series already in the tree.
    ///
    /// Node ordinals (the single counter, the dual counter's run ordinal)
    /// are scanned in `fly` only, or in every fly for `None`. The dual
    /// counter's mode ids are always scanned across every fly. Each counter
    /// becomes the largest ordinal found in its partition plus one, or 1
    /// when the partition is empty. Ordinals above
    /// [`layout::MAX_ORDINAL`] are not ours and are skipped.
    ///
    /// # Errors
    /// `NotFound` if the tree has no `Flies` container
    pub fn reload_from_store(&mut self, tree: &Tree, fly: Option<&str>) -> Result<()> {
        let series = series_in_scope(tree, fly)?;
        let run_next = next_after(series.iter().filter_map(|s| s.ordinal));

        match self {
            Self::Single(c) => c.count = run_next,
            Self::Dual(c) => {
                let every_fly = series_in_scope(tree, None)?;
                c.run_count = run_next;
                c.poi_count = next_after(mode_counts(&every_fly, ScanMode::Poi));
                c.xyt_count = next_after(mode_counts(&every_fly, ScanMode::Xyt));
            }
        }
        tracing::debug!(
            target: "flylab::counter",
            fly = fly.unwrap_or("*"),
            series = series.len(),
            next_id = self.next_id(),
            node_ordinal = self.node_ordinal(),
            "series counter reloaded"
        );
        Ok(())
    }

    /// Ordinals already used in the counting scope, across every fly.
    ///
    /// Node ordinals for the single counter; the active mode's recorded
    /// counts for the dual counter.
    ///
    /// # Errors
    /// `NotFound` if the tree has no `Flies` container
    pub fn existing_ordinals(&self, tree: &Tree) -> Result<Vec<u32>> {
        let series = series_in_scope(tree, None)?;
        Ok(match self {
            Self::Single(_) => series.iter().filter_map(|s| s.ordinal).collect(),
            Self::Dual(c) => mode_counts(&series, c.mode).collect(),
        })
    }

    /// Record how the series at `acquisition_path` was numbered.
    ///
    /// No-op for the single counter.
    ///
    /// # Errors
    /// `NotFound` if the acquisition node does not exist
    pub fn stamp_acquisition(&self, tree: &mut Tree, acquisition_path: &str) -> Result<()> {
        if let Self::Dual(c) = self {
            tree.put_attr(acquisition_path, POI_SCAN_ATTR, c.mode.flag())?;
            tree.put_attr(acquisition_path, c.mode.count_attr(), i64::from(c.active()))?;
        }
        Ok(())
    }
}

fn next_after(ordinals: impl Iterator<Item = u32>) -> u32 {
    ordinals
        .filter(|&n| n <= layout::MAX_ORDINAL)
        .max()
        .map_or(1, |m| m.saturating_add(1))
}

struct SeriesEntry<'a> {
    ordinal: Option<u32>,
    acquisition: Option<&'a Node>,
}

fn series_in_scope<'a>(tree: &'a Tree, fly: Option<&str>) -> Result<Vec<SeriesEntry<'a>>> {
    let flies = tree.node(&layout::flies_path())?;
    let selected: Vec<&Node> = match fly {
        Some(id) => flies.child(id).into_iter().collect(),
        None => flies.children().map(|(_, node)| node).collect(),
    };

    Ok(selected
        .into_iter()
        .filter_map(|node| node.child(layout::EPOCH_RUNS))
        .flat_map(|runs| runs.children())
        .map(|(name, node)| SeriesEntry {
            ordinal: layout::ordinal_suffix(name),
            acquisition: node.child(layout::ACQUISITION),
        })
        .collect())
}

fn mode_counts<'a>(
    series: &'a [SeriesEntry<'a>],
    mode: ScanMode,
) -> impl Iterator<Item = u32> + 'a {
    series
        .iter()
        .filter_map(|s| s.acquisition)
        .filter(move |acq| {
            acq.attrs()
                .get(POI_SCAN_ATTR)
                .and_then(|v| v.as_bool())
                .map(ScanMode::from_flag)
                == Some(mode)
        })
        .filter_map(move |acq| acq.attrs().get(mode.count_attr())?.as_int())
        .filter_map(|n| u32::try_from(n).ok())
}
