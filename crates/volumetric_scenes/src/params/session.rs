//! # Session Memory
//!
//! Last-used parameter values per scene, kept for the lifetime of the
//! process. Entries are created on the first save of a scene and are
//! only removed when a caller asks for it.

use std::collections::BTreeMap;

use super::value::ParamValue;
use crate::registry::SceneKind;

/// Saved values of one scene, by parameter name.
pub type ParamSnapshot = BTreeMap<String, ParamValue>;

/// Owned store of per-scene snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionMemory {
    snapshots: BTreeMap<SceneKind, ParamSnapshot>,
}

impl SessionMemory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The saved snapshot for a scene, if any.
    #[must_use]
    pub fn snapshot(&self, kind: SceneKind) -> Option<&ParamSnapshot> {
        self.snapshots.get(&kind)
    }

    /// Replaces the snapshot for a scene.
    pub fn store(&mut self, kind: SceneKind, snapshot: ParamSnapshot) {
        self.snapshots.insert(kind, snapshot);
    }

    /// True if the scene has been saved.
    #[must_use]
    pub fn contains(&self, kind: SceneKind) -> bool {
        self.snapshots.contains_key(&kind)
    }

    /// Number of scenes with a snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True if nothing has been saved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drops the snapshot for a scene, returning it.
    pub fn forget(&mut self, kind: SceneKind) -> Option<ParamSnapshot> {
        self.snapshots.remove(&kind)
    }
}
