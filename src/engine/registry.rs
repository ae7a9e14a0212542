// src/engine/registry.rs

//! Process-wide lookup table from [`RunId`] to [`RunHandle`].
//!
//! The map is split into independently locked shards, keyed by the low bits
//! of the run id, so inserts for different runs rarely touch the same lock.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::errors::{JobwireError, Result};
use crate::run::RunHandle;
use crate::types::RunId;

pub const DEFAULT_SHARDS: usize = 16;

#[derive(Debug)]
pub struct RunRegistry {
    shards: Vec<RwLock<HashMap<RunId, RunHandle>>>,
}

impl Default for RunRegistry {
    fn default() -> Self {
        RunRegistry::new(DEFAULT_SHARDS)
    }
}

impl RunRegistry {
    /// `shard_count` is clamped to at least 1.
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let shards = (0..shard_count)
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self { shards }
    }

    /// Register a handle under its own id.
    ///
    /// Returns `false`, leaving the existing entry untouched, if the id is
    /// already taken.
    pub fn insert(&self, handle: RunHandle) -> bool {
        let id = handle.id();
        let mut shard = self
            .shard(&id)
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if shard.contains_key(&id) {
            return false;
        }
        shard.insert(id, handle);
        debug!(run_id = %id, "registered run");
        true
    }

    pub fn resolve(&self, id: &RunId) -> Result<RunHandle> {
        self.shard(id)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or(JobwireError::RunNotFound(*id))
    }

    pub fn contains(&self, id: &RunId) -> bool {
        self.shard(id)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn remove(&self, id: &RunId) -> Option<RunHandle> {
        let removed = self
            .shard(id)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if removed.is_some() {
            debug!(run_id = %id, "unregistered run");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every registered id, in no particular order.
    pub fn ids(&self) -> Vec<RunId> {
        self.shards
            .iter()
            .flat_map(|s| {
                s.read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .keys()
                    .copied()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn shard(&self, id: &RunId) -> &RwLock<HashMap<RunId, RunHandle>> {
        let index = (id.as_uuid().as_u128() % self.shards.len() as u128) as usize;
        &self.shards[index]
    }
}
