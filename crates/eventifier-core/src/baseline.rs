//! Baseline lookup contract.
//!
//! Baselines are written by an external maintenance process; the detector
//! only reads them. A missing or unreadable baseline is the normal state for
//! a first observation and is never an error at this boundary.

use crate::model::campus::CampusId;
use crate::model::record::{UserId, UserRecord};
use std::collections::BTreeMap;

/// Read-only access to the last known snapshot of a user
pub trait BaselineSource {
    /// Return the baseline for `(user_id, campus_id)`, or `None`.
    ///
    /// Lookup order: the entry keyed by both ids, then (when the campus is
    /// unknown or that entry is missing) the first entry for `user_id` in any
    /// campus partition.
    fn resolve(&self, user_id: &UserId, campus_id: CampusId) -> Option<UserRecord>;
}

/// In-memory baselines partitioned by campus
#[derive(Debug, Clone, Default)]
pub struct InMemoryBaselines {
    partitions: BTreeMap<i64, BTreeMap<UserId, UserRecord>>,
}

impl InMemoryBaselines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, campus_id: i64, user_id: UserId, record: UserRecord) {
        self.partitions
            .entry(campus_id)
            .or_default()
            .insert(user_id, record);
    }

    pub fn with(mut self, campus_id: i64, user_id: UserId, record: UserRecord) -> Self {
        self.insert(campus_id, user_id, record);
        self
    }

    pub fn len(&self) -> usize {
        self.partitions.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BaselineSource for InMemoryBaselines {
    fn resolve(&self, user_id: &UserId, campus_id: CampusId) -> Option<UserRecord> {
        if let Some(found) = campus_id
            .and_then(|cid| self.partitions.get(&cid))
            .and_then(|partition| partition.get(user_id))
        {
            return Some(found.clone());
        }
        self.partitions
            .values()
            .find_map(|partition| partition.get(user_id))
            .cloned()
    }
}
