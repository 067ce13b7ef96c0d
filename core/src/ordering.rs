//! Per-task response ordering.
//!
//! Update requests for the same task may complete out of order. Each request
//! takes a ticket when it is issued; its response is applied only if no
//! later-issued request for that task has already been applied.

use std::collections::HashMap;

use crate::types::TaskId;

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    issued: u64,
    applied: u64,
}

#[derive(Debug, Default)]
pub(crate) struct ResponseOrdering {
    tasks: HashMap<TaskId, Counters>,
}

impl ResponseOrdering {
    /// Take the next sequence number for `id`.
    pub(crate) fn issue(&mut self, id: &TaskId) -> u64 {
        let counters = self.tasks.entry(id.clone()).or_default();
        counters.issued += 1;
        counters.issued
    }

    /// Returns true, and records `seq` as applied, if `seq` is newer than
    /// everything applied so far for `id`.
    pub(crate) fn accept(&mut self, id: &TaskId, seq: u64) -> bool {
        let counters = self.tasks.entry(id.clone()).or_default();
        if seq <= counters.applied {
            return false;
        }
        counters.applied = seq;
        true
    }

    pub(crate) fn forget(&mut self, id: &TaskId) {
        self.tasks.remove(id);
    }
}
