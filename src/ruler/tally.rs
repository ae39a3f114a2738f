//! A per-ring tally of counters, published by the ring and read by anyone.
//!
//! Reads and writes are relaxed, and a snapshot taken during a solve may mix counts from slightly different moments.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ring::counters::Statistics;

#[derive(Debug, Default)]
pub struct Tally {
    pub conflicts: AtomicU64,
    pub decisions: AtomicU64,
    pub propagations: AtomicU64,
    pub restarts: AtomicU64,
    pub reductions: AtomicU64,
    pub imported: AtomicU64,
    pub exported: AtomicU64,
}

impl Tally {
    pub fn publish(&self, statistics: &Statistics) {
        self.conflicts.store(statistics.conflicts(), Ordering::Relaxed);
        self.decisions.store(statistics.decisions(), Ordering::Relaxed);
        self.propagations.store(statistics.propagations(), Ordering::Relaxed);
        self.restarts.store(statistics.restarts, Ordering::Relaxed);
        self.reductions.store(statistics.reductions, Ordering::Relaxed);

        let imported = statistics.imported;
        self.imported.store(imported.units + imported.binary + imported.large, Ordering::Relaxed);
        let exported = statistics.exported;
        self.exported.store(exported.units + exported.binary + exported.large, Ordering::Relaxed);
    }
}
