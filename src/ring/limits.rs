//! Limits at which scheduled procedures next run, and values recorded at their last run.
//!
//! Limits are counts of search conflicts, with the exception of the [mode](crate::procedures::mode) limit, which is a count of search ticks after the first switch.

use crate::config::Config;

/// Limits, each compared against the current count of search conflicts (or ticks).
#[derive(Clone, Copy, Debug, Default)]
pub struct Limits {
    pub mode: u64,
    pub restart: u64,
    pub reduce: u64,
    pub rephase: u64,
    pub probe: u64,

    /// Probing waits for this count of reductions.
    pub probe_reductions: u64,

    /// Used by the first ring only, to request rounds of simplification.
    pub simplify: u64,

    /// Random decisions remaining.
    pub random_decisions: u64,
}

impl Limits {
    pub fn new(config: &Config) -> Self {
        Limits {
            mode: config.mode_interval.value,
            restart: config.focused_restart_interval.value,
            reduce: config.reduce_interval.value,
            rephase: config.rephase_interval.value,
            probe: config.probe_interval.value,
            probe_reductions: 1,
            simplify: config.simplify_interval.value,
            random_decisions: 0,
        }
    }
}

/// Values noted at the last run of some procedure.
#[derive(Clone, Copy, Debug, Default)]
pub struct Last {
    /// Search ticks at the end of the last probe.
    pub probing: u64,

    /// Search conflicts at the last import from a peer.
    pub import: u64,

    /// Search conflicts at the last import from an external producer, if any.
    pub external: Option<u64>,

    /// Search conflicts at the last publication to the tally of the ring.
    pub publish: u64,

    /// Search ticks at the last switch of mode.
    pub switched: u64,
}
