//! Barriers at the phases of a solve.
//!
//! Every ring passes through each barrier, and so a ring never begins a phase before every other ring has finished the previous phase.
//!
//! - `start`: every ring has been cloned.
//! - `unclone`: every ring has stopped searching, either to simplify or to finish.
//! - `import`: every ring has saved its redundant clauses and exported its units, so the leader may simplify the formula.
//! - `copy`: the leader has simplified (and perhaps compacted) the formula, so each ring may compact itself and watch the formula again.
//! - `run`: every ring is ready to search again.
//! - `end`: every ring has flushed the buckets it filled.

use std::sync::Barrier;

#[derive(Debug)]
pub struct Barriers {
    pub start: Barrier,
    pub unclone: Barrier,
    pub import: Barrier,
    pub copy: Barrier,
    pub run: Barrier,
    pub end: Barrier,
}

impl Barriers {
    pub fn new(rings: usize) -> Self {
        Barriers {
            start: Barrier::new(rings),
            unclone: Barrier::new(rings),
            import: Barrier::new(rings),
            copy: Barrier::new(rings),
            run: Barrier::new(rings),
            end: Barrier::new(rings),
        }
    }
}
