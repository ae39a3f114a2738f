//! Counters kept by a ring.
//!
//! Counts of conflicts, decisions, propagations, and ticks are split by [SearchContext](crate::ring::SearchContext), as the schedules of inprocessing are derived from the effort spent in search.
//! Everything else is a plain count, read when a ring reports or publishes to its [tally](crate::ruler::Tally).

use crate::ring::SearchContext;

/// Counts kept for each context.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextCounters {
    pub conflicts: u64,
    pub decisions: u64,
    pub propagations: u64,

    /// An approximation of the cache lines visited during propagation.
    pub ticks: u64,
}

/// Counts of learnt clauses, by kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct Learned {
    pub clauses: u64,
    pub units: u64,
    pub binary: u64,
    pub glue1: u64,
    pub tier1: u64,
    pub tier2: u64,
    pub tier3: u64,
}

/// Counts of literals through analysis.
#[derive(Clone, Copy, Debug, Default)]
pub struct Literals {
    pub deduced: u64,
    pub learned: u64,
    pub minimized: u64,
    pub shrunken: u64,
}

/// Counts of clauses, by size, for sharing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shared {
    pub units: u64,
    pub binary: u64,
    pub large: u64,
}

/// Counts of exports which did not reach a bucket, or which displaced a clause.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dropped {
    pub dropped: u64,
    pub displaced: u64,
}

/// Counts of subsumption checks of imported clauses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Subsumed {
    pub binary_checked: u64,
    pub binary: u64,
    pub large_checked: u64,
    pub large: u64,
}

/// Counts from vivification.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vivify {
    pub tried: u64,
    pub reused: u64,
    pub succeeded: u64,
    pub subsumed: u64,
    pub strengthened: u64,
    pub implied: u64,
    pub units: u64,
}

/// Every counter of a ring.
#[derive(Clone, Copy, Debug, Default)]
pub struct Statistics {
    pub contexts: [ContextCounters; 2],

    pub restarts: u64,
    pub reused_levels: u64,
    pub reductions: u64,
    pub collected: u64,
    pub rephased: u64,
    pub switched: u64,
    pub probings: u64,
    pub failed: u64,
    pub fixed: u64,
    pub diverged: u64,

    pub learned: Learned,
    pub literals: Literals,

    pub exported: Shared,
    pub export_drops: Dropped,
    pub imported: Shared,
    pub subsumed: Subsumed,
    pub flushed: u64,

    pub external_imported: u64,
    pub external_discarded: u64,

    pub vivify: Vivify,
}

impl Statistics {
    pub fn context(&self, context: SearchContext) -> &ContextCounters {
        &self.contexts[context as usize]
    }

    pub fn context_mut(&mut self, context: SearchContext) -> &mut ContextCounters {
        &mut self.contexts[context as usize]
    }

    /// Conflicts found during search.
    pub fn conflicts(&self) -> u64 {
        self.contexts[SearchContext::Search as usize].conflicts
    }

    /// Decisions made during search.
    pub fn decisions(&self) -> u64 {
        self.contexts[SearchContext::Search as usize].decisions
    }

    /// Propagations in every context.
    pub fn propagations(&self) -> u64 {
        self.contexts.iter().map(|context| context.propagations).sum()
    }

    pub fn search_ticks(&self) -> u64 {
        self.contexts[SearchContext::Search as usize].ticks
    }

    pub fn probing_ticks(&self) -> u64 {
        self.contexts[SearchContext::Probing as usize].ticks
    }
}
