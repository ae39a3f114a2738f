/*!
A ring: one complete solver, searching on its own thread.

Each ring holds its own copy of everything needed for search:
- Values of literals, and [variables](crate::db::variable) with the reason and level of each assignment.
- The [trail], and [watch lists](crate::db::watches).
- Structures for decisions, with an [index heap](crate::generic::index_heap) for stable mode and a [queue](crate::generic::queue) for focused mode.
- [Averages](crate::generic::ema), [limits], and [counters].

The only data shared with other rings are:
- Irredundant binary clauses, read only.
- Large clauses, through [Arc]s.
- The [ruler](crate::ruler), for units, the winner, and the grid of buckets for sharing learnt clauses.

Procedures on a ring are implemented in [procedures](crate::procedures), and those which interact with other rings take the ruler as an argument.

# Generic rings

A ring is generic over its source of randomness, though in practice every ring is a [Ring], using [MinimalPCG32].
Each ring is seeded with the sum of the configured seed and the id of the ring.
*/

pub mod counters;
pub mod limits;

use std::sync::Arc;

use crate::{
    config::Config,
    db::{
        trail::Trail,
        variable::{Phases, Variable},
        watches::Watches,
    },
    generic::{
        ema::Averages, index_heap::IndexHeap, luby::Luby, queue::Queue,
        random::MinimalPCG32,
    },
    misc::log::targets::{self},
    ruler::Ruler,
    structures::{clause::ClauseRef, literal::Literal},
};

use counters::Statistics;
use limits::{Last, Limits};

/// The context in which a ring propagates, used to split counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchContext {
    Search = 0,
    Probing = 1,
}

/// How a call to [search](crate::procedures::search) ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The ring found the formula satisfiable, or unsatisfiable.
    Verdict(crate::reports::Report),

    /// Some ring reached a verdict, or some limit was reached.
    Terminated,

    /// A round of simplification was requested.
    Simplify,
}

/// A ring, generic over the source of randomness.
pub struct GenericRing<R: rand::Rng + rand::SeedableRng> {
    /// The id of the ring, in `0..rings`.
    pub id: usize,

    /// The count of rings in the solve.
    pub rings: usize,

    pub config: Config,

    pub rng: R,

    /// The count of variables in the index space of the ring.
    pub size: usize,

    /// The current decision level.
    pub level: u32,

    /// The count of unassigned variables.
    pub unassigned: usize,

    /// Whether the ring has derived the empty clause.
    pub inconsistent: bool,

    /// Whether the ring is in stable mode (or focused mode).
    pub stable: bool,

    pub context: SearchContext,

    /// Whether fresh units await export.
    pub iterating: bool,

    /// The value of each literal, indexed by literal.
    pub values: Vec<i8>,

    /// Marks on literals, indexed by literal.
    pub marks: Vec<i8>,

    pub variables: Vec<Variable>,

    pub phases: Vec<Phases>,

    pub trail: Trail,

    pub watches: Watches,

    pub heap: IndexHeap,

    pub queue: Queue,

    /// Averages for focused mode, then stable mode.
    pub averages: [Averages; 2],

    pub limits: Limits,

    pub last: Last,

    /// The ticks of search between the first two switches of mode.
    pub mode_interval: u64,

    pub luby: Luby,

    pub statistics: Statistics,

    /// Literals fixed by the ring, in order of assignment.
    pub units: Vec<Literal>,

    /// The count of units exported to the ruler.
    pub exported_units: usize,

    /// The count of units of the ruler imported.
    pub ruler_units: usize,

    /// A buffer for the clause derived during analysis.
    pub clause: Vec<Literal>,

    /// Variables with some analysis flag set.
    pub analyzed: Vec<usize>,

    /// Whether some literal of a level is in the clause derived, indexed by level.
    pub used_levels: Vec<bool>,

    /// Levels marked as used.
    pub levels: Vec<u32>,

    /// Redundant clauses saved during a round of simplification.
    pub saved: Vec<ClauseRef>,

    /// The size of the trail when target phases were last saved.
    pub target_assigned: usize,

    /// The size of the trail when best phases were last saved.
    pub best_assigned: usize,

    /// The next variable to probe.
    pub probe_cursor: usize,

    /// The map from original variables to variables of the ring.
    pub map: Arc<[u32]>,

    /// The map from variables of the ring to original variables.
    pub unmap: Arc<[u32]>,
}

/// A ring using [MinimalPCG32] as its source of randomness.
pub type Ring = GenericRing<MinimalPCG32>;

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// A fresh ring over the formula held by the ruler, watching every large clause of the formula and sharing every binary clause.
    pub fn new(ruler: &Ruler, id: usize) -> Self {
        let config = ruler.config.clone();
        let formula = ruler.formula.lock();
        let size = formula.size;

        let mut heap = IndexHeap::new(size);
        for index in 0..size {
            heap.push(index);
        }

        let mut ring = GenericRing {
            id,
            rings: config.threads.value,
            rng: R::seed_from_u64(config.seed.value.wrapping_add(id as u64)),
            size,
            level: 0,
            unassigned: size,
            inconsistent: false,
            stable: false,
            context: SearchContext::Search,
            iterating: false,
            values: vec![0; 2 * size],
            marks: vec![0; 2 * size],
            variables: vec![Variable::default(); size],
            phases: vec![Phases::new(config.initial_phase.value.value()); size],
            trail: Trail::new(size),
            watches: Watches::new(size, formula.binaries.clone()),
            heap,
            queue: Queue::new(size),
            averages: [Averages::new(config.fast_alpha.value, config.slow_alpha.value); 2],
            limits: Limits::new(&config),
            last: Last::default(),
            mode_interval: 0,
            luby: Luby::default(),
            statistics: Statistics::default(),
            units: Vec::default(),
            exported_units: 0,
            ruler_units: 0,
            clause: Vec::default(),
            analyzed: Vec::default(),
            used_levels: vec![false; size + 2],
            levels: Vec::default(),
            saved: Vec::default(),
            target_assigned: 0,
            best_assigned: 0,
            probe_cursor: 0,
            map: formula.map.clone(),
            unmap: formula.unmap.clone(),
            config,
        };

        ring.watch_formula_clauses(&formula.clauses);
        drop(formula);

        ring.import_units(ruler);

        log::debug!(target: targets::CLONE, "Ring {id} created over {size} variables with {} watchers", ring.watches.watchers.len());
        ring
    }

    /// Watches the first two literals of each irredundant large clause which is not garbage.
    pub fn watch_formula_clauses(&mut self, clauses: &[Arc<crate::structures::clause::LargeClause>]) {
        for clause in clauses {
            if clause.is_garbage() {
                continue;
            }
            let literals = clause.literals();
            let (first, second) = (literals[0], literals[1]);
            let glue = clause.glue();
            self.watches.watch_large(clause.clone(), first, second, false, glue);
        }
    }

    /// The value of `literal`, in `{-1, 0, 1}`.
    pub fn value(&self, literal: Literal) -> i8 {
        self.values[literal.index()]
    }

    /// Whether `literal` has a value at level zero.
    pub fn is_fixed(&self, literal: Literal) -> bool {
        self.values[literal.index()] != 0 && self.variables[literal.var_index()].level == 0
    }

    /// The level of the assignment to the variable of `literal`.
    pub fn level_of(&self, literal: Literal) -> u32 {
        self.variables[literal.var_index()].level
    }

    /// Notes the ring has derived the empty clause.
    pub fn set_inconsistent(&mut self, reason: &str) {
        log::debug!(target: targets::RING, "Ring {} inconsistent: {reason}", self.id);
        self.inconsistent = true;
    }

    /// The averages of the current mode.
    pub fn averages(&self) -> &Averages {
        &self.averages[self.stable as usize]
    }

    pub fn averages_mut(&mut self) -> &mut Averages {
        &mut self.averages[self.stable as usize]
    }

    /// Publishes counters to the tally of the ring, for [statistics](Ruler::statistics).
    pub fn publish(&mut self, ruler: &Ruler) {
        self.last.publish = self.statistics.conflicts();
        ruler.tallies[self.id].publish(&self.statistics);
    }

    /// Whether the ring should stop what it is doing, as a verdict was found elsewhere, a limit was reached, or simplification was requested.
    pub fn terminating(&mut self, ruler: &Ruler) -> bool {
        use std::sync::atomic::Ordering;

        if ruler.terminate.load(Ordering::Relaxed) || ruler.simplify.load(Ordering::Relaxed) {
            return true;
        }

        let conflict_limit = self.config.conflict_limit.value;
        if conflict_limit > 0 && self.statistics.conflicts() >= conflict_limit {
            log::info!(target: targets::RING, "Ring {} reached the conflict limit", self.id);
            ruler.terminate.store(true, Ordering::Relaxed);
            return true;
        }

        let time_limit = self.config.time_limit.value;
        if !time_limit.is_zero() && ruler.elapsed() >= time_limit {
            log::info!(target: targets::RING, "Ring {} reached the time limit", self.id);
            ruler.terminate.store(true, Ordering::Relaxed);
            return true;
        }

        false
    }

    /// The original (external) literal of `literal`.
    pub fn external(&self, literal: Literal) -> i32 {
        let original = self.unmap[literal.var_index()];
        Literal::new(original, literal.is_negative()).external()
    }

    /// The values of every original variable, as seen by the ring, with `0` for variables outside of the index space of the ring.
    pub fn original_values(&self, originals: usize) -> Vec<i8> {
        let mut values = vec![0; originals];
        for (index, original) in self.unmap.iter().enumerate() {
            values[*original as usize] = self.values[2 * index];
        }
        values
    }
}
