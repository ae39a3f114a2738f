/*!
The ruler, which holds everything shared between rings.

A solve begins with clauses added to a ruler, either [directly](Ruler::add_clause) or from a [DIMACS](Ruler::read_dimacs) file.
On a [solve](crate::procedures::solve) the ruler simplifies the formula at level zero, [clones](crate::procedures::clone) a ring for each thread, and waits for some ring to find a verdict.

Once rings are searching, the ruler is only ever read through a shared reference, and the items which rings write are each behind a lock or an atomic:
- The [formula](Formula), only written by the leader during rounds of simplification, when no ring is searching.
- The [unit trail](UnitTrail), appended to by any ring under a lock.
- The winner, written once under a lock.
- The flags to terminate, to simplify, and noting the formula is inconsistent.
- The [grid](crate::pool::Grid) of buckets for sharing learnt clauses.
- The [tallies](Tally) of each ring, for [statistics](Ruler::statistics).

```rust
# use ring_sat::{config::Config, reports::Report, ruler::Ruler};
let mut ruler = Ruler::from_config(Config::default());
ruler.add_clause(&[1, 2]).unwrap();
ruler.add_clause(&[-1, 2]).unwrap();
ruler.add_clause(&[-2, 3]).unwrap();

assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
assert_eq!(ruler.value_of(2), Some(true));
assert_eq!(ruler.value_of(3), Some(true));
```
*/

mod barriers;
pub use barriers::Barriers;

mod external;
pub use external::{ConsumeClause, External, ProduceClause};

mod formula;
pub use formula::{Compaction, Formula, UnitTrail};

mod tally;
pub use tally::Tally;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crossbeam::utils::CachePadded;
use parking_lot::Mutex;

use crate::{
    config::Config,
    misc::log::targets::{self},
    pool::Grid,
    reports::{Report, StatisticsSnapshot},
    structures::{clause::LargeClause, literal::Literal},
    types::err::{self, ErrorKind},
};

/// The ring which first found a verdict, and the verdict.
#[derive(Clone, Debug)]
pub struct Winner {
    pub ring: usize,
    pub report: Report,

    /// For a satisfiable verdict, the value of each original variable in the ring.
    pub values: Option<Vec<i8>>,
}

/// The ruler.
pub struct Ruler {
    pub config: Config,

    /// The count of original variables.
    pub(crate) variables: usize,

    /// Original clauses, kept to check a model.
    pub(crate) original: Vec<Box<[i32]>>,

    pub(crate) formula: Mutex<Formula>,

    pub(crate) units: Mutex<UnitTrail>,

    /// The value of each original variable removed by compaction.
    pub(crate) fixed: Mutex<Vec<i8>>,

    /// The count of original variables fixed, noted as units are committed to the unit trail.
    pub(crate) fixed_count: AtomicU64,

    /// The compaction of the current round of simplification, if any.
    pub(crate) compaction: Mutex<Option<Arc<Compaction>>>,

    pub(crate) winner: Mutex<Option<Winner>>,

    pub(crate) terminate: AtomicBool,

    pub(crate) simplify: AtomicBool,

    pub(crate) inconsistent: AtomicBool,

    pub(crate) barriers: Barriers,

    pub(crate) pool: Grid,

    pub(crate) tallies: Box<[CachePadded<Tally>]>,

    pub(crate) external: External,

    pub(crate) started: Instant,

    pub(crate) solved: bool,

    pub(crate) model: Option<Vec<i8>>,
}

impl Ruler {
    /// A ruler with the given configuration, without any clauses.
    pub fn from_config(config: Config) -> Self {
        let rings = config.threads.value.max(1);
        let tallies = (0..rings)
            .map(|_| CachePadded::new(Tally::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let max_size = config.external_export_max_size.value;
        Ruler {
            variables: 0,
            original: Vec::default(),
            formula: Mutex::new(Formula::default()),
            units: Mutex::new(UnitTrail::default()),
            fixed: Mutex::new(Vec::default()),
            fixed_count: AtomicU64::new(0),
            compaction: Mutex::new(None),
            winner: Mutex::new(None),
            terminate: AtomicBool::new(false),
            simplify: AtomicBool::new(false),
            inconsistent: AtomicBool::new(false),
            barriers: Barriers::new(rings),
            pool: Grid::new(rings),
            tallies,
            external: External {
                max_size,
                ..Default::default()
            },
            started: Instant::now(),
            solved: false,
            model: None,
            config,
        }
    }

    /// The count of original variables.
    pub fn variable_count(&self) -> usize {
        self.variables
    }

    /// The count of rings used in a solve.
    pub fn rings(&self) -> usize {
        self.tallies.len()
    }

    /// Whether the formula is known to be unsatisfiable.
    pub fn is_inconsistent(&self) -> bool {
        self.inconsistent.load(Ordering::Relaxed)
    }

    pub(crate) fn set_inconsistent(&self, reason: &str) {
        log::debug!(target: targets::RULER, "Inconsistent: {reason}");
        self.inconsistent.store(true, Ordering::Relaxed);
    }

    /// Time since the start of the solve.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Ensures there are at least `count` original variables.
    pub fn ensure_variables(&mut self, count: usize) {
        if count <= self.variables {
            return;
        }
        self.variables = count;
        self.formula.get_mut().grow(count);
        self.units.get_mut().grow(count);
        self.fixed.get_mut().resize(count, 0);
    }

    /// Adds a clause of external literals to the formula.
    ///
    /// Duplicate literals are removed and tautologies are ignored.
    /// The empty clause makes the formula inconsistent.
    pub fn add_clause(&mut self, clause: &[i32]) -> Result<(), ErrorKind> {
        if self.solved {
            return Err(err::BuildError::Solving.into());
        }

        let mut literals = Vec::with_capacity(clause.len());
        for external in clause {
            let literal = match (*external, Literal::from_external(*external)) {
                (0, _) => return Err(err::BuildError::ZeroLiteral.into()),
                (_, None) => return Err(err::BuildError::VariableLimit.into()),
                (_, Some(literal)) => literal,
            };
            literals.push(literal);
        }

        if let Some(max) = literals.iter().map(|literal| literal.var_index()).max() {
            self.ensure_variables(max + 1);
        }

        if self.config.check_witness.value {
            self.original.push(clause.into());
        }

        literals.sort_unstable();
        literals.dedup();
        if literals.windows(2).any(|pair| pair[0] == !pair[1]) {
            log::trace!(target: targets::RULER, "Ignoring tautology {clause:?}");
            return Ok(());
        }

        match literals.as_slice() {
            [] => self.set_inconsistent("empty clause"),

            [unit] => {
                let units = self.units.get_mut();
                let before = units.len();
                let consistent = units.push(*unit);
                *self.fixed_count.get_mut() += (units.len() - before) as u64;
                if !consistent {
                    self.set_inconsistent("contradictory units");
                }
            }

            [a, b] => self.formula.get_mut().add_binary(*a, *b),

            _ => {
                let clause = LargeClause::new(&literals, false, 0, 0);
                self.formula.get_mut().clauses.push(clause);
            }
        }
        Ok(())
    }

    /// Sets a consumer of learnt clauses of at most `max_size` literals.
    ///
    /// The consumer is called with the literals of the clause, in the original index space, the glue of the clause, and the id of the ring which learnt (or imported) the clause.
    pub fn set_consume_clause(
        &mut self,
        max_size: usize,
        callback: impl FnMut(&[i32], u32, usize) + Send + 'static,
    ) {
        self.external.max_size = max_size;
        self.external.has_consumer = true;
        *self.external.consume.get_mut() = Some(Box::new(callback));
    }

    /// Sets a producer of clauses.
    ///
    /// The producer writes the literals of a clause to the given buffer and returns the glue, or returns None if no clause is available.
    /// Each clause is validated, and clauses with invalid literals are discarded.
    pub fn set_produce_clause(
        &mut self,
        callback: impl FnMut(&mut Vec<i32>) -> Option<u32> + Send + 'static,
    ) {
        self.external.has_producer = true;
        *self.external.produce.get_mut() = Some(Box::new(callback));
    }

    /// The value of an original variable in the model of a satisfiable solve, where variables are one-based.
    pub fn value_of(&self, variable: i32) -> Option<bool> {
        let model = self.model.as_ref()?;
        let index = usize::try_from(variable).ok()?.checked_sub(1)?;
        match model.get(index)? {
            1 => Some(true),
            -1 => Some(false),
            _ => None,
        }
    }

    /// The model of a satisfiable solve, as a literal for each original variable.
    pub fn model(&self) -> Option<Vec<i32>> {
        let model = self.model.as_ref()?;
        Some(
            model
                .iter()
                .enumerate()
                .map(|(index, value)| match *value < 0 {
                    true => -(index as i32 + 1),
                    false => index as i32 + 1,
                })
                .collect(),
        )
    }

    /// A snapshot of counters, summed over rings.
    ///
    /// No lock is taken, and so during a solve the snapshot may mix counts from slightly different moments.
    pub fn statistics(&self) -> StatisticsSnapshot {
        let mut snapshot = StatisticsSnapshot::default();
        for tally in self.tallies.iter() {
            snapshot.conflicts += tally.conflicts.load(Ordering::Relaxed);
            snapshot.decisions += tally.decisions.load(Ordering::Relaxed);
            snapshot.propagations += tally.propagations.load(Ordering::Relaxed);
            snapshot.restarts += tally.restarts.load(Ordering::Relaxed);
            snapshot.reductions += tally.reductions.load(Ordering::Relaxed);
            snapshot.shared_imported += tally.imported.load(Ordering::Relaxed);
            snapshot.shared_exported += tally.exported.load(Ordering::Relaxed);
        }
        snapshot.external_imported = self.external.imported.load(Ordering::Relaxed);
        snapshot.external_discarded = self.external.discarded.load(Ordering::Relaxed);
        snapshot.external_exported = self.external.exported.load(Ordering::Relaxed);
        snapshot.fixed = self.fixed_count.load(Ordering::Relaxed);
        snapshot
    }

    /// The ring which first found a verdict, if any.
    pub fn winner(&self) -> Option<usize> {
        self.winner.lock().as_ref().map(|winner| winner.ring)
    }

    /// Records a verdict from `ring`, if no verdict was recorded before, and asks every ring to terminate.
    ///
    /// Returns whether the verdict was recorded.
    pub(crate) fn set_winner(&self, ring: usize, report: Report, values: Option<Vec<i8>>) -> bool {
        let mut winner = self.winner.lock();
        let recorded = match winner.as_ref() {
            Some(_) => false,
            None => {
                log::info!(target: targets::RULER, "Ring {ring} wins with {report}");
                *winner = Some(Winner {
                    ring,
                    report,
                    values,
                });
                true
            }
        };
        self.terminate.store(true, Ordering::Relaxed);
        recorded
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ruler::Ruler};

    #[test]
    fn fixed_units_are_counted_once() {
        let mut config = Config::default();
        config.compact_fraction.value = 0.01;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1]).unwrap();
        ruler.add_clause(&[-2]).unwrap();
        ruler.add_clause(&[1]).unwrap();
        ruler.add_clause(&[-1, 3]).unwrap();
        ruler.add_clause(&[3, 4, 5]).unwrap();
        assert_eq!(ruler.statistics().fixed, 2);

        // Propagation fixes 3, and compaction moves every unit to the fixed record.
        ruler.prepare();
        assert_eq!(ruler.formula.lock().size, 2);
        assert_eq!(ruler.statistics().fixed, 3);
    }
}
