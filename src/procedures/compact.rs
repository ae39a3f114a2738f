/*!
Compaction of the index space.

# Overview

Once enough variables are fixed, fixed variables are removed from the index space of the formula and of every ring.
The ruler builds a map from the current index space to a fresh, dense, index space holding only the variables not fixed, and:

- Records the value of each removed variable against its original variable, for the witness.
- Remaps every binary and large clause of the formula.
  Large clauses are remapped through the [Compaction], so a clause remapped by the ruler or any ring is remapped once and shared.
- Composes the map from original variables, and the map to original variables, with the fresh map.
- Clears the unit trail, as every unit has been removed.

Each ring then follows the same map, with every per-variable structure rebuilt in the fresh index space.
Scores, stamps, and phases are carried over, while the trail and every assignment are cleared, as every variable assigned at level zero was removed.

Compaction happens during a round of [simplification](crate::procedures::simplify), when the count of units is at least `compact_fraction` of the variables of the index space.
*/

use std::sync::Arc;

use crate::{
    db::{
        trail::Trail,
        variable::{Phases, Variable},
    },
    misc::log::targets::{self},
    ring::GenericRing,
    ruler::{Compaction, Formula, Ruler, UnitTrail},
    structures::literal::{Literal, INVALID},
};

impl Ruler {
    /// Whether enough variables are fixed for a compaction.
    pub(crate) fn compacting(&self, formula: &Formula, units: &UnitTrail) -> bool {
        !units.is_empty() && units.len() as f64 >= self.config.compact_fraction.value * formula.size as f64
    }

    /// Compacts the formula, removing every fixed variable, and returns the compaction for rings to follow.
    pub(crate) fn compact_formula(&self, formula: &mut Formula, units: &mut UnitTrail) -> Arc<Compaction> {
        let mut fixed = self.fixed.lock();

        let mut map = Vec::with_capacity(formula.size);
        let mut size = 0;
        for index in 0..formula.size {
            match units.values[2 * index] {
                0 => {
                    map.push(size as u32);
                    size += 1;
                }
                value => {
                    fixed[formula.unmap[index] as usize] = value;
                    map.push(INVALID);
                }
            }
        }
        let compaction = Arc::new(Compaction::new(Arc::from(map), size));

        let mut binaries = vec![Vec::default(); 2 * size];
        for (code, others) in formula.binaries.iter().enumerate() {
            let Some(literal) = Literal::from_code(code as u32).mapped(&compaction.map) else {
                continue;
            };
            binaries[literal.index()].extend(others.iter().filter_map(|other| other.mapped(&compaction.map)));
        }
        formula.binaries = Arc::new(binaries);

        formula.clauses = formula
            .clauses
            .iter()
            .filter(|clause| !clause.is_garbage())
            .filter_map(|clause| compaction.remap(clause))
            .collect();

        let remap = |index: &u32| match *index {
            INVALID => INVALID,
            index => compaction.map[index as usize],
        };
        formula.map = formula.map.iter().map(remap).collect();

        let mut unmap = vec![0; size];
        for (index, fresh) in compaction.map.iter().enumerate() {
            if *fresh != INVALID {
                unmap[*fresh as usize] = formula.unmap[index];
            }
        }
        formula.unmap = Arc::from(unmap);

        log::info!(target: targets::COMPACT, "Compaction {} from {} to {size} variables", formula.compactions + 1, formula.size);
        formula.size = size;
        formula.compactions += 1;

        *units = UnitTrail::default();
        units.grow(size);

        compaction
    }
}

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Rebuilds every per-variable structure of the ring in the fresh index space of `compaction`.
    ///
    /// The ring is expected to be at level zero, with every variable the compaction removes fixed.
    pub fn compact(&mut self, compaction: &Compaction) {
        debug_assert!(self.level == 0);
        let map = &compaction.map;
        let size = compaction.size;

        let mut phases = vec![Phases::default(); size];
        for (index, fresh) in map.iter().enumerate() {
            if *fresh != INVALID {
                phases[*fresh as usize] = self.phases[index];
            }
        }
        self.phases = phases;

        self.heap = self.heap.compacted(map, size);
        self.queue = self.queue.compacted(map, size);

        self.values = vec![0; 2 * size];
        self.marks = vec![0; 2 * size];
        self.variables = vec![Variable::default(); size];
        self.trail = Trail::new(size);
        self.used_levels = vec![false; size + 2];

        log::debug!(target: targets::COMPACT, "Ring {}: compacted from {} to {size} variables", self.id, self.size);
        self.size = size;
        self.unassigned = size;
        self.units.clear();
        self.exported_units = 0;
        self.ruler_units = 0;
        self.iterating = false;
        self.probe_cursor = 0;
        self.target_assigned = 0;
        self.best_assigned = 0;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        ring::Ring,
        ruler::Ruler,
        structures::literal::{Literal, INVALID},
    };

    #[test]
    fn formula_and_ring_follow_the_map() {
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[2, 3, 5]).unwrap();
        ruler.add_clause(&[-3, 5]).unwrap();
        ruler.add_clause(&[1]).unwrap();
        ruler.add_clause(&[-4]).unwrap();
        ruler.prepare();

        let mut ring = Ring::new(&ruler, 0);
        assert_eq!(ring.units.len(), 2);
        ring.unclone(&ruler);

        let compaction = {
            let mut formula = ruler.formula.lock();
            let mut units = ruler.units.lock();
            ruler.compact_formula(&mut formula, &mut units)
        };
        assert_eq!(&compaction.map[..], &[INVALID, 0, 1, INVALID, 2]);
        assert_eq!(compaction.size, 3);
        assert_eq!(*ruler.fixed.lock(), vec![1, 0, 0, -1, 0]);

        {
            let formula = ruler.formula.lock();
            assert_eq!(&formula.unmap[..], &[1, 2, 4]);
            assert_eq!(&formula.map[..], &[INVALID, 0, 1, INVALID, 2]);
            assert_eq!(formula.clauses[0].literals(), &[Literal::new(0, false), Literal::new(1, false), Literal::new(2, false)]);
            assert_eq!(formula.binaries[Literal::new(1, true).index()], vec![Literal::new(2, false)]);
            assert!(ruler.units.lock().is_empty());
        }

        *ruler.compaction.lock() = Some(compaction);
        ring.copy(&ruler);
        assert_eq!(ring.size, 3);
        assert_eq!(ring.unassigned, 3);
        assert!(ring.trail.is_empty());
        assert_eq!(ring.external(Literal::new(2, true)), -5);
        assert_eq!(ring.watches.watchers.len(), 1);
    }
}
