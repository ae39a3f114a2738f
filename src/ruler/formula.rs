//! The formula held by the ruler, the global trail of units, and records of compaction.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    db::watches::Occurrences,
    structures::{clause::LargeClause, literal::Literal},
};

/// The irredundant clauses of a solve, in the current index space.
#[derive(Debug)]
pub struct Formula {
    /// The count of variables in the current index space.
    pub size: usize,

    /// The others of each literal in binary clauses.
    pub binaries: Occurrences,

    /// Large clauses.
    pub clauses: Vec<Arc<LargeClause>>,

    /// The map from original variables to the current index space, with [INVALID](crate::structures::literal::INVALID) for removed variables.
    pub map: Arc<[u32]>,

    /// The map from the current index space to original variables.
    pub unmap: Arc<[u32]>,

    pub simplifications: u64,

    pub compactions: u64,
}

impl Default for Formula {
    fn default() -> Self {
        Formula {
            size: 0,
            binaries: Occurrences::default(),
            clauses: Vec::default(),
            map: Arc::from(Vec::default()),
            unmap: Arc::from(Vec::default()),
            simplifications: 0,
            compactions: 0,
        }
    }
}

impl Formula {
    /// Grows the index space to `size` variables, extending the maps with the identity.
    ///
    /// Only used before any compaction, when the current and original index spaces coincide.
    pub fn grow(&mut self, size: usize) {
        if size <= self.size {
            return;
        }
        debug_assert!(self.compactions == 0);
        Arc::make_mut(&mut self.binaries).resize(2 * size, Vec::default());
        self.size = size;
        let identity: Arc<[u32]> = (0..size as u32).collect();
        self.map = identity.clone();
        self.unmap = identity;
    }

    /// Adds the binary clause of `a` and `b`.
    pub fn add_binary(&mut self, a: Literal, b: Literal) {
        let binaries = Arc::make_mut(&mut self.binaries);
        binaries[a.index()].push(b);
        binaries[b.index()].push(a);
    }

    /// A count of binary clauses.
    pub fn binary_count(&self) -> usize {
        self.binaries.iter().map(|others| others.len()).sum::<usize>() / 2
    }
}

/// The trail of literals fixed by some ring, or by the ruler.
#[derive(Debug, Default)]
pub struct UnitTrail {
    /// Fixed literals, in order.
    pub literals: Vec<Literal>,

    /// The value of each literal, indexed by literal.
    pub values: Vec<i8>,
}

impl UnitTrail {
    pub fn grow(&mut self, size: usize) {
        if self.values.len() < 2 * size {
            self.values.resize(2 * size, 0);
        }
    }

    pub fn value(&self, literal: Literal) -> i8 {
        self.values[literal.index()]
    }

    /// Fixes `literal`, returning false if the negation of `literal` is already fixed.
    pub fn push(&mut self, literal: Literal) -> bool {
        match self.values[literal.index()] {
            1 => true,
            -1 => false,
            _ => {
                self.values[literal.index()] = 1;
                self.values[(!literal).index()] = -1;
                self.literals.push(literal);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// A compaction of the index space, published by the ruler for every ring to follow.
#[derive(Debug)]
pub struct Compaction {
    /// The map from the previous index space to the fresh index space.
    pub map: Arc<[u32]>,

    /// The count of variables in the fresh index space.
    pub size: usize,

    /// Clauses remapped by some ring, by identifier, so each clause is remapped once.
    remapped: Mutex<HashMap<u64, Option<Arc<LargeClause>>>>,
}

impl Compaction {
    pub fn new(map: Arc<[u32]>, size: usize) -> Self {
        Compaction {
            map,
            size,
            remapped: Mutex::new(HashMap::default()),
        }
    }

    /// The clause in the fresh index space, shared with any other ring which remapped the same clause.
    pub fn remap(&self, clause: &Arc<LargeClause>) -> Option<Arc<LargeClause>> {
        let mut remapped = self.remapped.lock();
        remapped
            .entry(clause.id())
            .or_insert_with(|| clause.remapped(&self.map))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::literal::INVALID;

    #[test]
    fn unit_trail_contradiction() {
        let mut units = UnitTrail::default();
        units.grow(3);
        let p = Literal::new(1, false);
        assert!(units.push(p));
        assert!(units.push(p));
        assert_eq!(units.len(), 1);
        assert!(!units.push(!p));
        assert_eq!(units.value(!p), -1);
    }

    #[test]
    fn remapping_is_shared() {
        let clause = LargeClause::new(
            &[Literal::new(0, false), Literal::new(2, true), Literal::new(3, false)],
            true,
            2,
            0,
        );
        let compaction = Compaction::new(Arc::from(vec![0, INVALID, 1, 2]), 3);
        let first = compaction.remap(&clause).unwrap();
        let second = compaction.remap(&clause).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.literals()[1], Literal::new(1, true));
    }
}
