/*!
Watch lists, and watchers of large clauses.

# Watch lists

Each literal has a list of [Watch]es, and a clause is in the list of a literal if the literal is one of the two literals watched in the clause.
When a literal becomes false its list is visited by [propagation](crate::procedures::propagate).

- Binary clauses are held inline, with the anchor of the [BinaryClause] the literal of the list.
  As each list holds its own copy, no binary clause is ever allocated.
- Irredundant binary clauses are not in the watch lists at all.
  Instead, the *others* of each literal are kept in a vector shared (read only) by every ring, and visited before the watch list of the literal.
- Large clauses are held through the [WatcherKey] of a [Watcher], along with a *blocking* literal.
  If the blocking literal is true, the clause is satisfied and the watcher need not be visited.

# Watchers

A watcher is the ring-local record of a shared [LargeClause].
The two literals watched are not stored, instead the watcher holds their xor as `sum`, so given either watched literal the other is found without visiting the clause.
For clauses of at most [WATCHER_LITERALS] literals the literals are also cached inline.

Watchers are stored in an arena, and are only ever removed when the arena is compacted during [reduction](crate::procedures::reduce).
Otherwise, a watcher is marked as garbage and dropped from watch lists as they are visited.

The glue of a watcher is a cache of the glue of the clause, and is only lowered through [promotion](Watches::promote).
*/

use std::sync::Arc;

use crate::structures::{
    clause::{BinaryClause, LargeClause},
    literal::Literal,
};

/// The count of literals cached inline by a watcher.
pub const WATCHER_LITERALS: usize = 4;

/// The key to a watcher.
pub type WatcherKey = usize;

/// The others of each literal in irredundant binary clauses, indexed by literal.
pub type Occurrences = Arc<Vec<Vec<Literal>>>;

/// An entry of a watch list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Watch {
    /// A redundant binary clause, whose anchor is the literal of the list.
    Binary(BinaryClause),

    /// A large clause.
    Large { key: WatcherKey, blocking: Literal },
}

/// A watcher of a large clause.
#[derive(Clone, Debug)]
pub struct Watcher {
    /// Uses as a reason since the last reduction.
    pub used: u8,

    /// Cached glue of the clause.
    pub glue: u32,

    pub garbage: bool,

    /// Whether the watcher is the reason for some assignment, refreshed by reductions.
    pub reason: bool,

    pub redundant: bool,

    /// Scheduled for vivification before any fresh candidate.
    pub vivify: bool,

    /// The position the last search for a replacement watch ended at.
    pub middle: usize,

    /// The xor of the codes of the two watched literals.
    pub sum: u32,

    /// The count of literals cached inline, or zero if the clause is too large.
    pub size: u8,

    pub aux: [Literal; WATCHER_LITERALS],

    pub clause: Arc<LargeClause>,
}

impl Watcher {
    /// The literals of the watched clause.
    pub fn literals(&self) -> &[Literal] {
        match self.size {
            0 => self.clause.literals(),
            size => &self.aux[..size as usize],
        }
    }

    /// Given one watched literal, the other.
    pub fn other(&self, watched: Literal) -> Literal {
        Literal::from_code(self.sum ^ watched.code())
    }
}

/// The watch lists and watchers of a ring.
#[derive(Debug, Default)]
pub struct Watches {
    /// Irredundant binary clauses, shared with every other ring.
    pub binaries: Occurrences,

    /// Watch lists, indexed by literal.
    pub lists: Vec<Vec<Watch>>,

    /// The arena of watchers.
    pub watchers: Vec<Watcher>,
}

impl Watches {
    /// Empty watch lists for `variables` variables, sharing `binaries`.
    pub fn new(variables: usize, binaries: Occurrences) -> Self {
        Watches {
            binaries,
            lists: vec![Vec::default(); 2 * variables],
            watchers: Vec::default(),
        }
    }

    /// Watches the (redundant) binary clause of `a` and `b`.
    pub fn watch_binary(&mut self, a: Literal, b: Literal) -> BinaryClause {
        let clause = BinaryClause::new(a, b, true);
        self.lists[a.index()].push(Watch::Binary(clause));
        self.lists[b.index()].push(Watch::Binary(clause.flipped()));
        clause
    }

    /// Watches `first` and `second` of `clause`, returning the key to the fresh watcher.
    pub fn watch_large(
        &mut self,
        clause: Arc<LargeClause>,
        first: Literal,
        second: Literal,
        redundant: bool,
        glue: u32,
    ) -> WatcherKey {
        debug_assert!(first != second);
        let mut aux = [Literal::default(); WATCHER_LITERALS];
        let size = match clause.size() <= WATCHER_LITERALS {
            true => {
                aux[..clause.size()].copy_from_slice(clause.literals());
                clause.size() as u8
            }
            false => 0,
        };

        let key = self.watchers.len();
        self.watchers.push(Watcher {
            used: 0,
            glue,
            garbage: false,
            reason: false,
            redundant,
            vivify: false,
            middle: 0,
            sum: first.code() ^ second.code(),
            size,
            aux,
            clause,
        });

        self.lists[first.index()].push(Watch::Large {
            key,
            blocking: second,
        });
        self.lists[second.index()].push(Watch::Large {
            key,
            blocking: first,
        });
        key
    }

    /// Whether the binary clause of `a` and `b` is present, either as an irredundant or redundant clause.
    pub fn contains_binary(&self, a: Literal, b: Literal) -> bool {
        if let Some(others) = self.binaries.get(a.index()) {
            if others.contains(&b) {
                return true;
            }
        }
        let (list, other) = match self.lists[a.index()].len() <= self.lists[b.index()].len() {
            true => (&self.lists[a.index()], b),
            false => (&self.lists[b.index()], a),
        };
        list.iter()
            .any(|watch| matches!(watch, Watch::Binary(clause) if clause.other == other))
    }

    /// Lowers the cached glue of a watcher, and of its clause, to `glue`.
    pub fn promote(&mut self, key: WatcherKey, glue: u32) {
        let watcher = &mut self.watchers[key];
        if glue < watcher.glue {
            watcher.glue = watcher.clause.promote(glue);
        }
    }

    /// An iterator over the keys of redundant watchers which are not garbage.
    pub fn redundant_keys(&self) -> impl Iterator<Item = WatcherKey> + '_ {
        self.watchers
            .iter()
            .enumerate()
            .filter(|(_, watcher)| watcher.redundant && !watcher.garbage)
            .map(|(key, _)| key)
    }

    /// Removes every watch and watcher, and releases the shared binary clauses.
    pub fn release(&mut self) {
        self.binaries = Occurrences::default();
        self.lists.iter_mut().for_each(|list| list.clear());
        self.watchers.clear();
    }

    /// Compacts the arena, keeping watchers for which `keep` holds.
    ///
    /// Returns a map from old to new keys, after removing every watch of a dropped watcher.
    pub fn compact_watchers(&mut self, keep: impl Fn(&Watcher) -> bool) -> Vec<Option<WatcherKey>> {
        let mut map = Vec::with_capacity(self.watchers.len());
        let mut kept = 0;
        for watcher in &self.watchers {
            match keep(watcher) {
                true => {
                    map.push(Some(kept));
                    kept += 1;
                }
                false => map.push(None),
            }
        }

        let mut index = 0;
        self.watchers.retain(|_| {
            let keep = map[index].is_some();
            index += 1;
            keep
        });

        for list in self.lists.iter_mut() {
            list.retain_mut(|watch| match watch {
                Watch::Binary(_) => true,
                Watch::Large { key, .. } => match map[*key] {
                    Some(fresh) => {
                        *key = fresh;
                        true
                    }
                    None => false,
                },
            });
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(code: u32) -> Literal {
        Literal::from_code(code)
    }

    #[test]
    fn watcher_sum_recovers_the_other_watch() {
        let mut watches = Watches::new(4, Occurrences::default());
        let clause = LargeClause::new(&[lit(0), lit(3), lit(4), lit(7)], true, 2, 0);
        let key = watches.watch_large(clause, lit(3), lit(7), true, 2);
        let watcher = &watches.watchers[key];
        assert_eq!(watcher.other(lit(3)), lit(7));
        assert_eq!(watcher.other(lit(7)), lit(3));
        assert_eq!(watcher.literals(), &[lit(0), lit(3), lit(4), lit(7)]);
        assert_eq!(watches.lists[3].len(), 1);
        assert_eq!(watches.lists[7].len(), 1);
    }

    #[test]
    fn compaction_remaps_and_drops() {
        let mut watches = Watches::new(4, Occurrences::default());
        let a = LargeClause::new(&[lit(0), lit(2), lit(4)], true, 3, 0);
        let b = LargeClause::new(&[lit(1), lit(3), lit(5)], true, 3, 0);
        let first = watches.watch_large(a, lit(0), lit(2), true, 3);
        let second = watches.watch_large(b, lit(1), lit(3), true, 3);
        watches.watch_binary(lit(0), lit(6));
        watches.watchers[first].garbage = true;

        let map = watches.compact_watchers(|watcher| !watcher.garbage);
        assert_eq!(map, vec![None, Some(0)]);
        assert_eq!(watches.watchers.len(), 1);
        assert_eq!(second, 1);
        assert_eq!(watches.lists[0], vec![Watch::Binary(BinaryClause::new(lit(0), lit(6), true))]);
        assert_eq!(
            watches.lists[1],
            vec![Watch::Large {
                key: 0,
                blocking: lit(3)
            }]
        );
        assert!(watches.lists[2].is_empty());
    }

    #[test]
    fn binary_lookup() {
        let mut others = vec![Vec::default(); 6];
        others[0].push(lit(4));
        others[4].push(lit(0));
        let mut watches = Watches::new(3, Arc::new(others));
        watches.watch_binary(lit(1), lit(2));
        assert!(watches.contains_binary(lit(0), lit(4)));
        assert!(watches.contains_binary(lit(2), lit(1)));
        assert!(!watches.contains_binary(lit(0), lit(2)));
    }

    #[test]
    fn promotion_lowers_both_glues() {
        let mut watches = Watches::new(3, Occurrences::default());
        let clause = LargeClause::new(&[lit(0), lit(2), lit(4)], true, 9, 0);
        let key = watches.watch_large(clause.clone(), lit(0), lit(2), true, 9);
        watches.promote(key, 4);
        assert_eq!(watches.watchers[key].glue, 4);
        assert_eq!(clause.glue(), 4);
        watches.promote(key, 6);
        assert_eq!(watches.watchers[key].glue, 4);
    }
}
