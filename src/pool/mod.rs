/*!
The grid of buckets through which rings share learnt clauses.

For each ordered pair of rings (*source*, *destination*) there are [POOL_BUCKETS] buckets, written only by the source and read only by the destination.
Each bucket is a [ClauseCell] paired with the redundancy rank of the clause held, where lower ranks are better.

# Put

To [put](Grid::put) a clause the source scans the buckets of the pair:
- If some bucket is empty, the clause is placed in the first empty bucket.
- Otherwise, the bucket holding the clause of worst rank is chosen (ties going to the later bucket), and the clause replaces the held clause only if the held rank is strictly worse.
  Otherwise the clause is dropped.

A clause displaced from a bucket is released, and so the reference held by the bucket is released exactly once.

# Take

To [take](Grid::take) a clause the destination scans the buckets of the pair for the occupied bucket of best rank, and swaps the bucket to empty.

# Consistency

Ranks and cells are updated by separate atomic operations, and so a rank read during a scan may belong to a clause which has since been taken or replaced.
Sharing is best effort, and a stale rank only leads to a worse choice of bucket.
What holds regardless is that a clause is taken at most once, as taking is a swap.

Each bucket is padded to a cache line, as buckets of different pairs are written by different threads.
*/

mod cell;
pub use cell::ClauseCell;

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::utils::CachePadded;

use crate::{config::POOL_BUCKETS, structures::clause::ClauseRef};

/// A bucket, holding at most one clause.
#[derive(Debug, Default)]
pub struct Bucket {
    redundancy: AtomicU64,
    cell: ClauseCell,
}

/// The result of putting a clause into a bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutResult {
    /// The clause was placed in an empty bucket.
    Placed,

    /// The clause replaced a clause of worse rank.
    Displaced,

    /// Every bucket held a clause of equal or better rank, and the clause was dropped.
    Dropped,
}

/// The grid of buckets for a fixed count of rings.
#[derive(Debug)]
pub struct Grid {
    rings: usize,
    buckets: Box<[CachePadded<Bucket>]>,
}

impl Grid {
    /// Empty buckets for every ordered pair of `rings` rings.
    pub fn new(rings: usize) -> Self {
        let count = rings * rings * POOL_BUCKETS;
        let buckets = (0..count)
            .map(|_| CachePadded::new(Bucket::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Grid { rings, buckets }
    }

    pub fn rings(&self) -> usize {
        self.rings
    }

    fn pair(&self, source: usize, destination: usize) -> &[CachePadded<Bucket>] {
        debug_assert!(source != destination);
        let start = (source * self.rings + destination) * POOL_BUCKETS;
        &self.buckets[start..start + POOL_BUCKETS]
    }

    /// Offers `clause`, of rank `redundancy`, from `source` to `destination`.
    pub fn put(
        &self,
        source: usize,
        destination: usize,
        clause: ClauseRef,
        redundancy: u64,
    ) -> PutResult {
        let buckets = self.pair(source, destination);

        let mut chosen = None;
        let mut worst = 0;
        for (index, bucket) in buckets.iter().enumerate() {
            if !bucket.cell.is_occupied() {
                chosen = Some(index);
                worst = u64::MAX;
                break;
            }
            let rank = bucket.redundancy.load(Ordering::Relaxed);
            if chosen.is_none() || rank >= worst {
                chosen = Some(index);
                worst = rank;
            }
        }

        let Some(index) = chosen else {
            return PutResult::Dropped;
        };
        if worst <= redundancy {
            return PutResult::Dropped;
        }

        let bucket = &buckets[index];
        bucket.redundancy.store(redundancy, Ordering::Relaxed);
        match bucket.cell.swap(Some(clause)) {
            None => PutResult::Placed,
            Some(_displaced) => PutResult::Displaced,
        }
    }

    /// Takes the clause of best rank offered from `source` to `destination`, if any.
    pub fn take(&self, source: usize, destination: usize) -> Option<ClauseRef> {
        let buckets = self.pair(source, destination);

        let mut chosen = None;
        let mut best = u64::MAX;
        for (index, bucket) in buckets.iter().enumerate() {
            if !bucket.cell.is_occupied() {
                continue;
            }
            let rank = bucket.redundancy.load(Ordering::Relaxed);
            if chosen.is_none() || rank < best {
                chosen = Some(index);
                best = rank;
            }
        }

        buckets[chosen?].cell.take()
    }

    /// Releases every clause offered by `source`, returning a count of the clauses released.
    pub fn flush(&self, source: usize) -> usize {
        let mut flushed = 0;
        for destination in (0..self.rings).filter(|destination| *destination != source) {
            for bucket in self.pair(source, destination) {
                if bucket.cell.take().is_some() {
                    flushed += 1;
                }
            }
        }
        flushed
    }
}
