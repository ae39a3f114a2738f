//! Callbacks to an external solver, and counters of clauses exchanged.
//!
//! - The consumer is called with each clause learnt (or imported from a peer) by some ring, in the original index space.
//! - The producer is asked for clauses, which are validated before being installed in a ring.
//!
//! Each callback is held under a lock, so at most one ring calls a callback at any time.

use std::sync::atomic::AtomicU64;

use parking_lot::Mutex;

/// A consumer of learnt clauses, called with the literals, glue, and id of the ring.
pub type ConsumeClause = Box<dyn FnMut(&[i32], u32, usize) + Send>;

/// A producer of clauses, which writes literals to the buffer and returns the glue, or returns None if no clause is available.
pub type ProduceClause = Box<dyn FnMut(&mut Vec<i32>) -> Option<u32> + Send>;

#[derive(Default)]
pub struct External {
    pub consume: Mutex<Option<ConsumeClause>>,

    /// The largest clause passed to the consumer.
    pub max_size: usize,

    pub produce: Mutex<Option<ProduceClause>>,

    pub has_consumer: bool,

    pub has_producer: bool,

    /// Clauses from the producer installed by some ring.
    pub imported: AtomicU64,

    /// Clauses from the producer rejected by validation.
    pub discarded: AtomicU64,

    /// Clauses passed to the consumer.
    pub exported: AtomicU64,
}
