//! Generic structures, used by a ring but not specific to satisfiability.

pub mod ema;
pub mod index_heap;
pub mod luby;
pub mod queue;
pub mod random;
