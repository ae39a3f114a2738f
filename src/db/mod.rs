//! The databases of a ring.
//!
//! - [Variables](variable), with the reason and level of assignments and the phases used for decisions.
//! - The [trail] of assignments.
//! - [Watch lists and watchers](watches), used for propagation.
//!
//! Everything here is owned by a single ring, with the exception of shared clauses held by watchers.

pub mod trail;
pub mod variable;
pub mod watches;
