//! Abstract elements of a solve, and their representation.
//!
//! - [Literals](literal) are small unsigned integers, with a bijection to the signed integers of DIMACS.
//! - [Clauses](clause) are either binary, and stored inline wherever they are referenced, or large, and shared by reference between rings.

pub mod clause;
pub mod literal;
