//! A parallel portfolio solver for the satisfiability of boolean formulas written in conjunctive normal form.
//!
//! ring_sat runs a collection of conflict-driven clause-learning solvers, called *rings*, each on its own thread and each with its own heuristics, over a shared formula.
//! Rings gossip learnt clauses through a grid of lock-free buckets, fixed units through a shared trail, and the first ring to find a verdict ends the solve for every ring.
//!
//! # Orientation
//!
//! The library is designed around two structures:
//! - A [ruler](crate::ruler), which holds the formula and everything else shared between rings.
//! - A [ring](crate::ring), which holds the state of a single solver: a valuation, a trail, watches, and heuristics.
//!
//! Clauses are added to a ruler either through the [DIMACS](crate::ruler::Ruler::read_dimacs) representation of a formula or [programatically](crate::ruler::Ruler::add_clause).
//! On a [solve](crate::procedures::solve) the ruler simplifies the formula at level zero, clones a ring for each configured thread, and waits for some ring to find a verdict.
//!
//! Large clauses are shared between the formula, every ring, and the buckets of the pool through reference counting, and so a clause learnt by one ring may be watched by several.
//! Binary clauses are stored inline, with a copy in the watch list of each literal.
//!
//! Useful starting points, then, may be:
//! - The [search loop](crate::procedures::search) of a ring, which shows when each procedure is used.
//! - The [lifecycle](crate::procedures::clone) of a ring, including rounds of simplification during a solve.
//! - The [pool](crate::pool), to see how clauses are passed between rings.
//! - The [configuration](crate::config) to see what features are supported.
//!
//! # Examples
//!
//! + Solve a formula built programatically, across four rings.
//!
//! ```rust
//! # use ring_sat::{config::Config, reports::Report, ruler::Ruler};
//! let mut ruler = Ruler::from_config(Config::with_threads(4));
//!
//! // Exactly one of 1, 2, 3, and 3 implies 1.
//! ruler.add_clause(&[1, 2, 3]).unwrap();
//! ruler.add_clause(&[-1, -2]).unwrap();
//! ruler.add_clause(&[-1, -3]).unwrap();
//! ruler.add_clause(&[-2, -3]).unwrap();
//! ruler.add_clause(&[-3, 1]).unwrap();
//!
//! assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
//! assert_eq!(ruler.value_of(3), Some(false));
//! assert_ne!(ruler.value_of(1), ruler.value_of(2));
//! ```
//!
//! + Parse and solve a DIMACS formula.
//!
//! ```rust
//! # use ring_sat::{config::Config, reports::Report, ruler::Ruler};
//! # use std::io::Write;
//! let mut ruler = Ruler::from_config(Config::default());
//!
//! let mut dimacs = vec![];
//! let _ = dimacs.write(b"
//!  1  2 0
//! -1  2 0
//! -1 -2 0
//!  1 -2 0
//! ");
//!
//! assert!(ruler.read_dimacs(dimacs.as_slice()).is_ok());
//! assert_eq!(ruler.solve(), Ok(Report::Unsatisfiable));
//! ```
//!
//! + Pass learnt clauses to (and take clauses from) some other solver.
//!
//! ```rust
//! # use ring_sat::{config::Config, reports::Report, ruler::Ruler};
//! # use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//! let mut ruler = Ruler::from_config(Config::with_threads(2));
//! ruler.add_clause(&[1, 2]).unwrap();
//! ruler.add_clause(&[-1, 2]).unwrap();
//!
//! let consumed = Arc::new(AtomicUsize::default());
//! let counter = consumed.clone();
//! ruler.set_consume_clause(8, move |_clause, _glue, _ring| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! let mut offered = false;
//! ruler.set_produce_clause(move |clause| match offered {
//!     true => None,
//!     false => {
//!         offered = true;
//!         clause.extend_from_slice(&[2, -1]);
//!         Some(1)
//!     }
//! });
//!
//! assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
//! assert_eq!(ruler.value_of(2), Some(true));
//! ```
//!
//! # CLI
//!
//! The `ring_cli` binary reads a DIMACS file, solves, and writes the result in the conventional format.
//!
//! ```sh
//! ring_cli [--option=value ...] [--model] FILE.cnf
//! ```
//!
//! - Any [configuration option](crate::config::Config) may be set by name, e.g. `--threads=8` or `--export_policy=All`.
//! - With `--model` a satisfying valuation is written on a `v` line.
//! - Statistics are written on `c` lines, unless `--quiet` is given.
//! - The exit code is 10 for a satisfiable formula, 20 for an unsatisfiable formula, and 0 otherwise.
//!
//! With the `xz` feature, files with an `xz` extension are decompressed when read.
//!
//! # Logs
//!
//! To help diagnose issues detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//! As logging is only built on request, and further can be requested by level, logs are verbose.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when the CLI is built with the `log` feature (which installs [env_logger](https://docs.rs/env_logger/latest/env_logger/)):
//! - Logs of clauses passed between rings can be found with `RUST_LOG=export=trace,import=trace …` or,
//! - Logs of rounds of simplification, without information on each ring, can be found with `RUST_LOG=simplify=info …`

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::derivable_impls)]

pub mod builder;
pub mod procedures;

pub mod config;
pub mod reports;
pub mod ring;
pub mod ruler;
pub mod structures;
pub mod types;

pub mod generic;

pub mod db;
pub mod pool;

pub mod misc;
