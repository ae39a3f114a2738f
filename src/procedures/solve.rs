/*!
A solve, from the formula of a ruler to a [report](Report).

# Overview

A solve:
1. [Prepares](Ruler::prepare) the formula, with a round of simplification if configured.
2. Spawns a scoped thread for each ring, each running the [lifecycle](crate::procedures::clone) of its ring.
3. Joins every thread, once some ring has found a verdict or some limit was reached.
4. Reads the verdict of the winning ring, and for a satisfiable verdict [extends](crate::procedures::witness) the values of the ring to a model of the original formula, which is checked if configured.

A ruler supports a single solve.

```rust
# use ring_sat::{config::Config, reports::Report, ruler::Ruler};
let mut ruler = Ruler::from_config(Config::with_threads(2));
ruler.add_clause(&[1, 2]).unwrap();
ruler.add_clause(&[-1, 2]).unwrap();
ruler.add_clause(&[1, -2]).unwrap();
ruler.add_clause(&[-1, -2]).unwrap();

assert_eq!(ruler.solve(), Ok(Report::Unsatisfiable));
assert!(ruler.model().is_none());
```
*/

use std::time::Instant;

use crate::{
    misc::log::targets::{self},
    reports::Report,
    ruler::Ruler,
    types::err::{self, ErrorKind},
};

impl Ruler {
    /// Solves the formula of the ruler.
    pub fn solve(&mut self) -> Result<Report, ErrorKind> {
        if self.solved {
            return Err(err::SolveError::AlreadySolved.into());
        }
        self.solved = true;
        self.started = Instant::now();

        self.prepare();
        if self.is_inconsistent() {
            log::info!(target: targets::RULER, "Inconsistent before search");
            return Ok(Report::Unsatisfiable);
        }

        let rings = self.rings();
        log::info!(target: targets::RULER, "Solving over {} variables with {rings} rings", self.formula.get_mut().size);

        let ruler: &Ruler = self;
        std::thread::scope(|scope| -> Result<(), ErrorKind> {
            let mut handles = Vec::with_capacity(rings);
            for id in 0..rings {
                let handle = std::thread::Builder::new()
                    .name(format!("ring-{id}"))
                    .spawn_scoped(scope, move || ruler.run_ring(id))
                    .map_err(|_| err::ThreadError::Spawn)?;
                handles.push(handle);
            }
            for (id, handle) in handles.into_iter().enumerate() {
                handle.join().map_err(|_| err::ThreadError::Join(id))?;
            }
            Ok(())
        })?;

        let winner = self.winner.get_mut().clone();
        let report = match winner {
            Some(winner) if winner.report == Report::Satisfiable => {
                let values = winner.values.ok_or(err::SolveError::MissingWinner)?;
                let model = self.extend_witness(values);
                if self.config.check_witness.value {
                    self.check_witness(&model)?;
                }
                self.model = Some(model);
                Report::Satisfiable
            }
            Some(winner) => winner.report,
            None if self.is_inconsistent() => Report::Unsatisfiable,
            None => Report::Unknown,
        };

        log::info!(target: targets::RULER, "Solve ends with {report} after {:.2?}", self.elapsed());
        Ok(report)
    }
}
