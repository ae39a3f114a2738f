//! The witness of a satisfiable solve.
//!
//! The values of the winning ring cover the variables of its index space.
//! Every other original variable was removed by compaction, and takes the value recorded when removed, with any variable left unvalued (e.g. one without occurrence in any clause) taken as true.
//!
//! If configured, the witness is checked against every original clause, with the first clause falsified reported as an error.

use crate::{
    misc::log::targets::{self},
    ruler::Ruler,
    types::err::{self},
};

impl Ruler {
    /// The values of the winning ring, extended to every original variable.
    pub(crate) fn extend_witness(&self, mut values: Vec<i8>) -> Vec<i8> {
        values.resize(self.variables, 0);
        let fixed = self.fixed.lock();
        for (value, fixed) in values.iter_mut().zip(fixed.iter()) {
            if *value == 0 {
                *value = *fixed;
            }
        }
        for value in values.iter_mut() {
            if *value == 0 {
                *value = 1;
            }
        }
        values
    }

    /// Checks every original clause has some literal true on `model`.
    pub(crate) fn check_witness(&self, model: &[i8]) -> Result<(), err::SolveError> {
        for (index, clause) in self.original.iter().enumerate() {
            let satisfied = clause.iter().any(|literal| {
                let value = model[literal.unsigned_abs() as usize - 1];
                (*literal > 0 && value > 0) || (*literal < 0 && value < 0)
            });
            if !satisfied {
                log::error!(target: targets::RULER, "Witness falsifies clause {index}: {clause:?}");
                return Err(err::SolveError::Witness(index));
            }
        }
        log::debug!(target: targets::RULER, "Witness satisfies {} clauses", self.original.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ruler::Ruler, types::err::SolveError};

    fn checking_ruler() -> Ruler {
        let mut config = Config::default();
        config.check_witness.value = true;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, -2]).unwrap();
        ruler.add_clause(&[2, 3]).unwrap();
        ruler.add_clause(&[-3, -1, 4]).unwrap();
        ruler
    }

    #[test]
    fn fixed_values_fill_gaps() {
        let ruler = checking_ruler();
        ruler.fixed.lock()[3] = -1;
        assert_eq!(ruler.extend_witness(vec![1, 0, 0]), vec![1, 1, 1, -1]);
    }

    #[test]
    fn falsified_clauses_are_reported() {
        let ruler = checking_ruler();
        assert_eq!(ruler.check_witness(&[1, 1, -1, -1]), Ok(()));
        assert_eq!(ruler.check_witness(&[-1, 1, 1, 1]), Err(SolveError::Witness(0)));
        assert_eq!(ruler.check_witness(&[1, 1, 1, -1]), Err(SolveError::Witness(2)));
    }
}
