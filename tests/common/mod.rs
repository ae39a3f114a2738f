//! Formulas shared by the integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use ring_sat::{config::Config, generic::random::MinimalPCG32, reports::Report, ruler::Ruler};

/// The pigeonhole formula of `pigeons` pigeons and `holes` holes, unsatisfiable whenever there are more pigeons than holes.
pub fn pigeonhole(pigeons: i32, holes: i32) -> Vec<Vec<i32>> {
    let var = |pigeon: i32, hole: i32| pigeon * holes + hole + 1;
    let mut clauses = Vec::default();
    for pigeon in 0..pigeons {
        clauses.push((0..holes).map(|hole| var(pigeon, hole)).collect());
    }
    for hole in 0..holes {
        for a in 0..pigeons {
            for b in a + 1..pigeons {
                clauses.push(vec![-var(a, hole), -var(b, hole)]);
            }
        }
    }
    clauses
}

/// A random 3-CNF formula over `variables` variables, satisfied by some hidden valuation.
pub fn planted_3sat(variables: i32, clauses: usize, seed: u64) -> Vec<Vec<i32>> {
    let mut rng = MinimalPCG32::seed_from_u64(seed);
    let hidden = (0..variables).map(|_| rng.random_bool(0.5)).collect::<Vec<_>>();

    let mut formula = Vec::with_capacity(clauses);
    while formula.len() < clauses {
        let mut clause: Vec<i32> = Vec::with_capacity(3);
        while clause.len() < 3 {
            let variable = rng.random_range(1..=variables);
            if clause.iter().any(|literal| literal.abs() == variable) {
                continue;
            }
            clause.push(match rng.random_bool(0.5) {
                true => variable,
                false => -variable,
            });
        }

        let satisfied = |literal: &i32| hidden[literal.unsigned_abs() as usize - 1] == (*literal > 0);
        if !clause.iter().any(satisfied) {
            let flip = rng.random_range(0..3);
            clause[flip] = -clause[flip];
        }
        formula.push(clause);
    }
    formula
}

/// A ruler over `clauses`.
pub fn ruler_over(config: Config, clauses: &[Vec<i32>]) -> Ruler {
    let mut ruler = Ruler::from_config(config);
    for clause in clauses {
        assert!(ruler.add_clause(clause).is_ok());
    }
    ruler
}

/// Whether `model` satisfies every clause of `clauses`.
pub fn satisfies(model: &[i32], clauses: &[Vec<i32>]) -> bool {
    clauses.iter().all(|clause| {
        clause
            .iter()
            .any(|literal| model[literal.unsigned_abs() as usize - 1] == *literal)
    })
}

/// Solves `clauses` with `config`, checking any model found.
pub fn solve(config: Config, clauses: &[Vec<i32>]) -> Report {
    let mut ruler = ruler_over(config, clauses);
    let report = match ruler.solve() {
        Ok(report) => report,
        Err(e) => panic!("{e:?}"),
    };
    if report == Report::Satisfiable {
        let model = ruler.model().expect("a model of a satisfiable formula");
        assert!(satisfies(&model, clauses));
    }
    report
}
