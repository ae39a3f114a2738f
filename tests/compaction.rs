mod common;

mod compaction {
    use ring_sat::{
        config::Config,
        db::watches::Watch,
        reports::Report,
        ring::Ring,
        structures::literal::{Literal, INVALID},
    };

    use super::common::{planted_3sat, ruler_over, satisfies};

    fn compacting() -> Config {
        let mut config = Config::default();
        config.compact_fraction.value = 0.01;
        config
    }

    /// Checks every literal the ring holds lies in its index space.
    fn check_ring(ring: &Ring) {
        let limit = 2 * ring.size as u32;
        assert_eq!(ring.watches.lists.len(), 2 * ring.size);
        assert_eq!(ring.watches.binaries.len(), 2 * ring.size);
        assert_eq!(ring.unmap.len(), ring.size);

        for others in ring.watches.binaries.iter() {
            assert!(others.iter().all(|other| other.code() < limit));
        }
        for list in &ring.watches.lists {
            for watch in list {
                match watch {
                    Watch::Binary(clause) => {
                        assert!(clause.anchor.code() < limit && clause.other.code() < limit)
                    }
                    Watch::Large { key, blocking } => {
                        assert!(blocking.code() < limit);
                        let watcher = &ring.watches.watchers[*key];
                        assert!(watcher.literals().iter().all(|literal| literal.code() < limit));
                    }
                }
            }
        }
    }

    #[test]
    fn fixed_variables_leave_the_index_space() {
        let clauses = vec![
            vec![1],
            vec![-4],
            vec![-1, 2],
            vec![2, 3, 5, 6],
            vec![-3, 4, 5, 7],
            vec![-5, -6, 7],
            vec![3, -7, 6],
        ];
        let mut ruler = ruler_over(compacting(), &clauses);
        ruler.prepare();

        let ring = Ring::new(&ruler, 0);
        check_ring(&ring);

        // Variables 1, 2, and 4 are fixed.
        assert_eq!(ring.size, 4);
        for fixed in [0_u32, 1, 3] {
            assert_eq!(ring.map[fixed as usize], INVALID);
            assert!(!ring.unmap.contains(&fixed));
        }
        for (fresh, original) in ring.unmap.iter().enumerate() {
            assert_eq!(ring.map[*original as usize], fresh as u32);
        }
        assert_eq!(ring.external(Literal::new(0, true)), -3);
    }

    #[test]
    fn models_cover_fixed_variables() {
        let mut clauses = planted_3sat(90, 360, 21);
        let model = {
            let mut ruler = ruler_over(Config::default(), &clauses);
            assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
            ruler.model().unwrap()
        };

        // Fix a third of the variables to their values in some model.
        clauses.extend(model.iter().step_by(3).map(|literal| vec![*literal]));

        let mut config = compacting();
        config.check_witness.value = true;
        let mut ruler = ruler_over(config, &clauses);
        assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
        let compacted = ruler.model().unwrap();
        assert_eq!(compacted.len(), 90);
        assert!(satisfies(&compacted, &clauses));
        for literal in model.iter().step_by(3) {
            assert_eq!(compacted[literal.unsigned_abs() as usize - 1], *literal);
        }
    }

    #[test]
    fn rounds_during_search_compact() {
        let mut config = compacting();
        config.threads.value = 2;
        config.simplify_interval.value = 1;
        config.check_witness.value = true;

        for seed in 0..4 {
            let clauses = planted_3sat(150, 620, 100 + seed);
            let mut ruler = ruler_over(config.clone(), &clauses);
            assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
            assert!(satisfies(&ruler.model().unwrap(), &clauses));
        }
    }
}
