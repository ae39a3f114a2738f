mod common;

mod basic {
    use ring_sat::{config::Config, reports::Report, ruler::Ruler};

    use super::common::{pigeonhole, planted_3sat, ruler_over, solve};

    #[test]
    fn one_literal() {
        let mut ruler = Ruler::from_config(Config::default());
        assert!(ruler.add_clause(&[1]).is_ok());
        assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
        assert_eq!(ruler.value_of(1), Some(true));
    }

    #[test]
    fn conflict() {
        let clauses = vec![vec![1, 2], vec![-1, -2], vec![1, -2], vec![-1, 2]];
        assert_eq!(solve(Config::default(), &clauses), Report::Unsatisfiable);
    }

    #[test]
    fn resolved_both_ways() {
        let clauses = vec![vec![1, 2], vec![-1, 2], vec![-2]];
        assert_eq!(solve(Config::default(), &clauses), Report::Unsatisfiable);

        let mut config = Config::default();
        config.simplify.value = false;
        assert_eq!(solve(config, &clauses), Report::Unsatisfiable);
    }

    #[test]
    fn propagation_alone() {
        for simplify in [true, false] {
            let mut config = Config::default();
            config.simplify.value = simplify;
            let mut ruler = ruler_over(config, &[vec![1], vec![-1, 2]]);

            assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
            assert_eq!(ruler.value_of(1), Some(true));
            assert_eq!(ruler.value_of(2), Some(true));
            assert_eq!(ruler.statistics().decisions, 0);
        }
    }

    #[test]
    fn unused_variables_are_valued() {
        let mut ruler = Ruler::from_config(Config::default());
        ruler.ensure_variables(5);
        assert!(ruler.add_clause(&[-2, 3]).is_ok());
        assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
        assert_eq!(ruler.model().map(|model| model.len()), Some(5));
        assert!(ruler.value_of(5).is_some());
        assert!(ruler.value_of(6).is_none());
    }

    #[test]
    fn pigeonholes() {
        for holes in 2..6 {
            let clauses = pigeonhole(holes + 1, holes);
            assert_eq!(solve(Config::default(), &clauses), Report::Unsatisfiable);

            let clauses = pigeonhole(holes, holes);
            assert_eq!(solve(Config::default(), &clauses), Report::Satisfiable);
        }
    }

    #[test]
    fn planted_formulas() {
        for seed in 0..8 {
            let clauses = planted_3sat(80, 340, seed);
            assert_eq!(solve(Config::default(), &clauses), Report::Satisfiable);
        }
    }

    #[test]
    fn without_inprocessing() {
        let mut config = Config::default();
        config.probe.value = false;
        config.simplify.value = false;
        config.minimize.value = false;
        config.shrink.value = false;

        assert_eq!(solve(config.clone(), &pigeonhole(6, 5)), Report::Unsatisfiable);
        assert_eq!(solve(config, &planted_3sat(60, 250, 3)), Report::Satisfiable);
    }

    #[test]
    fn frequent_inprocessing() {
        let mut config = Config::default();
        config.probe_interval.value = 1;
        config.reduce_interval.value = 10;
        config.rephase_interval.value = 10;
        config.mode_interval.value = 20;
        config.simplify_interval.value = 50;
        config.check_witness.value = true;

        assert_eq!(solve(config.clone(), &pigeonhole(7, 6)), Report::Unsatisfiable);
        assert_eq!(solve(config, &planted_3sat(100, 420, 11)), Report::Satisfiable);
    }

    #[test]
    fn a_time_limit_gives_unknown() {
        let mut config = Config::default();
        config.time_limit.value = std::time::Duration::from_nanos(1);
        config.simplify.value = false;
        assert_eq!(solve(config, &pigeonhole(10, 9)), Report::Unknown);
    }
}
