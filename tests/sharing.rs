mod common;

mod sharing {
    use ring_sat::{
        config::{Config, ExportPolicy},
        reports::Report,
        ring::Ring,
        structures::{clause::ClauseRef, literal::Literal},
    };

    use super::common::{pigeonhole, planted_3sat, ruler_over, solve};

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    fn two_rings() -> Config {
        let mut config = Config::with_threads(2);
        config.simplify.value = false;
        config.export_policy.value = ExportPolicy::All;
        config
    }

    #[test]
    fn injected_binary_is_installed() {
        let mut ruler = ruler_over(two_rings(), &[vec![1, 2, 3], vec![-1, -2, -3]]);
        ruler.prepare();

        let mut exporter = Ring::new(&ruler, 0);
        let mut importer = Ring::new(&ruler, 1);

        exporter.export_clause(&ruler, &ClauseRef::binary(lit(-1), lit(2), true));
        assert_eq!(exporter.statistics.exported.binary, 1);

        assert!(!importer.import_shared(&ruler));
        assert_eq!(importer.statistics.imported.binary, 1);
        assert!(importer.watches.contains_binary(lit(-1), lit(2)));

        // Nothing more to take.
        assert!(!importer.import_shared(&ruler));
        assert_eq!(importer.statistics.imported.binary, 1);
    }

    #[test]
    fn injected_binary_may_be_subsumed() {
        let mut ruler = ruler_over(two_rings(), &[vec![1, 2, 3], vec![-1, -2, -3]]);
        ruler.prepare();

        let mut exporter = Ring::new(&ruler, 0);
        let mut importer = Ring::new(&ruler, 1);
        importer.watches.watch_binary(lit(2), lit(-1));

        exporter.export_clause(&ruler, &ClauseRef::binary(lit(-1), lit(2), true));
        assert!(!importer.import_shared(&ruler));
        assert_eq!(importer.statistics.imported.binary, 0);
        assert_eq!(importer.statistics.subsumed.binary, 1);
    }

    #[test]
    fn nothing_is_exported_without_peers_or_sharing() {
        let mut config = two_rings();
        config.share_learned.value = false;
        let mut ruler = ruler_over(config, &[vec![1, 2, 3]]);
        ruler.prepare();

        let mut ring = Ring::new(&ruler, 0);
        ring.export_clause(&ruler, &ClauseRef::binary(lit(-1), lit(2), true));
        assert_eq!(ring.statistics.exported.binary, 0);
    }

    #[test]
    fn verdicts_do_not_depend_on_the_winner() {
        for threads in [2, 3, 4] {
            let config = Config::with_threads(threads);

            let mut ruler = ruler_over(config.clone(), &pigeonhole(7, 6));
            assert_eq!(ruler.solve(), Ok(Report::Unsatisfiable));
            assert!(ruler.winner().is_some_and(|winner| winner < threads));

            assert_eq!(solve(config, &planted_3sat(120, 500, threads as u64)), Report::Satisfiable);
        }
    }

    #[test]
    fn every_export_policy() {
        for policy in [ExportPolicy::Single, ExportPolicy::Logarithmic, ExportPolicy::All] {
            for share_by_size in [false, true] {
                let mut config = Config::with_threads(3);
                config.export_policy.value = policy;
                config.share_by_size.value = share_by_size;
                config.limit_import_rate.value = share_by_size;

                assert_eq!(solve(config.clone(), &pigeonhole(6, 5)), Report::Unsatisfiable);
                assert_eq!(solve(config, &planted_3sat(80, 340, 5)), Report::Satisfiable);
            }
        }
    }

    #[test]
    fn seeds_vary_the_portfolio() {
        for seed in 0..4 {
            let mut config = Config::with_threads(2);
            config.seed.value = seed;
            assert_eq!(solve(config, &pigeonhole(6, 5)), Report::Unsatisfiable);
        }
    }
}
