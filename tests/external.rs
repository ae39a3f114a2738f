mod common;

mod external {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use ring_sat::{config::Config, reports::Report};

    use super::common::{pigeonhole, planted_3sat, ruler_over};

    type Consumed = Arc<Mutex<Vec<(Vec<i32>, u32, usize)>>>;

    #[test]
    fn consumed_clauses_are_in_the_original_space() {
        for threads in [1, 2] {
            let mut config = Config::with_threads(threads);
            config.compact_fraction.value = 0.01;
            let clauses = pigeonhole(7, 6);
            let mut ruler = ruler_over(config, &clauses);

            let consumed: Consumed = Arc::default();
            let sink = consumed.clone();
            ruler.set_consume_clause(6, move |literals, glue, ring| {
                sink.lock().unwrap().push((literals.to_vec(), glue, ring));
            });

            assert_eq!(ruler.solve(), Ok(Report::Unsatisfiable));

            let consumed = consumed.lock().unwrap();
            assert!(!consumed.is_empty());
            assert_eq!(ruler.statistics().external_exported, consumed.len() as u64);
            for (literals, glue, ring) in consumed.iter() {
                assert!(!literals.is_empty() && literals.len() <= 6);
                assert!(literals.iter().all(|literal| *literal != 0 && literal.abs() <= 42));
                assert!(1 <= *glue && (*glue as usize) < literals.len().max(2));
                assert!(*ring < threads);
            }
        }
    }

    #[test]
    fn produced_clauses_are_validated() {
        let clauses = vec![vec![1, 2], vec![-1, 2], vec![3, 4, 5]];
        let mut ruler = ruler_over(Config::default(), &clauses);

        let mut produced = VecDeque::from(vec![
            vec![0, 1],
            vec![6, 1],
            vec![1, -1, 3],
            vec![-3, -4],
            vec![4, 4, -5],
        ]);
        ruler.set_produce_clause(move |buffer| {
            let clause = produced.pop_front()?;
            buffer.extend_from_slice(&clause);
            Some(1)
        });

        assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
        let statistics = ruler.statistics();
        assert_eq!(statistics.external_discarded, 3);
        assert_eq!(statistics.external_imported, 2);

        assert_eq!(ruler.value_of(2), Some(true));
        assert!(ruler.value_of(3) == Some(false) || ruler.value_of(4) == Some(false));
        assert!(ruler.value_of(4) == Some(true) || ruler.value_of(5) == Some(false));
    }

    #[test]
    fn produced_units_may_refute() {
        let clauses = vec![vec![1, 2], vec![-1, 2], vec![2, 3, 4]];
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = ruler_over(config, &clauses);

        let mut offered = false;
        ruler.set_produce_clause(move |buffer| match offered {
            true => None,
            false => {
                offered = true;
                buffer.push(-2);
                Some(1)
            }
        });

        assert_eq!(ruler.solve(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn sharing_with_a_second_portfolio() {
        // Clauses learnt by one solve are offered to another solve of the same formula.
        let clauses = planted_3sat(100, 420, 7);

        let mut first = ruler_over(Config::with_threads(2), &clauses);
        let consumed: Consumed = Arc::default();
        let sink = consumed.clone();
        first.set_consume_clause(16, move |literals, glue, ring| {
            sink.lock().unwrap().push((literals.to_vec(), glue, ring));
        });
        assert_eq!(first.solve(), Ok(Report::Satisfiable));

        let mut offers = consumed
            .lock()
            .unwrap()
            .iter()
            .map(|(literals, glue, _)| (literals.clone(), *glue))
            .collect::<VecDeque<_>>();
        let offered = offers.len() as u64;

        let mut second = ruler_over(Config::with_threads(2), &clauses);
        second.set_produce_clause(move |buffer| {
            let (literals, glue) = offers.pop_front()?;
            buffer.extend_from_slice(&literals);
            Some(glue)
        });
        assert_eq!(second.solve(), Ok(Report::Satisfiable));

        let statistics = second.statistics();
        assert!(statistics.external_imported + statistics.external_discarded <= offered);
    }
}
