pub mod solver;

#[cfg(test)]
mod tests {
    use rug::Integer;

    use super::solver::DlogSolver;
    use crate::error::FeError;
    use crate::util::group::Group;
    use crate::util::sampler;

    fn pow(g: &Integer, e: &Integer, p: &Integer) -> Integer {
        g.clone().pow_mod(e, p).unwrap()
    }

    #[test]
    fn test_precomputed_search_finds_answer() {
        let grp = Group::precomputed(128).unwrap();
        let y = Integer::from(777_777);
        let h = pow(&grp.g, &y, &grp.p);

        let bound = Integer::from(1u32) << 20;
        let mut solver = DlogSolver::new(&grp.p, Some(&grp.q))
            .unwrap()
            .with_bound(&bound);
        solver.precompute(10, &grp.g).unwrap();

        assert_eq!(solver.solve(&h, &grp.g).unwrap(), y);
    }

    #[test]
    fn test_iterative_search_finds_small_answer() {
        let grp = Group::precomputed(128).unwrap();
        let y = Integer::from(42);
        let h = pow(&grp.g, &y, &grp.p);

        let bound = Integer::from(1u32) << 20;
        let solver = DlogSolver::new(&grp.p, Some(&grp.q))
            .unwrap()
            .with_bound(&bound);

        assert_eq!(solver.solve(&h, &grp.g).unwrap(), y);
    }

    #[test]
    fn test_zero_exponent() {
        let grp = Group::precomputed(128).unwrap();
        let bound = Integer::from(1000);
        let solver = DlogSolver::new(&grp.p, Some(&grp.q))
            .unwrap()
            .with_bound(&bound);
        assert_eq!(solver.solve(&Integer::from(1), &grp.g).unwrap(), 0);
    }

    #[test]
    fn test_negative_answer() {
        let grp = Group::precomputed(128).unwrap();
        let y = Integer::from(-1234);
        let h = pow(&grp.g, &y, &grp.p);

        let bound = Integer::from(1u32) << 20;
        let solver = DlogSolver::new(&grp.p, Some(&grp.q))
            .unwrap()
            .with_bound(&bound)
            .with_neg();

        assert_eq!(solver.solve(&h, &grp.g).unwrap(), y);
    }

    #[test]
    fn test_two_sided_random_answers() {
        let grp = Group::precomputed(256).unwrap();
        let bound = Integer::from(1u32) << 20;
        let half: Integer = Integer::from(1u32) << 19;

        for _ in 0..3 {
            let y = sampler::sample_range(&-half.clone(), &half);
            let h = pow(&grp.g, &y, &grp.p);
            let solver = DlogSolver::new(&grp.p, Some(&grp.q))
                .unwrap()
                .with_bound(&bound)
                .with_neg();
            assert_eq!(solver.solve(&h, &grp.g).unwrap(), y);
        }
    }

    #[test]
    fn test_bound_exhausted() {
        let grp = Group::precomputed(128).unwrap();
        let y = Integer::from(5000);
        let h = pow(&grp.g, &y, &grp.p);

        let bound = Integer::from(1000);
        let solver = DlogSolver::new(&grp.p, Some(&grp.q))
            .unwrap()
            .with_bound(&bound);

        assert!(matches!(
            solver.solve(&h, &grp.g),
            Err(FeError::BoundExhausted { .. })
        ));
    }

    #[test]
    fn test_precompute_rejects_tiny_table() {
        let grp = Group::precomputed(128).unwrap();
        let mut solver = DlogSolver::new(&grp.p, Some(&grp.q)).unwrap();
        assert!(matches!(
            solver.precompute(1, &grp.g),
            Err(FeError::PrecomputeTooSmall(1))
        ));
    }

    #[test]
    fn test_oversized_bound_is_clamped() {
        let grp = Group::precomputed(128).unwrap();
        let huge = Integer::from(1u32) << 60;
        // the clamp keeps the default interval, still solvable for small y
        let solver = DlogSolver::new(&grp.p, Some(&Integer::from(1u32 << 20)))
            .unwrap()
            .with_bound(&huge);
        let y = Integer::from(17);
        let h = pow(&grp.g, &y, &grp.p);
        assert_eq!(solver.solve(&h, &grp.g).unwrap(), y);
    }
}
