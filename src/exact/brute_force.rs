//! Brute force enumeration of every route partition.
//!
//! Every permutation of the customers is cut at every combination of K-1
//! interior positions. The search space is N! * C(N-1, K-1), so the solver
//! refuses instances above [`ExactConfig::max_customers`].

use crate::error::{Result, VrpError};
use crate::fitness;
use crate::instance::VrpInstance;
use crate::solution::{split_at_cuts, Solution};
use itertools::Itertools;

const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Debug, Clone)]
pub struct ExactConfig {
    /// Largest customer count the enumeration is allowed to start on
    pub max_customers: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        ExactConfig { max_customers: 10 }
    }
}

pub struct BruteForceSolver {
    pub config: ExactConfig,
}

impl BruteForceSolver {
    pub fn new(config: ExactConfig) -> Self {
        BruteForceSolver { config }
    }

    fn check_input(&self, instance: &VrpInstance, customers: &[usize], vehicles: usize) -> Result<()> {
        instance.check_customers(customers)?;
        let n = customers.len();

        if vehicles == 0 {
            return Err(VrpError::invalid_instance("at least one vehicle is required"));
        }
        if vehicles > n {
            return Err(VrpError::invalid_instance(format!(
                "cannot cut {} customers into {} non-empty routes",
                n, vehicles
            )));
        }
        if n > self.config.max_customers {
            return Err(VrpError::ComputationAborted {
                customers: n,
                limit: self.config.max_customers,
            });
        }

        Ok(())
    }

    /// Cost of a permutation cut at `cuts`, without building the routes.
    fn partition_cost(instance: &VrpInstance, perm: &[usize], cuts: &[usize]) -> f64 {
        let mut cost = 0.0;
        let mut start = 0;
        for &cut in cuts {
            cost += fitness::route_cost(&perm[start..cut], instance);
            start = cut;
        }
        cost + fitness::route_cost(&perm[start..], instance)
    }

    /// Find the minimum cost partition of `customers` into `vehicles` routes.
    ///
    /// Ties keep the first partition found, in permutation-then-cut order.
    pub fn solve(&self, instance: &VrpInstance, customers: &[usize], vehicles: usize) -> Result<Solution> {
        self.check_input(instance, customers, vehicles)?;
        let start = std::time::Instant::now();
        let n = customers.len();

        log::info!(
            "[BruteForce] Enumerating {} customers over {} vehicles",
            n,
            vehicles
        );

        let mut best_cost = f64::INFINITY;
        let mut best: Option<(Vec<usize>, Vec<usize>)> = None;
        let mut evaluations = 0usize;

        for perm in customers.iter().copied().permutations(n) {
            for cuts in (1..n).combinations(vehicles - 1) {
                let cost = Self::partition_cost(instance, &perm, &cuts);
                evaluations += 1;

                if cost < best_cost {
                    best_cost = cost;
                    best = Some((perm.clone(), cuts));
                }

                if evaluations % PROGRESS_INTERVAL == 0 {
                    log::debug!(
                        "[BruteForce] {} partitions evaluated, best {:.4}, elapsed {:.2}s",
                        evaluations,
                        best_cost,
                        start.elapsed().as_secs_f64()
                    );
                }
            }
        }

        // Validation guarantees at least one permutation and one cut combination.
        let (perm, cuts) = best.ok_or_else(|| VrpError::invalid_instance("no partition could be enumerated"))?;

        let mut solution = Solution::from_routes(instance, split_at_cuts(&perm, &cuts), "BruteForce");
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = Some(evaluations);

        log::info!(
            "[BruteForce] Optimum {:.4} after {} partitions in {:.4}s",
            solution.cost,
            evaluations,
            solution.computation_time
        );

        Ok(solution)
    }
}

impl Default for BruteForceSolver {
    fn default() -> Self {
        Self::new(ExactConfig::default())
    }
}

/// Exact solver entry point.
pub fn solve_exact(
    customers: &[usize],
    vehicles: usize,
    instance: &VrpInstance,
    config: &ExactConfig,
) -> Result<Solution> {
    BruteForceSolver::new(config.clone()).solve(instance, customers, vehicles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Route;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Independent reference: insert customers one at a time into every
    /// position of every route, keeping only partitions with no empty route.
    fn reference_optimum(instance: &VrpInstance, customers: &[usize], vehicles: usize) -> f64 {
        fn recurse(instance: &VrpInstance, remaining: &[usize], routes: &mut Vec<Route>, best: &mut f64) {
            let Some((&next, rest)) = remaining.split_first() else {
                if routes.iter().all(|r| !r.is_empty()) {
                    *best = best.min(fitness::evaluate(routes, instance));
                }
                return;
            };
            for r in 0..routes.len() {
                for pos in 0..=routes[r].len() {
                    routes[r].insert(pos, next);
                    recurse(instance, rest, routes, best);
                    routes[r].remove(pos);
                }
            }
        }

        let mut routes = vec![Vec::new(); vehicles];
        let mut best = f64::INFINITY;
        recurse(instance, customers, &mut routes, &mut best);
        best
    }

    #[test]
    fn test_colinear_single_vehicle() {
        let instance = VrpInstance::from_coords("line", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]).unwrap();
        let solution = solve_exact(&[1, 2, 3], 1, &instance, &ExactConfig::default()).unwrap();

        assert_eq!(solution.routes, vec![vec![1, 2, 3]]);
        assert_eq!(solution.cost, 6.0);
        assert_eq!(solution.iterations, Some(6));
    }

    #[test]
    fn test_matches_reference_on_integer_distances() {
        // Colinear points keep every distance and partial sum an exact integer.
        let instance = VrpInstance::from_coords(
            "axis",
            &[(0.0, 0.0), (-2.0, 0.0), (1.0, 0.0), (-1.0, 0.0), (3.0, 0.0)],
        )
        .unwrap();
        let customers = instance.customers();

        let solution = solve_exact(&customers, 2, &instance, &ExactConfig::default()).unwrap();
        let reference = reference_optimum(&instance, &customers, 2);

        assert_eq!(solution.cost, reference);
        assert_eq!(solution.cost, 10.0);
        assert!(solution.covers(&customers));
    }

    #[test]
    fn test_matches_reference_on_random_instances() {
        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let instance = VrpInstance::random(5, &mut rng);
            let customers = instance.customers();

            for vehicles in 1..=3 {
                let solution = solve_exact(&customers, vehicles, &instance, &ExactConfig::default()).unwrap();
                let reference = reference_optimum(&instance, &customers, vehicles);

                assert!((solution.cost - reference).abs() < 1e-9);
                assert_eq!(solution.routes.len(), vehicles);
                assert!(solution.routes.iter().all(|r| !r.is_empty()));
                assert!(solution.covers(&customers));
            }
        }
    }

    #[test]
    fn test_one_vehicle_per_customer() {
        let instance = VrpInstance::from_coords("pair", &[(0.0, 0.0), (1.0, 0.0), (0.0, 2.0)]).unwrap();
        let solution = solve_exact(&[1, 2], 2, &instance, &ExactConfig::default()).unwrap();

        assert_eq!(solution.routes, vec![vec![1], vec![2]]);
        assert_eq!(solution.cost, 6.0);
    }

    #[test]
    fn test_rejects_invalid_counts() {
        let instance = VrpInstance::from_coords("pair", &[(0.0, 0.0), (1.0, 0.0), (0.0, 2.0)]).unwrap();
        let config = ExactConfig::default();

        assert!(matches!(solve_exact(&[1, 2], 0, &instance, &config), Err(VrpError::InvalidInstance(_))));
        assert!(matches!(solve_exact(&[1, 2], 5, &instance, &config), Err(VrpError::InvalidInstance(_))));
        assert!(matches!(solve_exact(&[], 1, &instance, &config), Err(VrpError::InvalidInstance(_))));
    }

    #[test]
    fn test_size_guard() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let instance = VrpInstance::random(12, &mut rng);
        let config = ExactConfig { max_customers: 8 };

        let err = solve_exact(&instance.customers(), 2, &instance, &config).unwrap_err();
        assert!(matches!(err, VrpError::ComputationAborted { customers: 12, limit: 8 }));
    }
}
