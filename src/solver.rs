//! Solver facade.
//!
//! Single entry point that dispatches an instance to one of the three
//! algorithms and normalises the output. Every algorithm is scored with the
//! same evaluator, so results are directly comparable.

use crate::error::Result;
use crate::exact::{solve_exact, ExactConfig};
use crate::fitness;
use crate::heuristics::{solve_genetic, solve_greedy, GAConfig};
use crate::instance::VrpInstance;
use crate::solution::{Route, Solution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Generate a random instance: `customer_count` customers plus the depot at index 0.
pub fn generate_instance<R: Rng + ?Sized>(customer_count: usize, rng: &mut R) -> VrpInstance {
    VrpInstance::random(customer_count, rng)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    BruteForce,
    Greedy,
    Genetic,
}

impl Algorithm {
    /// Every algorithm, in reporting order
    pub const ALL: [Algorithm; 3] = [Algorithm::BruteForce, Algorithm::Greedy, Algorithm::Genetic];

    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::BruteForce => "Brute Force",
            Algorithm::Greedy => "Greedy",
            Algorithm::Genetic => "Genetic",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters for every algorithm, plus the seed used by `solve_all`
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub exact: ExactConfig,
    pub genetic: GAConfig,
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            exact: ExactConfig::default(),
            genetic: GAConfig::default(),
            seed: 42,
        }
    }
}

/// Uniform output of every algorithm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverResult {
    pub algorithm: Algorithm,
    pub routes: Vec<Route>,
    pub total_distance: f64,
    /// Wall-clock seconds spent in the solver
    pub computation_time: f64,
}

impl SolverResult {
    /// Rebuild a full solution record, e.g. for rendering
    pub fn to_solution(&self, instance: &VrpInstance) -> Solution {
        let mut solution = Solution::from_routes(instance, self.routes.clone(), self.algorithm.label());
        solution.computation_time = self.computation_time;
        solution
    }
}

/// Run one algorithm over every customer of `instance`.
///
/// Only the genetic algorithm draws from `rng`.
pub fn solve<R: Rng + ?Sized>(
    instance: &VrpInstance,
    algorithm: Algorithm,
    vehicles: usize,
    config: &SolverConfig,
    rng: &mut R,
) -> Result<SolverResult> {
    let customers = instance.customers();
    let start = std::time::Instant::now();

    log::info!(
        "Solving {} ({} customers, {} vehicles) with {}",
        instance.name,
        customers.len(),
        vehicles,
        algorithm
    );

    let solution = match algorithm {
        Algorithm::BruteForce => solve_exact(&customers, vehicles, instance, &config.exact)?,
        Algorithm::Greedy => solve_greedy(&customers, vehicles, instance)?,
        Algorithm::Genetic => solve_genetic(customers.len(), vehicles, instance, &config.genetic, rng)?,
    };

    let total_distance = fitness::evaluate(&solution.routes, instance);
    let computation_time = start.elapsed().as_secs_f64();

    log::info!(
        "{} finished: distance {:.4} in {:.4}s",
        algorithm,
        total_distance,
        computation_time
    );

    Ok(SolverResult {
        algorithm,
        routes: solution.routes,
        total_distance,
        computation_time,
    })
}

fn solve_seeded(instance: &VrpInstance, algorithm: Algorithm, vehicles: usize, config: &SolverConfig) -> Result<SolverResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let result = solve(instance, algorithm, vehicles, config, &mut rng);
    if let Err(ref e) = result {
        log::warn!("{} failed: {}", algorithm, e);
    }
    result
}

/// Run the three algorithms one after another.
///
/// Results come back in [`Algorithm::ALL`] order. Each algorithm gets its
/// own generator seeded from `config.seed`.
pub fn solve_all(instance: &VrpInstance, vehicles: usize, config: &SolverConfig) -> Vec<Result<SolverResult>> {
    Algorithm::ALL
        .iter()
        .map(|&algorithm| solve_seeded(instance, algorithm, vehicles, config))
        .collect()
}

/// Same as [`solve_all`], with each algorithm on its own rayon worker.
pub fn solve_all_parallel(instance: &VrpInstance, vehicles: usize, config: &SolverConfig) -> Vec<Result<SolverResult>> {
    Algorithm::ALL[..]
        .par_iter()
        .map(|&algorithm| solve_seeded(instance, algorithm, vehicles, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VrpError;
    use proptest::prelude::*;

    fn create_test_instance(customers: usize, seed: u64) -> VrpInstance {
        generate_instance(customers, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_generate_instance() {
        let instance = create_test_instance(5, 0);
        assert_eq!(instance.dimension(), 6);
        assert_eq!(instance.depot, 0);
    }

    #[test]
    fn test_solve_all_order_and_coverage() {
        let instance = create_test_instance(6, 4);
        let results = solve_all(&instance, 2, &SolverConfig::default());

        assert_eq!(results.len(), 3);
        for (result, expected) in results.iter().zip(Algorithm::ALL) {
            let result = result.as_ref().unwrap();
            assert_eq!(result.algorithm, expected);
            assert_eq!(result.routes.len(), 2);
            assert_eq!(result.total_distance, fitness::evaluate(&result.routes, &instance));

            let solution = result.to_solution(&instance);
            assert!(solution.covers(&instance.customers()));
        }
    }

    #[test]
    fn test_exact_is_a_lower_bound() {
        for seed in 0..4 {
            let instance = create_test_instance(6, seed);
            let results: Vec<SolverResult> = solve_all(&instance, 2, &SolverConfig::default())
                .into_iter()
                .map(|r| r.unwrap())
                .collect();

            let optimum = results[0].total_distance;
            assert!(results[1].total_distance >= optimum - 1e-9);
            assert!(results[2].total_distance >= optimum - 1e-9);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let instance = create_test_instance(7, 9);
        let config = SolverConfig { seed: 123, ..Default::default() };

        let sequential = solve_all(&instance, 3, &config);
        let parallel = solve_all_parallel(&instance, 3, &config);

        for (a, b) in sequential.iter().zip(parallel.iter()) {
            let (a, b) = (a.as_ref().unwrap(), b.as_ref().unwrap());
            assert_eq!(a.algorithm, b.algorithm);
            assert_eq!(a.routes, b.routes);
            assert_eq!(a.total_distance, b.total_distance);
        }
    }

    #[test]
    fn test_failure_does_not_hide_other_results() {
        let instance = create_test_instance(12, 1);
        let results = solve_all(&instance, 2, &SolverConfig::default());

        assert!(matches!(results[0], Err(VrpError::ComputationAborted { customers: 12, limit: 10 })));
        assert!(results[1].is_ok());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_more_vehicles_than_customers() {
        let instance = create_test_instance(3, 2);
        let results = solve_all(&instance, 5, &SolverConfig::default());

        assert!(matches!(results[0], Err(VrpError::InvalidInstance(_))));
        let greedy = results[1].as_ref().unwrap();
        assert_eq!(greedy.routes.iter().filter(|r| !r.is_empty()).count(), 3);
        assert_eq!(greedy.routes.iter().filter(|r| r.is_empty()).count(), 2);
        assert!(matches!(results[2], Err(VrpError::InvalidInstance(_))));
    }

    #[test]
    fn test_no_customers() {
        let instance = create_test_instance(0, 0);
        for result in solve_all(&instance, 1, &SolverConfig::default()) {
            assert!(matches!(result, Err(VrpError::InvalidInstance(_))));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_every_solver_covers_customers(customers in 1usize..=6, vehicles in 1usize..=3, seed in any::<u64>()) {
            prop_assume!(vehicles <= customers);
            let instance = create_test_instance(customers, seed);
            let config = SolverConfig { seed, ..Default::default() };

            for result in solve_all(&instance, vehicles, &config) {
                let result = result.unwrap();
                prop_assert_eq!(result.routes.len(), vehicles);
                prop_assert!(result.to_solution(&instance).covers(&instance.customers()));
                prop_assert!(result.total_distance >= 0.0);
            }
        }
    }
}
