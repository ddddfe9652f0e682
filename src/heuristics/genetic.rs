//! Genetic Algorithm for the VRP.
//!
//! This module implements a generational genetic algorithm with:
//! - Random permutation initialization split at random cut points
//! - Order-preserving crossover on the flattened customer sequence
//! - Swap mutation of one customer between two routes
//! - Full generational replacement (no elitism)

use crate::error::{Result, VrpError};
use crate::fitness;
use crate::instance::VrpInstance;
use crate::solution::{split_at_cuts, split_by_lengths, Route, Solution};
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand::seq::index;
use std::collections::HashSet;

/// Individual in the genetic algorithm population
#[derive(Debug, Clone)]
pub struct Individual {
    /// One route per vehicle
    pub routes: Vec<Route>,
    /// Total travel distance (lower is better)
    pub fitness: f64,
}

impl Individual {
    pub fn new(routes: Vec<Route>, instance: &VrpInstance) -> Self {
        let fitness = fitness::evaluate(&routes, instance);
        Individual { routes, fitness }
    }

    pub fn cost(&self) -> f64 {
        self.fitness
    }

    pub fn flatten(&self) -> Vec<usize> {
        self.routes.iter().flatten().copied().collect()
    }
}

/// Genetic Algorithm configuration
#[derive(Debug, Clone)]
pub struct GAConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations
    pub generations: usize,
    /// Probability that an offspring is mutated
    pub mutation_prob: f64,
    /// Report the best individual of any generation instead of the last one
    pub keep_best_ever: bool,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            population_size: 20,
            generations: 50,
            mutation_prob: 0.05,
            keep_best_ever: false,
        }
    }
}

impl GAConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(VrpError::InvalidConfig("population size must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(VrpError::InvalidConfig(format!(
                "mutation probability must lie in [0, 1], got {}",
                self.mutation_prob
            )));
        }
        Ok(())
    }
}

/// Order-preserving crossover with explicit cut indices.
///
/// Each child keeps its own parent's route lengths; only the segment
/// `cut1..cut2` of the other parent's flattened sequence is transplanted.
pub fn order_crossover_at(parent1: &[Route], parent2: &[Route], cut1: usize, cut2: usize) -> (Vec<Route>, Vec<Route>) {
    let flat1: Vec<usize> = parent1.iter().flatten().copied().collect();
    let flat2: Vec<usize> = parent2.iter().flatten().copied().collect();

    let child1 = transplant(&flat2[cut1..cut2], parent1, &flat1, cut1);
    let child2 = transplant(&flat1[cut1..cut2], parent2, &flat2, cut1);

    (child1, child2)
}

fn transplant(segment: &[usize], parent: &[Route], parent_flat: &[usize], at: usize) -> Vec<Route> {
    let in_segment: HashSet<usize> = segment.iter().copied().collect();
    let mut flat: Vec<usize> = parent_flat.iter().copied().filter(|c| !in_segment.contains(c)).collect();
    flat.splice(at..at, segment.iter().copied());

    let lengths: Vec<usize> = parent.iter().map(Vec::len).collect();
    split_by_lengths(&flat, &lengths)
}

/// Order-preserving crossover with two distinct random cut indices.
pub fn order_crossover<R: Rng + ?Sized>(parent1: &[Route], parent2: &[Route], rng: &mut R) -> (Vec<Route>, Vec<Route>) {
    let total: usize = parent1.iter().map(Vec::len).sum();
    if total < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let cuts = index::sample(rng, total, 2);
    let (a, b) = (cuts.index(0), cuts.index(1));
    order_crossover_at(parent1, parent2, a.min(b), a.max(b))
}

/// Swap mutation
///
/// With probability `prob`, picks two distinct routes and, if both are
/// non-empty, exchanges one random customer between them.
pub fn swap_mutation<R: Rng + ?Sized>(routes: &mut [Route], prob: f64, rng: &mut R) {
    if rng.gen::<f64>() >= prob || routes.len() < 2 {
        return;
    }

    let picks = index::sample(rng, routes.len(), 2);
    let (a, b) = (picks.index(0), picks.index(1));
    if routes[a].is_empty() || routes[b].is_empty() {
        return;
    }

    let i = rng.gen_range(0..routes[a].len());
    let j = rng.gen_range(0..routes[b].len());
    let tmp = routes[a][i];
    routes[a][i] = routes[b][j];
    routes[b][j] = tmp;
}

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm<'a, R: Rng> {
    config: GAConfig,
    instance: &'a VrpInstance,
    customers: Vec<usize>,
    vehicles: usize,
    population: Vec<Individual>,
    generation_best: Option<Individual>,
    best_ever: Option<Individual>,
    rng: R,
    generation: usize,
}

impl<'a, R: Rng> GeneticAlgorithm<'a, R> {
    /// Set up a run over the first `customer_count` customers of `instance`.
    pub fn new(
        instance: &'a VrpInstance,
        customer_count: usize,
        vehicles: usize,
        config: GAConfig,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;

        if customer_count == 0 {
            return Err(VrpError::invalid_instance("at least one customer is required"));
        }
        if customer_count > instance.num_customers() {
            return Err(VrpError::invalid_instance(format!(
                "{} customers requested but the instance only has {}",
                customer_count,
                instance.num_customers()
            )));
        }
        if vehicles == 0 {
            return Err(VrpError::invalid_instance("at least one vehicle is required"));
        }
        if vehicles > customer_count {
            return Err(VrpError::invalid_instance(format!(
                "cannot draw {} distinct cut points for {} customers",
                vehicles - 1,
                customer_count
            )));
        }

        let customers: Vec<usize> = instance.customers().into_iter().take(customer_count).collect();

        Ok(GeneticAlgorithm {
            config,
            instance,
            customers,
            vehicles,
            population: Vec::new(),
            generation_best: None,
            best_ever: None,
            rng,
            generation: 0,
        })
    }

    /// Shuffle the customers and cut the permutation at K-1 random sorted points
    fn random_individual(&mut self) -> Individual {
        let n = self.customers.len();
        let mut perm = self.customers.clone();
        perm.shuffle(&mut self.rng);

        let mut cuts: Vec<usize> = index::sample(&mut self.rng, n - 1, self.vehicles - 1)
            .into_iter()
            .map(|i| i + 1)
            .collect();
        cuts.sort_unstable();

        Individual::new(split_at_cuts(&perm, &cuts), self.instance)
    }

    /// Build the initial population
    pub fn initialize(&mut self) {
        let population: Vec<Individual> = (0..self.config.population_size)
            .map(|_| self.random_individual())
            .collect();
        self.population = population;
        self.generation = 0;
        self.best_ever = None;
        self.record_best();

        log::debug!(
            "[GA] Initialized population of {} individuals",
            self.population.len()
        );
    }

    fn record_best(&mut self) {
        let best = self.population.iter().min_by_key(|ind| OrderedFloat(ind.fitness)).cloned();

        if let Some(ref candidate) = best {
            let improved = self
                .best_ever
                .as_ref()
                .map_or(true, |current| candidate.fitness < current.fitness);
            if improved {
                self.best_ever = Some(candidate.clone());
            }
        }

        self.generation_best = best;
    }

    /// Create new generation
    pub fn evolve(&mut self) {
        let size = self.config.population_size;
        let mut new_population = Vec::with_capacity(size + 1);

        for _ in 0..size.div_ceil(2) {
            let i = self.rng.gen_range(0..self.population.len());
            let j = self.rng.gen_range(0..self.population.len());

            let (mut child1, mut child2) =
                order_crossover(&self.population[i].routes, &self.population[j].routes, &mut self.rng);
            swap_mutation(&mut child1, self.config.mutation_prob, &mut self.rng);
            swap_mutation(&mut child2, self.config.mutation_prob, &mut self.rng);

            new_population.push(Individual::new(child1, self.instance));
            new_population.push(Individual::new(child2, self.instance));
        }
        new_population.truncate(size);

        self.population = new_population;
        self.generation += 1;
        self.record_best();

        if log::log_enabled!(log::Level::Debug) {
            let mean = self.population.iter().map(|i| i.fitness).sum::<f64>() / self.population.len() as f64;
            log::debug!(
                "[GA] Gen {}  Best cost {:.4}  Mean cost {:.4}  Diversity {:.2}",
                self.generation,
                self.generation_best.as_ref().map_or(f64::NAN, Individual::cost),
                mean,
                self.population_diversity()
            );
        }
    }

    /// Run the genetic algorithm
    pub fn run(&mut self) -> Solution {
        let start = std::time::Instant::now();

        self.initialize();
        while self.generation < self.config.generations {
            self.evolve();
        }

        let mut solution = self
            .best_solution()
            .unwrap_or_else(|| Solution::from_routes(self.instance, vec![Vec::new(); self.vehicles], "Genetic"));
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = Some(self.generation);

        log::info!(
            "[GA] {} generations, cost {:.4}, elapsed {:.4}s",
            self.generation,
            solution.cost,
            solution.computation_time
        );

        solution
    }

    /// Get current best solution according to the configured reporting policy
    pub fn best_solution(&self) -> Option<Solution> {
        let best = if self.config.keep_best_ever {
            self.best_ever.as_ref()
        } else {
            self.generation_best.as_ref()
        };
        best.map(|ind| Solution::from_routes(self.instance, ind.routes.clone(), "Genetic"))
    }

    /// Current population
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Customers this run distributes
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Get current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Average share of differing positions between flattened individuals
    pub fn population_diversity(&self) -> f64 {
        let sample = self.population.len().min(20);
        if sample < 2 || self.customers.is_empty() {
            return 0.0;
        }

        let flat: Vec<Vec<usize>> = self.population[..sample].iter().map(Individual::flatten).collect();
        let mut total_diff = 0.0;
        let mut count = 0;

        for i in 0..sample {
            for j in i + 1..sample {
                let diff = flat[i].iter().zip(flat[j].iter()).filter(|(a, b)| a != b).count();
                total_diff += diff as f64 / self.customers.len() as f64;
                count += 1;
            }
        }

        total_diff / count as f64
    }
}

/// Genetic solver entry point.
pub fn solve_genetic<R: Rng + ?Sized>(
    customer_count: usize,
    vehicles: usize,
    instance: &VrpInstance,
    config: &GAConfig,
    rng: &mut R,
) -> Result<Solution> {
    let mut ga = GeneticAlgorithm::new(instance, customer_count, vehicles, config.clone(), rng)?;
    Ok(ga.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    fn create_test_instance(customers: usize, seed: u64) -> VrpInstance {
        VrpInstance::random(customers, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    fn covers(routes: &[Route], customers: &[usize]) -> bool {
        let mut flat: Vec<usize> = routes.iter().flatten().copied().collect();
        flat.sort_unstable();
        flat == customers
    }

    #[test]
    fn test_order_crossover_example() {
        let parent1 = vec![vec![1, 2], vec![3, 4, 5]];
        let parent2 = vec![vec![5, 4, 3, 2, 1]];

        let (child1, child2) = order_crossover_at(&parent1, &parent2, 1, 3);

        assert_eq!(child1, vec![vec![1, 4], vec![3, 2, 5]]);
        assert_eq!(child2, vec![vec![5, 2, 3, 4, 1]]);
    }

    #[test]
    fn test_random_crossover_keeps_structure() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let parent1 = vec![vec![3, 7], vec![], vec![1, 6, 2], vec![5, 4]];
        let parent2 = vec![vec![1, 2, 3, 4], vec![5, 6, 7], vec![], vec![]];
        let customers: Vec<usize> = (1..=7).collect();

        for _ in 0..200 {
            let (child1, child2) = order_crossover(&parent1, &parent2, &mut rng);

            assert!(covers(&child1, &customers));
            assert!(covers(&child2, &customers));
            assert_eq!(child1.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 0, 3, 2]);
            assert_eq!(child2.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 3, 0, 0]);
        }
    }

    #[test]
    fn test_crossover_single_customer() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (child1, child2) = order_crossover(&[vec![1]], &[vec![1]], &mut rng);
        assert_eq!(child1, vec![vec![1]]);
        assert_eq!(child2, vec![vec![1]]);
    }

    #[test]
    fn test_swap_mutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let original = vec![vec![1, 2], vec![3], vec![], vec![4, 5, 6]];
        let customers: Vec<usize> = (1..=6).collect();

        let mut unchanged = original.clone();
        swap_mutation(&mut unchanged, 0.0, &mut rng);
        assert_eq!(unchanged, original);

        let mut mutated_any = false;
        for _ in 0..100 {
            let mut routes = original.clone();
            swap_mutation(&mut routes, 1.0, &mut rng);
            assert!(covers(&routes, &customers));
            assert_eq!(routes.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1, 0, 3]);
            mutated_any |= routes != original;
        }
        assert!(mutated_any);

        let mut single = vec![vec![1, 2, 3]];
        swap_mutation(&mut single, 1.0, &mut rng);
        assert_eq!(single, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_every_generation_covers_customers() {
        let instance = create_test_instance(9, 1);
        let config = GAConfig {
            population_size: 15,
            generations: 30,
            mutation_prob: 0.3,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(&instance, 9, 3, config, ChaCha8Rng::seed_from_u64(2)).unwrap();
        let customers = ga.customers().to_vec();

        ga.initialize();
        for generation in 0..=30 {
            assert_eq!(ga.generation(), generation);
            assert_eq!(ga.population().len(), 15);
            for individual in ga.population() {
                assert_eq!(individual.routes.len(), 3);
                assert!(covers(&individual.routes, &customers));
                assert!(individual.fitness >= 0.0);
            }
            ga.evolve();
        }
    }

    #[test]
    fn test_genetic_algorithm() {
        let instance = create_test_instance(8, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let solution = solve_genetic(8, 2, &instance, &GAConfig::default(), &mut rng).unwrap();

        assert_eq!(solution.routes.len(), 2);
        assert!(solution.covers(&instance.customers()));
        assert_eq!(solution.iterations, Some(50));
        assert_eq!(solution.cost, fitness::evaluate(&solution.routes, &instance));
    }

    #[test]
    fn test_reproducible_with_seed() {
        let instance = create_test_instance(7, 8);
        let config = GAConfig::default();

        let a = solve_genetic(7, 3, &instance, &config, &mut ChaCha8Rng::seed_from_u64(21)).unwrap();
        let b = solve_genetic(7, 3, &instance, &config, &mut ChaCha8Rng::seed_from_u64(21)).unwrap();

        assert_eq!(a.routes, b.routes);
        assert_eq!(a.cost, b.cost);
    }

    #[test]
    fn test_best_ever_never_worse_than_last_generation() {
        let instance = create_test_instance(8, 12);
        let last = GAConfig { mutation_prob: 0.2, ..Default::default() };
        let ever = GAConfig { keep_best_ever: true, ..last.clone() };

        let a = solve_genetic(8, 3, &instance, &last, &mut ChaCha8Rng::seed_from_u64(6)).unwrap();
        let b = solve_genetic(8, 3, &instance, &ever, &mut ChaCha8Rng::seed_from_u64(6)).unwrap();

        assert!(b.cost <= a.cost);
    }

    #[test]
    fn test_odd_population_and_zero_generations() {
        let instance = create_test_instance(5, 2);
        let config = GAConfig { population_size: 7, generations: 0, ..Default::default() };
        let mut ga = GeneticAlgorithm::new(&instance, 5, 2, config, ChaCha8Rng::seed_from_u64(1)).unwrap();

        let solution = ga.run();
        assert_eq!(solution.iterations, Some(0));
        assert!(solution.covers(&instance.customers()));

        ga.evolve();
        assert_eq!(ga.population().len(), 7);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let instance = create_test_instance(4, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = GAConfig::default();

        assert!(matches!(solve_genetic(2, 5, &instance, &config, &mut rng), Err(VrpError::InvalidInstance(_))));
        assert!(matches!(solve_genetic(4, 0, &instance, &config, &mut rng), Err(VrpError::InvalidInstance(_))));
        assert!(matches!(solve_genetic(0, 1, &instance, &config, &mut rng), Err(VrpError::InvalidInstance(_))));
        assert!(matches!(solve_genetic(9, 1, &instance, &config, &mut rng), Err(VrpError::InvalidInstance(_))));

        let bad = GAConfig { mutation_prob: 1.5, ..Default::default() };
        assert!(matches!(solve_genetic(4, 2, &instance, &bad, &mut rng), Err(VrpError::InvalidConfig(_))));
        let empty = GAConfig { population_size: 0, ..Default::default() };
        assert!(matches!(solve_genetic(4, 2, &instance, &empty, &mut rng), Err(VrpError::InvalidConfig(_))));
    }
}
