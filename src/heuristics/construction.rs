use crate::error::{Result, VrpError};
use crate::instance::VrpInstance;
use crate::solution::{Route, Solution};
use std::collections::BTreeSet;

pub trait ConstructionHeuristic {
    fn construct(&self, instance: &VrpInstance, customers: &[usize], vehicles: usize) -> Result<Solution>;
    fn name(&self) -> &str;
}

/// Round-robin Nearest Neighbor Heuristic
///
/// Vehicles take turns in a fixed order. On its turn a vehicle extends its
/// route with the unassigned customer nearest to where it currently stands.
/// Equidistant candidates resolve to the lowest customer index.
pub struct NearestNeighborHeuristic;

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic
    }

    fn find_nearest(&self, instance: &VrpInstance, current: usize, unassigned: &BTreeSet<usize>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        // Ascending iteration plus a strict comparison keeps the lowest index on ties.
        for &c in unassigned {
            let d = instance.distance(current, c);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((c, d)),
            }
        }

        best.map(|(c, _)| c)
    }
}

impl Default for NearestNeighborHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, instance: &VrpInstance, customers: &[usize], vehicles: usize) -> Result<Solution> {
        instance.check_customers(customers)?;
        if vehicles == 0 {
            return Err(VrpError::invalid_instance("at least one vehicle is required"));
        }

        let start = std::time::Instant::now();
        let mut routes: Vec<Route> = vec![Vec::new(); vehicles];
        let mut unassigned: BTreeSet<usize> = customers.iter().copied().collect();
        let mut rounds = 0;

        'rounds: while !unassigned.is_empty() {
            rounds += 1;
            for route in routes.iter_mut() {
                let current = route.last().copied().unwrap_or(instance.depot);
                let Some(next) = self.find_nearest(instance, current, &unassigned) else {
                    break 'rounds;
                };
                route.push(next);
                unassigned.remove(&next);
            }
        }

        let mut solution = Solution::from_routes(instance, routes, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution.iterations = Some(rounds);

        log::info!(
            "[Greedy] {} customers over {} vehicles, cost {:.4}",
            customers.len(),
            vehicles,
            solution.cost
        );

        Ok(solution)
    }

    fn name(&self) -> &str {
        "Greedy"
    }
}

/// Greedy solver entry point.
pub fn solve_greedy(customers: &[usize], vehicles: usize, instance: &VrpInstance) -> Result<Solution> {
    NearestNeighborHeuristic::new().construct(instance, customers, vehicles)
}
