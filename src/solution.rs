//! Solution representation for the VRP.
//!
//! A solution holds exactly one route per vehicle. Routes list customer
//! indices only; the depot at both ends is implicit.

use crate::fitness;
use crate::instance::VrpInstance;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered customer indices served by one vehicle
pub type Route = Vec<usize>;

/// Represents a solution to the VRP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// One route per vehicle, possibly empty
    pub routes: Vec<Route>,
    /// Total travel distance
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a solution from routes, scoring it with the shared evaluator
    pub fn from_routes(instance: &VrpInstance, routes: Vec<Route>, algorithm: &str) -> Self {
        let cost = fitness::evaluate(&routes, instance);

        Solution {
            routes,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Recompute the cost after the routes were edited in place
    pub fn validate(&mut self, instance: &VrpInstance) {
        self.cost = fitness::evaluate(&self.routes, instance);
    }

    /// Check that every customer in `customers` is served exactly once and
    /// nothing else is served.
    pub fn covers(&self, customers: &[usize]) -> bool {
        let expected: HashSet<usize> = customers.iter().copied().collect();
        let mut seen = HashSet::with_capacity(expected.len());

        for &c in self.routes.iter().flatten() {
            if !expected.contains(&c) || !seen.insert(c) {
                return false;
            }
        }

        seen.len() == expected.len()
    }

    /// All customers in route order, routes concatenated
    pub fn flatten(&self) -> Vec<usize> {
        self.routes.iter().flatten().copied().collect()
    }

    /// Length of each route
    pub fn route_lengths(&self) -> Vec<usize> {
        self.routes.iter().map(Vec::len).collect()
    }

    /// Number of vehicles that leave the depot
    pub fn num_vehicles_used(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Number of customers served
    pub fn num_customers(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Cost of each route, in vehicle order
    pub fn route_costs(&self, instance: &VrpInstance) -> Vec<f64> {
        self.routes.iter().map(|r| fitness::route_cost(r, instance)).collect()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.4}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Routes: {:?}", self.routes)
    }
}

/// Cut `sequence` at the given sorted positions into `cuts.len() + 1` routes.
pub fn split_at_cuts(sequence: &[usize], cuts: &[usize]) -> Vec<Route> {
    let mut routes = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        routes.push(sequence[start..cut].to_vec());
        start = cut;
    }
    routes.push(sequence[start..].to_vec());
    routes
}

/// Re-split a flat sequence into routes of the given lengths.
pub fn split_by_lengths(sequence: &[usize], lengths: &[usize]) -> Vec<Route> {
    let mut routes = Vec::with_capacity(lengths.len());
    let mut idx = 0;
    for &len in lengths {
        routes.push(sequence[idx..idx + len].to_vec());
        idx += len;
    }
    routes
}
