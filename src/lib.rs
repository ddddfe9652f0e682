//! VRP Solver Library
//!
//! Solvers for a small Vehicle Routing Problem: one depot, K vehicles, N
//! customers on the plane, no capacities. The objective is the total
//! Euclidean distance of all routes, each leaving from and returning to the
//! depot.
//!
//! # Features
//!
//! - Exact brute force enumeration (small instances only)
//! - Round-robin nearest neighbour construction
//! - Genetic algorithm with order-preserving crossover and swap mutation
//! - A facade that runs every algorithm, sequentially or in parallel
//! - Benchmarking and SVG visualization tools
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use vrp_solver::solver::{generate_instance, solve_all, SolverConfig};
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let instance = generate_instance(5, &mut rng);
//!
//! for result in solve_all(&instance, 2, &SolverConfig::default()) {
//!     match result {
//!         Ok(r) => println!("{}: {:.4} {:?}", r.algorithm, r.total_distance, r.routes),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod error;
pub mod instance;
pub mod fitness;
pub mod solution;
pub mod exact;
pub mod heuristics;
pub mod solver;
pub mod benchmark;
pub mod visualization;

pub use error::{Result, VrpError};
pub use exact::solve_exact;
pub use fitness::evaluate;
pub use heuristics::{solve_genetic, solve_greedy};
pub use instance::VrpInstance;
pub use solution::Solution;
pub use solver::{generate_instance, Algorithm, SolverConfig, SolverResult};
