//! Heuristic solvers for the VRP.
//!
//! Round-robin nearest neighbour construction and a genetic algorithm.

pub mod construction;
pub mod genetic;

pub use construction::*;
pub use genetic::*;
