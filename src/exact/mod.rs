//! Exact solvers module.
//!
//! Only exhaustive enumeration is provided. It serves as a correctness
//! oracle for the heuristics on small instances.

mod brute_force;

pub use brute_force::*;
