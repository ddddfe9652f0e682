//! Benchmarking and experimentation module for the VRP solvers.
//!
//! Runs every algorithm on a series of seeded random instances, collects
//! per-run results and aggregates them per algorithm. The brute force
//! optimum, when available, is the reference for the optimality gap.

use crate::error::Result;
use crate::exact::ExactConfig;
use crate::heuristics::GAConfig;
use crate::solver::{generate_instance, solve_all, Algorithm, SolverConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::io;

/// Result of running a single algorithm on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Run index, also the offset added to the base seed
    pub run: usize,
    pub customers: usize,
    pub vehicles: usize,
    /// Total distance
    pub cost: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Percentage above the brute force optimum of the same run
    pub gap_to_optimum: Option<f64>,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    /// Number of successful runs
    pub num_runs: usize,
    pub avg_cost: f64,
    pub best_cost: f64,
    pub worst_cost: f64,
    /// Sample standard deviation of cost
    pub std_cost: f64,
    pub avg_time: f64,
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of random instances
    pub runs: usize,
    /// Customers per instance
    pub customers: usize,
    pub vehicles: usize,
    /// Base seed; run `r` uses `seed + r`
    pub seed: u64,
    pub exact: ExactConfig,
    pub genetic: GAConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            runs: 10,
            customers: 6,
            vehicles: 2,
            seed: 42,
            exact: ExactConfig::default(),
            genetic: GAConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Solve every run with all three algorithms.
    ///
    /// Failed solvers are skipped; they are already reported by the facade.
    pub fn run(&mut self, show_progress: bool) {
        let progress = if show_progress {
            let bar = ProgressBar::new(self.config.runs as u64);
            bar.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        log::info!(
            "Benchmark: {} runs, {} customers, {} vehicles",
            self.config.runs,
            self.config.customers,
            self.config.vehicles
        );

        for run in 0..self.config.runs {
            let seed = self.config.seed.wrapping_add(run as u64);
            let instance = generate_instance(self.config.customers, &mut ChaCha8Rng::seed_from_u64(seed));
            let solver_config = SolverConfig {
                exact: self.config.exact.clone(),
                genetic: self.config.genetic.clone(),
                seed,
            };

            let outcomes = solve_all(&instance, self.config.vehicles, &solver_config);
            let optimum = outcomes
                .iter()
                .flatten()
                .find(|r| r.algorithm == Algorithm::BruteForce)
                .map(|r| r.total_distance);

            for result in outcomes.into_iter().flatten() {
                let gap_to_optimum = optimum
                    .filter(|&opt| opt > 0.0)
                    .map(|opt| (result.total_distance - opt) / opt * 100.0);

                self.results.push(AlgorithmResult {
                    algorithm: result.algorithm.label().to_string(),
                    run,
                    customers: self.config.customers,
                    vehicles: self.config.vehicles,
                    cost: result.total_distance,
                    time: result.computation_time,
                    gap_to_optimum,
                });
            }

            progress.set_message(format!("seed {}", seed));
            progress.inc(1);
        }

        progress.finish_with_message("done");
    }

    /// Compute statistics for each algorithm, in reporting order
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        Algorithm::ALL
            .iter()
            .filter_map(|algorithm| {
                let label = algorithm.label();
                let results: Vec<&AlgorithmResult> = self.results.iter().filter(|r| r.algorithm == label).collect();
                if results.is_empty() {
                    return None;
                }

                let costs: Vec<f64> = results.iter().map(|r| r.cost).collect();
                let times: Vec<f64> = results.iter().map(|r| r.time).collect();
                let gaps: Vec<f64> = results.iter().filter_map(|r| r.gap_to_optimum).collect();

                let std_cost = if costs.len() > 1 { costs.iter().std_dev() } else { 0.0 };

                Some(AlgorithmStatistics {
                    algorithm: label.to_string(),
                    num_runs: results.len(),
                    avg_cost: costs.iter().mean(),
                    best_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
                    worst_cost: costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                    std_cost,
                    avg_time: times.iter().mean(),
                    avg_gap: if gaps.is_empty() { None } else { Some(gaps.iter().mean()) },
                })
            })
            .collect()
    }

    /// Write one CSV row per result
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        for result in &self.results {
            writer.serialize(result).map_err(io::Error::from)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("         VRP Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!("Generated: {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
        report.push_str(&format!(
            "Runs: {}  Customers: {}  Vehicles: {}  Base seed: {}\n\n",
            self.config.runs, self.config.customers, self.config.vehicles, self.config.seed
        ));

        report.push_str("-".repeat(80).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<15} {:>6} {:>12} {:>12} {:>10} {:>10} {:>10}\n",
            "Algorithm", "Runs", "Avg Cost", "Best Cost", "Std", "Avg Gap%", "Avg Time"
        ));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            let gap_str = stat
                .avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!(
                "{:<15} {:>6} {:>12.4} {:>12.4} {:>10.4} {:>10} {:>10.4}\n",
                stat.algorithm, stat.num_runs, stat.avg_cost, stat.best_cost, stat.std_cost, gap_str, stat.avg_time
            ));
        }

        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}
