//! VRP Solver - Command Line Interface

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vrp_solver::benchmark::{Benchmark, BenchmarkConfig};
use vrp_solver::exact::ExactConfig;
use vrp_solver::fitness;
use vrp_solver::heuristics::GAConfig;
use vrp_solver::instance::VrpInstance;
use vrp_solver::solver::{self, Algorithm, SolverConfig, SolverResult};
use vrp_solver::visualization::{RenderPlan, Visualizer};
use vrp_solver::Result;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "vrp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Brute force, greedy and genetic solvers for a small VRP")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug) when RUST_LOG is unset
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one random instance
    Solve {
        /// Number of customers
        #[arg(short, long, default_value = "5")]
        customers: usize,

        /// Number of vehicles
        #[arg(short = 'k', long, default_value = "2")]
        vehicles: usize,

        /// Random seed for the instance and the genetic algorithm
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "all")]
        algorithm: AlgorithmArg,

        /// Genetic algorithm population size
        #[arg(long, default_value = "20")]
        population: usize,

        /// Genetic algorithm generations
        #[arg(long, default_value = "50")]
        generations: usize,

        /// Probability that an offspring is mutated
        #[arg(long, default_value = "0.05")]
        mutation_rate: f64,

        /// Report the best individual ever seen instead of the last generation's
        #[arg(long)]
        keep_best_ever: bool,

        /// Refuse brute force above this many customers
        #[arg(long, default_value = "10")]
        max_exact_customers: usize,

        /// Run the algorithms on separate threads (with --algorithm all)
        #[arg(long)]
        parallel: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Write a side-by-side SVG of the routes
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Compare the algorithms over several random instances
    Benchmark {
        /// Number of random instances
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Customers per instance
        #[arg(short, long, default_value = "6")]
        customers: usize,

        /// Number of vehicles
        #[arg(short = 'k', long, default_value = "2")]
        vehicles: usize,

        /// Base random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Export per-run results to CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum AlgorithmArg {
    /// Every algorithm
    All,
    /// Exhaustive enumeration
    BruteForce,
    /// Round-robin nearest neighbour
    Greedy,
    /// Genetic algorithm
    Genetic,
}

impl AlgorithmArg {
    fn algorithms(self) -> Vec<Algorithm> {
        match self {
            AlgorithmArg::All => Algorithm::ALL.to_vec(),
            AlgorithmArg::BruteForce => vec![Algorithm::BruteForce],
            AlgorithmArg::Greedy => vec![Algorithm::Greedy],
            AlgorithmArg::Genetic => vec![Algorithm::Genetic],
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let ok = match cli.command {
        Commands::Solve {
            customers,
            vehicles,
            seed,
            algorithm,
            population,
            generations,
            mutation_rate,
            keep_best_ever,
            max_exact_customers,
            parallel,
            json,
            svg,
        } => {
            let config = SolverConfig {
                exact: ExactConfig {
                    max_customers: max_exact_customers,
                },
                genetic: GAConfig {
                    population_size: population,
                    generations,
                    mutation_prob: mutation_rate,
                    keep_best_ever,
                },
                seed,
            };
            solve_random(customers, vehicles, algorithm, &config, parallel, json, svg.as_deref(), cli.verbose > 0)
        }

        Commands::Benchmark {
            runs,
            customers,
            vehicles,
            seed,
            csv,
        } => {
            let config = BenchmarkConfig {
                runs,
                customers,
                vehicles,
                seed,
                ..Default::default()
            };
            run_benchmark(config, csv.as_deref())
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_random(
    customers: usize,
    vehicles: usize,
    algorithm: AlgorithmArg,
    config: &SolverConfig,
    parallel: bool,
    json: bool,
    svg: Option<&Path>,
    verbose: bool,
) -> bool {
    let instance = solver::generate_instance(customers, &mut ChaCha8Rng::seed_from_u64(config.seed));
    if verbose {
        println!("{}", instance.statistics());
    }

    let algorithms = algorithm.algorithms();
    let outcomes: Vec<Result<SolverResult>> = match algorithm {
        AlgorithmArg::All if parallel => solver::solve_all_parallel(&instance, vehicles, config),
        AlgorithmArg::All => solver::solve_all(&instance, vehicles, config),
        _ => algorithms
            .iter()
            .map(|&a| solver::solve(&instance, a, vehicles, config, &mut ChaCha8Rng::seed_from_u64(config.seed)))
            .collect(),
    };

    let mut ok = true;
    let mut results = Vec::new();
    for (algorithm, outcome) in algorithms.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("{} failed: {}", algorithm, e);
                ok = false;
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                log::error!("Cannot serialize results: {}", e);
                ok = false;
            }
        }
    } else {
        print_results(&instance, vehicles, &results);
    }

    if let Some(path) = svg {
        match write_svg(&instance, &results, path) {
            Ok(()) => println!("SVG written to {:?}", path),
            Err(e) => {
                log::error!("Cannot write SVG: {}", e);
                ok = false;
            }
        }
    }

    ok
}

fn print_results(instance: &VrpInstance, vehicles: usize, results: &[SolverResult]) {
    println!("\n========================================");
    println!("  {} customers, {} vehicles", instance.num_customers(), vehicles);
    println!("========================================");

    for result in results {
        println!(
            "\n{}: distance {:.4} ({:.4}s)",
            result.algorithm, result.total_distance, result.computation_time
        );
        for (i, route) in result.routes.iter().enumerate() {
            let stops: Vec<String> = std::iter::once(instance.depot)
                .chain(route.iter().copied())
                .chain(std::iter::once(instance.depot))
                .map(|n| n.to_string())
                .collect();
            println!(
                "  Vehicle {}: {} ({:.4})",
                i + 1,
                stops.join(" -> "),
                fitness::route_cost(route, instance)
            );
        }
    }
}

fn write_svg(instance: &VrpInstance, results: &[SolverResult], path: &Path) -> Result<()> {
    let solutions: Vec<_> = results
        .iter()
        .map(|r| (r.to_solution(instance), r.algorithm.label()))
        .collect();
    let plan = RenderPlan::new(instance, &solutions);

    let viz = Visualizer::new();
    viz.save_svg(&viz.generate_svg(&plan), path)
}

fn run_benchmark(config: BenchmarkConfig, csv: Option<&Path>) -> bool {
    let mut bench = Benchmark::new(config);
    bench.run(true);

    println!("\n{}", bench.generate_report());

    if let Some(path) = csv {
        let written: Result<()> = std::fs::File::create(path)
            .map_err(Into::into)
            .and_then(|file| bench.export_csv(file));
        match written {
            Ok(()) => println!("Results saved to {:?}", path),
            Err(e) => {
                log::error!("Cannot export CSV: {}", e);
                return false;
            }
        }
    }

    true
}
