//! Command-line front end: solves a cutting-stock instance by column
//! generation, or with the compact formulation as a baseline.
//!
//! Results go to stdout. Logs go to stderr and follow `RUST_LOG`
//! (default `info`). Any failure, including a usage error, exits with 1.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cutstock::{ColumnGeneration, Compact, Config, Instance, ScipOracle};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(author, version, about = "One-dimensional cutting stock with SCIP", long_about = None)]
struct Opt {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the LP relaxation by column generation
    Colgen {
        /// Instance file
        instance: PathBuf,
        /// Stop after this many master solves
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Reduced-cost tolerance
        #[arg(long)]
        tolerance: Option<f64>,
        /// Print the patterns used by the final master solution
        #[arg(long)]
        show_patterns: bool,
    },
    /// Solve the compact formulation
    Compact {
        /// Instance file
        instance: PathBuf,
        /// Time limit per solve, in seconds
        time_limit: Option<f64>,
        /// Also solve the integer model
        #[arg(long)]
        ip: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) => {
            let _ = err.print();
            std::process::exit(exit_code(&err));
        }
    };

    if let Err(err) = run(opt) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// Maps a command-line parse failure to the process exit code. Usage
/// errors exit with 1 rather than clap's 2.
fn exit_code(err: &clap::Error) -> i32 {
    // --help and --version are not failures
    if err.use_stderr() { 1 } else { 0 }
}

fn run(opt: Opt) -> Result<()> {
    let mut config = match &opt.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    match opt.command {
        Command::Colgen {
            instance,
            max_iterations,
            tolerance,
            show_patterns,
        } => {
            if let Some(max) = max_iterations {
                config.column_generation.max_iterations = Some(max);
            }
            if let Some(tolerance) = tolerance {
                config.column_generation.tolerance = tolerance;
            }
            config.validate()?;
            debug!(?config, "configuration");

            let instance = load_instance(&instance)?;
            let oracle = ScipOracle::new().with_verbosity(config.solver.verbosity);
            let result =
                ColumnGeneration::from(&config.column_generation).solve(&oracle, &instance)?;

            println!("ColGen LP:   {} ({}s)", result.lp_obj, result.time);
            println!("Patterns:    {}", result.n_patterns);
            println!("Iterations:  {}", result.n_iterations);
            if !result.converged() {
                println!("Stopped:     iteration limit");
            }
            if show_patterns {
                for (pattern, usage) in result.patterns.iter().zip(&result.usage) {
                    if *usage > 1e-9 {
                        println!("  {usage:>10.4} x {pattern}");
                    }
                }
            }
        }
        Command::Compact {
            instance,
            time_limit,
            ip,
        } => {
            if let Some(time_limit) = time_limit {
                config.compact.time_limit = time_limit;
            }
            config.compact.solve_ip |= ip;
            config.validate()?;
            debug!(?config, "configuration");

            let instance = load_instance(&instance)?;
            let oracle = ScipOracle::new().with_verbosity(config.solver.verbosity);
            let result = Compact::from(&config.compact).solve(&oracle, &instance)?;

            println!("Compact LP:  {} ({}s)", result.lp_obj, result.lp_time);
            println!("Vars: {}, Constrs: {}", result.n_vars, result.n_conss);
            if let Some(ip) = result.ip {
                let obj = match ip.obj {
                    Some(obj) => obj.to_string(),
                    None => "no solution".to_string(),
                };
                let limit = if ip.time_limit_reached { " [time limit]" } else { "" };
                println!("Compact IP:  {obj} ({}s){limit}", ip.time);
            }
        }
    }
    Ok(())
}

fn load_instance(path: &Path) -> Result<Instance> {
    let instance = Instance::load(path)?;
    println!(
        "Instance: {} (n={}, W={})",
        instance.name(),
        instance.n_items(),
        instance.capacity()
    );
    Ok(instance)
}
