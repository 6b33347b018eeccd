//! The column-generation loop.
//!
//! Solve the restricted master, hand its duals to the pricer, and append
//! the priced pattern while its reduced cost stays below `-tolerance`. The
//! master objective after the last solve is the LP relaxation bound.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ColumnGenerationConfig;
use crate::error::Error;
use crate::instance::Instance;
use crate::master::RestrictedMaster;
use crate::oracle::{Oracle, OracleModel};
use crate::pattern::Pattern;
use crate::pricer::{KnapsackPricer, Pricer};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Pricing found no pattern with reduced cost below `-tolerance`.
    Converged,
    /// The configured iteration cap was reached first.
    IterationLimit,
}

/// The outcome of a column-generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ColGenResult {
    /// Master objective after the last solve.
    pub lp_obj: f64,
    /// Wall-clock time of the whole run, in seconds.
    pub time: f64,
    /// Number of pattern columns in the master at the end.
    pub n_patterns: usize,
    /// Number of master solves, the final one included.
    pub n_iterations: usize,
    /// Every pattern in the master, in the order it was added.
    pub patterns: Vec<Pattern>,
    /// Usage of each pattern in the last master solution.
    pub usage: Vec<f64>,
    /// Master objective after each solve.
    pub history: Vec<f64>,
    /// Why the loop stopped.
    pub termination: Termination,
}

impl ColGenResult {
    /// Returns true if the loop ran until no improving pattern was left.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Settings and entry point of the column-generation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGeneration {
    tolerance: f64,
    max_iterations: Option<usize>,
}

impl Default for ColumnGeneration {
    fn default() -> Self {
        ColumnGeneration {
            tolerance: 1e-6,
            max_iterations: None,
        }
    }
}

impl From<&ColumnGenerationConfig> for ColumnGeneration {
    fn from(config: &ColumnGenerationConfig) -> Self {
        ColumnGeneration {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
        }
    }
}

impl ColumnGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reduced-cost tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Caps the number of master solves. `None` lets the loop run until it converges.
    pub fn max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builds the master for `instance` and runs the loop with a knapsack pricer.
    pub fn solve<O: Oracle>(&self, oracle: &O, instance: &Instance) -> Result<ColGenResult, Error> {
        let start = Instant::now();
        info!(
            instance = instance.name(),
            n = instance.n_items(),
            capacity = instance.capacity(),
            "starting column generation"
        );
        let master = RestrictedMaster::build(oracle, instance)?;
        let pricer = KnapsackPricer::new(oracle, instance);
        let mut result = self.run(master, pricer)?;
        result.time = start.elapsed().as_secs_f64();
        info!(
            lp_obj = result.lp_obj,
            patterns = result.n_patterns,
            iterations = result.n_iterations,
            time = result.time,
            "column generation finished"
        );
        Ok(result)
    }

    /// Runs the loop on an already built master.
    pub fn run<M, P>(
        &self,
        mut master: RestrictedMaster<M>,
        mut pricer: P,
    ) -> Result<ColGenResult, Error>
    where
        M: OracleModel,
        P: Pricer,
    {
        let start = Instant::now();
        let mut history = Vec::new();
        let mut iteration = 0;
        let (solution, termination) = loop {
            iteration += 1;
            let solution = master.solve()?;
            history.push(solution.objective);

            let priced = pricer.generate_column(&solution.duals)?;
            debug!(
                iteration,
                objective = solution.objective,
                reduced_cost = priced.reduced_cost,
                pattern = %priced.pattern,
                "priced"
            );
            if !priced.is_improving(self.tolerance) {
                break (solution, Termination::Converged);
            }
            if self.max_iterations.is_some_and(|max| iteration >= max) {
                warn!(
                    iteration,
                    reduced_cost = priced.reduced_cost,
                    "iteration limit reached before convergence"
                );
                break (solution, Termination::IterationLimit);
            }
            master.add_column(priced.pattern)?;
        };

        Ok(ColGenResult {
            lp_obj: solution.objective,
            time: start.elapsed().as_secs_f64(),
            n_patterns: solution.n_columns,
            n_iterations: iteration,
            patterns: master.into_patterns(),
            usage: solution.usage,
            history,
            termination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScipOracle;
    use crate::compact::{Compact, CompactResult};
    use crate::mock::{MockOracle, lp_solution, mip_solution};
    use crate::oracle::OracleError;
    use crate::pricer::PricingResult;
    use rand::{Rng, SeedableRng};
    use rayon::prelude::*;

    fn two_items() -> Instance {
        Instance::new("two", 10, vec![3, 4], vec![5, 4]).unwrap()
    }

    /// Replays fixed pricing outcomes and records the duals it was given.
    struct ScriptedPricer {
        results: Vec<PricingResult>,
        seen: Vec<Vec<f64>>,
    }

    impl Pricer for &mut ScriptedPricer {
        fn generate_column(&mut self, duals: &[f64]) -> Result<PricingResult, Error> {
            self.seen.push(duals.to_vec());
            Ok(self.results.remove(0))
        }
    }

    fn priced(pattern: Vec<u32>, reduced_cost: f64) -> PricingResult {
        PricingResult {
            pattern: Pattern(pattern),
            objective: 1.0 - reduced_cost,
            reduced_cost,
        }
    }

    #[test]
    fn loop_alternates_master_and_pricing() {
        let oracle = MockOracle::new().script(
            "master",
            [
                lp_solution(11.0 / 3.0, vec![5.0 / 3.0, 2.0], vec![1.0 / 3.0, 0.5]),
                lp_solution(3.5, vec![0.0, 1.5, 2.5], vec![0.25, 0.5]),
            ],
        );
        let master = RestrictedMaster::build(&oracle, &two_items()).unwrap();
        let mut pricer = ScriptedPricer {
            results: vec![priced(vec![2, 1], -1.0 / 6.0), priced(vec![2, 1], 0.0)],
            seen: Vec::new(),
        };

        let result = ColumnGeneration::new().run(master, &mut pricer).unwrap();
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.n_iterations, 2);
        assert_eq!(result.n_patterns, 3);
        assert_eq!(result.lp_obj, 3.5);
        assert_eq!(result.history, vec![11.0 / 3.0, 3.5]);
        assert_eq!(result.usage, vec![0.0, 1.5, 2.5]);
        assert_eq!(result.patterns[2], Pattern(vec![2, 1]));
        assert_eq!(pricer.seen, vec![vec![1.0 / 3.0, 0.5], vec![0.25, 0.5]]);

        // two columns before the first solve, three before the second
        let models = oracle.models("master");
        assert_eq!(models[0].solves, vec![2, 3]);
    }

    #[test]
    fn reduced_cost_within_tolerance_stops() {
        let oracle =
            MockOracle::new().script("master", [lp_solution(2.0, vec![1.0, 1.0], vec![0.5, 0.5])]);
        let master = RestrictedMaster::build(&oracle, &two_items()).unwrap();
        let mut pricer = ScriptedPricer {
            results: vec![priced(vec![1, 1], -1e-7)],
            seen: Vec::new(),
        };
        let result = ColumnGeneration::new().run(master, &mut pricer).unwrap();
        assert!(result.converged());
        assert_eq!(result.n_iterations, 1);
        assert_eq!(result.n_patterns, 2);
    }

    #[test]
    fn iteration_limit_stops_early() {
        let oracle = MockOracle::new().script(
            "master",
            [
                lp_solution(4.0, vec![2.0, 2.0], vec![0.5, 0.5]),
                lp_solution(3.8, vec![1.0, 1.0, 1.0], vec![0.4, 0.5]),
            ],
        );
        let master = RestrictedMaster::build(&oracle, &two_items()).unwrap();
        let mut pricer = ScriptedPricer {
            results: vec![priced(vec![2, 1], -0.5), priced(vec![1, 1], -0.1)],
            seen: Vec::new(),
        };
        let result = ColumnGeneration::new()
            .max_iterations(Some(2))
            .run(master, &mut pricer)
            .unwrap();
        assert_eq!(result.termination, Termination::IterationLimit);
        assert_eq!(result.n_iterations, 2);
        assert_eq!(result.n_patterns, 3);
        assert_eq!(result.lp_obj, 3.8);
    }

    #[test]
    fn oracle_failure_is_fatal() {
        // the master is solved once; pricing has nothing scripted
        let oracle =
            MockOracle::new().script("master", [lp_solution(2.0, vec![1.0, 1.0], vec![0.5, 0.5])]);
        let err = ColumnGeneration::new()
            .solve(&oracle, &two_items())
            .unwrap_err();
        assert!(matches!(err, Error::Oracle(OracleError::Scip(_))));
    }

    #[test]
    fn solve_with_mock_knapsack() {
        let oracle = MockOracle::new()
            .script(
                "master",
                [
                    lp_solution(11.0 / 3.0, vec![5.0 / 3.0, 2.0], vec![1.0 / 3.0, 0.5]),
                    lp_solution(3.5, vec![0.0, 1.5, 2.5], vec![0.25, 0.5]),
                ],
            )
            .script(
                "pricing",
                [
                    mip_solution(7.0 / 6.0, vec![2.0, 1.0]),
                    mip_solution(1.0, vec![2.0, 1.0]),
                ],
            );
        let result = ColumnGeneration::new().solve(&oracle, &two_items()).unwrap();
        assert!(result.converged());
        assert_eq!(result.n_iterations, 2);
        assert_eq!(result.n_patterns, 3);
        assert_eq!(oracle.models("pricing").len(), 2);
    }

    #[test]
    fn item_that_does_not_fit_is_reported_before_solving() {
        let inst = Instance::new("bad", 10, vec![11], vec![1]).unwrap();
        let oracle = MockOracle::new();
        let err = ColumnGeneration::new().solve(&oracle, &inst).unwrap_err();
        assert!(matches!(err, Error::ItemDoesNotFit { item: 0, .. }));
        assert!(oracle.models("master").is_empty());
    }

    #[test]
    fn single_item_converges_immediately() {
        let inst = Instance::new("single", 100, vec![30], vec![10]).unwrap();
        let result = ColumnGeneration::new()
            .solve(&ScipOracle::new(), &inst)
            .unwrap();
        assert!(result.converged());
        assert!((result.lp_obj - 10.0 / 3.0).abs() < 1e-6);
        assert_eq!(result.n_iterations, 1);
        assert_eq!(result.n_patterns, 1);
        assert_eq!(result.patterns, vec![Pattern(vec![3])]);
    }

    #[test]
    fn discovers_mixed_pattern() {
        let inst = two_items();
        let result = ColumnGeneration::new()
            .solve(&ScipOracle::new(), &inst)
            .unwrap();
        assert!(result.converged());
        assert!(result.n_iterations >= 2);
        assert!(result.patterns.contains(&Pattern(vec![2, 1])));
        // 2.5 bars of [2, 1] and 0.75 of [0, 2]
        assert!((result.lp_obj - 3.25).abs() < 1e-6);
        assert!(result.lp_obj < result.history[0] - 1e-6);
        for p in &result.patterns {
            assert!(p.fits(&inst));
        }
    }

    #[test]
    fn final_usage_covers_demand() {
        let inst = Instance::new("cover", 20, vec![9, 7, 5, 3], vec![4, 6, 3, 8]).unwrap();
        let result = ColumnGeneration::new()
            .solve(&ScipOracle::new(), &inst)
            .unwrap();
        assert_eq!(result.usage.len(), result.n_patterns);
        for (i, &d) in inst.demands().iter().enumerate() {
            let covered: f64 = result
                .patterns
                .iter()
                .zip(&result.usage)
                .map(|(p, x)| f64::from(p[i]) * x)
                .sum();
            assert!(covered >= f64::from(d) - 1e-6, "item {i}: {covered} < {d}");
        }
        let used: f64 = result.usage.iter().sum();
        assert!((used - result.lp_obj).abs() < 1e-6);
    }

    #[test]
    fn classic_instance_from_file() {
        let inst = Instance::load("data/test/classic.txt").unwrap();
        let result = ColumnGeneration::new()
            .solve(&ScipOracle::new(), &inst)
            .unwrap();
        assert!(result.converged());
        assert!((result.lp_obj - 452.25).abs() < 1e-4);
        assert!(result.n_patterns > inst.n_items());
    }

    #[test]
    fn data_files_parse() {
        for (path, n) in [
            ("data/test/single_item.txt", 1),
            ("data/test/two_items.txt", 2),
            ("data/test/classic.txt", 4),
        ] {
            assert_eq!(Instance::load(path).unwrap().n_items(), n);
        }
    }

    fn random_instance(seed: u64) -> Instance {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let capacity = rng.gen_range(20..=60);
        let n = rng.gen_range(1..=5);
        let widths = (0..n).map(|_| rng.gen_range(1..=capacity)).collect();
        let demands = (0..n).map(|_| rng.gen_range(0..=15)).collect();
        Instance::new(format!("random{seed}"), capacity, widths, demands).unwrap()
    }

    #[test]
    fn random_instances_bound_and_converge() {
        let outcomes: Vec<(Instance, ColGenResult, CompactResult)> = (0..16u64)
            .into_par_iter()
            .map(|seed| {
                let inst = random_instance(seed);
                let oracle = ScipOracle::new();
                let colgen = ColumnGeneration::new().solve(&oracle, &inst).unwrap();
                let compact = Compact::new().solve(&oracle, &inst).unwrap();
                (inst, colgen, compact)
            })
            .collect();

        for (inst, colgen, compact) in outcomes {
            assert!(colgen.converged(), "{}", inst.name());
            for pair in colgen.history.windows(2) {
                assert!(pair[1] <= pair[0] + 1e-6, "{}: {:?}", inst.name(), colgen.history);
            }
            // the compact relaxation only sees the material bound
            assert!(compact.lp_obj <= colgen.lp_obj + 1e-6, "{}", inst.name());
            for p in &colgen.patterns {
                assert!(p.fits(&inst));
            }
        }
    }

    #[test]
    fn agrees_with_compact_when_widths_divide_the_bar() {
        let inst = Instance::new("exact", 12, vec![6, 4, 3, 2], vec![5, 7, 2, 9]).unwrap();
        let oracle = ScipOracle::new();
        let colgen = ColumnGeneration::new().solve(&oracle, &inst).unwrap();
        let compact = Compact::new().solve(&oracle, &inst).unwrap();
        let expected = inst.total_size() as f64 / f64::from(inst.capacity());
        assert!((colgen.lp_obj - expected).abs() < 1e-6);
        assert!((compact.lp_obj - colgen.lp_obj).abs() < 1e-6);
    }
}
