use tracing::trace;

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::instance::Instance;
use crate::oracle::{ObjSense, Oracle, OracleModel};
use crate::pattern::Pattern;

/// A source of new columns for the master problem.
pub trait Pricer {
    /// Searches for the most profitable pattern under the given dual prices.
    ///
    /// # Arguments
    /// * `duals`: one dual price per demand constraint of the master.
    fn generate_column(&mut self, duals: &[f64]) -> Result<PricingResult, Error>;
}

/// The outcome of one pricing round.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    /// The best pattern found, with oracle noise rounded away.
    pub pattern: Pattern,
    /// The pricing objective `Σ π_i a_i` as reported by the oracle.
    pub objective: f64,
    /// `1 - objective`. Negative means the pattern improves the master.
    pub reduced_cost: f64,
}

impl PricingResult {
    /// Returns true if adding the pattern would improve the master by more than `tolerance`.
    pub fn is_improving(&self, tolerance: f64) -> bool {
        self.reduced_cost < -tolerance
    }
}

/// Prices by solving the bounded knapsack
///
/// ```text
/// max  Σ π_i a_i
/// s.t. Σ w_i a_i <= W
///      a_i ∈ {0, ..., floor(W / w_i)}
/// ```
///
/// as a small integer program. A fresh model is built every round.
pub struct KnapsackPricer<'a, O> {
    oracle: &'a O,
    instance: &'a Instance,
}

impl<'a, O: Oracle> KnapsackPricer<'a, O> {
    pub fn new(oracle: &'a O, instance: &'a Instance) -> Self {
        KnapsackPricer { oracle, instance }
    }
}

impl<O: Oracle> Pricer for KnapsackPricer<'_, O> {
    fn generate_column(&mut self, duals: &[f64]) -> Result<PricingResult, Error> {
        if duals.len() != self.instance.n_items() {
            return Err(Error::LengthMismatch {
                what: "dual vector",
                expected: self.instance.n_items(),
                found: duals.len(),
            });
        }

        let mut model = self.oracle.create_model("pricing", ObjSense::Maximize)?;
        let mut counts = Vec::with_capacity(duals.len());
        for (i, &pi) in duals.iter().enumerate() {
            let name = format!("a_{i}");
            let ub = self.instance.max_copies(i) as isize;
            counts.push(model.add(var().name(&name).integer(0, ub).obj(pi))?);
        }
        let capacity = counts
            .iter()
            .zip(self.instance.widths())
            .map(|(&a, &w)| (a, f64::from(w)));
        model.add(
            cons()
                .name("capacity")
                .le(f64::from(self.instance.capacity()))
                .expr(capacity),
        )?;

        let solution = model.solve_optimal()?;
        let pattern = Pattern(
            counts
                .iter()
                .map(|&a| solution.val(a).round().max(0.0) as u32)
                .collect(),
        );
        let objective = solution.obj_val();
        trace!(%pattern, objective, "priced");

        Ok(PricingResult {
            pattern,
            objective,
            reduced_cost: 1.0 - objective,
        })
    }
}
