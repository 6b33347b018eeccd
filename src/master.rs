//! The restricted master problem.
//!
//! One `>= d_i` demand constraint per item type, created once with an empty
//! left-hand side, and an append-only list of pattern columns attached to
//! them. Each column is a continuous variable in `[0, +inf)` costing one bar.

use tracing::trace;

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::constraint::ConsId;
use crate::error::Error;
use crate::instance::Instance;
use crate::oracle::{ObjSense, Oracle, OracleError, OracleModel};
use crate::pattern::Pattern;
use crate::variable::VarId;

/// What one master solve exposes to the rest of the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterSolution {
    /// Optimal value of the master LP.
    pub objective: f64,
    /// Number of pattern columns in the master at the time of the solve.
    pub n_columns: usize,
    /// One dual price per demand constraint.
    pub duals: Vec<f64>,
    /// Fractional usage of each pattern column.
    pub usage: Vec<f64>,
}

/// The master LP over the patterns generated so far.
#[derive(Debug)]
pub struct RestrictedMaster<M> {
    model: M,
    demand: Vec<ConsId>,
    columns: Vec<VarId>,
    patterns: Vec<Pattern>,
}

impl<M: OracleModel> RestrictedMaster<M> {
    /// Builds the master for `instance`: the demand constraints first, then
    /// one trivial single-item pattern per item type.
    ///
    /// Fails with [`Error::ItemDoesNotFit`] if an item is wider than the bar.
    pub fn build<O>(oracle: &O, instance: &Instance) -> Result<Self, Error>
    where
        O: Oracle<Model = M>,
    {
        instance.check_items_fit()?;

        let mut model = oracle.create_model("master", ObjSense::Minimize)?;
        let mut demand = Vec::with_capacity(instance.n_items());
        for (i, &d) in instance.demands().iter().enumerate() {
            let name = format!("demand_{i}");
            demand.push(model.add(cons().name(&name).ge(f64::from(d)))?);
        }

        let mut master = RestrictedMaster {
            model,
            demand,
            columns: Vec::with_capacity(instance.n_items()),
            patterns: Vec::with_capacity(instance.n_items()),
        };
        for i in 0..instance.n_items() {
            master.add_column(Pattern::trivial(instance, i))?;
        }
        Ok(master)
    }

    /// Appends a pattern as a new column. Duplicates are not detected.
    pub fn add_column(&mut self, pattern: Pattern) -> Result<VarId, Error> {
        if pattern.0.len() != self.demand.len() {
            return Err(Error::LengthMismatch {
                what: "pattern",
                expected: self.demand.len(),
                found: pattern.0.len(),
            });
        }
        let name = format!("pattern_{}", self.columns.len());
        let column = pattern
            .nonzeros()
            .map(|(i, a)| (self.demand[i], f64::from(a)))
            .collect::<Vec<_>>();
        let var = self
            .model
            .add(var().name(&name).obj(1.0).column(column))?;
        trace!(column = %name, %pattern, "added column");
        self.columns.push(var);
        self.patterns.push(pattern);
        Ok(var)
    }

    /// Solves the master LP and reads back its objective, duals and column usage.
    pub fn solve(&mut self) -> Result<MasterSolution, Error> {
        let solution = self.model.solve_optimal()?;
        let duals = self
            .demand
            .iter()
            .map(|&cons| solution.dual(cons))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| OracleError::NoDuals(self.model.name().to_string()))?;
        let usage = self.columns.iter().map(|&var| solution.val(var)).collect();

        Ok(MasterSolution {
            objective: solution.obj_val(),
            n_columns: self.model.n_vars(),
            duals,
            usage,
        })
    }

    /// Returns the number of pattern columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the patterns in the order their columns were added.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Consumes the master and returns its patterns.
    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }
}
