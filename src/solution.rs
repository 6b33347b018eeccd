use std::fmt;

use crate::constraint::ConsId;
use crate::status::Status;
use crate::variable::VarId;

/// An owned snapshot of what an oracle found during one solve.
///
/// The snapshot outlives the solve, so the model it came from can be
/// modified and re-solved while the values are still being read.
#[derive(Clone, PartialEq)]
pub struct Solution {
    pub(crate) status: Status,
    pub(crate) obj_val: f64,
    pub(crate) values: Vec<f64>,
    pub(crate) duals: Option<Vec<f64>>,
    pub(crate) solving_time: f64,
}

impl Solution {
    /// Returns the status the solve ended with.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns true if a primal solution is available.
    pub fn has_primal(&self) -> bool {
        !self.obj_val.is_nan()
    }

    /// Returns the objective value of the best solution found, `NaN` if there is none.
    pub fn obj_val(&self) -> f64 {
        self.obj_val
    }

    /// Returns the value of a variable in the best solution found.
    ///
    /// Variables without a value (no primal solution) read as `0.0`.
    pub fn val(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }

    /// Returns the values of all variables, indexed by `VarId`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the dual value of a linear constraint, if the solve produced duals.
    pub fn dual(&self, cons: ConsId) -> Option<f64> {
        self.duals.as_ref().and_then(|d| d.get(cons.0).copied())
    }

    /// Returns all dual values, indexed by `ConsId`.
    pub fn duals(&self) -> Option<&[f64]> {
        self.duals.as_deref()
    }

    /// Returns the time spent in the solve, in seconds.
    pub fn solving_time(&self) -> f64 {
        self.solving_time
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Solution ({:?}) with obj val: {}", self.status, self.obj_val)?;
        for (i, val) in self.values.iter().enumerate() {
            if *val != 0.0 {
                writeln!(f, "Var x{i}={val}")?;
            }
        }
        Ok(())
    }
}
