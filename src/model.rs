use std::ffi::CString;

use tracing::trace;

use crate::constraint::ConsId;
use crate::oracle::{ObjSense, Oracle, OracleError, OracleModel};
use crate::param::{PURE_LP_BOOL_PARAMS, PURE_LP_INT_PARAMS};
use crate::scip::ScipPtr;
use crate::solution::Solution;
use crate::status::Status;
use crate::variable::{VarId, VarType};

/// An [`Oracle`] backed by SCIP, one fresh SCIP instance per model.
#[derive(Debug, Clone, Copy)]
pub struct ScipOracle {
    verbosity: i32,
}

impl ScipOracle {
    /// Creates an oracle whose models print nothing.
    pub fn new() -> Self {
        ScipOracle { verbosity: 0 }
    }

    /// Sets SCIP's `display/verblevel` (0 = silent, 5 = full) for every model created afterwards.
    pub fn with_verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }
}

impl Default for ScipOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for ScipOracle {
    type Model = ScipModel;

    fn create_model(&self, name: &str, sense: ObjSense) -> Result<ScipModel, OracleError> {
        ScipModel::new(name, sense, self.verbosity)
    }
}

/// A SCIP problem that can be grown and re-solved.
///
/// Models without integer or binary variables are solved as plain LPs with
/// presolving, propagation and dual reductions turned off, so every linear
/// constraint keeps a valid dual value.
#[derive(Debug)]
pub struct ScipModel {
    scip: ScipPtr,
    name: String,
    n_integral: usize,
}

impl ScipModel {
    /// Creates a SCIP instance with default plugins and an empty problem.
    pub fn new(name: &str, sense: ObjSense, verbosity: i32) -> Result<Self, OracleError> {
        let c_name = c_string(name)?;
        let scip = ScipPtr::new()?;
        scip.set_int_param("display/verblevel", verbosity)?;
        scip.include_default_plugins()?;
        scip.create_prob(&c_name)?;
        scip.set_obj_sense(sense)?;
        Ok(ScipModel {
            scip,
            name: name.to_string(),
            n_integral: 0,
        })
    }

    /// Returns true if the model has no integer or binary variables.
    pub fn is_pure_lp(&self) -> bool {
        self.n_integral == 0
    }

    fn configure_pure_lp(&self) -> Result<(), OracleError> {
        self.scip.disable_mip_components()?;
        for (param, value) in PURE_LP_INT_PARAMS {
            self.scip.set_int_param(param, value)?;
        }
        for (param, value) in PURE_LP_BOOL_PARAMS {
            self.scip.set_bool_param(param, value)?;
        }
        Ok(())
    }
}

impl OracleModel for ScipModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_var(
        &mut self,
        name: &str,
        lb: f64,
        ub: f64,
        obj: f64,
        var_type: VarType,
        column: &[(ConsId, f64)],
    ) -> Result<VarId, OracleError> {
        let c_name = c_string(name)?;
        let conss = column
            .iter()
            .map(|(cons, coef)| {
                self.scip
                    .conss()
                    .get(cons.0)
                    .map(|raw| (*raw, *coef))
                    .ok_or(OracleError::UnknownConstraint(cons.0))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let var = self.scip.create_var(lb, ub, obj, &c_name, var_type)?;
        for (cons, coef) in conss {
            self.scip.add_cons_coef(cons, var, coef)?;
        }
        if var_type.is_integral() {
            self.n_integral += 1;
        }
        trace!(model = %self.name, var = name, lb, ub, obj, ?var_type, "added variable");
        Ok(VarId(self.scip.vars().len() - 1))
    }

    fn add_cons(
        &mut self,
        name: &str,
        expr: &[(VarId, f64)],
        lhs: f64,
        rhs: f64,
    ) -> Result<ConsId, OracleError> {
        let c_name = c_string(name)?;
        let mut vars = Vec::with_capacity(expr.len());
        let mut coefs = Vec::with_capacity(expr.len());
        for (var, coef) in expr {
            let raw = self
                .scip
                .vars()
                .get(var.0)
                .ok_or(OracleError::UnknownVariable(var.0))?;
            vars.push(*raw);
            coefs.push(*coef);
        }
        self.scip.create_cons(&vars, &coefs, lhs, rhs, &c_name)?;
        trace!(model = %self.name, cons = name, lhs, rhs, "added constraint");
        Ok(ConsId(self.scip.conss().len() - 1))
    }

    fn set_time_limit(&mut self, seconds: f64) -> Result<(), OracleError> {
        self.scip.ensure_problem_stage()?;
        self.scip.set_real_param("limits/time", seconds)?;
        Ok(())
    }

    fn n_vars(&self) -> usize {
        self.scip.vars().len()
    }

    fn n_conss(&self) -> usize {
        self.scip.conss().len()
    }

    fn solve(&mut self) -> Result<Solution, OracleError> {
        self.scip.ensure_problem_stage()?;
        if self.is_pure_lp() {
            self.configure_pure_lp()?;
        }
        self.scip.solve()?;

        let status = self.scip.status();
        let (obj_val, values) = match self.scip.best_sol() {
            Some(sol) => (
                self.scip.sol_obj_val(sol),
                self.scip
                    .vars()
                    .iter()
                    .map(|var| self.scip.sol_val(sol, *var))
                    .collect(),
            ),
            None => (f64::NAN, Vec::new()),
        };
        let duals = if self.is_pure_lp() && status == Status::Optimal {
            let duals = self
                .scip
                .conss()
                .iter()
                .map(|cons| self.scip.dual_sol(*cons))
                .collect::<Result<Vec<_>, _>>()?;
            Some(duals)
        } else {
            None
        };
        let solving_time = self.scip.solving_time();
        trace!(model = %self.name, ?status, obj_val, solving_time, "solved");

        Ok(Solution {
            status,
            obj_val,
            values,
            duals,
            solving_time,
        })
    }
}

fn c_string(name: &str) -> Result<CString, OracleError> {
    CString::new(name).map_err(|_| OracleError::InvalidName(name.to_string()))
}
