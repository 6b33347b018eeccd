//! The narrow LP/MIP interface both the master problem and the pricing
//! subproblem are written against.
//!
//! An [`Oracle`] hands out models; an [`OracleModel`] accepts variables
//! (optionally with coefficients in constraints that already exist),
//! linear constraints, and solve requests. Nothing above this module knows
//! which backend sits underneath.

use thiserror::Error;

use crate::builder::CanBeAddedToModel;
use crate::constraint::ConsId;
use crate::retcode::Retcode;
use crate::solution::Solution;
use crate::status::Status;
use crate::variable::{VarId, VarType};

/// An enum representing the objective sense of a model.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ObjSense {
    /// The problem is a minimization problem.
    Minimize,
    /// The problem is a maximization problem.
    Maximize,
}

/// Errors raised by an oracle backend.
#[derive(Debug, Error, PartialEq)]
pub enum OracleError {
    /// The backend returned a non-OK return code.
    #[error("SCIP call failed with {0:?}")]
    Scip(Retcode),

    /// A variable or constraint name could not be handed to the backend.
    #[error("invalid name {0:?}")]
    InvalidName(String),

    /// A column referenced a constraint the model does not have.
    #[error("unknown constraint index {0}")]
    UnknownConstraint(usize),

    /// An expression referenced a variable the model does not have.
    #[error("unknown variable index {0}")]
    UnknownVariable(usize),

    /// A solve that had to be optimal was not.
    #[error("model {model:?} finished with status {status:?}")]
    NotOptimal { model: String, status: Status },

    /// Dual values were requested from a solve that did not produce them.
    #[error("model {0:?} has no dual values")]
    NoDuals(String),
}

impl From<Retcode> for OracleError {
    fn from(retcode: Retcode) -> Self {
        OracleError::Scip(retcode)
    }
}

/// A factory for models.
pub trait Oracle {
    /// The model type this oracle produces.
    type Model: OracleModel;

    /// Creates an empty model with the given name and objective sense.
    fn create_model(&self, name: &str, sense: ObjSense) -> Result<Self::Model, OracleError>;
}

/// A linear (mixed-integer) model that can be grown and re-solved.
pub trait OracleModel {
    /// Returns the model's name.
    fn name(&self) -> &str;

    /// Adds a variable with the given bounds, objective coefficient and type.
    ///
    /// `column` lists coefficients of the new variable in constraints that
    /// already exist in the model.
    fn add_var(
        &mut self,
        name: &str,
        lb: f64,
        ub: f64,
        obj: f64,
        var_type: VarType,
        column: &[(ConsId, f64)],
    ) -> Result<VarId, OracleError>;

    /// Adds the linear constraint `lhs <= expr <= rhs`.
    fn add_cons(
        &mut self,
        name: &str,
        expr: &[(VarId, f64)],
        lhs: f64,
        rhs: f64,
    ) -> Result<ConsId, OracleError>;

    /// Limits the wall-clock time of subsequent solves.
    fn set_time_limit(&mut self, seconds: f64) -> Result<(), OracleError>;

    /// Returns the number of variables in the model.
    fn n_vars(&self) -> usize;

    /// Returns the number of constraints in the model.
    fn n_conss(&self) -> usize;

    /// Solves the model and returns a snapshot of the outcome.
    ///
    /// The model stays editable afterwards.
    fn solve(&mut self) -> Result<Solution, OracleError>;

    /// Adds a builder (or a collection of builders) to the model.
    fn add<B>(&mut self, builder: B) -> Result<B::Return, OracleError>
    where
        B: CanBeAddedToModel,
        Self: Sized,
    {
        builder.add(self)
    }

    /// Solves the model and fails unless the outcome is optimal.
    fn solve_optimal(&mut self) -> Result<Solution, OracleError> {
        let solution = self.solve()?;
        if solution.status() != Status::Optimal {
            return Err(OracleError::NotOptimal {
                model: self.name().to_string(),
                status: solution.status(),
            });
        }
        Ok(solution)
    }
}
