use crate::builder::CanBeAddedToModel;
use crate::constraint::ConsId;
use crate::oracle::{OracleError, OracleModel};
use crate::variable::VarId;

/// A builder for creating linear constraints `lhs <= expr <= rhs`.
#[derive(Debug, Clone)]
pub struct ConsBuilder<'a> {
    /// Left-hand side of constraint
    pub(crate) lhs: f64,
    /// Right-hand side of constraint
    pub(crate) rhs: f64,
    /// (Optional) name of constraint
    pub(crate) name: Option<&'a str>,
    /// Coefficients of constraint
    pub(crate) coefs: Vec<(VarId, f64)>,
}

/// Creates a new default `ConsBuilder`.
pub fn cons<'a>() -> ConsBuilder<'a> {
    ConsBuilder::default()
}

impl Default for ConsBuilder<'_> {
    fn default() -> Self {
        ConsBuilder {
            lhs: f64::NEG_INFINITY,
            rhs: f64::INFINITY,
            name: None,
            coefs: Vec::new(),
        }
    }
}

impl<'a> ConsBuilder<'a> {
    /// Creates a constraint of the form `expr <= val`.
    pub fn le(mut self, val: f64) -> Self {
        self.rhs = val;
        self.lhs = f64::NEG_INFINITY;
        self
    }

    /// Creates a constraint of the form `val <= expr`.
    pub fn ge(mut self, val: f64) -> Self {
        self.lhs = val;
        self.rhs = f64::INFINITY;
        self
    }

    /// Creates a constraint of the form `expr = val`.
    pub fn eq(mut self, val: f64) -> Self {
        self.lhs = val;
        self.rhs = val;
        self
    }

    /// Sets the name of the constraint.
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Adds a coefficient to the constraint.
    pub fn coef(mut self, var: VarId, coef: f64) -> Self {
        self.coefs.push((var, coef));
        self
    }

    /// Adds multiple coefficients to the constraint.
    pub fn expr<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (VarId, f64)>,
    {
        self.coefs.extend(iter);
        self
    }
}

impl CanBeAddedToModel for ConsBuilder<'_> {
    type Return = ConsId;
    fn add<M: OracleModel>(self, model: &mut M) -> Result<ConsId, OracleError> {
        let name = self
            .name
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("cons{}", model.n_conss()));
        model.add_cons(&name, &self.coefs, self.lhs, self.rhs)
    }
}
