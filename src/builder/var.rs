use crate::builder::CanBeAddedToModel;
use crate::constraint::ConsId;
use crate::oracle::{OracleError, OracleModel};
use crate::variable::{VarId, VarType};

/// A builder for variables.
#[derive(Debug, Clone)]
pub struct VarBuilder<'a> {
    name: Option<&'a str>,
    obj: f64,
    lb: f64,
    ub: f64,
    var_type: VarType,
    column: Vec<(ConsId, f64)>,
}

/// Creates a new default `VarBuilder`: continuous, in `[0, +inf)`, objective coefficient zero.
pub fn var<'a>() -> VarBuilder<'a> {
    VarBuilder::default()
}

impl Default for VarBuilder<'_> {
    fn default() -> Self {
        VarBuilder {
            name: None,
            obj: 0.0,
            lb: 0.0,
            ub: f64::INFINITY,
            var_type: VarType::Continuous,
            column: Vec::new(),
        }
    }
}

impl<'a> VarBuilder<'a> {
    /// Sets the variable to be an integer variable.
    pub fn integer(mut self, lb: isize, ub: isize) -> Self {
        self.lb = lb as f64;
        self.ub = ub as f64;
        self.var_type = VarType::Integer;
        self
    }

    /// Sets the variable to be a binary variable.
    pub fn binary(mut self) -> Self {
        self.lb = 0.0;
        self.ub = 1.0;
        self.var_type = VarType::Binary;
        self
    }

    /// Sets the variable to be a continuous variable.
    pub fn continuous(mut self, lb: f64, ub: f64) -> Self {
        self.lb = lb;
        self.ub = ub;
        self.var_type = VarType::Continuous;
        self
    }

    /// Sets the name of the variable.
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the objective coefficient of the variable.
    pub fn obj(mut self, obj: f64) -> Self {
        self.obj = obj;
        self
    }

    /// Gives the variable a coefficient in an existing constraint.
    pub fn coef(mut self, cons: ConsId, coef: f64) -> Self {
        self.column.push((cons, coef));
        self
    }

    /// Gives the variable coefficients in several existing constraints.
    pub fn column<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (ConsId, f64)>,
    {
        self.column.extend(iter);
        self
    }
}

impl CanBeAddedToModel for VarBuilder<'_> {
    type Return = VarId;
    fn add<M: OracleModel>(self, model: &mut M) -> Result<VarId, OracleError> {
        let name = self
            .name
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("x{}", model.n_vars()));

        model.add_var(
            &name,
            self.lb,
            self.ub,
            self.obj,
            self.var_type,
            &self.column,
        )
    }
}
