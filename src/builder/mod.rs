/// This module contains `VarBuilder` for easily creating variables.
pub mod var;

/// This module contains `ConsBuilder` for easily creating linear constraints.
pub mod cons;

use crate::oracle::{OracleError, OracleModel};

/// A trait for things that can be added to an oracle model.
pub trait CanBeAddedToModel {
    /// The return type after adding to the model (e.g. `VarId` / `ConsId`).
    type Return;
    /// How to add the value to the model.
    fn add<M: OracleModel>(self, model: &mut M) -> Result<Self::Return, OracleError>;
}

impl<T, I> CanBeAddedToModel for I
where
    T: CanBeAddedToModel,
    I: IntoIterator<Item = T>,
{
    type Return = Vec<T::Return>;
    fn add<M: OracleModel>(self, model: &mut M) -> Result<Self::Return, OracleError> {
        self.into_iter().map(|x| x.add(model)).collect()
    }
}
