/// Index of a variable inside an oracle model, in creation order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct VarId(pub usize);

/// The domain of a variable.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VarType {
    /// The variable is a continuous variable.
    Continuous,
    /// The variable is an integer variable.
    Integer,
    /// The variable is a binary variable.
    Binary,
}

impl VarType {
    /// Returns true for integer and binary variables.
    pub fn is_integral(&self) -> bool {
        !matches!(self, VarType::Continuous)
    }
}
