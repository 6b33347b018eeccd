/// Index of a linear constraint inside an oracle model, in creation order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct ConsId(pub usize);
