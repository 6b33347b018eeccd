/// Integer parameters that have to be zero for SCIP to keep the root LP intact.
pub(crate) const PURE_LP_INT_PARAMS: [(&str, i32); 2] = [
    ("propagating/maxrounds", 0),
    ("propagating/maxroundsroot", 0),
];

/// Boolean parameters that have to be off for dual values to stay valid.
pub(crate) const PURE_LP_BOOL_PARAMS: [(&str, bool); 2] = [
    ("misc/allowstrongdualreds", false),
    ("misc/allowweakdualreds", false),
];
