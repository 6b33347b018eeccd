//! Column generation for the one-dimensional cutting-stock problem.
//!
//! The restricted master LP starts from one single-item pattern per item
//! type. Its duals price a bounded knapsack whose best pattern joins the
//! master as a new column, until no pattern has negative reduced cost.
//! Both models are solved through the [`Oracle`] traits; [`ScipOracle`]
//! implements them on top of SCIP.
//!
//! ```no_run
//! use cutstock::{ColumnGeneration, Instance, ScipOracle};
//!
//! let instance = Instance::load("data/test/two_items.txt").unwrap();
//! let result = ColumnGeneration::new()
//!     .solve(&ScipOracle::new(), &instance)
//!     .unwrap();
//! println!("{} bars ({} patterns)", result.lp_obj, result.n_patterns);
//! ```

pub use scip_sys as ffi;

macro_rules! scip_call {
    ($res:expr) => {
        $crate::retcode::Retcode::check(unsafe { $res })?
    };
}
pub(crate) use scip_call;

/// Contains the `Retcode` enum, SCIP's return codes as Rust errors.
pub mod retcode;
pub use retcode::*;

/// Contains the solver-neutral `Status` enum.
pub mod status;
pub use status::*;

/// Contains `VarId` and `VarType`.
pub mod variable;
pub use variable::*;

/// Contains `ConsId`.
pub mod constraint;
pub use constraint::*;

/// Contains the owned `Solution` snapshot returned by every solve.
pub mod solution;
pub use solution::*;

/// Contains the `Oracle` and `OracleModel` traits.
pub mod oracle;
pub use oracle::*;

/// Contains builders for variables and constraints.
pub mod builder;
pub use builder::CanBeAddedToModel;
pub use builder::cons::{ConsBuilder, cons};
pub use builder::var::{VarBuilder, var};

mod param;

mod scip;

/// Contains the SCIP implementation of the oracle traits.
pub mod model;
pub use model::*;

/// Contains the crate-level `Error`.
pub mod error;
pub use error::Error;

/// Contains the TOML configuration.
pub mod config;
pub use config::{Config, ConfigError};

/// Contains `Instance` and its text format.
pub mod instance;
pub use instance::Instance;

/// Contains the `Pattern` type.
pub mod pattern;
pub use pattern::Pattern;

/// Contains the restricted master problem.
pub mod master;
pub use master::{MasterSolution, RestrictedMaster};

/// Contains the `Pricer` trait and the knapsack pricer.
pub mod pricer;
pub use pricer::{KnapsackPricer, Pricer, PricingResult};

/// Contains the column-generation loop.
pub mod colgen;
pub use colgen::{ColGenResult, ColumnGeneration, Termination};

/// Contains the compact baseline formulation.
pub mod compact;
pub use compact::{Compact, CompactIpResult, CompactResult};

#[cfg(test)]
mod mock;
