//! The compact (assignment) formulation, kept as a baseline to compare the
//! column-generation bound against.
//!
//! ```text
//! min  Σ_c y_c
//! s.t. Σ_i w_i x_ic <= W y_c      for every bar c
//!      Σ_c x_ic     >= d_i        for every item i
//!      y_c >= y_{c+1}             (integer model only)
//! ```
//!
//! The relaxation uses `ceil(Σ w_i d_i / W)` bars, enough for the material
//! alone. The integer model uses one bar per copy of each trivial pattern,
//! `Σ_i ceil(d_i / floor(W / w_i))`, so it always has a feasible solution.

use tracing::info;

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::config::CompactConfig;
use crate::error::Error;
use crate::instance::Instance;
use crate::oracle::{ObjSense, Oracle, OracleModel};
use crate::status::Status;
use crate::variable::VarId;

/// Outcome of the compact baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactResult {
    /// Optimal value of the LP relaxation.
    pub lp_obj: f64,
    /// Solving time of the LP relaxation, in seconds.
    pub lp_time: f64,
    /// Number of variables in the LP relaxation.
    pub n_vars: usize,
    /// Number of constraints in the LP relaxation.
    pub n_conss: usize,
    /// Present if the integer model was solved too.
    pub ip: Option<CompactIpResult>,
}

/// Outcome of the integer compact model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactIpResult {
    /// Best objective found, `None` if no feasible solution was found in time.
    pub obj: Option<f64>,
    /// Solving time of the integer model, in seconds.
    pub time: f64,
    /// True if SCIP stopped on the time limit instead of proving optimality.
    pub time_limit_reached: bool,
}

/// Settings and entry point of the compact baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compact {
    time_limit: f64,
    solve_ip: bool,
}

impl Default for Compact {
    fn default() -> Self {
        Compact {
            time_limit: 300.0,
            solve_ip: false,
        }
    }
}

impl From<&CompactConfig> for Compact {
    fn from(config: &CompactConfig) -> Self {
        Compact {
            time_limit: config.time_limit,
            solve_ip: config.solve_ip,
        }
    }
}

impl Compact {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time limit of each solve, in seconds.
    pub fn time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = seconds;
        self
    }

    /// Also solves the integer model.
    pub fn solve_ip(mut self, solve_ip: bool) -> Self {
        self.solve_ip = solve_ip;
        self
    }

    /// Solves the LP relaxation, then the integer model if requested.
    pub fn solve<O: Oracle>(&self, oracle: &O, instance: &Instance) -> Result<CompactResult, Error> {
        instance.check_items_fit()?;

        let lp_bars = instance.material_bound() as usize;
        info!(instance = instance.name(), bars = lp_bars, "solving compact relaxation");
        let mut lp = build_model(oracle, instance, lp_bars, true)?;
        lp.set_time_limit(self.time_limit)?;
        let lp_solution = lp.solve_optimal()?;

        let ip = if self.solve_ip {
            let ip_bars = trivial_bar_count(instance);
            info!(instance = instance.name(), bars = ip_bars, "solving compact integer model");
            let mut ip = build_model(oracle, instance, ip_bars, false)?;
            ip.set_time_limit(self.time_limit)?;
            let solution = ip.solve()?;
            Some(CompactIpResult {
                obj: solution.has_primal().then(|| solution.obj_val()),
                time: solution.solving_time(),
                time_limit_reached: solution.status() == Status::TimeLimit,
            })
        } else {
            None
        };

        Ok(CompactResult {
            lp_obj: lp_solution.obj_val(),
            lp_time: lp_solution.solving_time(),
            n_vars: lp.n_vars(),
            n_conss: lp.n_conss(),
            ip,
        })
    }
}

/// Bars used by cutting every item with its own trivial pattern.
fn trivial_bar_count(instance: &Instance) -> usize {
    instance
        .demands()
        .iter()
        .enumerate()
        .map(|(i, &d)| d.div_ceil(instance.max_copies(i)) as usize)
        .sum()
}

fn build_model<O: Oracle>(
    oracle: &O,
    instance: &Instance,
    bars: usize,
    relax: bool,
) -> Result<O::Model, Error> {
    let name = if relax { "compact_lp" } else { "compact_ip" };
    let mut model = oracle.create_model(name, ObjSense::Minimize)?;
    let capacity = f64::from(instance.capacity());

    let mut used = Vec::with_capacity(bars);
    for c in 0..bars {
        let name = format!("y_{c}");
        let y = if relax {
            var().name(&name).obj(1.0).continuous(0.0, 1.0)
        } else {
            var().name(&name).obj(1.0).binary()
        };
        used.push(model.add(y)?);
    }

    // cut[i][c]: copies of item i cut from bar c
    let mut cut: Vec<Vec<VarId>> = Vec::with_capacity(instance.n_items());
    for i in 0..instance.n_items() {
        let mut row = Vec::with_capacity(bars);
        for c in 0..bars {
            let name = format!("x_{i}_{c}");
            let x = if relax {
                var().name(&name)
            } else {
                // w_i x_ic <= W y_c <= W already implies this bound
                var().name(&name).integer(0, instance.max_copies(i) as isize)
            };
            row.push(model.add(x)?);
        }
        cut.push(row);
    }

    for (c, &y) in used.iter().enumerate() {
        let name = format!("capacity_{c}");
        let load = cut
            .iter()
            .zip(instance.widths())
            .map(|(row, &w)| (row[c], f64::from(w)));
        model.add(cons().name(&name).le(0.0).expr(load).coef(y, -capacity))?;
    }

    for (i, &d) in instance.demands().iter().enumerate() {
        let name = format!("demand_{i}");
        let copies = cut[i].iter().map(|&x| (x, 1.0));
        model.add(cons().name(&name).ge(f64::from(d)).expr(copies))?;
    }

    if !relax {
        for (c, pair) in used.windows(2).enumerate() {
            let name = format!("symmetry_{c}");
            model.add(cons().name(&name).ge(0.0).coef(pair[0], 1.0).coef(pair[1], -1.0))?;
        }
    }

    Ok(model)
}
