//! A scripted oracle for exercising model-building code without a solver.
//!
//! Every model records what was added to it. Solves pop the next scripted
//! [`Solution`] queued under the model's name; an empty queue fails the
//! solve with `Retcode::Error`.

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::constraint::ConsId;
use crate::oracle::{ObjSense, Oracle, OracleError, OracleModel};
use crate::retcode::Retcode;
use crate::solution::Solution;
use crate::status::Status;
use crate::variable::{VarId, VarType};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VarRecord {
    pub name: String,
    pub lb: f64,
    pub ub: f64,
    pub obj: f64,
    pub var_type: VarType,
    pub column: Vec<(ConsId, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConsRecord {
    pub name: String,
    pub expr: Vec<(VarId, f64)>,
    pub lhs: f64,
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ModelRecord {
    pub name: String,
    pub sense: ObjSense,
    pub vars: Vec<VarRecord>,
    pub conss: Vec<ConsRecord>,
    pub time_limit: Option<f64>,
    /// Number of variables present at each solve.
    pub solves: Vec<usize>,
}

type Scripts = Rc<RefCell<HashMap<String, VecDeque<Solution>>>>;

#[derive(Default)]
pub(crate) struct MockOracle {
    scripts: Scripts,
    created: RefCell<Vec<Rc<RefCell<ModelRecord>>>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues solutions returned by successive solves of models named `model`.
    pub fn script<I>(self, model: &str, solutions: I) -> Self
    where
        I: IntoIterator<Item = Solution>,
    {
        self.scripts
            .borrow_mut()
            .entry(model.to_string())
            .or_default()
            .extend(solutions);
        self
    }

    /// Snapshots of every model created under `name`, in creation order.
    pub fn models(&self, name: &str) -> Vec<ModelRecord> {
        self.created
            .borrow()
            .iter()
            .map(|r| r.borrow().clone())
            .filter(|r| r.name == name)
            .collect()
    }
}

impl Oracle for MockOracle {
    type Model = MockModel;

    fn create_model(&self, name: &str, sense: ObjSense) -> Result<MockModel, OracleError> {
        let model = MockModel::with_scripts(name, sense, self.scripts.clone());
        self.created.borrow_mut().push(model.record.clone());
        Ok(model)
    }
}

#[derive(Debug)]
pub(crate) struct MockModel {
    record: Rc<RefCell<ModelRecord>>,
    name: String,
    scripts: Scripts,
}

impl MockModel {
    pub fn new(name: &str, sense: ObjSense) -> Self {
        Self::with_scripts(name, sense, Scripts::default())
    }

    fn with_scripts(name: &str, sense: ObjSense, scripts: Scripts) -> Self {
        MockModel {
            record: Rc::new(RefCell::new(ModelRecord {
                name: name.to_string(),
                sense,
                vars: Vec::new(),
                conss: Vec::new(),
                time_limit: None,
                solves: Vec::new(),
            })),
            name: name.to_string(),
            scripts,
        }
    }

    pub fn record(&self) -> Ref<'_, ModelRecord> {
        self.record.borrow()
    }

    /// Adds an empty `>= 0` constraint.
    pub fn push_cons(&mut self, name: &str) -> ConsId {
        let mut record = self.record.borrow_mut();
        record.conss.push(ConsRecord {
            name: name.to_string(),
            expr: Vec::new(),
            lhs: 0.0,
            rhs: f64::INFINITY,
        });
        ConsId(record.conss.len() - 1)
    }
}

impl OracleModel for MockModel {
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
        let mut record = self.record.borrow_mut();
        if let Some((cons, _)) = column.iter().find(|(c, _)| c.0 >= record.conss.len()) {
            return Err(OracleError::UnknownConstraint(cons.0));
        }
        record.vars.push(VarRecord {
            name: name.to_string(),
            lb,
            ub,
            obj,
            var_type,
            column: column.to_vec(),
        });
        Ok(VarId(record.vars.len() - 1))
    }

    fn add_cons(
        &mut self,
        name: &str,
        expr: &[(VarId, f64)],
        lhs: f64,
        rhs: f64,
    ) -> Result<ConsId, OracleError> {
        let mut record = self.record.borrow_mut();
        if let Some((var, _)) = expr.iter().find(|(v, _)| v.0 >= record.vars.len()) {
            return Err(OracleError::UnknownVariable(var.0));
        }
        record.conss.push(ConsRecord {
            name: name.to_string(),
            expr: expr.to_vec(),
            lhs,
            rhs,
        });
        Ok(ConsId(record.conss.len() - 1))
    }

    fn set_time_limit(&mut self, seconds: f64) -> Result<(), OracleError> {
        self.record.borrow_mut().time_limit = Some(seconds);
        Ok(())
    }

    fn n_vars(&self) -> usize {
        self.record.borrow().vars.len()
    }

    fn n_conss(&self) -> usize {
        self.record.borrow().conss.len()
    }

    fn solve(&mut self) -> Result<Solution, OracleError> {
        let n_vars = self.n_vars();
        self.record.borrow_mut().solves.push(n_vars);
        self.scripts
            .borrow_mut()
            .get_mut(&self.name)
            .and_then(|queue| queue.pop_front())
            .ok_or(OracleError::Scip(Retcode::Error))
    }
}

/// An optimal LP outcome with duals.
pub(crate) fn lp_solution(obj_val: f64, values: Vec<f64>, duals: Vec<f64>) -> Solution {
    Solution {
        status: Status::Optimal,
        obj_val,
        values,
        duals: Some(duals),
        solving_time: 0.0,
    }
}

/// An optimal MIP outcome.
pub(crate) fn mip_solution(obj_val: f64, values: Vec<f64>) -> Solution {
    Solution {
        status: Status::Optimal,
        obj_val,
        values,
        duals: None,
        solving_time: 0.0,
    }
}

/// An outcome that stopped with `status` and no primal solution.
pub(crate) fn failed_solution(status: Status) -> Solution {
    Solution {
        status,
        obj_val: f64::NAN,
        values: Vec::new(),
        duals: None,
        solving_time: 0.0,
    }
}
