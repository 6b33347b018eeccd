use std::ffi::CString;
use std::mem::MaybeUninit;

use crate::retcode::Retcode;
use crate::status::Status;
use crate::variable::VarType;
use crate::{ObjSense, ffi, scip_call};

/// Owns one SCIP instance together with the variables and constraints the
/// crate created in it.
#[derive(Debug)]
pub(crate) struct ScipPtr {
    pub(crate) raw: *mut ffi::SCIP,
    vars: Vec<*mut ffi::SCIP_VAR>,
    conss: Vec<*mut ffi::SCIP_CONS>,
}

impl ScipPtr {
    pub(crate) fn new() -> Result<Self, Retcode> {
        let mut scip_ptr = MaybeUninit::uninit();
        scip_call!(ffi::SCIPcreate(scip_ptr.as_mut_ptr()));
        let scip_ptr = unsafe { scip_ptr.assume_init() };
        Ok(ScipPtr {
            raw: scip_ptr,
            vars: Vec::new(),
            conss: Vec::new(),
        })
    }

    pub(crate) fn include_default_plugins(&self) -> Result<(), Retcode> {
        scip_call!(ffi::SCIPincludeDefaultPlugins(self.raw));
        Ok(())
    }

    pub(crate) fn create_prob(&self, name: &CString) -> Result<(), Retcode> {
        scip_call!(ffi::SCIPcreateProbBasic(self.raw, name.as_ptr()));
        Ok(())
    }

    pub(crate) fn set_obj_sense(&self, sense: ObjSense) -> Result<(), Retcode> {
        let sense = match sense {
            ObjSense::Maximize => ffi::SCIP_Objsense_SCIP_OBJSENSE_MAXIMIZE,
            ObjSense::Minimize => ffi::SCIP_Objsense_SCIP_OBJSENSE_MINIMIZE,
        };
        scip_call!(ffi::SCIPsetObjsense(self.raw, sense));
        Ok(())
    }

    pub(crate) fn set_bool_param(&self, param: &str, value: bool) -> Result<(), Retcode> {
        let param = CString::new(param).map_err(|_| Retcode::ParameterUnknown)?;
        scip_call!(ffi::SCIPsetBoolParam(self.raw, param.as_ptr(), value.into()));
        Ok(())
    }

    pub(crate) fn set_int_param(&self, param: &str, value: i32) -> Result<(), Retcode> {
        let param = CString::new(param).map_err(|_| Retcode::ParameterUnknown)?;
        scip_call!(ffi::SCIPsetIntParam(self.raw, param.as_ptr(), value));
        Ok(())
    }

    pub(crate) fn set_real_param(&self, param: &str, value: f64) -> Result<(), Retcode> {
        let param = CString::new(param).map_err(|_| Retcode::ParameterUnknown)?;
        scip_call!(ffi::SCIPsetRealParam(self.raw, param.as_ptr(), value));
        Ok(())
    }

    /// Turns presolving, separating and primal heuristics off as groups.
    pub(crate) fn disable_mip_components(&self) -> Result<(), Retcode> {
        let off = ffi::SCIP_ParamSetting_SCIP_PARAMSETTING_OFF;
        scip_call!(ffi::SCIPsetPresolving(self.raw, off, true.into()));
        scip_call!(ffi::SCIPsetSeparating(self.raw, off, true.into()));
        scip_call!(ffi::SCIPsetHeuristics(self.raw, off, true.into()));
        Ok(())
    }

    pub(crate) fn vars(&self) -> &[*mut ffi::SCIP_VAR] {
        &self.vars
    }

    pub(crate) fn conss(&self) -> &[*mut ffi::SCIP_CONS] {
        &self.conss
    }

    pub(crate) fn status(&self) -> Status {
        let status = unsafe { ffi::SCIPgetStatus(self.raw) };
        status_from_raw(status)
    }

    /// Frees the transformed problem if there is one, so the original
    /// problem can be modified again.
    pub(crate) fn ensure_problem_stage(&self) -> Result<(), Retcode> {
        let stage = unsafe { ffi::SCIPgetStage(self.raw) };
        if stage != ffi::SCIP_Stage_SCIP_STAGE_PROBLEM {
            scip_call!(ffi::SCIPfreeTransform(self.raw));
        }
        Ok(())
    }

    pub(crate) fn create_var(
        &mut self,
        lb: f64,
        ub: f64,
        obj: f64,
        name: &CString,
        var_type: VarType,
    ) -> Result<*mut ffi::SCIP_VAR, Retcode> {
        self.ensure_problem_stage()?;
        let mut var_ptr = MaybeUninit::uninit();
        scip_call!(ffi::SCIPcreateVarBasic(
            self.raw,
            var_ptr.as_mut_ptr(),
            name.as_ptr(),
            lb,
            ub,
            obj,
            var_type_to_raw(var_type),
        ));
        let var_ptr = unsafe { var_ptr.assume_init() };
        // captured by SCIPcreateVarBasic, released in drop
        self.vars.push(var_ptr);
        scip_call!(ffi::SCIPaddVar(self.raw, var_ptr));
        Ok(var_ptr)
    }

    pub(crate) fn create_cons(
        &mut self,
        vars: &[*mut ffi::SCIP_VAR],
        coefs: &[f64],
        lhs: f64,
        rhs: f64,
        name: &CString,
    ) -> Result<*mut ffi::SCIP_CONS, Retcode> {
        assert_eq!(vars.len(), coefs.len());
        self.ensure_problem_stage()?;
        let mut scip_cons = MaybeUninit::uninit();
        scip_call!(ffi::SCIPcreateConsBasicLinear(
            self.raw,
            scip_cons.as_mut_ptr(),
            name.as_ptr(),
            0,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            lhs,
            rhs,
        ));
        let scip_cons = unsafe { scip_cons.assume_init() };
        self.conss.push(scip_cons);
        for (var, coef) in vars.iter().zip(coefs) {
            scip_call!(ffi::SCIPaddCoefLinear(self.raw, scip_cons, *var, *coef));
        }
        scip_call!(ffi::SCIPaddCons(self.raw, scip_cons));
        Ok(scip_cons)
    }

    pub(crate) fn add_cons_coef(
        &self,
        cons: *mut ffi::SCIP_CONS,
        var: *mut ffi::SCIP_VAR,
        coef: f64,
    ) -> Result<(), Retcode> {
        self.ensure_problem_stage()?;
        scip_call!(ffi::SCIPaddCoefLinear(self.raw, cons, var, coef));
        Ok(())
    }

    pub(crate) fn solve(&self) -> Result<(), Retcode> {
        scip_call!(ffi::SCIPsolve(self.raw));
        Ok(())
    }

    pub(crate) fn best_sol(&self) -> Option<*mut ffi::SCIP_SOL> {
        let n_sols = unsafe { ffi::SCIPgetNSols(self.raw) };
        if n_sols == 0 {
            return None;
        }
        Some(unsafe { ffi::SCIPgetBestSol(self.raw) })
    }

    pub(crate) fn sol_obj_val(&self, sol: *mut ffi::SCIP_SOL) -> f64 {
        unsafe { ffi::SCIPgetSolOrigObj(self.raw, sol) }
    }

    pub(crate) fn sol_val(&self, sol: *mut ffi::SCIP_SOL, var: *mut ffi::SCIP_VAR) -> f64 {
        unsafe { ffi::SCIPgetSolVal(self.raw, sol, var) }
    }

    /// Returns the dual value of a linear constraint after a pure LP solve.
    ///
    /// Only valid in the `SOLVED` stage.
    pub(crate) fn dual_sol(&self, cons: *mut ffi::SCIP_CONS) -> Result<f64, Retcode> {
        let mut dual = MaybeUninit::uninit();
        let mut bound_cons = MaybeUninit::uninit();
        scip_call!(ffi::SCIPgetDualSolVal(
            self.raw,
            cons,
            dual.as_mut_ptr(),
            bound_cons.as_mut_ptr(),
        ));
        Ok(unsafe { dual.assume_init() })
    }

    pub(crate) fn solving_time(&self) -> f64 {
        unsafe { ffi::SCIPgetSolvingTime(self.raw) }
    }
}

impl Drop for ScipPtr {
    fn drop(&mut self) {
        // the Rust side holds one capture of every variable and constraint it
        // created; release them before freeing the SCIP instance
        for var in self.vars.iter_mut() {
            unsafe { ffi::SCIPreleaseVar(self.raw, var) };
        }
        for cons in self.conss.iter_mut() {
            unsafe { ffi::SCIPreleaseCons(self.raw, cons) };
        }
        unsafe { ffi::SCIPfree(&mut self.raw) };
    }
}

fn var_type_to_raw(var_type: VarType) -> ffi::SCIP_VARTYPE {
    match var_type {
        VarType::Continuous => ffi::SCIP_Vartype_SCIP_VARTYPE_CONTINUOUS,
        VarType::Integer => ffi::SCIP_Vartype_SCIP_VARTYPE_INTEGER,
        VarType::Binary => ffi::SCIP_Vartype_SCIP_VARTYPE_BINARY,
    }
}

fn status_from_raw(val: ffi::SCIP_STATUS) -> Status {
    match val {
        ffi::SCIP_Status_SCIP_STATUS_USERINTERRUPT => Status::UserInterrupt,
        ffi::SCIP_Status_SCIP_STATUS_NODELIMIT => Status::NodeLimit,
        ffi::SCIP_Status_SCIP_STATUS_TOTALNODELIMIT => Status::TotalNodeLimit,
        ffi::SCIP_Status_SCIP_STATUS_STALLNODELIMIT => Status::StallNodeLimit,
        ffi::SCIP_Status_SCIP_STATUS_TIMELIMIT => Status::TimeLimit,
        ffi::SCIP_Status_SCIP_STATUS_MEMLIMIT => Status::MemoryLimit,
        ffi::SCIP_Status_SCIP_STATUS_GAPLIMIT => Status::GapLimit,
        ffi::SCIP_Status_SCIP_STATUS_SOLLIMIT => Status::SolutionLimit,
        ffi::SCIP_Status_SCIP_STATUS_BESTSOLLIMIT => Status::BestSolutionLimit,
        ffi::SCIP_Status_SCIP_STATUS_RESTARTLIMIT => Status::RestartLimit,
        ffi::SCIP_Status_SCIP_STATUS_OPTIMAL => Status::Optimal,
        ffi::SCIP_Status_SCIP_STATUS_INFEASIBLE => Status::Infeasible,
        ffi::SCIP_Status_SCIP_STATUS_UNBOUNDED => Status::Unbounded,
        ffi::SCIP_Status_SCIP_STATUS_INFORUNBD => Status::Inforunbd,
        ffi::SCIP_Status_SCIP_STATUS_TERMINATE => Status::Terminate,
        _ => Status::Unknown,
    }
}

