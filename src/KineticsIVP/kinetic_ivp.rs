//! # Kinetic IVP Module
//!
//! Solves the initial value problem for a built kinetic system:
//! dC/dt = f(C; k), C(t0) = C0, with f the symbolic derivative vector from the
//! reaction-system builder and k the numeric rate constants.
//!
//! ## Usage Pattern
//! 1. `new()` - create instance with solver type
//! 2. `set_reactions()` or `set_system()` - the kinetic system
//! 3. `set_rate_constants()` or `set_arrhenius()` - numbers for every constant
//! 4. `set_initial_concentrations()` and `set_time()`
//! 5. `check_task()` - validate configuration
//! 6. `solve()` - then `get_result()`, `plot()`, `plot_in_terminal()` or `save_result()`
//!
//! ## Solver Notes
//!
//! Kinetic systems with rate constants spanning many orders of magnitude
//! (Robertson's problem is the canonical case) are stiff: use BDF or Radau.
//! RK45 is cheaper for non-stiff problems. The state-vector order of the
//! solver is the declared substance order of the kinetic system, so initial
//! concentrations are keyed by substance name and resolved here.
use crate::Kinetics::rate_constants::ArrheniusRate;
use crate::Kinetics::reaction_system::{
    ElementaryReaction, KineticEquationSystem, KineticsError, build_kinetic_equations,
};
use RustedSciThe::Utils::plots::plots_terminal;
use RustedSciThe::numerical::ODE_api2::{SolverParam, SolverType, UniversalODESolver};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;

/// IVP task for a kinetic system.
pub struct KineticIVP {
    /// ODE solver instance (initialized after solve() is called)
    solver: Option<UniversalODESolver>,
    /// Numerical solver parameters (step size, tolerance, etc.)
    solver_params: HashMap<String, SolverParam>,
    /// the symbolic kinetic system to integrate
    system: Option<KineticEquationSystem>,
    /// numeric value for every interned rate-constant name
    rate_values: HashMap<String, f64>,
    /// initial concentration for every substance, keyed by name
    initial_concentrations: HashMap<String, f64>,
    /// integration interval
    t0: f64,
    t_final: f64,
    /// Type of numerical solver to use
    solvertype: SolverType,
    stop_condition: Option<HashMap<String, f64>>,
}

impl KineticIVP {
    pub fn new(solvertype: SolverType) -> Self {
        let map_of_params = HashMap::from([
            ("step_size".to_owned(), SolverParam::Float(1e-3)),
            ("tolerance".to_owned(), SolverParam::Float(1e-3)),
            ("max_iterations".to_owned(), SolverParam::Int(100000)),
            ("rtol".to_owned(), SolverParam::Float(1e-3)),
            ("atol".to_owned(), SolverParam::Float(1e-3)),
            ("max_step".to_owned(), SolverParam::Float(0.1)),
            ("first_step".to_owned(), SolverParam::OptionalFloat(None)),
            ("vectorized".to_owned(), SolverParam::Bool(false)),
            ("jac_sparsity".to_owned(), SolverParam::OptionalMatrix(None)),
            ("parallel".to_owned(), SolverParam::Bool(true)),
        ]);
        Self {
            solver: None,
            solver_params: map_of_params,
            system: None,
            rate_values: HashMap::new(),
            initial_concentrations: HashMap::new(),
            t0: 0.0,
            t_final: 0.0,
            solvertype,
            stop_condition: None,
        }
    }
    /////////////////////////////////SETTERS///////////////////////////////////////////////////
    /// Set an already built kinetic system.
    pub fn set_system(&mut self, system: KineticEquationSystem) {
        self.system = Some(system);
        self.solver = None;
    }

    /// Build the kinetic system from reactions and a declared substance list.
    pub fn set_reactions(
        &mut self,
        reactions: &[ElementaryReaction],
        substances: &[String],
    ) -> Result<(), KineticsError> {
        let system = build_kinetic_equations(reactions, substances)?;
        self.set_system(system);
        Ok(())
    }

    /// Numeric value for every rate-constant name of the system.
    pub fn set_rate_constants(&mut self, rate_values: HashMap<String, f64>) {
        self.rate_values = rate_values;
        self.solver = None;
    }

    /// Compute the rate constants from Arrhenius parameters at a fixed
    /// temperature (isothermal integration).
    /// ATTENTION! don't forget to use absolute temperature in Kelvin!
    pub fn set_arrhenius(
        &mut self,
        arrhenius: HashMap<String, ArrheniusRate>,
        Temp: f64,
    ) -> Result<(), KineticsError> {
        if Temp <= 0.0 {
            return Err(KineticsError::InvalidConfiguration(
                "temperature must be positive".to_string(),
            ));
        }
        let mut rate_values = HashMap::new();
        for (name, rate) in arrhenius.iter() {
            rate_values.insert(name.clone(), rate.K_const(Temp));
        }
        self.set_rate_constants(rate_values);
        Ok(())
    }

    /// Initial concentrations keyed by substance name; resolved into the
    /// declared substance order when solving.
    pub fn set_initial_concentrations(&mut self, initial: HashMap<String, f64>) {
        self.initial_concentrations = initial;
        self.solver = None;
    }

    pub fn set_time(&mut self, t0: f64, t_final: f64) -> Result<(), KineticsError> {
        if t_final <= t0 {
            return Err(KineticsError::InvalidConfiguration(format!(
                "t_final {} must be greater than t0 {}",
                t_final, t0
            )));
        }
        self.t0 = t0;
        self.t_final = t_final;
        Ok(())
    }

    pub fn set_solver_params(&mut self, params: HashMap<String, SolverParam>) {
        self.solver_params = params;
    }

    pub fn set_stop_condition(&mut self, condition: Option<HashMap<String, f64>>) {
        self.stop_condition = condition;
    }
    ///////////////////////////////////////////VALIDATION////////////////////////////////////////////////
    /// Validate that the task is completely configured before solving.
    pub fn check_task(&self) -> Result<(), KineticsError> {
        let system = self.system.as_ref().ok_or_else(|| {
            KineticsError::MissingData("kinetic system not set".to_string())
        })?;
        for name in system.rate_constant_names.iter() {
            if !self.rate_values.contains_key(name) {
                return Err(KineticsError::MissingData(format!(
                    "no value given for rate constant '{}'",
                    name
                )));
            }
        }
        for substance in system.substances.iter() {
            if !self.initial_concentrations.contains_key(substance) {
                return Err(KineticsError::MissingData(format!(
                    "no initial concentration for substance '{}'",
                    substance
                )));
            }
        }
        if self.t_final <= self.t0 {
            return Err(KineticsError::InvalidConfiguration(
                "integration interval not set or empty".to_string(),
            ));
        }
        Ok(())
    }
    ///////////////////////////////////////////SOLVING////////////////////////////////////////////////
    /// Substitute the numeric rate constants and hand the system to the solver.
    pub fn solve(&mut self) -> Result<(), KineticsError> {
        self.check_task()?;
        let system = self.system.as_ref().ok_or_else(|| {
            KineticsError::MissingData("kinetic system not set".to_string())
        })?;

        let eq_system: Vec<Expr> = system.substitute_rate_constants(&self.rate_values)?;
        info!("rate constants substituted, handing {} equations to solver", eq_system.len());

        let mut y0_values = Vec::with_capacity(system.substances.len());
        for substance in system.substances.iter() {
            let c0 = self.initial_concentrations.get(substance).ok_or_else(|| {
                KineticsError::MissingData(format!(
                    "no initial concentration for substance '{}'",
                    substance
                ))
            })?;
            y0_values.push(*c0);
        }
        let y0 = DVector::from_vec(y0_values);

        let mut ode = UniversalODESolver::new(
            eq_system,
            system.substances.clone(),
            "t".to_owned(),
            self.solvertype.clone(),
            self.t0,
            y0,
            self.t_final,
        );
        ode.set_parameters(self.solver_params.clone());
        if let Some(stop_condition) = self.stop_condition.clone() {
            ode.set_stop_condition(stop_condition);
        }
        ode.initialize();
        ode.solve();
        info!("kinetic IVP solved");

        self.solver = Some(ode);
        Ok(())
    }
    ///////////////////////////////////////////RESULTS////////////////////////////////////////////////
    /// Time mesh and solution matrix (columns follow the substance order).
    pub fn get_result(&self) -> Result<(DVector<f64>, DMatrix<f64>), KineticsError> {
        let ode = self.solver.as_ref().ok_or_else(|| {
            KineticsError::MissingData("Solver not initialized. Call solve() first.".to_string())
        })?;
        let (t, y) = ode.get_result();
        let t = t.ok_or_else(|| {
            KineticsError::MissingData("solver returned no time mesh".to_string())
        })?;
        let y = y.ok_or_else(|| {
            KineticsError::MissingData("solver returned no solution".to_string())
        })?;
        Ok((t, y))
    }

    /// Plots the solution using gnuplot.
    pub fn plot(&self) -> Result<(), KineticsError> {
        let ode = self.solver.as_ref().ok_or_else(|| {
            KineticsError::MissingData("Solver not initialized. Call solve() first.".to_string())
        })?;
        ode.plot_result();
        Ok(())
    }

    pub fn plot_in_terminal(&self) -> Result<(), KineticsError> {
        let system = self.system.as_ref().ok_or_else(|| {
            KineticsError::MissingData("kinetic system not set".to_string())
        })?;
        let (t, y) = self.get_result()?;
        plots_terminal("t".to_string(), system.substances.clone(), t, y);
        Ok(())
    }

    /// Saves the solution results to file.
    pub fn save_result(&self) -> Result<(), KineticsError> {
        let ode = self.solver.as_ref().ok_or_else(|| {
            KineticsError::MissingData("Solver not initialized. Call solve() first.".to_string())
        })?;
        ode.save_result().map_err(|e| {
            KineticsError::InvalidConfiguration(format!("Failed to save result: {:?}", e))
        })?;
        Ok(())
    }
}
