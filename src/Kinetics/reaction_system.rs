//! # Reaction System Module
//!
//! This is the mathematical core of the crate: it assembles the symbolic
//! right-hand side of a kinetic ODE system from a list of elementary reactions
//! and a declared substance list.
//!
//! ## Mathematical Framework
//!
//! Under the law of mass action every reaction j contributes a rate
//! Rⱼ = kⱼ·∏ᵢ\[Cᵢ\]^Gⱼᵢ, and every substance i accumulates
//! dCᵢ/dt = ∑ⱼ Sⱼᵢ·Rⱼ, where S is the stoichiometric matrix and G the matrix
//! of concentration degrees produced by the stoichiometry module.
//!
//! ## Index Conventions
//!
//! - the derivative vector has exactly one entry per declared substance, in
//!   declared order; the Jacobian rows/columns, lambdified argument order and
//!   solver initial-condition vector all follow the same order
//! - rate-constant symbols are collected in first-appearance order across the
//!   reaction list, deduplicated by name; a reused name always means the same
//!   physical constant
//!
//! ## Key Insights
//!
//! - the builder is a pure function: no I/O, no mutation of inputs, fresh
//!   symbols per call, so it is safe to call repeatedly and in parallel
//! - validation happens once, at the system boundary: unknown or duplicated
//!   substance names abort construction before any expression is built, there
//!   is no partial result
//! - the builder is a syntactic translator from stoichiometry to algebra: it
//!   does not check units, physical plausibility or mass balance
use crate::Kinetics::parse_reactions::parse_reaction_equation;
use crate::Kinetics::rate_constants::RateSymbolTable;
use crate::Kinetics::stoichiometry::{StoichData, substances_from_reactions};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// error types of kinetic system construction
#[derive(Debug, Error)]
pub enum KineticsError {
    #[error("unknown species '{species}' in reaction {reaction_index}")]
    UnknownSpecies {
        species: String,
        reaction_index: usize,
    },
    #[error("duplicate species '{species}' in substance list")]
    DuplicateSpecies { species: String },
    #[error("malformed reaction equation: {0}")]
    MalformedEquation(String),
    #[error("missing data: {0}")]
    MissingData(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(String),
}

/// One elementary reaction: a named rate constant, the degrees of concentration
/// of its reagents, and the signed net change of every substance it touches.
///
/// A substance absent from a mapping is treated as degree/change 0, and an
/// explicit zero entry is equivalent to omission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementaryReaction {
    /// name of the rate constant, e.g. "k1"; shared names share one symbol
    pub rate_constant: String,
    /// substance name -> degree of concentration in the rate law
    pub reactants: HashMap<String, f64>,
    /// substance name -> net stoichiometric change per reaction event
    pub net_stoich: HashMap<String, f64>,
}

impl ElementaryReaction {
    pub fn new(
        rate_constant: &str,
        reactants: HashMap<String, f64>,
        net_stoich: HashMap<String, f64>,
    ) -> Self {
        Self {
            rate_constant: rate_constant.to_string(),
            reactants,
            net_stoich,
        }
    }

    /// Construct from a chemistry-shorthand equation, e.g. `"2 H2 + O2 => 2 H2O"`.
    pub fn from_equation(eq: &str, rate_constant: &str) -> Result<Self, KineticsError> {
        parse_reaction_equation(eq, rate_constant)
    }
}

/// The built artifact: symbolic derivative vector plus the two symbol lists
/// fixing the state-vector and parameter-vector conventions, and the dense
/// stoichiometric data the expressions were assembled from.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticEquationSystem {
    /// d\[substance i\]/dt, one entry per declared substance, declared order
    pub rhs: Vec<Expr>,
    /// declared substance names (state-vector order)
    pub substances: Vec<String>,
    /// concentration symbols, one per substance, declared order
    pub concentration_symbols: Vec<Expr>,
    /// rate-constant names in first-appearance order, deduplicated
    pub rate_constant_names: Vec<String>,
    /// rate-constant symbols matching `rate_constant_names`
    pub rate_constant_symbols: Vec<Expr>,
    /// per-reaction rate expressions Rⱼ in input reaction order
    pub reaction_rates: Vec<Expr>,
    /// dense stoichiometric matrices the system was assembled from
    pub stoich: StoichData,
}

/// Assemble the symbolic ODE right-hand side for a reaction set.
///
/// The contract of the whole crate lives here:
/// 1. validate the substance list (duplicates) and every mapping key (unknown
///    names carry the reaction index), resolving names to dense indices once
/// 2. create one concentration symbol per substance, in declared order
/// 3. intern rate-constant symbols in first-seen order, deduplicated by name
/// 4. per reaction build Rⱼ = kⱼ·∏\[Cᵢ\]^Gⱼᵢ, skipping zero degrees
/// 5. per substance accumulate dCᵢ/dt = ∑ⱼ Sⱼᵢ·Rⱼ from symbolic zero,
///    skipping zero coefficients
///
/// Either a complete, consistent system is returned or the first validation
/// failure aborts the whole construction.
pub fn build_kinetic_equations(
    reactions: &[ElementaryReaction],
    substances: &[String],
) -> Result<KineticEquationSystem, KineticsError> {
    let stoich = StoichData::from_reactions(reactions, substances)?;
    let n = substances.len();
    let k = reactions.len();

    let concentration_symbols: Vec<Expr> = substances
        .iter()
        .map(|name| Expr::Var(name.clone()))
        .collect();

    let mut rate_table = RateSymbolTable::new();
    for reaction in reactions.iter() {
        rate_table.intern(&reaction.rate_constant);
    }
    let rate_constant_symbols = rate_table.symbols();

    // Rⱼ = kⱼ·∏[Cᵢ]^Gⱼᵢ; a zero degree contributes a factor of 1 and is skipped
    let mut reaction_rates: Vec<Expr> = Vec::with_capacity(k);
    for j in 0..k {
        let mut rate_expr = Expr::Var(reactions[j].rate_constant.clone());
        for i in 0..n {
            let degree = stoich.reactant_orders[j][i];
            if degree == 0.0 {
                continue;
            }
            let ci = concentration_symbols[i].clone();
            rate_expr = if degree == 1.0 {
                rate_expr * ci
            } else {
                rate_expr * ci.pow(Expr::Const(degree))
            };
        }
        reaction_rates.push(rate_expr);
    }

    // dCᵢ/dt = ∑ⱼ Sⱼᵢ·Rⱼ, accumulated from symbolic zero
    let mut rhs: Vec<Expr> = vec![Expr::Const(0.0); n];
    for j in 0..k {
        for i in 0..n {
            let nu = stoich.stoich_matrix[j][i];
            if nu == 0.0 {
                continue;
            }
            let rate_j = reaction_rates[j].clone();
            rhs[i] = if nu == 1.0 {
                rhs[i].clone() + rate_j
            } else if nu == -1.0 {
                rhs[i].clone() - rate_j
            } else {
                rhs[i].clone() + Expr::Const(nu) * rate_j
            };
        }
    }
    let rhs: Vec<Expr> = rhs.into_iter().map(|expr| expr.symplify()).collect();

    Ok(KineticEquationSystem {
        rhs,
        substances: substances.to_vec(),
        concentration_symbols,
        rate_constant_names: rate_table.names().to_vec(),
        rate_constant_symbols,
        reaction_rates,
        stoich,
    })
}

impl KineticEquationSystem {
    pub fn number_of_substances(&self) -> usize {
        self.substances.len()
    }

    /// Jacobian of the derivative vector with respect to the concentration
    /// vector: entry (i, l) = ∂(dCᵢ/dt)/∂Cₗ, shape n×n in declared order.
    /// Differentiation is delegated to the symbolic engine.
    pub fn jacobian(&self) -> Vec<Vec<Expr>> {
        self.rhs
            .iter()
            .map(|rhs_i| {
                self.substances
                    .iter()
                    .map(|name| rhs_i.diff(name).symplify())
                    .collect()
            })
            .collect()
    }

    /// Substitute numeric values for every rate constant, returning a system
    /// over concentrations only. The map must cover all interned names.
    pub fn substitute_rate_constants(
        &self,
        rate_values: &HashMap<String, f64>,
    ) -> Result<Vec<Expr>, KineticsError> {
        let mut substituted = Vec::with_capacity(self.rhs.len());
        for rhs_i in self.rhs.iter() {
            let mut expr = rhs_i.clone();
            for name in self.rate_constant_names.iter() {
                let value = rate_values.get(name).ok_or_else(|| {
                    KineticsError::MissingData(format!(
                        "no value given for rate constant '{}'",
                        name
                    ))
                })?;
                expr = expr.set_variable(name.as_str(), *value);
            }
            substituted.push(expr.symplify());
        }
        Ok(substituted)
    }

    /// Evaluate the derivative vector numerically at a concentration state.
    ///
    /// `concentrations` follows the declared substance order; rate constants
    /// are taken by name. Lambdification is delegated to the symbolic engine,
    /// with the argument order (concentrations, then rate constants) matching
    /// the two symbol lists.
    pub fn evaluate(
        &self,
        concentrations: &[f64],
        rate_values: &HashMap<String, f64>,
    ) -> Result<Vec<f64>, KineticsError> {
        if concentrations.len() != self.substances.len() {
            return Err(KineticsError::InvalidConfiguration(format!(
                "expected {} concentrations, got {}",
                self.substances.len(),
                concentrations.len()
            )));
        }
        let mut arg_names: Vec<&str> = self.substances.iter().map(|s| s.as_str()).collect();
        let mut arg_values: Vec<f64> = concentrations.to_vec();
        for name in self.rate_constant_names.iter() {
            let value = rate_values.get(name).ok_or_else(|| {
                KineticsError::MissingData(format!("no value given for rate constant '{}'", name))
            })?;
            arg_names.push(name.as_str());
            arg_values.push(*value);
        }

        let mut derivatives = Vec::with_capacity(self.rhs.len());
        for rhs_i in self.rhs.iter() {
            let rhs_fun = rhs_i.clone().lambdify_owned(arg_names.clone());
            derivatives.push(rhs_fun(arg_values.clone()));
        }
        Ok(derivatives)
    }

    /// Sum of all derivative expressions; identically zero for a closed system.
    pub fn sum_of_derivatives(&self) -> Expr {
        let mut total = Expr::Const(0.0);
        for rhs_i in self.rhs.iter() {
            total = total + rhs_i.clone();
        }
        total.symplify()
    }

    /// Print the system as a table: substance | dC/dt expression.
    pub fn pretty_print_equations(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::new("substance"), Cell::new("d[C]/dt")]));
        for (name, rhs_i) in self.substances.iter().zip(self.rhs.iter()) {
            table.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&format!("{}", rhs_i)),
            ]));
        }
        table.printstd();
    }
}

/// Task struct collecting the inputs of a kinetic system and the built artifact.
///
/// The usual workflow:
/// 1) `new()` then `set_reactions_directly()` / `set_reactions_from_equations()`
/// 2) `set_substances()` (or `substances_from_reactions()` when the order does
///    not matter to the caller)
/// 3) `build()` - validates and assembles the symbolic system
/// 4) accessors: `system()`, `jacobian()`, `pretty_print_system()`
#[derive(Debug, Clone, Default)]
pub struct KineticSystemTask {
    /// Optional problem identifier
    pub problem_name: Option<String>,
    /// reactions in input order
    pub reactions: Vec<ElementaryReaction>,
    /// declared substance list fixing the index convention
    pub substances: Vec<String>,
    /// the built system; None until `build()` succeeds
    pub system: Option<KineticEquationSystem>,
}

impl KineticSystemTask {
    pub fn new() -> Self {
        Self {
            problem_name: None,
            reactions: Vec::new(),
            substances: Vec::new(),
            system: None,
        }
    }

    pub fn set_problem_name(&mut self, name: &str) {
        self.problem_name = Some(name.to_string());
    }

    /// set reactions directly
    pub fn set_reactions_directly(&mut self, reactions: Vec<ElementaryReaction>) {
        self.reactions = reactions;
        self.system = None;
    }

    /// set reactions from equation strings paired with rate-constant names
    pub fn set_reactions_from_equations(
        &mut self,
        equations: Vec<(&str, &str)>,
    ) -> Result<(), KineticsError> {
        let mut reactions = Vec::with_capacity(equations.len());
        for (eq, rate_constant) in equations {
            reactions.push(ElementaryReaction::from_equation(eq, rate_constant)?);
        }
        self.reactions = reactions;
        self.system = None;
        Ok(())
    }

    pub fn set_substances(&mut self, substances: Vec<String>) {
        self.substances = substances;
        self.system = None;
    }

    /// Fill the substance list from the reactions themselves (deterministic
    /// order, see the stoichiometry module). Declared lists take precedence.
    pub fn substances_from_reactions(&mut self) {
        self.substances = substances_from_reactions(&self.reactions);
        self.system = None;
    }

    /// Validate that the task is complete before building.
    pub fn check_task(&self) -> Result<(), KineticsError> {
        if self.reactions.is_empty() {
            return Err(KineticsError::MissingData(
                "no reactions set in kinetic task".to_string(),
            ));
        }
        if self.substances.is_empty() {
            return Err(KineticsError::MissingData(
                "no substances set in kinetic task".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the symbolic system from the collected inputs.
    pub fn build(&mut self) -> Result<(), KineticsError> {
        self.check_task()?;
        info!("kinetic task checked!");
        let system = build_kinetic_equations(&self.reactions, &self.substances)?;
        info!(
            "kinetic equations built: {} substances, {} reactions, {} rate constants",
            system.number_of_substances(),
            system.reaction_rates.len(),
            system.rate_constant_names.len()
        );
        self.system = Some(system);
        Ok(())
    }

    pub fn system(&self) -> Result<&KineticEquationSystem, KineticsError> {
        self.system.as_ref().ok_or_else(|| {
            KineticsError::MissingData("kinetic system not built. Call build() first.".to_string())
        })
    }

    /// Jacobian of the built system (see [`KineticEquationSystem::jacobian`]).
    pub fn jacobian(&self) -> Result<Vec<Vec<Expr>>, KineticsError> {
        Ok(self.system()?.jacobian())
    }

    pub fn pretty_print_system(&self) -> Result<(), KineticsError> {
        self.system()?.pretty_print_equations();
        Ok(())
    }
}
