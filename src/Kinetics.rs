/// The mathematical core of the crate. The module takes as input a vector of
/// elementary reactions (each: rate-constant name, degrees of concentration of
/// the reagents, net stoichiometric changes) and a declared substance list, and
/// produces the following data:
/// 1) one symbolic expression per substance for its time derivative
/// 2) the ordered vector of concentration symbols (the state-vector convention)
/// 3) the ordered vector of rate-constant symbols (the parameter-vector convention)
/// Downstream the symbolic engine differentiates the derivative vector into the
/// Jacobian and lambdifies both into numeric functions for the IVP solvers.
///
/// # Examples
/// ```
/// use KiOde::Kinetics::reaction_system::{ElementaryReaction, build_kinetic_equations};
/// use std::collections::HashMap;
/// let reactions = vec![
///     ElementaryReaction::new(
///         "l1",
///         HashMap::from([("x".to_string(), 1.0)]),
///         HashMap::from([("x".to_string(), -1.0), ("y".to_string(), 1.0)]),
///     ),
///     ElementaryReaction::new(
///         "l2",
///         HashMap::from([("y".to_string(), 1.0)]),
///         HashMap::from([("y".to_string(), -1.0), ("z".to_string(), 1.0)]),
///     ),
/// ];
/// let substances = vec!["x".to_string(), "y".to_string(), "z".to_string()];
/// let system = build_kinetic_equations(&reactions, &substances).unwrap();
/// // dx/dt = -l1*x, dy/dt = l1*x - l2*y, dz/dt = l2*y
/// system.pretty_print_equations();
/// ```
pub mod reaction_system;
/// The module takes name-keyed reaction mappings and resolves them, once, at the
/// system boundary into dense matrices: the stoichiometric matrix and the matrix
/// of degrees of concentration for the kinetic function. As a rule the degrees
/// of concentration coincide with the stoicheometric coefficients of the
/// substances in the reaction; however, for empirical reactions they may differ.
/// All unknown-name and duplicate-name errors are caught here; downstream code
/// works with validated integer indices only.
pub mod stoichiometry;
/// Rate-constant bookkeeping: interning of rate-constant names (first-seen
/// order, deduplicated by name - a reused name always means the same physical
/// constant) and the Arrhenius form k(T) = A*T^n*exp(-E/(R*T)) in numeric and
/// symbolic flavours.
pub mod rate_constants;
/// The module takes reaction equations specified as strings in the usual
/// chemistry shorthand and produces [`reaction_system::ElementaryReaction`]
/// data.
///
/// # Examples
/// ```
/// use KiOde::Kinetics::parse_reactions::parse_reaction_equation;
/// let reaction = parse_reaction_equation("2 H2 + O2 => 2 H2O", "kb").unwrap();
/// assert_eq!(reaction.reactants["H2"], 2.0);
/// assert_eq!(reaction.net_stoich["H2O"], 2.0);
/// ```
pub mod parse_reactions;
