/// Initial value problems for kinetic systems: the module wires a built
/// symbolic system together with numeric rate constants and initial
/// concentrations into the general-purpose ODE solver api (BDF, Radau,
/// Backward Euler, RK45). Integration itself is delegated entirely to the
/// solver crate; this module only owns the task bookkeeping.
pub mod kinetic_ivp;
