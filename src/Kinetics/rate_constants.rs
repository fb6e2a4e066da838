//! Rate-constant bookkeeping: the interning table that fixes the parameter-vector
//! convention, and the Arrhenius form for turning named constants into numbers or
//! temperature-dependent expressions.
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Universal gas constant in J/(mol·K)
pub const R_G: f64 = 8.314;
#[allow(non_upper_case_globals)]
const Rsym: Expr = Expr::Const(8.314);

/// Interning table for rate-constant names.
///
/// A name is registered on first sight and every later reference resolves to the
/// same handle, so two reactions sharing a constant name share one symbol. The
/// registration order is the parameter-vector order seen by every downstream
/// consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSymbolTable {
    names: Vec<String>,
    index_by_name: HashMap<String, usize>,
}

impl RateSymbolTable {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            index_by_name: HashMap::new(),
        }
    }

    /// Register a name (no-op when already present) and return its handle.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index_by_name.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index_by_name.insert(name.to_string(), i);
        i
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// Registered names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// One symbolic variable per registered name, in first-seen order.
    pub fn symbols(&self) -> Vec<Expr> {
        self.names
            .iter()
            .map(|name| Expr::Var(name.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Arrhenius parameters of an elementary rate constant:
/// k(T) = A * T^n * exp(-E/(R*T))
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrheniusRate {
    /// Pre-exponential factor (units depend on reaction order)
    pub A: f64,
    /// Temperature exponent (dimensionless)
    pub n: f64,
    /// Activation energy (J/mol)
    pub E: f64,
}

impl ArrheniusRate {
    pub fn new(A: f64, n: f64, E: f64) -> Self {
        Self { A, n, E }
    }

    /// Numeric rate constant at the given temperature.
    /// ATTENTION! don't forget to use absolute temperature in Kelvin!
    pub fn K_const(&self, Temp: f64) -> f64 {
        self.A * Temp.powf(self.n) * f64::exp(-self.E / (Temp * R_G))
    }

    /// Symbolic twin of [`K_const`](Self::K_const) over a temperature expression.
    pub fn K_expr(&self, Temp: Expr) -> Expr {
        let A = Expr::Const(self.A);
        let n = Expr::Const(self.n);
        let E = Expr::Const(self.E);
        let k0 = A * (Temp.clone()).pow(n);
        k0 * (-E / (Rsym * Temp)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interning_dedups_by_name_in_first_seen_order() {
        let mut table = RateSymbolTable::new();
        assert_eq!(table.intern("k1"), 0);
        assert_eq!(table.intern("k2"), 1);
        assert_eq!(table.intern("k1"), 0);
        assert_eq!(table.intern("k3"), 2);
        assert_eq!(table.names(), &["k1", "k2", "k3"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.index_of("k2"), Some(1));
        assert_eq!(table.index_of("k9"), None);

        let symbols = table.symbols();
        assert_eq!(symbols[1], Expr::Var("k2".to_string()));
    }

    #[test]
    fn test_arrhenius_const() {
        let rate = ArrheniusRate::new(1.0, 2.0, 300.0);
        let temp = 298.0;
        let expected = 1.0 * (298.0_f64).powf(2.0) * f64::exp(-300.0 / (298.0 * 8.314));
        assert_relative_eq!(rate.K_const(temp), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_arrhenius_symbolic_matches_numeric() {
        let rate = ArrheniusRate::new(1e6, 0.5, 50000.0);
        let k_sym = rate.K_expr(Expr::Var("T".to_string()));
        for temp in [300.0, 500.0, 1200.0] {
            let k_fun = k_sym.clone().lambdify_owned(vec!["T"]);
            assert_relative_eq!(
                k_fun(vec![temp]),
                rate.K_const(temp),
                max_relative = 1e-10
            );
        }
    }
}
