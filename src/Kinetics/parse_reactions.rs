//! Parsing of reaction-equation strings into [`ElementaryReaction`] data.
//!
//! The accepted grammar is the usual chemistry shorthand: sides separated by
//! `=>`, `->` or `=`, terms separated by `+`, every term an optional numeric
//! multiplier followed by a substance name. A term may carry a `**p` suffix
//! which overrides the degree of concentration in the kinetic function; as a
//! rule the degrees coincide with the stoichiometric coefficients of the
//! reagents, however for empirical reactions they may differ.
//!
//! Examples of accepted input: `"A => B"`, `"2 H2 + O2 = 2 H2O"`,
//! `"B + C -> A + C"` (catalyst cancels out of the net change),
//! `"A**0.5 + B => C"` (empirical half-order in A).
use crate::Kinetics::reaction_system::{ElementaryReaction, KineticsError};
use regex::Regex;
use std::collections::HashMap;

/// A single parsed term: multiplier, substance name, optional empirical order.
#[derive(Debug, Clone, PartialEq)]
struct EquationTerm {
    coefficient: f64,
    substance: String,
    empirical_order: Option<f64>,
}

fn term_regex() -> Regex {
    // "2 H2O", "H2O", "1.5 A", "A**0.3"
    Regex::new(r"^(\d+(?:\.\d+)?)?\s*([A-Za-z][A-Za-z0-9_()*']*?)(?:\*\*(\d+(?:\.\d+)?))?$")
        .expect("term regex is valid")
}

/// Split an equation into left and right sides at the first `=>`, `->` or `=`.
fn split_equation(eq: &str) -> Result<(&str, &str), KineticsError> {
    for separator in ["=>", "->", "="] {
        if let Some(position) = eq.find(separator) {
            let lhs = &eq[..position];
            let rhs = &eq[position + separator.len()..];
            if lhs.trim().is_empty() || rhs.trim().is_empty() {
                return Err(KineticsError::MalformedEquation(format!(
                    "equation '{}' has an empty side",
                    eq
                )));
            }
            return Ok((lhs, rhs));
        }
    }
    Err(KineticsError::MalformedEquation(format!(
        "no '=>', '->' or '=' separator in equation '{}'",
        eq
    )))
}

fn parse_side(side: &str, eq: &str) -> Result<Vec<EquationTerm>, KineticsError> {
    let re = term_regex();
    let mut terms = Vec::new();
    for raw_term in side.split('+') {
        let raw_term = raw_term.trim();
        if raw_term.is_empty() {
            return Err(KineticsError::MalformedEquation(format!(
                "empty term in equation '{}'",
                eq
            )));
        }
        let captures = re.captures(raw_term).ok_or_else(|| {
            KineticsError::MalformedEquation(format!(
                "can not parse term '{}' in equation '{}'",
                raw_term, eq
            ))
        })?;
        let coefficient = match captures.get(1) {
            Some(c) => c.as_str().parse::<f64>().map_err(|_| {
                KineticsError::MalformedEquation(format!(
                    "bad multiplier in term '{}' of equation '{}'",
                    raw_term, eq
                ))
            })?,
            None => 1.0,
        };
        let substance = captures
            .get(2)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                KineticsError::MalformedEquation(format!(
                    "no substance name in term '{}' of equation '{}'",
                    raw_term, eq
                ))
            })?;
        let empirical_order = match captures.get(3) {
            Some(p) => Some(p.as_str().parse::<f64>().map_err(|_| {
                KineticsError::MalformedEquation(format!(
                    "bad degree in term '{}' of equation '{}'",
                    raw_term, eq
                ))
            })?),
            None => None,
        };
        terms.push(EquationTerm {
            coefficient,
            substance,
            empirical_order,
        });
    }
    Ok(terms)
}

/// Parse a reaction equation into name-keyed reactant orders and net changes.
///
/// The left side fixes the degrees of concentration (the `**p` suffix wins over
/// the multiplier when present), the net stoichiometry is right minus left; a
/// substance appearing on both sides with equal multipliers cancels and drops
/// out of the net-change mapping entirely.
pub fn parse_reaction_equation(
    eq: &str,
    rate_constant: &str,
) -> Result<ElementaryReaction, KineticsError> {
    let (lhs, rhs) = split_equation(eq)?;
    let lhs_terms = parse_side(lhs, eq)?;
    let rhs_terms = parse_side(rhs, eq)?;

    let mut reactants: HashMap<String, f64> = HashMap::new();
    let mut net_stoich: HashMap<String, f64> = HashMap::new();

    for term in lhs_terms.iter() {
        let order = term.empirical_order.unwrap_or(term.coefficient);
        *reactants.entry(term.substance.clone()).or_insert(0.0) += order;
        *net_stoich.entry(term.substance.clone()).or_insert(0.0) -= term.coefficient;
    }
    for term in rhs_terms.iter() {
        *net_stoich.entry(term.substance.clone()).or_insert(0.0) += term.coefficient;
    }
    net_stoich.retain(|_, nu| *nu != 0.0);
    reactants.retain(|_, order| *order != 0.0);

    Ok(ElementaryReaction {
        rate_constant: rate_constant.to_string(),
        reactants,
        net_stoich,
    })
}

/// Substance names of an equation in textual appearance order, left side first,
/// duplicates removed. Useful for building a declared substance list that reads
/// the way the mechanism was written.
pub fn substances_in_equation(eq: &str) -> Result<Vec<String>, KineticsError> {
    let (lhs, rhs) = split_equation(eq)?;
    let mut substances: Vec<String> = Vec::new();
    for term in parse_side(lhs, eq)?.iter().chain(parse_side(rhs, eq)?.iter()) {
        if !substances.contains(&term.substance) {
            substances.push(term.substance.clone());
        }
    }
    Ok(substances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_decay() {
        let reaction = parse_reaction_equation("A => B", "k1").unwrap();
        assert_eq!(reaction.rate_constant, "k1");
        assert_eq!(reaction.reactants, HashMap::from([("A".to_string(), 1.0)]));
        assert_eq!(
            reaction.net_stoich,
            HashMap::from([("A".to_string(), -1.0), ("B".to_string(), 1.0)])
        );
    }

    #[test]
    fn test_multipliers_and_separators() {
        for eq in ["2 H2 + O2 = 2 H2O", "2H2 + O2 -> 2H2O", "2 H2 + O2 => 2 H2O"] {
            let reaction = parse_reaction_equation(eq, "kb").unwrap();
            assert_eq!(
                reaction.reactants,
                HashMap::from([("H2".to_string(), 2.0), ("O2".to_string(), 1.0)])
            );
            assert_eq!(
                reaction.net_stoich,
                HashMap::from([
                    ("H2".to_string(), -2.0),
                    ("O2".to_string(), -1.0),
                    ("H2O".to_string(), 2.0)
                ])
            );
        }
    }

    #[test]
    fn test_catalyst_cancels_out_of_net_change() {
        let reaction = parse_reaction_equation("B + C => A + C", "k2").unwrap();
        // C drives the rate but its net change is zero
        assert_eq!(
            reaction.reactants,
            HashMap::from([("B".to_string(), 1.0), ("C".to_string(), 1.0)])
        );
        assert_eq!(
            reaction.net_stoich,
            HashMap::from([("B".to_string(), -1.0), ("A".to_string(), 1.0)])
        );
    }

    #[test]
    fn test_empirical_order_overrides_multiplier() {
        let reaction = parse_reaction_equation("2 A**0.5 + B => C", "k3").unwrap();
        assert_eq!(reaction.reactants["A"], 0.5);
        // the net change still follows the stoichiometric multiplier
        assert_eq!(reaction.net_stoich["A"], -2.0);
    }

    #[test]
    fn test_repeated_substance_on_one_side_accumulates() {
        let reaction = parse_reaction_equation("B + B => C", "k3").unwrap();
        assert_eq!(reaction.reactants, HashMap::from([("B".to_string(), 2.0)]));
        assert_eq!(
            reaction.net_stoich,
            HashMap::from([("B".to_string(), -2.0), ("C".to_string(), 1.0)])
        );
    }

    #[test]
    fn test_malformed_equations_are_rejected() {
        for eq in ["A + B", "=> B", "A =>", "A + => B", "A => 2", "A - B => C"] {
            let result = parse_reaction_equation(eq, "k");
            assert!(result.is_err(), "expected error for '{}'", eq);
        }
    }

    #[test]
    fn test_substances_in_equation_textual_order() {
        let substances = substances_in_equation("B + C => A + C").unwrap();
        assert_eq!(
            substances,
            vec!["B".to_string(), "C".to_string(), "A".to_string()]
        );
    }
}
