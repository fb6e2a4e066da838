//! # Stoichiometry Module
//!
//! Turns the sparse, name-keyed reaction mappings into dense matrices indexed by
//! validated species positions. All name resolution happens here, once, at the
//! system boundary: downstream code works with plain `Vec<Vec<f64>>` rows and can
//! not hit an unknown key anymore.
//!
//! Produced data structures:
//! 1) stoichiometric matrix S: rows = reactions, columns = species, entries are the
//!    signed net change of the species per reaction event
//! 2) matrix of reactant orders G: rows = reactions, columns = species, entries are
//!    the degrees of concentration in the kinetic function. As a rule the degrees
//!    coincide with the stoichiometric coefficients of the reagents; for empirical
//!    reactions they may differ, so the two matrices are kept separately.
//! 3) map substance name -> column index, fixing the state-vector index convention
use crate::Kinetics::reaction_system::{ElementaryReaction, KineticsError};
use std::collections::{HashMap, HashSet};

/// Dense stoichiometric data for a validated reaction set.
///
/// Row order follows the input reaction order, column order follows the declared
/// substance order. The same column convention is used by the derivative vector,
/// the Jacobian and the solver state vector.
#[derive(Debug, Clone, PartialEq)]
pub struct StoichData {
    /// substance names in declared order (column convention)
    pub substances: Vec<String>,
    /// substance name -> column index
    pub substance_index: HashMap<String, usize>,
    /// S\[j\]\[i\]: net change of substance i in reaction j
    pub stoich_matrix: Vec<Vec<f64>>,
    /// G\[j\]\[i\]: concentration degree of substance i in the rate law of reaction j
    pub reactant_orders: Vec<Vec<f64>>,
}

impl StoichData {
    /// Validate the substance list and resolve it to a name -> index map.
    ///
    /// A repeated name is rejected: the declared order fixes vector and matrix
    /// index conventions, and a duplicate would make them ambiguous.
    pub fn index_substances(
        substances: &[String],
    ) -> Result<HashMap<String, usize>, KineticsError> {
        let mut substance_index: HashMap<String, usize> = HashMap::new();
        for (i, name) in substances.iter().enumerate() {
            if substance_index.insert(name.clone(), i).is_some() {
                return Err(KineticsError::DuplicateSpecies {
                    species: name.clone(),
                });
            }
        }
        Ok(substance_index)
    }

    /// Build dense matrices from name-keyed reactions.
    ///
    /// Every name mentioned in a reactant or net-stoichiometry mapping must be in
    /// the declared substance list; the first miss aborts with the offending name
    /// and reaction index. Mapping entries equal to zero are dropped, absent
    /// entries stay zero, so omission and an explicit zero produce the same row.
    pub fn from_reactions(
        reactions: &[ElementaryReaction],
        substances: &[String],
    ) -> Result<Self, KineticsError> {
        let substance_index = Self::index_substances(substances)?;
        let n = substances.len();
        let mut stoich_matrix: Vec<Vec<f64>> = Vec::with_capacity(reactions.len());
        let mut reactant_orders: Vec<Vec<f64>> = Vec::with_capacity(reactions.len());

        for (j, reaction) in reactions.iter().enumerate() {
            let mut s_row = vec![0.0; n];
            let mut g_row = vec![0.0; n];
            for (name, order) in reaction.reactants.iter() {
                let i = *substance_index.get(name).ok_or_else(|| {
                    KineticsError::UnknownSpecies {
                        species: name.clone(),
                        reaction_index: j,
                    }
                })?;
                g_row[i] = *order;
            }
            for (name, nu) in reaction.net_stoich.iter() {
                let i = *substance_index.get(name).ok_or_else(|| {
                    KineticsError::UnknownSpecies {
                        species: name.clone(),
                        reaction_index: j,
                    }
                })?;
                s_row[i] = *nu;
            }
            stoich_matrix.push(s_row);
            reactant_orders.push(g_row);
        }

        Ok(Self {
            substances: substances.to_vec(),
            substance_index,
            stoich_matrix,
            reactant_orders,
        })
    }

    pub fn number_of_reactions(&self) -> usize {
        self.stoich_matrix.len()
    }

    pub fn number_of_substances(&self) -> usize {
        self.substances.len()
    }

    /// Per-reaction sums of the net stoichiometric changes.
    ///
    /// A reaction that only redistributes molecules between the declared
    /// substances sums to zero; when every entry is zero the sum of all
    /// derivative expressions of the built system vanishes identically. A
    /// nonzero entry names a reaction that creates or destroys molecules on net.
    pub fn conservation_defect(&self) -> Vec<f64> {
        self.stoich_matrix
            .iter()
            .map(|row| row.iter().sum())
            .collect()
    }
}

/// Collect the substance names mentioned by a reaction set.
///
/// Names are gathered per reaction (reactants first, then net changes) in
/// alphabetical order within a reaction and in first-appearance order across
/// reactions, so the result is deterministic for map-based inputs. Intended as a
/// convenience when the caller does not want to declare the list explicitly;
/// declaring it stays the way to control index order.
pub fn substances_from_reactions(reactions: &[ElementaryReaction]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut substances: Vec<String> = Vec::new();
    for reaction in reactions.iter() {
        let mut mentioned: Vec<&String> = reaction
            .reactants
            .keys()
            .chain(reaction.net_stoich.keys())
            .collect();
        mentioned.sort();
        for name in mentioned {
            if seen.insert(name.clone()) {
                substances.push(name.clone());
            }
        }
    }
    substances
}
