use super::atom::Atom;
use crate::core::utils::identifiers::{is_amino_acid, is_water, residue_one_letter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a residue within a structure by chain and sequence number.
///
/// Keys order lexicographically on `(chain_id, number)`, which is the tie-break
/// order used for contact reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResidueKey {
    pub chain_id: char,
    pub number: isize,
}

impl ResidueKey {
    pub fn new(chain_id: char, number: isize) -> Self {
        Self { chain_id, number }
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Residue {
    pub number: isize,     // Residue sequence number from source file
    pub name: String,      // Name of the residue (e.g., "ALA", "GLY")
    pub chain_id: char,    // Identifier of the parent chain
    atoms: Vec<Atom>,      // Atoms in file order
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str, chain_id: char) -> Self {
        Self {
            number,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn push_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn key(&self) -> ResidueKey {
        ResidueKey::new(self.chain_id, self.number)
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn alpha_carbon(&self) -> Option<&Atom> {
        self.atom("CA").filter(|a| !a.is_hetero || is_amino_acid(&self.name))
    }

    /// The atom used for residue-level distances: the alpha carbon, or the first
    /// atom when the residue has none. `None` only for an empty residue.
    pub fn representative_atom(&self) -> Option<&Atom> {
        self.alpha_carbon().or_else(|| self.atoms.first())
    }

    /// A residue is hetero when every one of its atoms came from a HETATM record.
    pub fn is_hetero(&self) -> bool {
        !self.atoms.is_empty() && self.atoms.iter().all(|a| a.is_hetero)
    }

    pub fn is_water(&self) -> bool {
        is_water(&self.name)
    }

    pub fn one_letter_code(&self) -> char {
        residue_one_letter(&self.name).unwrap_or('X')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atom(name: &str, residue: &str, x: f64) -> Atom {
        Atom::new(1, name, residue, 'A', 10, Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let residue = Residue::new(10, "GLY", 'A');
        assert_eq!(residue.number, 10);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.chain_id, 'A');
        assert!(residue.atoms().is_empty());
        assert!(residue.representative_atom().is_none());
        assert!(!residue.is_hetero());
    }

    #[test]
    fn representative_atom_prefers_alpha_carbon() {
        let mut residue = Residue::new(10, "ALA", 'A');
        residue.push_atom(atom("N", "ALA", 0.0));
        residue.push_atom(atom("CA", "ALA", 1.5));
        residue.push_atom(atom("C", "ALA", 2.5));
        assert_eq!(residue.representative_atom().unwrap().name, "CA");
    }

    #[test]
    fn representative_atom_falls_back_to_first_atom() {
        let mut residue = Residue::new(10, "ALA", 'A');
        residue.push_atom(atom("N", "ALA", 0.0));
        residue.push_atom(atom("CB", "ALA", 1.5));
        assert_eq!(residue.representative_atom().unwrap().name, "N");
    }

    #[test]
    fn calcium_ion_is_not_an_alpha_carbon() {
        let mut residue = Residue::new(501, "CA", 'A');
        residue.push_atom(atom("CA", "CA", 0.0).hetero());
        assert!(residue.alpha_carbon().is_none());
        assert_eq!(residue.representative_atom().unwrap().name, "CA");
        assert!(residue.is_hetero());
    }

    #[test]
    fn key_orders_by_chain_then_number() {
        let a1 = ResidueKey::new('A', 1);
        let a2 = ResidueKey::new('A', 2);
        let b0 = ResidueKey::new('B', 0);
        assert!(a1 < a2);
        assert!(a2 < b0);
        assert_eq!(a2.to_string(), "A:2");
    }

    #[test]
    fn one_letter_code_defaults_to_x() {
        assert_eq!(Residue::new(1, "TRP", 'A').one_letter_code(), 'W');
        assert_eq!(Residue::new(1, "LIG", 'A').one_letter_code(), 'X');
    }

    #[test]
    fn water_detection_uses_residue_name() {
        assert!(Residue::new(1, "HOH", 'W').is_water());
        assert!(!Residue::new(1, "SER", 'A').is_water());
    }
}
