use crate::core::utils::identifiers::infer_element;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Represents a single atom record read from a structure file.
///
/// Atoms are created once by the structure readers and never mutated afterwards.
/// Each atom carries enough residue context (name, chain, sequence number) to be
/// grouped and reported on its own, which keeps contact reports self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Atom {
    /// The atom serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "OG1").
    pub name: String,
    /// The element symbol (e.g., "C", "N", "ZN").
    pub element: String,
    /// The name of the residue this atom belongs to (e.g., "ALA").
    pub residue_name: String,
    /// Single-character chain identifier.
    pub chain_id: char,
    /// Residue sequence number from the source file.
    pub residue_number: isize,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<f64>,
    /// B-factor column. Prediction services store per-residue confidence (pLDDT) here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_factor: Option<f64>,
    /// Whether the atom came from a HETATM record.
    #[serde(default)]
    pub is_hetero: bool,
}

impl Atom {
    /// Creates a new `Atom` with the element inferred from its name.
    ///
    /// Optional fields (occupancy, B-factor) start out absent and the record is
    /// treated as a standard `ATOM` record; use the `with_*` methods to fill them in.
    ///
    /// # Arguments
    ///
    /// * `serial` - The atom serial number.
    /// * `name` - The atom name.
    /// * `residue_name` - The parent residue name.
    /// * `chain_id` - The parent chain identifier.
    /// * `residue_number` - The parent residue sequence number.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(
        serial: usize,
        name: &str,
        residue_name: &str,
        chain_id: char,
        residue_number: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: infer_element(name, residue_name, false),
            residue_name: residue_name.to_string(),
            chain_id,
            residue_number,
            position,
            occupancy: None,
            b_factor: None,
            is_hetero: false,
        }
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = element.to_ascii_uppercase();
        self
    }

    pub fn with_occupancy(mut self, occupancy: Option<f64>) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn with_b_factor(mut self, b_factor: Option<f64>) -> Self {
        self.b_factor = b_factor;
        self
    }

    /// Marks the atom as coming from a `HETATM` record and re-infers its element,
    /// since hetero groups may carry two-letter elements such as `ZN` or `MG`.
    pub fn hetero(mut self) -> Self {
        self.is_hetero = true;
        self.element = infer_element(&self.name, &self.residue_name, true);
        self
    }

    /// Returns `true` for hydrogen and deuterium atoms.
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.as_str(), "H" | "D")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new(7, "CA", "ALA", 'A', 12, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.serial, 7);
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.element, "C");
        assert_eq!(atom.residue_name, "ALA");
        assert_eq!(atom.chain_id, 'A');
        assert_eq!(atom.residue_number, 12);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert!(atom.occupancy.is_none());
        assert!(atom.b_factor.is_none());
        assert!(!atom.is_hetero);
    }

    #[test]
    fn hetero_atoms_get_two_letter_elements() {
        let atom = Atom::new(1, "ZN", "ZN", 'C', 1, Point3::origin()).hetero();
        assert!(atom.is_hetero);
        assert_eq!(atom.element, "ZN");

        let calcium = Atom::new(2, "CA", "CA", 'C', 2, Point3::origin()).hetero();
        assert_eq!(calcium.element, "CA");
    }

    #[test]
    fn alpha_carbon_in_protein_residue_is_carbon() {
        let atom = Atom::new(1, "CA", "GLY", 'A', 1, Point3::origin());
        assert_eq!(atom.element, "C");
    }

    #[test]
    fn builder_methods_set_optional_fields() {
        let atom = Atom::new(1, "N", "MET", 'A', 1, Point3::origin())
            .with_occupancy(Some(1.0))
            .with_b_factor(Some(87.5))
            .with_element("n");
        assert_eq!(atom.occupancy, Some(1.0));
        assert_eq!(atom.b_factor, Some(87.5));
        assert_eq!(atom.element, "N");
    }

    #[test]
    fn hydrogen_detection_uses_element() {
        let h = Atom::new(1, "HA", "ALA", 'A', 1, Point3::origin());
        let d = Atom::new(2, "D1", "ALA", 'A', 1, Point3::origin());
        let c = Atom::new(3, "CB", "ALA", 'A', 1, Point3::origin());
        assert!(h.is_hydrogen());
        assert!(d.is_hydrogen());
        assert!(!c.is_hydrogen());
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let atom1 = Atom::new(1, "O", "SER", 'B', 4, Point3::new(0.5, 0.0, -1.0))
            .with_b_factor(Some(50.0));
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
