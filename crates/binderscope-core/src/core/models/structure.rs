use super::atom::Atom;
use super::chain::Chain;
use super::residue::{Residue, ResidueKey};
use crate::core::validation::{ValidationError, validate_confidence};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Where a structure came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StructureSource {
    /// Predicted from a sequence by a structure-prediction service.
    SequenceDerived {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    /// Supplied directly as a coordinate file.
    #[default]
    Uploaded,
    /// Retrieved from a public database by its accession id.
    FetchedById { id: String },
}

impl fmt::Display for StructureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureSource::SequenceDerived { model: Some(model) } => {
                write!(f, "predicted ({})", model)
            }
            StructureSource::SequenceDerived { model: None } => write!(f, "predicted"),
            StructureSource::Uploaded => write!(f, "uploaded"),
            StructureSource::FetchedById { id } => write!(f, "fetched ({})", id),
        }
    }
}

/// A parsed protein structure: chains of residues of atoms.
///
/// Chains keep the order in which they first appear in the source file and chain
/// identifiers are unique. Within a chain, residue numbers never decrease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Structure {
    name: String,
    #[serde(default)]
    source: StructureSource,
    chains: Vec<Chain>,
    /// Per-residue model confidence (pLDDT), one value per residue in structure order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<Vec<f64>>,
}

impl Structure {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &StructureSource {
        &self.source
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Iterates over every residue in chain order, then sequence order.
    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.chains.iter().flat_map(|c| c.residues.iter())
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues().flat_map(|r| r.atoms().iter())
    }

    pub fn residue(&self, key: ResidueKey) -> Option<&Residue> {
        self.chain(key.chain_id)?
            .residues
            .iter()
            .find(|r| r.number == key.number)
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.residues().map(|r| r.atoms().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_count() == 0
    }

    /// The largest positive residue number, or 0 when there is none.
    pub fn max_residue_number(&self) -> usize {
        self.residues()
            .filter_map(|r| usize::try_from(r.number).ok())
            .max()
            .unwrap_or(0)
    }

    /// One-letter sequence over all chains, concatenated in chain order.
    pub fn sequence(&self) -> String {
        self.chains.iter().map(Chain::sequence).collect()
    }

    pub fn confidence(&self) -> Option<&[f64]> {
        self.confidence.as_deref()
    }

    pub fn mean_confidence(&self) -> Option<f64> {
        let values = self.confidence.as_ref().filter(|v| !v.is_empty())?;
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Attaches a per-residue confidence array after checking its length and range.
    pub fn with_confidence(mut self, values: Vec<f64>) -> Result<Self, ValidationError> {
        validate_confidence(&values, self.residue_count())?;
        self.confidence = Some(values);
        Ok(self)
    }

    pub fn with_source(mut self, source: StructureSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Reads per-residue confidence from the B-factor column of each residue's
    /// representative atom.
    ///
    /// Prediction services write pLDDT there. Returns `None` unless every residue
    /// carries a value in `[0, 100]`, so crystallographic files with missing or
    /// out-of-range B-factors are left without confidence.
    pub fn confidence_from_b_factors(&self) -> Option<Vec<f64>> {
        if self.residue_count() == 0 {
            return None;
        }
        self.residues()
            .map(|r| {
                r.representative_atom()
                    .and_then(|a| a.b_factor)
                    .filter(|b| (0.0..=100.0).contains(b))
            })
            .collect()
    }

    /// Attaches [`confidence_from_b_factors`](Self::confidence_from_b_factors) when available.
    pub fn with_b_factor_confidence(mut self) -> Self {
        if let Some(values) = self.confidence_from_b_factors() {
            self.confidence = Some(values);
        }
        self
    }

    /// Re-checks the rules that [`StructureBuilder`] and [`with_confidence`](Self::with_confidence)
    /// guarantee, for structures that arrive through deserialization.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken rule.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.id) {
                return Err(format!("chain '{}' appears more than once", chain.id));
            }
            if let Some(residue) = chain.residues.iter().find(|r| r.atoms().is_empty()) {
                return Err(format!("residue {} has no atoms", residue.key()));
            }
            if let Some(residue) = chain.residues.iter().find(|r| r.chain_id != chain.id) {
                return Err(format!(
                    "residue {} is stored under chain '{}'",
                    residue.key(),
                    chain.id
                ));
            }
            if let Some(pair) = chain.residues.windows(2).find(|w| w[1].number < w[0].number) {
                return Err(format!(
                    "residue {} follows {} in chain '{}'",
                    pair[1].number, pair[0].number, chain.id
                ));
            }
        }
        if let Some(values) = &self.confidence {
            validate_confidence(values, self.residue_count())
                .map_err(|e| format!("structure '{}': {}", self.name, e))?;
        }
        Ok(())
    }
}

/// Incrementally assembles a [`Structure`] from atom records.
///
/// Atoms are routed to their chain and residue by `(chain_id, residue_number)`.
/// Records for an already-seen residue are merged into it even when they are not
/// contiguous in the file. Residues are sorted by number within each chain on
/// [`build`](StructureBuilder::build).
#[derive(Debug, Default)]
pub struct StructureBuilder {
    chains: Vec<Chain>,
    chain_index: HashMap<char, usize>,
    residue_index: HashMap<ResidueKey, (usize, usize)>,
    atom_count: usize,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> &mut Self {
        let key = ResidueKey::new(atom.chain_id, atom.residue_number);

        let (chain_idx, res_idx) = match self.residue_index.get(&key) {
            Some(&indices) => indices,
            None => {
                let chain_idx = *self.chain_index.entry(atom.chain_id).or_insert_with(|| {
                    self.chains.push(Chain::new(atom.chain_id));
                    self.chains.len() - 1
                });
                let chain = &mut self.chains[chain_idx];
                chain.residues.push(Residue::new(
                    atom.residue_number,
                    &atom.residue_name,
                    atom.chain_id,
                ));
                let indices = (chain_idx, chain.residues.len() - 1);
                self.residue_index.insert(key, indices);
                indices
            }
        };

        self.chains[chain_idx].residues[res_idx].push_atom(atom);
        self.atom_count += 1;
        self
    }

    pub fn contains(&self, key: ResidueKey, atom_name: &str) -> bool {
        self.residue_index
            .get(&key)
            .map(|&(c, r)| self.chains[c].residues[r].atom(atom_name).is_some())
            .unwrap_or(false)
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn build(self, name: &str) -> Structure {
        let mut chains = self.chains;
        for chain in &mut chains {
            chain.residues.sort_by_key(|r| r.number);
        }
        Structure {
            name: name.to_string(),
            source: StructureSource::default(),
            chains,
            confidence: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atom(serial: usize, name: &str, res: &str, chain: char, num: isize) -> Atom {
        Atom::new(serial, name, res, chain, num, Point3::new(serial as f64, 0.0, 0.0))
    }

    fn two_chain_structure() -> Structure {
        let mut builder = StructureBuilder::new();
        builder
            .add_atom(atom(1, "N", "MET", 'A', 1).with_b_factor(Some(90.0)))
            .add_atom(atom(2, "CA", "MET", 'A', 1).with_b_factor(Some(80.0)))
            .add_atom(atom(3, "CA", "GLY", 'A', 2).with_b_factor(Some(60.0)))
            .add_atom(atom(4, "CA", "TRP", 'B', 5).with_b_factor(Some(70.0)));
        builder.build("complex")
    }

    #[test]
    fn builder_groups_atoms_into_chains_and_residues() {
        let structure = two_chain_structure();
        assert_eq!(structure.name(), "complex");
        assert_eq!(structure.chains().len(), 2);
        assert_eq!(structure.residue_count(), 3);
        assert_eq!(structure.atom_count(), 4);
        assert_eq!(structure.sequence(), "MGW");
        assert!(!structure.is_empty());
        assert_eq!(structure.chain('A').unwrap().len(), 2);
    }

    #[test]
    fn builder_merges_non_contiguous_records_and_sorts_residues() {
        let mut builder = StructureBuilder::new();
        builder
            .add_atom(atom(1, "CA", "ALA", 'A', 3))
            .add_atom(atom(2, "CA", "GLY", 'A', 1))
            .add_atom(atom(3, "CB", "ALA", 'A', 3));
        assert!(builder.contains(ResidueKey::new('A', 3), "CB"));
        assert!(!builder.contains(ResidueKey::new('A', 1), "CB"));
        assert_eq!(builder.atom_count(), 3);

        let structure = builder.build("s");
        let numbers: Vec<isize> = structure.residues().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(
            structure.residue(ResidueKey::new('A', 3)).unwrap().atoms().len(),
            2
        );
    }

    #[test]
    fn confidence_is_read_from_representative_b_factors() {
        let structure = two_chain_structure();
        assert_eq!(structure.confidence_from_b_factors(), Some(vec![80.0, 60.0, 70.0]));
        let annotated = structure.with_b_factor_confidence();
        assert_eq!(annotated.mean_confidence(), Some(70.0));
    }

    #[test]
    fn confidence_is_absent_when_any_b_factor_is_missing_or_out_of_range() {
        let mut builder = StructureBuilder::new();
        builder
            .add_atom(atom(1, "CA", "ALA", 'A', 1).with_b_factor(Some(50.0)))
            .add_atom(atom(2, "CA", "ALA", 'A', 2));
        assert_eq!(builder.build("s").confidence_from_b_factors(), None);

        let mut builder = StructureBuilder::new();
        builder.add_atom(atom(1, "CA", "ALA", 'A', 1).with_b_factor(Some(150.0)));
        assert_eq!(builder.build("s").confidence_from_b_factors(), None);
    }

    #[test]
    fn with_confidence_validates_length_and_range() {
        let structure = two_chain_structure();
        assert!(structure.clone().with_confidence(vec![1.0, 2.0]).is_err());
        assert!(structure.clone().with_confidence(vec![1.0, 2.0, 101.0]).is_err());

        let annotated = structure.with_confidence(vec![90.0, 60.0, 60.0]).unwrap();
        assert_eq!(annotated.confidence(), Some(&[90.0, 60.0, 60.0][..]));
        assert_eq!(annotated.mean_confidence(), Some(70.0));
    }

    #[test]
    fn mean_confidence_is_none_without_confidence() {
        assert_eq!(two_chain_structure().mean_confidence(), None);
    }

    #[test]
    fn source_defaults_to_uploaded_and_can_be_replaced() {
        let structure = two_chain_structure();
        assert_eq!(structure.source(), &StructureSource::Uploaded);
        let predicted = structure.with_source(StructureSource::SequenceDerived {
            model: Some("esmfold".into()),
        });
        assert_eq!(predicted.source().to_string(), "predicted (esmfold)");
    }

    #[test]
    fn empty_builder_produces_empty_structure() {
        let structure = StructureBuilder::new().build("empty");
        assert!(structure.is_empty());
        assert_eq!(structure.residue_count(), 0);
        assert_eq!(structure.confidence_from_b_factors(), None);
    }
}
