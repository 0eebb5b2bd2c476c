use super::residue::Residue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chain {
    pub id: char,                      // Chain identifier (e.g., 'A', 'B')
    pub(crate) residues: Vec<Residue>, // Residues in non-decreasing sequence-number order
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// One-letter sequence of the chain, with `X` for anything that is not an amino acid.
    pub fn sequence(&self) -> String {
        self.residues.iter().map(Residue::one_letter_code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chain_is_empty() {
        let chain = Chain::new('B');
        assert_eq!(chain.id, 'B');
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert_eq!(chain.sequence(), "");
    }

    #[test]
    fn sequence_uses_one_letter_codes() {
        let mut chain = Chain::new('A');
        chain.residues.push(Residue::new(1, "MET", 'A'));
        chain.residues.push(Residue::new(2, "LYS", 'A'));
        chain.residues.push(Residue::new(3, "HOH", 'A'));
        assert_eq!(chain.sequence(), "MKX");
    }
}
