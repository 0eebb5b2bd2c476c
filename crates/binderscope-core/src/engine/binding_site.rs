use super::interface::InterfaceResult;
use crate::core::models::residue::ResidueKey;
use std::collections::BTreeSet;

/// How the target side of an interface lines up with an annotated binding site.
///
/// Site residues are matched by sequence number on any target chain.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSiteOverlap {
    /// Site residues with at least one contact, ascending.
    pub covered: Vec<isize>,
    /// Site residues without any contact, ascending.
    pub missed: Vec<isize>,
    /// Target interface residues outside the site.
    pub off_site: Vec<ResidueKey>,
}

impl BindingSiteOverlap {
    pub fn site_size(&self) -> usize {
        self.covered.len() + self.missed.len()
    }

    /// Fraction of site residues in contact, in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        match self.site_size() {
            0 => 0.0,
            size => self.covered.len() as f64 / size as f64,
        }
    }
}

/// Compares the target interface residues of `result` with `binding_site`.
///
/// Returns `None` for an empty site, which stands for the whole interface.
pub fn binding_site_overlap(result: &InterfaceResult, binding_site: &[isize]) -> Option<BindingSiteOverlap> {
    let site: BTreeSet<isize> = binding_site.iter().copied().collect();
    if site.is_empty() {
        return None;
    }
    let contacted: BTreeSet<isize> = result.target_residues().iter().map(|k| k.number).collect();
    let (covered, missed): (Vec<isize>, Vec<isize>) =
        site.iter().copied().partition(|n| contacted.contains(n));
    let off_site = result
        .target_residues()
        .iter()
        .filter(|k| !site.contains(&k.number))
        .copied()
        .collect();
    Some(BindingSiteOverlap {
        covered,
        missed,
        off_site,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::{Structure, StructureBuilder};
    use crate::engine::interface::analyze;
    use nalgebra::Point3;

    fn line(chain: char, residues: usize, y: f64) -> Structure {
        let mut builder = StructureBuilder::new();
        for i in 0..residues {
            builder.add_atom(Atom::new(
                i + 1,
                "CA",
                "ALA",
                chain,
                i as isize + 1,
                Point3::new(i as f64 * 3.8, y, 0.0),
            ));
        }
        builder.build("line")
    }

    #[test]
    fn empty_site_means_whole_interface() {
        let result = analyze(&line('A', 5, 0.0), &line('B', 5, 4.0), 5.0).unwrap();
        assert_eq!(binding_site_overlap(&result, &[]), None);
    }

    #[test]
    fn site_residues_split_into_covered_and_missed() {
        // Only the first three target residues face the binder.
        let result = analyze(&line('A', 10, 0.0), &line('B', 3, 4.0), 5.0).unwrap();
        let overlap = binding_site_overlap(&result, &[3, 2, 3, 8, 9]).unwrap();

        assert_eq!(overlap.covered, vec![2, 3]);
        assert_eq!(overlap.missed, vec![8, 9]);
        assert_eq!(overlap.off_site, vec![ResidueKey::new('A', 1)]);
        assert_eq!(overlap.site_size(), 4);
        assert_eq!(overlap.coverage(), 0.5);
    }
}
