use super::config::AnalysisConfig;
use super::error::AnalysisError;
use super::grid::CellGrid;
use crate::core::models::atom::Atom;
use crate::core::models::residue::{Residue, ResidueKey};
use crate::core::models::side::Side;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{centroid, distance};
use crate::core::utils::identifiers::is_amino_acid;
use itertools::Itertools;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Buried area credited to each contact before the packing adjustment, in Å².
const AREA_PER_CONTACT: f64 = 20.0;
/// Mean contact distance treated as ideal packing, in Å.
const IDEAL_PACKING_DISTANCE: f64 = 4.0;
const PACKING_FACTOR_RANGE: (f64, f64) = (0.5, 1.5);

/// A target residue and a binder residue whose representative atoms lie within the cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactPair {
    pub target: ResidueKey,
    pub target_name: String,
    pub binder: ResidueKey,
    pub binder_name: String,
    pub distance: f64,
}

/// The geometric summary of a target/binder interface.
///
/// Computed once per `(target, binder, configuration)` and never updated afterwards.
/// Distance statistics are `None` when there are no contacts, which is distinct from a
/// distance of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceResult {
    target_residues: BTreeSet<ResidueKey>,
    binder_residues: BTreeSet<ResidueKey>,
    contacts: Vec<ContactPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mean_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interface_center: Option<Point3<f64>>,
    buried_surface_estimate: f64,
    has_clash: bool,
    cutoff: f64,
    clash_threshold: f64,
}

impl InterfaceResult {
    /// Derives every summary field from a set of contacts.
    ///
    /// `points` are the atom positions the contact distances were measured between;
    /// their centroid becomes the interface center.
    pub(crate) fn from_contacts(
        mut contacts: Vec<ContactPair>,
        points: &[Point3<f64>],
        cutoff: f64,
        clash_threshold: f64,
    ) -> Self {
        contacts.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.target.cmp(&b.target))
                .then_with(|| a.binder.cmp(&b.binder))
        });

        let target_residues = contacts.iter().map(|c| c.target).collect();
        let binder_residues = contacts.iter().map(|c| c.binder).collect();

        let min_distance = contacts.first().map(|c| c.distance);
        let max_distance = contacts.last().map(|c| c.distance);
        let mean_distance = (!contacts.is_empty())
            .then(|| contacts.iter().map(|c| c.distance).sum::<f64>() / contacts.len() as f64);

        let buried_surface_estimate = match mean_distance {
            Some(mean) => {
                let packing = if mean > 0.0 {
                    (IDEAL_PACKING_DISTANCE / mean).clamp(PACKING_FACTOR_RANGE.0, PACKING_FACTOR_RANGE.1)
                } else {
                    PACKING_FACTOR_RANGE.1
                };
                contacts.len() as f64 * AREA_PER_CONTACT * packing
            }
            None => 0.0,
        };

        Self {
            target_residues,
            binder_residues,
            has_clash: min_distance.is_some_and(|d| d < clash_threshold),
            contacts,
            min_distance,
            mean_distance,
            max_distance,
            interface_center: centroid(points),
            buried_surface_estimate,
            cutoff,
            clash_threshold,
        }
    }

    pub fn target_residues(&self) -> &BTreeSet<ResidueKey> {
        &self.target_residues
    }

    pub fn binder_residues(&self) -> &BTreeSet<ResidueKey> {
        &self.binder_residues
    }

    pub fn interface_residues(&self, side: Side) -> &BTreeSet<ResidueKey> {
        match side {
            Side::Target => &self.target_residues,
            Side::Binder => &self.binder_residues,
        }
    }

    /// Contacts in ascending distance order, ties broken by target then binder key.
    pub fn contacts(&self) -> &[ContactPair] {
        &self.contacts
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn has_contacts(&self) -> bool {
        !self.contacts.is_empty()
    }

    pub fn min_distance(&self) -> Option<f64> {
        self.min_distance
    }

    pub fn mean_distance(&self) -> Option<f64> {
        self.mean_distance
    }

    pub fn max_distance(&self) -> Option<f64> {
        self.max_distance
    }

    /// Centroid of the atoms that define the contacts, useful as a viewing focus.
    pub fn interface_center(&self) -> Option<Point3<f64>> {
        self.interface_center
    }

    /// Heuristic buried surface area in Å²; not a solvent-accessibility calculation.
    pub fn buried_surface_estimate(&self) -> f64 {
        self.buried_surface_estimate
    }

    pub fn has_clash(&self) -> bool {
        self.has_clash
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn clash_threshold(&self) -> f64 {
        self.clash_threshold
    }

    /// Number of contacts each interface residue on `side` takes part in.
    pub fn contacts_per_residue(&self, side: Side) -> BTreeMap<ResidueKey, usize> {
        self.contacts
            .iter()
            .map(|c| match side {
                Side::Target => c.target,
                Side::Binder => c.binder,
            })
            .counts()
            .into_iter()
            .collect()
    }
}

/// Analyzes the interface between `target` and `binder` with default settings and the
/// given cutoff.
pub fn analyze(
    target: &Structure,
    binder: &Structure,
    cutoff: f64,
) -> Result<InterfaceResult, AnalysisError> {
    analyze_with(target, binder, &AnalysisConfig::with_cutoff(cutoff))
}

/// Finds every residue pair whose representative atoms lie within `config.cutoff`.
///
/// Each (target residue, binder residue) pair is measured between one atom per side:
/// the alpha carbons when both residues have one, else the first atom name the two
/// residues share, else their first atoms. Large inputs are searched through a cell
/// grid, which returns exactly the contacts a full pairwise scan would.
///
/// # Errors
///
/// * [`AnalysisError::InvalidCutoff`] if the cutoff is not a positive finite distance.
/// * [`AnalysisError::EmptyStructure`] if either side has no eligible residues.
pub fn analyze_with(
    target: &Structure,
    binder: &Structure,
    config: &AnalysisConfig,
) -> Result<InterfaceResult, AnalysisError> {
    if !config.cutoff.is_finite() || config.cutoff <= 0.0 {
        return Err(AnalysisError::InvalidCutoff(config.cutoff));
    }
    if !config.clash_threshold.is_finite() || config.clash_threshold < 0.0 {
        return Err(AnalysisError::InvalidClashThreshold(config.clash_threshold));
    }

    let targets = eligible_residues(target, config.include_hetero);
    if targets.is_empty() {
        return Err(AnalysisError::EmptyStructure { side: Side::Target });
    }
    let binders = eligible_residues(binder, config.include_hetero);
    if binders.is_empty() {
        return Err(AnalysisError::EmptyStructure { side: Side::Binder });
    }

    let pair_count = targets.len() * binders.len();
    let use_grid = pair_count >= config.spatial_index_min_pairs
        && grid_resolves(&targets, config.cutoff)
        && grid_resolves(&binders, config.cutoff);
    let (contacts, points) = if use_grid {
        grid_search(&targets, &binders, config.cutoff)
    } else {
        brute_force_search(&targets, &binders, config.cutoff)
    };

    debug!(
        target_residues = targets.len(),
        binder_residues = binders.len(),
        pair_count,
        use_grid,
        contacts = contacts.len(),
        "Interface search complete"
    );

    Ok(InterfaceResult::from_contacts(
        contacts,
        &points,
        config.cutoff,
        config.clash_threshold,
    ))
}

fn eligible_residues(structure: &Structure, include_hetero: bool) -> Vec<&Residue> {
    structure
        .residues()
        .filter(|r| !r.atoms().is_empty())
        .filter(|r| include_hetero || !r.is_hetero() || is_amino_acid(&r.name))
        .collect()
}

/// Picks the pair of atoms a residue-level distance is measured between.
fn representative_pair<'a>(target: &'a Residue, binder: &'a Residue) -> Option<(&'a Atom, &'a Atom)> {
    if let (Some(a), Some(b)) = (target.alpha_carbon(), binder.alpha_carbon()) {
        return Some((a, b));
    }
    target
        .atoms()
        .iter()
        .find_map(|a| binder.atom(&a.name).map(|b| (a, b)))
        .or_else(|| Some((target.atoms().first()?, binder.atoms().first()?)))
}

type Measured = (ContactPair, [Point3<f64>; 2]);

fn measure(target: &Residue, binder: &Residue, cutoff: f64) -> Option<Measured> {
    let (a, b) = representative_pair(target, binder)?;
    let d = distance(&a.position, &b.position);
    (d <= cutoff).then(|| {
        (
            ContactPair {
                target: target.key(),
                target_name: target.name.clone(),
                binder: binder.key(),
                binder_name: binder.name.clone(),
                distance: d,
            },
            [a.position, b.position],
        )
    })
}

fn collect(measured: impl Iterator<Item = Measured>) -> (Vec<ContactPair>, Vec<Point3<f64>>) {
    let mut contacts = Vec::new();
    let mut points = Vec::new();
    for (contact, pair_points) in measured {
        contacts.push(contact);
        points.extend(pair_points);
    }
    (contacts, points)
}

fn brute_force_search(
    targets: &[&Residue],
    binders: &[&Residue],
    cutoff: f64,
) -> (Vec<ContactPair>, Vec<Point3<f64>>) {
    collect(
        targets
            .iter()
            .cartesian_product(binders.iter())
            .filter_map(|(t, b)| measure(t, b, cutoff)),
    )
}

/// Above this many cutoffs from the origin, `coordinate / cutoff` no longer floors to
/// an exact cell, so points within the cutoff may land two or more cells apart.
const MAX_GRID_CELL: f64 = (1u64 << 52) as f64;

/// Whether every atom maps to an exact grid cell at this cutoff.
fn grid_resolves(residues: &[&Residue], cutoff: f64) -> bool {
    residues
        .iter()
        .flat_map(|r| r.atoms())
        .all(|a| a.position.coords.amax() / cutoff < MAX_GRID_CELL)
}

/// Every atom of every binder residue is indexed, so a pair whose measured atoms lie
/// within the cutoff is always among the candidates, whichever atoms were measured.
fn grid_search(
    targets: &[&Residue],
    binders: &[&Residue],
    cutoff: f64,
) -> (Vec<ContactPair>, Vec<Point3<f64>>) {
    let mut grid = CellGrid::new(cutoff);
    for (index, residue) in binders.iter().enumerate() {
        for atom in residue.atoms() {
            grid.insert(&atom.position, index);
        }
    }

    collect(targets.iter().flat_map(|t| {
        grid.candidates(t.atoms().iter().map(|a| &a.position))
            .into_iter()
            .filter_map(move |index| measure(t, binders[index], cutoff))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::StructureBuilder;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Builds a structure of single-atom residues `(chain, number, residue, atom, xyz)`.
    fn build(records: &[(char, isize, &str, &str, [f64; 3])]) -> Structure {
        let mut builder = StructureBuilder::new();
        for (i, (chain, number, residue, atom, xyz)) in records.iter().enumerate() {
            builder.add_atom(Atom::new(
                i + 1,
                atom,
                residue,
                *chain,
                *number,
                Point3::new(xyz[0], xyz[1], xyz[2]),
            ));
        }
        builder.build("test")
    }

    fn ca_chain(chain: char, coords: &[[f64; 3]]) -> Structure {
        let records: Vec<_> = coords
            .iter()
            .enumerate()
            .map(|(i, xyz)| (chain, i as isize + 1, "ALA", "CA", *xyz))
            .collect();
        build(&records)
    }

    fn random_chain(rng: &mut StdRng, chain: char, n: usize, span: f64) -> Structure {
        let mut builder = StructureBuilder::new();
        let mut serial = 1;
        for number in 1..=n as isize {
            let base = Point3::new(
                rng.random_range(-span..span),
                rng.random_range(-span..span),
                rng.random_range(-span..span),
            );
            // Some residues lack an alpha carbon so every representative-atom rule is exercised.
            let names: &[&str] = if rng.random_range(0..4) == 0 {
                &["N", "CB"]
            } else {
                &["N", "CA", "C"]
            };
            for name in names {
                let jitter = Point3::new(
                    base.x + rng.random_range(-1.5..1.5),
                    base.y + rng.random_range(-1.5..1.5),
                    base.z + rng.random_range(-1.5..1.5),
                );
                builder.add_atom(Atom::new(serial, name, "GLY", chain, number, jitter));
                serial += 1;
            }
        }
        builder.build("random")
    }

    #[test]
    fn finds_contacts_within_cutoff_in_distance_order() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [30.0, 0.0, 0.0]]);
        let binder = ca_chain('B', &[[0.0, 4.0, 0.0], [10.0, 3.0, 0.0]]);

        let result = analyze(&target, &binder, 5.0).unwrap();

        assert_eq!(result.contact_count(), 2);
        let first = &result.contacts()[0];
        assert_eq!(first.target, ResidueKey::new('A', 2));
        assert_eq!(first.binder, ResidueKey::new('B', 2));
        assert_eq!(first.distance, 3.0);
        assert_eq!(first.target_name, "ALA");
        assert_eq!(result.contacts()[1].distance, 4.0);

        assert_eq!(
            result.target_residues(),
            &BTreeSet::from([ResidueKey::new('A', 1), ResidueKey::new('A', 2)])
        );
        assert_eq!(result.binder_residues().len(), 2);
        assert_eq!(result.min_distance(), Some(3.0));
        assert_eq!(result.max_distance(), Some(4.0));
        assert_eq!(result.mean_distance(), Some(3.5));
        assert!(!result.has_clash());
        assert_eq!(result.cutoff(), 5.0);
        assert_eq!(result.clash_threshold(), 2.5);
    }

    #[test]
    fn contact_at_exactly_the_cutoff_is_included() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let binder = ca_chain('B', &[[5.0, 0.0, 0.0]]);
        let result = analyze(&target, &binder, 5.0).unwrap();
        assert_eq!(result.contact_count(), 1);
        assert_eq!(result.contacts()[0].distance, 5.0);
    }

    #[test]
    fn equal_distances_are_ordered_by_target_then_binder_key() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0], [0.0, 0.0, 10.0]]);
        let binder = ca_chain('B', &[[3.0, 0.0, 10.0], [3.0, 0.0, 0.0], [-3.0, 0.0, 0.0]]);

        let result = analyze(&target, &binder, 3.5).unwrap();
        let order: Vec<(isize, isize)> = result
            .contacts()
            .iter()
            .map(|c| (c.target.number, c.binder.number))
            .collect();
        assert_eq!(order, vec![(1, 2), (1, 3), (2, 1)]);
    }

    #[test]
    fn no_contacts_yields_absent_statistics() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let binder = ca_chain('B', &[[50.0, 0.0, 0.0]]);
        let result = analyze(&target, &binder, 5.0).unwrap();

        assert!(!result.has_contacts());
        assert_eq!(result.min_distance(), None);
        assert_eq!(result.mean_distance(), None);
        assert_eq!(result.max_distance(), None);
        assert_eq!(result.interface_center(), None);
        assert_eq!(result.buried_surface_estimate(), 0.0);
        assert!(!result.has_clash());
        assert!(result.target_residues().is_empty());
    }

    #[test]
    fn clash_is_flagged_below_threshold() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let binder = ca_chain('B', &[[2.0, 0.0, 0.0]]);
        assert!(analyze(&target, &binder, 5.0).unwrap().has_clash());

        let binder = ca_chain('B', &[[2.5, 0.0, 0.0]]);
        assert!(!analyze(&target, &binder, 5.0).unwrap().has_clash());
    }

    #[test]
    fn buried_surface_uses_clamped_packing_factor() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);

        let ideal = analyze(&target, &ca_chain('B', &[[4.0, 0.0, 0.0]]), 5.0).unwrap();
        assert_eq!(ideal.buried_surface_estimate(), 20.0);

        let tight = analyze(&target, &ca_chain('B', &[[2.0, 0.0, 0.0]]), 5.0).unwrap();
        assert_eq!(tight.buried_surface_estimate(), 30.0);

        let loose = analyze(&target, &ca_chain('B', &[[10.0, 0.0, 0.0]]), 12.0).unwrap();
        assert_eq!(loose.buried_surface_estimate(), 10.0);
    }

    #[test]
    fn interface_center_is_centroid_of_measured_atoms() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let binder = ca_chain('B', &[[4.0, 2.0, 0.0]]);
        let result = analyze(&target, &binder, 5.0).unwrap();
        assert_eq!(result.interface_center(), Some(Point3::new(2.0, 1.0, 0.0)));
    }

    #[test]
    fn residues_without_alpha_carbon_use_shared_then_first_atoms() {
        let target = build(&[
            ('A', 1, "LIG", "C1", [0.0, 0.0, 0.0]),
            ('A', 1, "LIG", "N1", [0.0, 0.0, 20.0]),
        ]);
        // Shares N1 with the target: measured N1-N1 at 1.0, not C1-O1.
        let sharing = build(&[
            ('B', 1, "LIG", "O1", [0.0, 0.0, 30.0]),
            ('B', 1, "LIG", "N1", [0.0, 0.0, 21.0]),
        ]);
        let result = analyze(&target, &sharing, 5.0).unwrap();
        assert_eq!(result.contacts()[0].distance, 1.0);

        // Nothing shared: first atoms C1 and O1 at 3.0.
        let disjoint = build(&[
            ('B', 1, "LIG", "O1", [0.0, 3.0, 0.0]),
            ('B', 1, "LIG", "S1", [0.0, 0.0, 20.5]),
        ]);
        let result = analyze(&target, &disjoint, 5.0).unwrap();
        assert_eq!(result.contacts()[0].distance, 3.0);
    }

    #[test]
    fn ca_pair_wins_over_closer_side_chain_atoms() {
        let target = build(&[
            ('A', 1, "LYS", "CA", [0.0, 0.0, 0.0]),
            ('A', 1, "LYS", "NZ", [6.0, 0.0, 0.0]),
        ]);
        let binder = build(&[
            ('B', 1, "ASP", "CA", [12.0, 0.0, 0.0]),
            ('B', 1, "ASP", "NZ", [7.0, 0.0, 0.0]),
        ]);
        let result = analyze(&target, &binder, 5.0).unwrap();
        assert!(!result.has_contacts());
    }

    #[test]
    fn hetero_groups_are_excluded_unless_requested() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let mut builder = StructureBuilder::new();
        builder
            .add_atom(Atom::new(1, "CA", "ALA", 'B', 1, Point3::new(30.0, 0.0, 0.0)))
            .add_atom(Atom::new(2, "ZN", "ZN", 'B', 101, Point3::new(2.0, 0.0, 0.0)).hetero())
            .add_atom(Atom::new(3, "O", "HOH", 'B', 201, Point3::new(0.0, 3.0, 0.0)).hetero())
            .add_atom(Atom::new(4, "CA", "MSE", 'B', 2, Point3::new(0.0, 0.0, 4.0)).hetero());
        let binder = builder.build("binder");

        let default = analyze(&target, &binder, 5.0).unwrap();
        assert_eq!(
            default.binder_residues(),
            &BTreeSet::from([ResidueKey::new('B', 2)])
        );

        let config = AnalysisConfig {
            include_hetero: true,
            ..AnalysisConfig::default()
        };
        let with_hetero = analyze_with(&target, &binder, &config).unwrap();
        assert_eq!(with_hetero.contact_count(), 3);
        assert!(with_hetero.has_clash());
    }

    #[test]
    fn empty_sides_are_reported() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let empty = StructureBuilder::new().build("empty");

        assert_eq!(
            analyze(&target, &empty, 5.0),
            Err(AnalysisError::EmptyStructure { side: Side::Binder })
        );
        assert_eq!(
            analyze(&empty, &target, 5.0),
            Err(AnalysisError::EmptyStructure { side: Side::Target })
        );

        let mut builder = StructureBuilder::new();
        builder.add_atom(Atom::new(1, "O", "HOH", 'W', 1, Point3::origin()).hetero());
        let water_only = builder.build("water");
        assert_eq!(
            analyze(&target, &water_only, 5.0),
            Err(AnalysisError::EmptyStructure { side: Side::Binder })
        );
    }

    #[test]
    fn invalid_cutoffs_are_rejected() {
        let a = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let b = ca_chain('B', &[[1.0, 0.0, 0.0]]);
        for cutoff in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                analyze(&a, &b, cutoff),
                Err(AnalysisError::InvalidCutoff(_))
            ));
        }
    }

    #[test]
    fn contacts_per_residue_counts_each_side() {
        let target = ca_chain('A', &[[0.0, 0.0, 0.0]]);
        let binder = ca_chain('B', &[[3.0, 0.0, 0.0], [-3.0, 0.0, 0.0], [0.0, 4.0, 0.0]]);
        let result = analyze(&target, &binder, 5.0).unwrap();

        let per_target = result.contacts_per_residue(Side::Target);
        assert_eq!(per_target.get(&ResidueKey::new('A', 1)), Some(&3));
        let per_binder = result.contacts_per_residue(Side::Binder);
        assert_eq!(per_binder.len(), 3);
        assert!(per_binder.values().all(|&n| n == 1));
        assert_eq!(result.interface_residues(Side::Binder).len(), 3);
    }

    #[test]
    fn repeated_analysis_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let target = random_chain(&mut rng, 'A', 60, 15.0);
        let binder = random_chain(&mut rng, 'B', 40, 15.0);

        let first = analyze(&target, &binder, 6.0).unwrap();
        let second = analyze(&target, &binder, 6.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn larger_cutoff_never_loses_contacts() {
        let mut rng = StdRng::seed_from_u64(11);
        let target = random_chain(&mut rng, 'A', 50, 12.0);
        let binder = random_chain(&mut rng, 'B', 50, 12.0);

        let mut previous: BTreeSet<(ResidueKey, ResidueKey)> = BTreeSet::new();
        for cutoff in [2.0, 4.0, 5.0, 8.0, 12.0] {
            let current: BTreeSet<_> = analyze(&target, &binder, cutoff)
                .unwrap()
                .contacts()
                .iter()
                .map(|c| (c.target, c.binder))
                .collect();
            assert!(previous.is_subset(&current), "cutoff {} lost contacts", cutoff);
            previous = current;
        }
        assert!(!previous.is_empty());
    }

    #[test]
    fn grid_search_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(2024);
        for round in 0..5 {
            let target = random_chain(&mut rng, 'A', 80, 20.0);
            let binder = random_chain(&mut rng, 'B', 60, 20.0);
            let cutoff = 3.0 + round as f64 * 1.5;

            let brute = AnalysisConfig {
                cutoff,
                spatial_index_min_pairs: usize::MAX,
                ..AnalysisConfig::default()
            };
            let grid = AnalysisConfig {
                spatial_index_min_pairs: 0,
                ..brute.clone()
            };

            let expected = analyze_with(&target, &binder, &brute).unwrap();
            let actual = analyze_with(&target, &binder, &grid).unwrap();
            assert_eq!(expected.contacts(), actual.contacts(), "round {}", round);
            assert_eq!(expected.target_residues(), actual.target_residues());
            assert_eq!(expected.mean_distance(), actual.mean_distance());
        }
    }

    #[test]
    fn vanishing_cutoff_on_a_large_interface_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let target = random_chain(&mut rng, 'A', 500, 20.0);
        let binder = random_chain(&mut rng, 'B', 500, 20.0);
        let brute = AnalysisConfig {
            cutoff: 1e-20,
            spatial_index_min_pairs: usize::MAX,
            ..AnalysisConfig::default()
        };
        let grid = AnalysisConfig {
            spatial_index_min_pairs: 0,
            ..brute.clone()
        };

        let expected = analyze_with(&target, &binder, &brute).unwrap();
        let actual = analyze_with(&target, &binder, &grid).unwrap();
        assert_eq!(expected.contacts(), actual.contacts());
        assert_eq!(analyze(&target, &binder, 1e-20).unwrap().contacts(), expected.contacts());
    }

    #[test]
    fn every_contact_respects_the_cutoff() {
        let mut rng = StdRng::seed_from_u64(99);
        let target = random_chain(&mut rng, 'A', 40, 10.0);
        let binder = random_chain(&mut rng, 'B', 40, 10.0);
        let result = analyze(&target, &binder, 5.0).unwrap();
        assert!(result.has_contacts());
        assert!(
            result
                .contacts()
                .iter()
                .all(|c| c.distance >= 0.0 && c.distance <= 5.0)
        );
        assert!(result.contacts().windows(2).all(|w| w[0].distance <= w[1].distance));
    }
}
