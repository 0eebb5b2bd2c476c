use crate::core::utils::geometry::{CellIndex, cell_index};
use nalgebra::Point3;
use std::collections::{BTreeSet, HashMap};

/// A uniform grid of cubic cells mapping space to the items whose points fall inside.
///
/// With the cell edge equal to the search radius, every point within that radius of a
/// query lies in one of the 27 cells around the query's own cell.
#[derive(Debug, Clone)]
pub(crate) struct CellGrid {
    edge: f64,
    cells: HashMap<CellIndex, Vec<usize>>,
}

impl CellGrid {
    pub fn new(edge: f64) -> Self {
        Self {
            edge,
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, point: &Point3<f64>, item: usize) {
        let cell = self.cells.entry(cell_index(point, self.edge)).or_default();
        if cell.last() != Some(&item) {
            cell.push(item);
        }
    }

    /// Items with at least one point in the neighborhood of any of `points`.
    pub fn candidates<'a>(&self, points: impl IntoIterator<Item = &'a Point3<f64>>) -> BTreeSet<usize> {
        let mut found = BTreeSet::new();
        for point in points {
            let (cx, cy, cz) = cell_index(point, self.edge);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        if let Some(items) = self.cells.get(&(
                            cx.saturating_add(dx),
                            cy.saturating_add(dy),
                            cz.saturating_add(dz),
                        )) {
                            found.extend(items.iter().copied());
                        }
                    }
                }
            }
        }
        found
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_include_items_in_adjacent_cells() {
        let mut grid = CellGrid::new(5.0);
        grid.insert(&Point3::new(0.0, 0.0, 0.0), 0);
        grid.insert(&Point3::new(4.9, 4.9, 4.9), 1);
        grid.insert(&Point3::new(-4.9, 0.0, 0.0), 2);
        grid.insert(&Point3::new(20.0, 0.0, 0.0), 3);

        let found = grid.candidates([&Point3::new(1.0, 1.0, 1.0)]);
        assert_eq!(found, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn repeated_inserts_of_the_same_item_are_collapsed() {
        let mut grid = CellGrid::new(5.0);
        grid.insert(&Point3::new(0.1, 0.1, 0.1), 7);
        grid.insert(&Point3::new(0.2, 0.2, 0.2), 7);
        assert_eq!(grid.occupied_cells(), 1);
        assert_eq!(grid.candidates([&Point3::origin()]), BTreeSet::from([7]));
    }

    #[test]
    fn cells_at_the_edge_of_the_index_range_do_not_overflow() {
        let mut grid = CellGrid::new(1e-20);
        let far = Point3::new(1e300, -1e300, 1.0);
        grid.insert(&far, 3);
        assert_eq!(grid.candidates([&far]), BTreeSet::from([3]));
    }

    #[test]
    fn empty_grid_has_no_candidates() {
        let grid = CellGrid::new(5.0);
        assert!(grid.candidates([&Point3::origin()]).is_empty());
    }
}
