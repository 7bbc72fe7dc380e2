// Copyright @yucwang 2026

use crate::grids::cartesian::{ CartesianGrid, GridCell };
use crate::math::constants::Float;

/// The dust distribution a run transports photons through: a hierarchy of
/// Cartesian density grids plus the per-photon scattering budget. Grid 0
/// is the root; refined cells point at nested grids by index.
pub struct DustModel {
    grids: Vec<CartesianGrid>,
    parents: Vec<Option<usize>>,
    max_scatters: u32,
}

impl DustModel {
    pub fn new(root: CartesianGrid, max_scatters: u32) -> Self {
        Self {
            grids: vec![root],
            parents: vec![None],
            max_scatters,
        }
    }

    pub fn max_scatters(&self) -> u32 {
        self.max_scatters
    }

    pub fn set_max_scatters(&mut self, max_scatters: u32) {
        self.max_scatters = max_scatters;
    }

    pub fn root(&self) -> &CartesianGrid {
        &self.grids[0]
    }

    pub fn grid(&self, index: usize) -> &CartesianGrid {
        &self.grids[index]
    }

    pub fn grid_count(&self) -> usize {
        self.grids.len()
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parents[index]
    }

    // Replaces one dust cell of `parent` with a refined nested grid. The
    // subgrid must tile exactly the parent cell it replaces.
    pub fn attach_subgrid(&mut self,
                          parent: usize,
                          cell: (usize, usize, usize),
                          subgrid: CartesianGrid) -> Result<usize, String> {
        if parent >= self.grids.len() {
            return Err(format!("no such grid: {}", parent));
        }

        let cell_bounds = {
            let parent_grid = &self.grids[parent];
            let (nx, ny, nz) = parent_grid.dims();
            if cell.0 >= nx || cell.1 >= ny || cell.2 >= nz {
                return Err(format!("cell ({}, {}, {}) outside grid {}", cell.0, cell.1, cell.2, parent));
            }
            match parent_grid.cell(cell.0, cell.1, cell.2) {
                GridCell::Refined(_) => {
                    return Err(format!("cell ({}, {}, {}) is already refined", cell.0, cell.1, cell.2));
                }
                GridCell::Dust(_) => parent_grid.cell_bounds(cell.0, cell.1, cell.2),
            }
        };

        let slack: Float = 1.0e-9 * cell_bounds.extent().norm();
        let sub_bounds = subgrid.bbox();
        if (sub_bounds.p_min - cell_bounds.p_min).norm() > slack
            || (sub_bounds.p_max - cell_bounds.p_max).norm() > slack {
            return Err(format!(
                "subgrid bounds {:?} do not match parent cell bounds {:?}",
                sub_bounds, cell_bounds
            ));
        }

        let index = self.grids.len();
        self.grids.push(subgrid);
        self.parents.push(Some(parent));
        self.grids[parent].set_cell(cell.0, cell.1, cell.2, GridCell::Refined(index));
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::aabb::AABB;
    use crate::math::constants::Vector3f;

    fn unit_root() -> CartesianGrid {
        let bbox = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 1.0, 1.0));
        CartesianGrid::uniform(2, 1, 1, bbox, 1.0).unwrap()
    }

    #[test]
    fn test_attach_subgrid_links_cell() {
        let mut model = DustModel::new(unit_root(), 100);
        let cell_bounds = model.root().cell_bounds(1, 0, 0);
        let sub = CartesianGrid::uniform(4, 4, 4, cell_bounds, 5.0).unwrap();

        let index = model.attach_subgrid(0, (1, 0, 0), sub).unwrap();
        assert_eq!(index, 1);
        assert_eq!(model.grid_count(), 2);
        assert_eq!(model.parent_of(1), Some(0));
        assert_eq!(model.root().cell(1, 0, 0), GridCell::Refined(1));
    }

    #[test]
    fn test_attach_subgrid_rejects_wrong_bounds() {
        let mut model = DustModel::new(unit_root(), 100);
        let wrong = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(0.5, 0.5, 0.5));
        let sub = CartesianGrid::uniform(2, 2, 2, wrong, 5.0).unwrap();
        assert!(model.attach_subgrid(0, (1, 0, 0), sub).is_err());
    }

    #[test]
    fn test_attach_subgrid_rejects_double_refinement() {
        let mut model = DustModel::new(unit_root(), 100);
        let cell_bounds = model.root().cell_bounds(0, 0, 0);
        let sub1 = CartesianGrid::uniform(2, 2, 2, cell_bounds, 5.0).unwrap();
        let sub2 = CartesianGrid::uniform(2, 2, 2, cell_bounds, 5.0).unwrap();
        model.attach_subgrid(0, (0, 0, 0), sub1).unwrap();
        assert!(model.attach_subgrid(0, (0, 0, 0), sub2).is_err());
    }
}
