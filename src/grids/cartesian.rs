// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCell {
    // Extinction per unit length of the dust filling this cell.
    Dust(Float),
    // The cell is tiled by a nested grid, addressed by model index.
    Refined(usize),
}

#[derive(Debug, Clone)]
pub struct CartesianGrid {
    nx: usize,
    ny: usize,
    nz: usize,
    bbox: AABB,
    cells: Vec<GridCell>,
}

impl CartesianGrid {
    pub fn uniform(nx: usize, ny: usize, nz: usize,
                   bbox: AABB,
                   density: Float) -> Result<Self, String> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err("grid dimensions must be positive".to_string());
        }
        if !bbox.is_valid() {
            return Err("grid bounds are inverted".to_string());
        }
        if density < 0.0 || !density.is_finite() {
            return Err(format!("invalid dust density: {}", density));
        }
        let count = nx
            .checked_mul(ny)
            .and_then(|v| v.checked_mul(nz))
            .ok_or_else(|| "grid dimensions overflow".to_string())?;

        Ok(Self {
            nx,
            ny,
            nz,
            bbox,
            cells: vec![GridCell::Dust(density); count],
        })
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    pub fn bbox(&self) -> AABB {
        self.bbox
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_extent(&self) -> Vector3f {
        let extent = self.bbox.extent();
        Vector3f::new(
            extent.x / self.nx as Float,
            extent.y / self.ny as Float,
            extent.z / self.nz as Float,
        )
    }

    fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        ix + self.nx * (iy + self.ny * iz)
    }

    pub fn cell(&self, ix: usize, iy: usize, iz: usize) -> GridCell {
        self.cells[self.index(ix, iy, iz)]
    }

    pub fn set_cell(&mut self, ix: usize, iy: usize, iz: usize, cell: GridCell) {
        let index = self.index(ix, iy, iz);
        self.cells[index] = cell;
    }

    /// Cell coordinates containing `p`, or None when `p` lies outside the
    /// grid. Positions on an interior face belong to the upper cell.
    pub fn locate(&self, p: &Vector3f) -> Option<(usize, usize, usize)> {
        if !self.bbox.contains(p) {
            return None;
        }

        let extent = self.cell_extent();
        let dims = [self.nx, self.ny, self.nz];
        let mut coords = [0usize; 3];
        for axis in 0..3 {
            let offset = (p[axis] - self.bbox.p_min[axis]) / extent[axis];
            coords[axis] = (offset as usize).min(dims[axis] - 1);
        }
        Some((coords[0], coords[1], coords[2]))
    }

    pub fn cell_bounds(&self, ix: usize, iy: usize, iz: usize) -> AABB {
        let extent = self.cell_extent();
        let p_min = Vector3f::new(
            self.bbox.p_min.x + ix as Float * extent.x,
            self.bbox.p_min.y + iy as Float * extent.y,
            self.bbox.p_min.z + iz as Float * extent.z,
        );
        AABB::new(p_min, p_min + extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x2x2() -> CartesianGrid {
        let bbox = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 2.0, 2.0));
        CartesianGrid::uniform(2, 2, 2, bbox, 1.5).unwrap()
    }

    #[test]
    fn test_uniform_grid_construction() {
        let grid = grid_2x2x2();
        assert_eq!(grid.dims(), (2, 2, 2));
        assert_eq!(grid.cell_count(), 8);
        assert_eq!(grid.cell(1, 1, 1), GridCell::Dust(1.5));
        assert_eq!(grid.cell_extent(), Vector3f::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_uniform_rejects_bad_input() {
        let bbox = AABB::new(Vector3f::zeros(), Vector3f::new(1.0, 1.0, 1.0));
        assert!(CartesianGrid::uniform(0, 2, 2, bbox, 1.0).is_err());
        assert!(CartesianGrid::uniform(2, 2, 2, bbox, -1.0).is_err());
        assert!(CartesianGrid::uniform(2, 2, 2, bbox, Float::NAN).is_err());
    }

    #[test]
    fn test_locate_maps_points_to_cells() {
        let grid = grid_2x2x2();
        assert_eq!(grid.locate(&Vector3f::new(0.5, 0.5, 0.5)), Some((0, 0, 0)));
        assert_eq!(grid.locate(&Vector3f::new(1.5, 0.5, 1.9)), Some((1, 0, 1)));
        // Interior face goes to the upper cell.
        assert_eq!(grid.locate(&Vector3f::new(1.0, 0.5, 0.5)), Some((1, 0, 0)));
        // Outside.
        assert_eq!(grid.locate(&Vector3f::new(2.0, 0.5, 0.5)), None);
        assert_eq!(grid.locate(&Vector3f::new(-0.1, 0.5, 0.5)), None);
    }

    #[test]
    fn test_cell_bounds_tile_the_grid() {
        let grid = grid_2x2x2();
        let bounds = grid.cell_bounds(0, 0, 0);
        assert_eq!(bounds.p_min, Vector3f::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.p_max, Vector3f::new(1.0, 1.0, 1.0));

        let bounds = grid.cell_bounds(1, 1, 1);
        assert_eq!(bounds.p_min, Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(bounds.p_max, Vector3f::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_set_cell_replaces_content() {
        let mut grid = grid_2x2x2();
        grid.set_cell(0, 1, 0, GridCell::Refined(4));
        assert_eq!(grid.cell(0, 1, 0), GridCell::Refined(4));
        assert_eq!(grid.cell(0, 0, 0), GridCell::Dust(1.5));
    }
}
