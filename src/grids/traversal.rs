// Copyright @yucwang 2026

use crate::core::model::DustModel;
use crate::core::photon::Photon;
use crate::core::trajectory::{ TrajectoryIntegrator, TrajectorySummary };
use crate::grids::cartesian::GridCell;
use crate::math::constants::Float;

/// Walks a photon cell by cell through the grid hierarchy, accumulating
/// optical depth until the target is reached or the root grid is left.
/// Refined cells are descended into; leaving a subgrid pops back to its
/// parent. The accumulated depth never exceeds the target.
pub struct GridWalker {
    // Fraction of the smallest cell extent stepped past a cell face, so
    // the next cell lookup lands on the far side.
    boundary_nudge: Float,
    // Safety valve against degenerate floating point walks.
    max_steps: u32,
}

impl Default for GridWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl GridWalker {
    pub fn new() -> Self {
        Self {
            boundary_nudge: 1.0e-7,
            max_steps: 1_000_000,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl TrajectoryIntegrator for GridWalker {
    fn propagate(&self,
                 photon: &mut Photon,
                 model: &DustModel,
                 target_tau: Float) -> TrajectorySummary {
        let mut summary = TrajectorySummary::default();
        let mut steps: u32 = 0;

        loop {
            steps += 1;
            if steps > self.max_steps {
                log::warn!(
                    "photon {}: trajectory walk exceeded {} steps, treating as a boundary exit",
                    photon.id, self.max_steps
                );
                summary.boundary_exit = true;
                return summary;
            }

            let grid = model.grid(photon.current_grid);
            let (ix, iy, iz) = match grid.locate(&photon.position) {
                Some(coords) => coords,
                None => {
                    // Left the current grid: pop to the parent, or out of
                    // the model entirely.
                    match model.parent_of(photon.current_grid) {
                        Some(parent) => {
                            photon.current_grid = parent;
                            continue;
                        }
                        None => {
                            summary.boundary_exit = true;
                            return summary;
                        }
                    }
                }
            };

            match grid.cell(ix, iy, iz) {
                GridCell::Refined(subgrid) => {
                    photon.current_grid = subgrid;
                }
                GridCell::Dust(density) => {
                    let bounds = grid.cell_bounds(ix, iy, iz);
                    let exit = bounds.exit_t(&photon.position, &photon.direction);
                    let remaining = target_tau - summary.tau_traveled;

                    if density > 0.0 && density * exit >= remaining {
                        // Scattering site inside this cell.
                        let step = remaining / density;
                        photon.position += photon.direction * step;
                        summary.distance += step;
                        summary.tau_traveled = target_tau;
                        return summary;
                    }

                    let nudge = self.boundary_nudge * grid.cell_extent().min();
                    let step = exit + nudge;
                    photon.position += photon.direction * step;
                    summary.distance += step;
                    summary.tau_traveled += density * exit;
                    summary.cells_crossed += 1;
                    photon.cells_this_step += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grids::cartesian::CartesianGrid;
    use crate::math::aabb::AABB;
    use crate::math::constants::Vector3f;

    fn cube_model(density: Float) -> DustModel {
        let bbox = AABB::new(Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(1.0, 1.0, 1.0));
        DustModel::new(CartesianGrid::uniform(1, 1, 1, bbox, density).unwrap(), 100)
    }

    fn photon_at(position: Vector3f, direction: Vector3f) -> Photon {
        Photon::new(0, position, direction)
    }

    #[test]
    fn test_scatter_site_inside_uniform_cube() {
        let model = cube_model(2.0);
        let walker = GridWalker::new();
        let mut photon = photon_at(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0));

        let summary = walker.propagate(&mut photon, &model, 1.0);
        assert!(!summary.boundary_exit);
        assert_eq!(summary.tau_traveled, 1.0);
        assert!((photon.position.x - 0.5).abs() < 1.0e-12);
        assert!((summary.distance - 0.5).abs() < 1.0e-12);
        assert_eq!(summary.cells_crossed, 0);
    }

    #[test]
    fn test_boundary_exit_caps_traveled_depth() {
        let model = cube_model(2.0);
        let walker = GridWalker::new();
        let mut photon = photon_at(Vector3f::zeros(), Vector3f::new(1.0, 0.0, 0.0));

        let summary = walker.propagate(&mut photon, &model, 10.0);
        assert!(summary.boundary_exit);
        assert!((summary.tau_traveled - 2.0).abs() < 1.0e-9);
        assert!(summary.tau_traveled < 10.0);
        assert_eq!(summary.cells_crossed, 1);
        assert_eq!(photon.cells_this_step, 1);
        assert!(photon.position.x > 1.0);
    }

    #[test]
    fn test_empty_cells_add_no_depth() {
        let bbox = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(4.0, 1.0, 1.0));
        let mut grid = CartesianGrid::uniform(4, 1, 1, bbox, 1.0).unwrap();
        grid.set_cell(1, 0, 0, GridCell::Dust(0.0));
        let model = DustModel::new(grid, 100);

        let walker = GridWalker::new();
        let mut photon = photon_at(Vector3f::new(0.1, 0.5, 0.5), Vector3f::new(1.0, 0.0, 0.0));

        // 0.9 through the first cell, nothing through the empty one, then
        // the remaining 0.6 stops inside the third.
        let summary = walker.propagate(&mut photon, &model, 1.5);
        assert!(!summary.boundary_exit);
        assert_eq!(summary.tau_traveled, 1.5);
        assert!((photon.position.x - 2.6).abs() < 1.0e-5);
        assert_eq!(summary.cells_crossed, 2);
        assert_eq!(photon.cells_this_step, 2);
    }

    fn slab_model(refined: bool) -> DustModel {
        let bbox = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 1.0, 1.0));
        let root = CartesianGrid::uniform(2, 1, 1, bbox, 1.0).unwrap();
        let mut model = DustModel::new(root, 100);
        if refined {
            let cell_bounds = model.root().cell_bounds(1, 0, 0);
            let sub = CartesianGrid::uniform(2, 2, 2, cell_bounds, 1.0).unwrap();
            model.attach_subgrid(0, (1, 0, 0), sub).unwrap();
        }
        model
    }

    #[test]
    fn test_subgrid_refinement_preserves_depth() {
        // A uniform slab and the same slab with one cell refined into a
        // subgrid of equal density must scatter the photon at the same
        // spot.
        let walker = GridWalker::new();

        let plain = slab_model(false);
        let mut photon_a = photon_at(Vector3f::new(0.25, 0.75, 0.75), Vector3f::new(1.0, 0.0, 0.0));
        let summary_a = walker.propagate(&mut photon_a, &plain, 1.5);

        let refined = slab_model(true);
        let mut photon_b = photon_at(Vector3f::new(0.25, 0.75, 0.75), Vector3f::new(1.0, 0.0, 0.0));
        let summary_b = walker.propagate(&mut photon_b, &refined, 1.5);

        assert!(!summary_a.boundary_exit);
        assert!(!summary_b.boundary_exit);
        assert_eq!(summary_a.tau_traveled, 1.5);
        assert_eq!(summary_b.tau_traveled, 1.5);
        assert!((photon_a.position.x - 1.75).abs() < 1.0e-5);
        assert!((photon_a.position.x - photon_b.position.x).abs() < 1.0e-5);

        // The scattering site lies inside the subgrid, and the photon
        // remembers being there.
        assert_eq!(photon_b.current_grid, 1);
        assert!(photon_b.cells_this_step > photon_a.cells_this_step);
    }

    #[test]
    fn test_exit_through_subgrid_pops_to_root() {
        let model = slab_model(true);
        let walker = GridWalker::new();
        let mut photon = photon_at(Vector3f::new(0.25, 0.75, 0.75), Vector3f::new(1.0, 0.0, 0.0));

        let summary = walker.propagate(&mut photon, &model, 100.0);
        assert!(summary.boundary_exit);
        assert_eq!(photon.current_grid, 0);
        // 0.75 in the first root cell plus 1.0 across the subgrid.
        assert!((summary.tau_traveled - 1.75).abs() < 1.0e-6);
        assert_eq!(photon.cells_this_step, 3);
    }

    #[test]
    fn test_start_outside_model_is_immediate_exit() {
        let model = cube_model(2.0);
        let walker = GridWalker::new();
        let mut photon = photon_at(Vector3f::new(5.0, 5.0, 5.0), Vector3f::new(1.0, 0.0, 0.0));

        let summary = walker.propagate(&mut photon, &model, 1.0);
        assert!(summary.boundary_exit);
        assert_eq!(summary.tau_traveled, 0.0);
        assert_eq!(summary.distance, 0.0);
    }

    #[test]
    fn test_step_safety_valve_reports_boundary_exit() {
        let bbox = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(8.0, 1.0, 1.0));
        let grid = CartesianGrid::uniform(8, 1, 1, bbox, 0.01).unwrap();
        let model = DustModel::new(grid, 100);

        let walker = GridWalker::new().with_max_steps(2);
        let mut photon = photon_at(Vector3f::new(0.5, 0.5, 0.5), Vector3f::new(1.0, 0.0, 0.0));

        let summary = walker.propagate(&mut photon, &model, 50.0);
        assert!(summary.boundary_exit);
        assert!(summary.cells_crossed <= 2);
    }
}
