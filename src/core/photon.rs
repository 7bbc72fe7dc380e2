// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector3f };

/// A photon packet: a bundle of radiative energy carrying a statistical
/// weight, not a single physical photon.
#[derive(Debug, Clone)]
pub struct Photon {
    // Stable identity; its parity selects the optical depth distribution.
    pub id: u64,
    pub position: Vector3f,
    pub direction: Vector3f,
    // Depth to the next scattering, redrawn before every propagation.
    pub target_tau: Float,
    // Importance sampling weight, adjusted whenever the stretched
    // distribution was used to draw the target depth.
    pub weight: Float,
    pub num_scatters: u32,
    // Index into the grid hierarchy; 0 is the root grid.
    pub current_grid: usize,
    // Cells crossed during the current propagation, filled in by the
    // trajectory walker.
    pub cells_this_step: u32,
}

impl Photon {
    pub fn new(id: u64, position: Vector3f, direction: Vector3f) -> Self {
        Self {
            id,
            position,
            direction: direction.normalize(),
            target_tau: 0.0,
            weight: 1.0,
            num_scatters: 0,
            current_grid: 0,
            cells_this_step: 0,
        }
    }
}
