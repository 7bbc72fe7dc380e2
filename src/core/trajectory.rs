// Copyright @yucwang 2026

use crate::core::model::DustModel;
use crate::core::photon::Photon;
use crate::math::constants::Float;

/// What one propagation through the grids produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrajectorySummary {
    pub distance: Float,
    pub tau_traveled: Float,
    pub cells_crossed: u32,
    // The walker's own view of whether the photon left the root grid.
    // The scatter kernel re-derives escape from the depth bookkeeping
    // and does not consult this flag.
    pub boundary_exit: bool,
}

pub trait TrajectoryIntegrator: Send + Sync {
    /// Walk the photon through the model until `target_tau` optical depth
    /// has accumulated or the root grid is left. On return
    /// `tau_traveled <= target_tau` up to roundoff; a smaller value is
    /// only allowed when the photon reached the model boundary first.
    fn propagate(&self,
                 photon: &mut Photon,
                 model: &DustModel,
                 target_tau: Float) -> TrajectorySummary;
}
