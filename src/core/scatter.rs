// Copyright @yucwang 2026

use crate::core::model::DustModel;
use crate::core::photon::Photon;
use crate::core::rng::RandomSource;
use crate::core::trajectory::TrajectoryIntegrator;
use crate::math::constants::{ Float, BIAS_TAU_SCALE, ROUNDOFF_TOLERANCE };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterOutcome {
    Scattered,
    Escaped,
    BudgetExhausted,
}

impl ScatterOutcome {
    // Legacy boolean view: a photon that ran out of its scattering budget
    // leaves the simulation the same way an escaping photon does.
    pub fn escaped(self) -> bool {
        !matches!(self, ScatterOutcome::Scattered)
    }
}

#[derive(Debug)]
pub enum TransportError {
    // The random source handed out a draw the sampler cannot take a
    // logarithm of.
    Domain { draw: Float },
    // The walker accumulated more depth than the sampled target allows.
    IntegratorContract { target_tau: Float, tau_traveled: Float },
}

#[derive(Debug, Clone, Copy)]
pub struct ScatterEvent {
    pub photon_id: u64,
    pub target_tau: Float,
    pub tau_traveled: Float,
    pub distance: Float,
    pub weight: Float,
    pub outcome: ScatterOutcome,
}

/// Per-decision observability hook. A caller can watch any photon without
/// recompiling by passing an implementation to `next_scatter`.
pub trait ScatterTrace {
    fn record(&mut self, event: &ScatterEvent);
}

#[derive(Debug, Clone, Copy)]
pub struct ScatterKernel {
    bias_scale: Float,
    tolerance: Float,
}

impl Default for ScatterKernel {
    fn default() -> Self {
        Self::new(BIAS_TAU_SCALE, ROUNDOFF_TOLERANCE)
    }
}

impl ScatterKernel {
    pub fn new(bias_scale: Float, tolerance: Float) -> Self {
        Self { bias_scale, tolerance }
    }

    pub fn bias_scale(&self) -> Float {
        self.bias_scale
    }

    pub fn tolerance(&self) -> Float {
        self.tolerance
    }

    /// Draw the optical depth at which the next scattering would occur.
    /// Even photons sample the physical exp(-tau) distribution; odd
    /// photons sample exp(-tau / k) with scale k, which over-samples
    /// large depths. The matching weight correction happens in
    /// `next_scatter`.
    pub fn sample_target_tau(&self,
                             photon: &mut Photon,
                             rng: &mut dyn RandomSource) -> Result<Float, TransportError> {
        let u = rng.next_open();
        if u <= 0.0 || u >= 1.0 {
            return Err(TransportError::Domain { draw: u });
        }

        let target_tau = if photon.id % 2 == 0 {
            -u.ln()
        } else {
            -self.bias_scale * u.ln()
        };

        photon.target_tau = target_tau;
        Ok(target_tau)
    }

    /// One scattering decision: sample a fresh target depth, walk the
    /// photon through the grids, and classify the result.
    pub fn next_scatter(&self,
                        photon: &mut Photon,
                        model: &DustModel,
                        integrator: &dyn TrajectoryIntegrator,
                        rng: &mut dyn RandomSource,
                        trace: Option<&mut dyn ScatterTrace>) -> Result<ScatterOutcome, TransportError> {
        // A decision always starts from the root grid: the sampled target
        // depth is total depth from the scattering site, not a
        // subgrid-local quantity.
        if photon.current_grid != 0 {
            photon.current_grid = 0;
        }
        photon.cells_this_step = 0;

        let target_tau = self.sample_target_tau(photon, rng)?;
        let summary = integrator.propagate(photon, model, target_tau);

        // Escape is re-derived here from the depth bookkeeping; the
        // walker's boundary flag is not consulted.
        let outcome = if target_tau - summary.tau_traveled > self.tolerance {
            ScatterOutcome::Escaped
        } else if photon.num_scatters > model.max_scatters() {
            ScatterOutcome::BudgetExhausted
        } else {
            ScatterOutcome::Scattered
        };

        // The correction uses the sampled target depth, not the traveled
        // depth, even when the boundary was reached first.
        if photon.id % 2 == 1 {
            let k = self.bias_scale;
            photon.weight *= (k * (-target_tau).exp()) / (-target_tau / k).exp();
        }

        if summary.tau_traveled - target_tau > self.tolerance {
            log::error!(
                "photon {}: traveled depth exceeds sampled target: target_tau = {}, tau_traveled = {}, diff = {}",
                photon.id,
                target_tau,
                summary.tau_traveled,
                summary.tau_traveled - target_tau
            );
            return Err(TransportError::IntegratorContract {
                target_tau,
                tau_traveled: summary.tau_traveled,
            });
        }

        if let Some(trace) = trace {
            trace.record(&ScatterEvent {
                photon_id: photon.id,
                target_tau,
                tau_traveled: summary.tau_traveled,
                distance: summary.distance,
                weight: photon.weight,
                outcome,
            });
        }

        Ok(outcome)
    }
}
