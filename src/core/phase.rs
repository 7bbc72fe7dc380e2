// Copyright @yucwang 2026

use crate::core::rng::RandomSource;
use crate::math::constants::Vector3f;

pub trait PhaseFunction: Send + Sync {
    /// Sample the outgoing unit direction for a scattering event.
    fn sample(&self, incoming: &Vector3f, rng: &mut dyn RandomSource) -> Vector3f;
}
