// Copyright @yucwang 2026

use crate::core::phase::PhaseFunction;
use crate::core::rng::RandomSource;
use crate::math::constants::{ Float, PI, Vector3f };
use crate::math::sampling::rotate_about;

/// Henyey-Greenstein phase function with asymmetry parameter g in
/// (-1, 1): g > 0 scatters forward, g < 0 backward, g = 0 isotropic.
pub struct HenyeyGreenstein {
    g: Float,
}

impl HenyeyGreenstein {
    pub fn new(g: Float) -> Self {
        Self { g: g.clamp(-0.999, 0.999) }
    }

    pub fn g(&self) -> Float {
        self.g
    }

    fn sample_cos_theta(&self, u: Float) -> Float {
        if self.g.abs() < 1.0e-3 {
            return 1.0 - 2.0 * u;
        }
        let g = self.g;
        let term = (1.0 - g * g) / (1.0 - g + 2.0 * g * u);
        ((1.0 + g * g - term * term) / (2.0 * g)).clamp(-1.0, 1.0)
    }
}

impl PhaseFunction for HenyeyGreenstein {
    fn sample(&self, incoming: &Vector3f, rng: &mut dyn RandomSource) -> Vector3f {
        let cos_theta = self.sample_cos_theta(rng.next_open());
        let phi = 2.0 * PI * rng.next_open();
        rotate_about(incoming, cos_theta, phi)
    }
}
