// Copyright @yucwang 2026

use crate::core::phase::PhaseFunction;
use crate::core::rng::RandomSource;
use crate::math::constants::{ Vector2f, Vector3f };
use crate::math::sampling::sample_uniform_sphere;

pub struct Isotropic;

impl PhaseFunction for Isotropic {
    fn sample(&self, _incoming: &Vector3f, rng: &mut dyn RandomSource) -> Vector3f {
        let u = Vector2f::new(rng.next_open(), rng.next_open());
        sample_uniform_sphere(&u)
    }
}
