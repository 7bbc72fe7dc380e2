// Copyright @yucwang 2026

use crate::core::emitter::PhotonEmitter;
use crate::core::photon::Photon;
use crate::core::rng::RandomSource;
use crate::math::constants::{ Vector2f, Vector3f };
use crate::math::sampling::sample_uniform_sphere;

/// An isotropic point source, the usual stand-in for a star embedded in
/// the dust.
pub struct PointEmitter {
    origin: Vector3f,
}

impl PointEmitter {
    pub fn new(origin: Vector3f) -> Self {
        Self { origin }
    }
}

impl PhotonEmitter for PointEmitter {
    fn emit(&self, id: u64, rng: &mut dyn RandomSource) -> Photon {
        let u = Vector2f::new(rng.next_open(), rng.next_open());
        Photon::new(id, self.origin, sample_uniform_sphere(&u))
    }
}
