// Copyright @yucwang 2026

use crate::core::photon::Photon;
use crate::core::rng::RandomSource;

pub trait PhotonEmitter: Send + Sync {
    /// Produce a fresh photon packet with unit weight and zeroed counters.
    fn emit(&self, id: u64, rng: &mut dyn RandomSource) -> Photon;
}
