// Copyright @yucwang 2026

pub mod emitter;
pub mod model;
pub mod phase;
pub mod photon;
pub mod rng;
pub mod scatter;
pub mod tally;
pub mod trajectory;
