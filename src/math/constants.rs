// Copyright @yucwang 2026

pub type Float = f64;
pub type Int = i64;
pub type UInt = u64;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;

pub const PI: Float = 3.14159265358979323846;

pub const FLOAT_MIN: Float = std::f64::MIN;
pub const FLOAT_MAX: Float = std::f64::MAX;

// Absorbs floating point accumulation error from many small cell-crossing
// contributions to the optical depth.
pub const ROUNDOFF_TOLERANCE: Float = 1.0e-6;

// Scale of the stretched optical depth distribution used for odd photons.
pub const BIAS_TAU_SCALE: Float = 10.0;

pub const DEFAULT_MAX_SCATTERS: u32 = 500;
