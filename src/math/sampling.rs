// Copyright @yucwang 2026

use super::constants::{ Float, PI, Vector2f, Vector3f };

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z: Float = 1.0 - 2.0 * u.x;
    let r: Float = (1.0 - z * z).max(0.0).sqrt();
    let phi: Float = 2.0 * PI * u.y;

    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn sample_uniform_sphere_pdf() -> Float {
    1.0 / (4.0 * PI)
}

pub fn build_tangent_frame(n: &Vector3f) -> (Vector3f, Vector3f) {
    let up = if n.z.abs() < 0.999 {
        Vector3f::new(0.0, 0.0, 1.0)
    } else {
        Vector3f::new(1.0, 0.0, 0.0)
    };
    let tangent = n.cross(&up).normalize();
    let bitangent = n.cross(&tangent).normalize();
    (tangent, bitangent)
}

// New unit direction making angle acos(cos_theta) with `axis`, azimuth `phi`
// measured in the tangent frame of `axis`.
pub fn rotate_about(axis: &Vector3f, cos_theta: Float, phi: Float) -> Vector3f {
    let (tangent, bitangent) = build_tangent_frame(axis);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    (axis * cos_theta
        + tangent * (sin_theta * phi.cos())
        + bitangent * (sin_theta * phi.sin()))
        .normalize()
}
