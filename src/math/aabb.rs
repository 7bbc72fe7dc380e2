// Copyright @yucwang 2026

use super::constants::{ Float, Vector3f, FLOAT_MIN, FLOAT_MAX };

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::new(FLOAT_MAX, FLOAT_MAX, FLOAT_MAX),
               p_max: Vector3f::new(FLOAT_MIN, FLOAT_MIN, FLOAT_MIN) }
    }
}

impl AABB {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        let mut min = Vector3f::new(0.0, 0.0, 0.0);
        let mut max = Vector3f::new(0.0, 0.0, 0.0);
        for idx in 0..3 {
            min[idx] = p_min[idx].min(p_max[idx]);
            max[idx] = p_max[idx].max(p_min[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    pub fn center(&self) -> Vector3f {
        0.5 * self.p_min + 0.5 * self.p_max
    }

    pub fn extent(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn is_valid(&self) -> bool {
        for idx in 0..3 {
            if self.p_min[idx] > self.p_max[idx] {
                return false;
            }
        }
        true
    }

    // Half-open on the upper faces so that adjacent boxes tile space
    // without double ownership of shared faces.
    pub fn contains(&self, p: &Vector3f) -> bool {
        for idx in 0..3 {
            if p[idx] < self.p_min[idx] || p[idx] >= self.p_max[idx] {
                return false;
            }
        }
        true
    }

    // Distance along `dir` from `origin` (inside the box) to the first
    // face crossed. Never negative.
    pub fn exit_t(&self, origin: &Vector3f, dir: &Vector3f) -> Float {
        let mut t_exit = FLOAT_MAX;
        for idx in 0..3 {
            if dir[idx] > 0.0 {
                t_exit = t_exit.min((self.p_max[idx] - origin[idx]) / dir[idx]);
            } else if dir[idx] < 0.0 {
                t_exit = t_exit.min((self.p_min[idx] - origin[idx]) / dir[idx]);
            }
        }
        t_exit.max(0.0)
    }
}

/* Tests for AABB */

#[cfg(test)]
mod tests {
    use super::AABB;
    use super::Vector3f;

    #[test]
    fn test_aabb_contains_half_open() {
        let aabb = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, 1.0));
        assert!(aabb.contains(&Vector3f::new(0.5, 0.5, 0.5)));
        assert!(aabb.contains(&Vector3f::new(0.0, 0.0, 0.0)));
        assert!(!aabb.contains(&Vector3f::new(1.0, 0.5, 0.5)));
        assert!(!aabb.contains(&Vector3f::new(0.5, -0.1, 0.5)));
    }

    #[test]
    fn test_aabb_exit_distance() {
        let aabb = AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, 1.0));
        let center = aabb.center();

        let t1 = aabb.exit_t(&center, &Vector3f::new(1.0, 0.0, 0.0));
        assert!((t1 - 0.5).abs() < 1.0e-12);

        let t2 = aabb.exit_t(&center, &Vector3f::new(0.0, -1.0, 0.0));
        assert!((t2 - 0.5).abs() < 1.0e-12);

        let d = Vector3f::new(1.0, 1.0, 0.0).normalize();
        let t3 = aabb.exit_t(&Vector3f::new(0.0, 0.0, 0.5), &d);
        assert!((t3 - std::f64::consts::SQRT_2).abs() < 1.0e-12);
    }

    #[test]
    fn test_aabb_new_reorders_corners() {
        let aabb = AABB::new(Vector3f::new(1.0, -2.0, 3.0), Vector3f::new(-1.0, 2.0, -3.0));
        assert_eq!(aabb.p_min, Vector3f::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.p_max, Vector3f::new(1.0, 2.0, 3.0));
        assert!(aabb.is_valid());
    }
}
