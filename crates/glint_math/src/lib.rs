// Re-export glam so downstream crates get Vec3 and friends from one place
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod scalar;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use scalar::{bilerp, lerp, trilerp};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_reexport() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_dot_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(a.dot(b), 0.0);
        assert_eq!(a.cross(b), Vec3::new(0.0, 0.0, 1.0));
    }
}
