//! Sphere primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use glint_math::{Aabb, Interval, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// Offset applied to the azimuth before mapping to u. Empirical: lines an
/// earth texture's seam up with its usual orientation.
const U_SEAM_OFFSET: f32 = 5.0 * PI / 12.0;

pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Texture coordinates for a point on the unit sphere at the origin.
    ///
    /// `theta` is the angle down from +Y, `phi` the azimuth around Y. The
    /// resulting u can exceed 1 because of the seam offset; the image
    /// sampler clamps.
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        let u = (phi + U_SEAM_OFFSET) / (2.0 * PI);
        let v = theta / PI;
        (u, v)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root inside the interval, if either is
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Color;

    fn test_sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, Lambertian::from_color(Color::splat(0.5)))
    }

    #[test]
    fn test_hit_from_outside() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -2.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 1.5).abs() < 1e-4);
        assert!(rec.front_face);

        // Hit point lies on the surface and the normal is unit length
        assert!(((rec.p - Vec3::new(0.0, 0.0, -2.0)).length() - 0.5).abs() < 1e-4);
        assert!((rec.normal.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_hit_from_inside_flips_normal() {
        let sphere = test_sphere(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!(!rec.front_face);
        assert!(ray.direction.dot(rec.normal) <= 0.0);
    }

    #[test]
    fn test_near_root_outside_interval_takes_far_root() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -2.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Interval excludes the near root at t=1.5 but not the far one at t=2.5
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(2.0, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_miss() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -2.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_uv_poles_and_seam() {
        // v runs 0 at the south pole to 1 at the north pole
        let (_, v) = Sphere::sphere_uv(Vec3::new(0.0, -1.0, 0.0));
        assert!(v.abs() < 1e-4);
        let (_, v) = Sphere::sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-4);

        // The seam offset shifts u by 5/24 relative to the plain mapping,
        // which puts (0,0,1) at 1/4
        let (u, v) = Sphere::sphere_uv(Vec3::new(0.0, 0.0, 1.0));
        assert!((u - (0.25 + 5.0 / 24.0)).abs() < 1e-4);
        assert!((v - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bounding_box_encloses_surface() {
        let sphere = test_sphere(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let bbox = sphere.bounding_box();
        assert!(bbox.x.min <= -1.0 && bbox.x.max >= 3.0);
        assert!(bbox.y.min <= 0.0 && bbox.y.max >= 4.0);
        assert!(bbox.z.min <= 1.0 && bbox.z.max >= 5.0);
    }
}
