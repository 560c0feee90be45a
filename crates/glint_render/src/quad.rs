//! Planar parallelogram primitive and the box helper built from it.

use crate::{
    hittable::{HitRecord, Hittable, Primitive},
    Material, Ray,
};
use glint_math::{Aabb, Interval, Vec3};
use std::sync::Arc;

/// Rays closer than this to parallel with the plane are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A parallelogram with corner `q` and edge vectors `u`, `v`.
///
/// A quad with `u x v = 0` is accepted but degenerates to NaN plane math
/// and can never be hit.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` with `n = u x v`; projects plane offsets onto (u, v)
    w: Vec3,
    normal: Vec3,
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        // Bounds from both diagonals; construction pads the planar axis
        let bbox = Aabb::union(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox,
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        // Planar coordinates of the intersection relative to q
        let p = ray.at(t);
        let planar = p - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six quads of an axis-aligned box spanning opposite corners `a`, `b`,
/// with outward-facing normals.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Vec<Primitive> {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    vec![
        // front (+z)
        Primitive::quad(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone()),
        // right (+x)
        Primitive::quad(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone()),
        // back (-z)
        Primitive::quad(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone()),
        // left (-x)
        Primitive::quad(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone()),
        // top (+y)
        Primitive::quad(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone()),
        // bottom (-y)
        Primitive::quad(Vec3::new(min.x, min.y, min.z), dx, dz, material),
    ]
}
