//! Ray-object intersection interface and the flat scene list.

use crate::{Material, Quad, Ray, ScatterResult, Sphere};
use glint_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A material that always absorbs, backing `HitRecord::default()`.
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }
}

static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection, always facing against the ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface texture coordinates
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray arrived from the outward side of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Store the normal so it opposes the ray, recording which side was hit.
    ///
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can intersect.
pub trait Hittable: Send + Sync {
    /// Test for the closest intersection with `ray_t`, filling `rec` on a hit.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Axis-aligned bounds enclosing the surface.
    fn bounding_box(&self) -> Aabb;
}

/// A concrete scene surface.
///
/// Primitives are a closed set, so intersection dispatch is a match rather
/// than a virtual call; materials and textures stay open behind traits.
pub enum Primitive {
    Sphere(Sphere),
    Quad(Quad),
}

impl Primitive {
    pub fn sphere(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Primitive::Sphere(Sphere::new(center, radius, material))
    }

    pub fn quad(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Primitive::Quad(Quad::new(q, u, v, material))
    }
}

impl Hittable for Primitive {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t, rec),
            Primitive::Quad(quad) => quad.hit(ray, ray_t, rec),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(sphere) => sphere.bounding_box(),
            Primitive::Quad(quad) => quad.bounding_box(),
        }
    }
}

/// An ordered list of primitives with their union bounds.
///
/// Scenes are assembled here and either traced directly (linear scan) or
/// handed to [`crate::Bvh`] for accelerated traversal.
pub struct World {
    objects: Vec<Arc<Primitive>>,
    bbox: Aabb,
}

impl World {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn add(&mut self, primitive: Primitive) {
        self.bbox = Aabb::union(&self.bbox, &primitive.bounding_box());
        self.objects.push(Arc::new(primitive));
    }

    /// Add every primitive of a composite shape, e.g. the quads of a box.
    pub fn add_all(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        for primitive in primitives {
            self.add(primitive);
        }
    }

    /// Shared handles to the scene contents, in insertion order.
    pub fn objects(&self) -> &[Arc<Primitive>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for World {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, Interval::new(ray_t.min, closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
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

    #[test]
    fn test_face_normal_opposes_ray() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec = HitRecord::default();
        rec.set_face_normal(&ray, Vec3::new(0.0, 0.0, 1.0));
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, 1.0));

        let mut rec = HitRecord::default();
        rec.set_face_normal(&ray, Vec3::new(0.0, 0.0, -1.0));
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, 1.0));

        assert!(ray.direction.dot(rec.normal) <= 0.0);
    }

    #[test]
    fn test_world_returns_closest_hit() {
        let mat = Lambertian::from_color(Color::splat(0.5));
        let mut world = World::new();
        world.add(Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, mat.clone()));
        world.add(Primitive::sphere(Vec3::new(0.0, 0.0, -2.0), 0.5, mat));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        // The nearer sphere wins regardless of insertion order
        assert!((rec.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_world_bbox_is_union() {
        let mat = Lambertian::from_color(Color::splat(0.5));
        let mut world = World::new();
        world.add(Primitive::sphere(Vec3::new(-2.0, 0.0, 0.0), 1.0, mat.clone()));
        world.add(Primitive::sphere(Vec3::new(3.0, 0.0, 0.0), 1.0, mat));

        let bbox = world.bounding_box();
        assert!(bbox.x.min <= -3.0);
        assert!(bbox.x.max >= 4.0);
    }
}
