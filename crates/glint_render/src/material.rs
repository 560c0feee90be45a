//! Materials: how surfaces scatter and emit light.

use crate::sampling::{gen_f32, random_unit_vector};
use crate::texture::{SolidColor, Texture};
use crate::{HitRecord, Ray};
use glint_math::Vec3;
use rand::RngCore;
use std::sync::Arc;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Result of scattering a ray off a material.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-bounce multiplicative color applied to downstream radiance
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// How light interacts with a surface.
///
/// Takes `&mut dyn RngCore` for object safety; all randomness comes from
/// the caller's per-worker generator.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or return None if it is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Radiance emitted at the hit point. Most materials emit nothing.
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Diffuse surface scattering around the normal, tinted by a texture.
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Arc<dyn Material> {
        Arc::new(Self { albedo })
    }

    pub fn from_color(albedo: Color) -> Arc<dyn Material> {
        Self::new(SolidColor::new(albedo))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch the degenerate case where the random vector cancels the normal
        if scatter_direction.abs().max_element() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.sample(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Specular reflector with optional roughness.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` is clamped to [0,1]: 0 is a perfect mirror, 1 very rough.
    pub fn new(albedo: Color, fuzz: f32) -> Arc<dyn Material> {
        Arc::new(Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        })
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzzed rays that end up under the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Clear refractive material (glass, water, diamond).
pub struct Dielectric {
    /// Index of refraction of the medium relative to the enclosing medium
    refraction_index: f32,
}

impl Dielectric {
    pub fn new(refraction_index: f32) -> Arc<dyn Material> {
        Arc::new(Self { refraction_index })
    }

    /// Schlick's approximation of the Fresnel reflectance.
    fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Past the critical angle only reflection is possible
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Pure emitter: contributes radiance and never scatters.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Arc<dyn Material> {
        Arc::new(Self { emit })
    }

    pub fn from_color(emit: Color) -> Arc<dyn Material> {
        Self::new(SolidColor::new(emit))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.sample(u, v, p)
    }
}

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
