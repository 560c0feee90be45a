//! Random sampling primitives.
//!
//! Everything here draws from a caller-supplied generator; nothing touches
//! thread-local or global RNG state, so workers stay reproducible when
//! seeded.

use glint_math::Vec3;
use rand::RngCore;

/// Uniform f32 in [0, 1) from an object-safe generator.
///
/// `dyn RngCore` cannot use `Rng::gen` directly; this mirrors the standard
/// distribution's bit trick for f32.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    let bits = rng.next_u32();
    (bits >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform f32 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + gen_f32(rng) * (max - min)
}

/// Uniformly distributed unit vector.
///
/// Rejection samples the cube [-1,1]^3 until a point falls inside the unit
/// sphere, then normalizes. The loop is unbounded in the worst case; the
/// acceptance rate is pi/6 per draw.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Uniform point inside the unit disk in the xy plane.
///
/// Rejection sampled; unbounded in the worst case like
/// [`random_unit_vector`].
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
