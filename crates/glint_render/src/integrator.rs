//! The path tracing integrator.

use crate::{Color, HitRecord, Hittable, Ray};
use glint_math::Interval;
use rand::RngCore;

/// Rays start this far along to avoid re-hitting the surface they left.
const SELF_INTERSECTION_BIAS: f32 = 0.001;

/// Radiance for rays that leave the scene.
#[derive(Debug, Clone, Copy)]
pub enum Background {
    /// A constant color everywhere.
    Solid(Color),
    /// White-to-blue vertical gradient keyed on the ray direction.
    SkyGradient,
}

impl Background {
    pub fn sample(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => {
                let unit = ray.direction.normalize();
                let a = 0.5 * (unit.y + 1.0);
                Color::ONE.lerp(Color::new(0.5, 0.7, 1.0), a)
            }
        }
    }
}

/// Per-worker integrator state: the attenuation and emission recorded at
/// each bounce, sized exactly at the bounce limit and reused across pixels
/// and samples.
pub struct Scratch {
    attenuation: Vec<Color>,
    emission: Vec<Color>,
}

impl Scratch {
    /// Panics if `max_depth` is zero; a zero-bounce render is a bug.
    pub fn new(max_depth: usize) -> Self {
        assert!(max_depth > 0, "max_depth must be at least 1");
        Self {
            attenuation: vec![Color::ZERO; max_depth],
            emission: vec![Color::ZERO; max_depth],
        }
    }

    pub fn max_depth(&self) -> usize {
        self.attenuation.len()
    }
}

/// Estimate the radiance arriving along `ray`.
///
/// Walks the path forward, recording per-bounce attenuation and emission
/// in `scratch`, then folds the stacks back to front:
/// `sample = sample * attenuation[j] + emission[j]`. A path that is
/// absorbed or runs out of bounces contributes no tail radiance; the
/// background applies only to rays that leave the scene.
pub fn radiance(
    ray: &Ray,
    world: &dyn Hittable,
    background: &Background,
    scratch: &mut Scratch,
    rng: &mut dyn RngCore,
) -> Color {
    let max_depth = scratch.max_depth();

    let mut current = *ray;
    let mut bounces = max_depth;
    let mut tail = Color::ZERO;
    let mut terminated = false;

    for k in 0..max_depth {
        let mut rec = HitRecord::default();
        if !world.hit(
            &current,
            Interval::new(SELF_INTERSECTION_BIAS, f32::INFINITY),
            &mut rec,
        ) {
            tail = background.sample(&current);
            bounces = k;
            terminated = true;
            break;
        }

        let emitted = rec.material.emitted(rec.u, rec.v, rec.p);
        match rec.material.scatter(&current, &rec, rng) {
            Some(scatter) => {
                scratch.emission[k] = emitted;
                scratch.attenuation[k] = scatter.attenuation;
                current = scatter.scattered;
            }
            None => {
                // Absorbed: the emission here replaces the tail outright and
                // is attenuated only by the bounces before it
                tail = emitted;
                bounces = k;
                terminated = true;
                break;
            }
        }
    }

    if !terminated {
        return Color::ZERO;
    }

    let mut sample = tail;
    for j in (0..bounces).rev() {
        sample = sample * scratch.attenuation[j] + scratch.emission[j];
    }
    sample
}
