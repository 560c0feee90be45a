//! glint render - CPU path tracing
//!
//! A Monte Carlo path tracer: scenes are assembled from spheres and quads
//! with shared materials and textures, optionally accelerated with a BVH,
//! and rendered by a pool of worker threads that stream an ordered plain
//! ASCII pixmap to any `Write` sink.

mod bvh;
mod camera;
mod hittable;
mod integrator;
mod material;
mod perlin;
mod pipeline;
mod quad;
mod sampling;
mod sphere;
mod texture;

pub use bvh::Bvh;
pub use camera::{format_pixel, linear_to_gamma, Camera};
pub use hittable::{HitRecord, Hittable, Primitive, World};
pub use integrator::{radiance, Background, Scratch};
pub use material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use perlin::Perlin;
pub use pipeline::{CancelToken, RenderError};
pub use quad::{make_box, Quad};
pub use sampling::{gen_f32, gen_range, random_in_unit_disk, random_unit_vector};
pub use sphere::Sphere;
pub use texture::{
    CheckerTexture, ImageLoadError, ImageTexture, NoiseTexture, SampledImage, SolidColor, Texture,
};

/// Re-export the math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Vec3};
