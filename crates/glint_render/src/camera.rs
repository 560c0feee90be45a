//! Camera model and the render entry point.

use crate::integrator::{radiance, Background, Scratch};
use crate::pipeline::{self, CancelToken, RenderError, CHUNK_BUFFER, CHUNK_SIZE, PIXEL_BUFFER};
use crate::sampling::{gen_f32, random_in_unit_disk};
use crate::{Color, Hittable, Ray};
use glint_math::Vec3;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::Write;
use std::sync::mpsc::sync_channel;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

/// A thin-lens camera plus the settings that drive a render.
///
/// Construct with [`Camera::new`], adjust through the `with_*` builders,
/// then call [`Camera::render`]. Derived quantities (viewport basis, pixel
/// grid, defocus disk) are recomputed whenever a setting changes, so the
/// camera is always ready to trace.
#[derive(Clone)]
pub struct Camera {
    // Image settings
    aspect_ratio: f32,
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    max_depth: u32,

    // Positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens
    vfov: f32,
    defocus_angle: f32,
    focus_dist: f32,

    background: Background,
    seed: Option<u64>,

    // Derived
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// A camera with the default option bundle, framed by aspect ratio and
    /// output width.
    pub fn new(aspect_ratio: f32, image_width: u32) -> Self {
        let mut camera = Self {
            aspect_ratio,
            image_width,
            image_height: 1,
            samples_per_pixel: 100,
            max_depth: 50,
            look_from: Vec3::new(0.0, 0.0, -1.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Background::Solid(Color::ZERO),
            seed: None,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set sampling quality. Panics if `max_depth` is zero.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        assert!(max_depth > 0, "max_depth must be at least 1");
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self.initialize();
        self
    }

    /// Set camera position and orientation.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set field of view (degrees), defocus angle (degrees) and focus
    /// distance.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self.initialize();
        self
    }

    /// Set the radiance for rays that leave the scene.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Seed worker generators deterministically instead of from the clock.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    fn initialize(&mut self) {
        self.image_height =
            (((self.image_width as f32) / self.aspect_ratio).floor() as u32).max(1);

        self.center = self.look_from;

        // Viewport dimensions at the focus plane
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Orthonormal camera basis
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// A jittered ray through pixel (i, j).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Averaged linear radiance for pixel (i, j).
    fn pixel_color(
        &self,
        world: &dyn Hittable,
        i: u32,
        j: u32,
        scratch: &mut Scratch,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut sum = Color::ZERO;
        for _ in 0..self.samples_per_pixel {
            let ray = self.get_ray(i, j, rng);
            sum += radiance(&ray, world, &self.background, scratch, rng);
        }
        sum / self.samples_per_pixel as f32
    }

    /// Render the scene as a plain ASCII pixmap into `writer`.
    pub fn render<W: Write>(&self, world: &dyn Hittable, writer: &mut W) -> Result<(), RenderError> {
        self.render_with_cancel(world, writer, &CancelToken::new())
    }

    /// Render, stopping early (without a complete image) if `cancel` fires.
    pub fn render_with_cancel<W: Write>(
        &self,
        world: &dyn Hittable,
        writer: &mut W,
        cancel: &CancelToken,
    ) -> Result<(), RenderError> {
        let width = self.image_width as usize;
        let height = self.image_height as usize;
        let total = width * height;

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let base_seed = self.seed.unwrap_or_else(wall_clock_seed);

        log::info!(
            "rendering {}x{} at {} spp, depth {}, {} workers",
            width,
            height,
            self.samples_per_pixel,
            self.max_depth,
            workers
        );

        let header = format!("P3\n{} {}\n255\n", width, height);

        let result = thread::scope(|s| {
            let mut worker_rxs = Vec::with_capacity(workers);
            for k in 0..workers {
                let (tx, rx) = sync_channel(PIXEL_BUFFER);
                worker_rxs.push(rx);
                let cancel = cancel.clone();

                s.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(k as u64));
                    let mut scratch = Scratch::new(self.max_depth as usize);

                    for idx in (k..total).step_by(workers) {
                        if cancel.is_cancelled() {
                            break;
                        }
                        let i = (idx % width) as u32;
                        let j = (idx / width) as u32;
                        let color = self.pixel_color(world, i, j, &mut scratch, &mut rng);
                        if tx.send(format_pixel(color)).is_err() {
                            break;
                        }
                    }
                });
            }

            let (pixel_tx, pixel_rx) = sync_channel(PIXEL_BUFFER);
            let (chunk_tx, chunk_rx) = sync_channel(CHUNK_BUFFER);
            s.spawn(move || pipeline::interleave(worker_rxs, pixel_tx));
            s.spawn(move || pipeline::aggregate(pixel_rx, chunk_tx, CHUNK_SIZE));

            // This thread owns the sink
            pipeline::drain_chunks(writer, &header, chunk_rx)
        });

        result?;
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }
}

/// Gamma-2 correction: linear to display.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize a linear color to an output pixel line: gamma-2, clamp to
/// [0,1], scale by 255.999 and floor.
pub fn format_pixel(color: Color) -> String {
    let r = (255.999 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.999 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.999 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    format!("{} {} {}", r, g, b)
}

/// Jitter offset in [-0.5, 0.5) x [-0.5, 0.5).
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
