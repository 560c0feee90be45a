//! Textures: functions from surface coordinates to color.
//!
//! Also hosts the decoded-image adapter the image texture samples from and
//! its file loader, so sampling itself never touches I/O.

use crate::perlin::Perlin;
use crate::Color;
use glint_math::Vec3;
use rand::RngCore;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Maps a surface point to a color.
///
/// `(u, v)` are primitive-specific surface coordinates; `p` is the hit
/// point in world space for solid (procedural) textures.
pub trait Texture: Send + Sync {
    fn sample(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Arc<dyn Texture> {
        Arc::new(Self { albedo })
    }
}

impl Texture for SolidColor {
    fn sample(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// World-space checkerboard alternating two sub-textures.
pub struct CheckerTexture {
    scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Arc<dyn Texture> {
        Arc::new(Self { scale, even, odd })
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Arc<dyn Texture> {
        Self::new(scale, SolidColor::new(even), SolidColor::new(odd))
    }
}

impl Texture for CheckerTexture {
    fn sample(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (p.x / self.scale).floor() as i64
            + (p.y / self.scale).floor() as i64
            + (p.z / self.scale).floor() as i64;

        if cell % 2 == 0 {
            self.even.sample(u, v, p)
        } else {
            self.odd.sample(u, v, p)
        }
    }
}

/// Errors from decoding an image texture from disk.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded 2D image: dimensions plus 16-bit RGB texels.
///
/// This is the narrow interface the sampler consumes; decoding lives in
/// [`SampledImage::load`] and stays out of the render path.
#[derive(Clone)]
pub struct SampledImage {
    width: u32,
    height: u32,
    pixels: Vec<[u16; 3]>,
}

impl SampledImage {
    pub fn new(width: u32, height: u32, pixels: Vec<[u16; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode an image file (JPEG, PNG, ...) into 16-bit RGB texels.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageLoadError> {
        let path = path.as_ref();
        let decoded = image::open(path)?.to_rgb16();
        let (width, height) = decoded.dimensions();
        let pixels = decoded.pixels().map(|p| p.0).collect();

        log::debug!("loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self::new(width, height, pixels))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at integer coordinates, row-major from the top-left.
    pub fn rgb(&self, x: u32, y: u32) -> [u16; 3] {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Samples a [`SampledImage`] by nearest texel.
pub struct ImageTexture {
    image: SampledImage,
}

impl ImageTexture {
    pub fn new(image: SampledImage) -> Arc<dyn Texture> {
        Arc::new(Self { image })
    }
}

impl Texture for ImageTexture {
    fn sample(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.image.height() == 0 {
            // Debug cyan: an unmistakable "texture data missing" marker
            return Color::new(0.0, 1.0, 1.0);
        }

        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let x = ((u * self.image.width() as f32) as u32).min(self.image.width() - 1);
        let y = ((v * self.image.height() as f32) as u32).min(self.image.height() - 1);

        let [r, g, b] = self.image.rgb(x, y);
        let scale = 1.0 / u16::MAX as f32;
        Color::new(r as f32 * scale, g as f32 * scale, b as f32 * scale)
    }
}

/// Marbled Perlin-turbulence texture.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Arc<dyn Texture> {
        Arc::new(Self {
            noise: Perlin::new(rng),
            scale,
        })
    }
}

impl Texture for NoiseTexture {
    fn sample(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = p.z * self.scale + 10.0 * self.noise.turb(p * self.scale, 7);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_ignores_coordinates() {
        let tex = SolidColor::new(Color::new(0.2, 0.4, 0.6));
        assert_eq!(tex.sample(0.0, 0.0, Vec3::ZERO), Color::new(0.2, 0.4, 0.6));
        assert_eq!(
            tex.sample(0.9, 0.1, Vec3::splat(100.0)),
            Color::new(0.2, 0.4, 0.6)
        );
    }

    #[test]
    fn test_checker_parity() {
        let even = Color::new(1.0, 1.0, 1.0);
        let odd = Color::new(0.0, 0.0, 0.0);
        let tex = CheckerTexture::from_colors(1.0, even, odd);

        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), even);
        // One step along any single axis flips the cell
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), odd);
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(0.5, 1.5, 0.5)), odd);
        // Two steps restore it
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), even);
    }

    #[test]
    fn test_checker_scale() {
        let even = Color::new(1.0, 1.0, 1.0);
        let odd = Color::new(0.0, 0.0, 0.0);
        let tex = CheckerTexture::from_colors(2.0, even, odd);

        // Cells are 2 units wide
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), even);
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), even);
        assert_eq!(tex.sample(0.0, 0.0, Vec3::new(2.5, 0.5, 0.5)), odd);
    }

    #[test]
    fn test_image_texture_corners_and_flip() {
        // 2x2 image: top row red then green, bottom row blue then white
        let red = [u16::MAX, 0, 0];
        let green = [0, u16::MAX, 0];
        let blue = [0, 0, u16::MAX];
        let white = [u16::MAX; 3];
        let image = SampledImage::new(2, 2, vec![red, green, blue, white]);
        let tex = ImageTexture::new(image);

        // v=1 is the top row, v=0 the bottom
        assert_eq!(tex.sample(0.0, 1.0, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(0.9, 1.0, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(0.0, 0.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));

        // u,v outside [0,1] clamp instead of wrapping
        assert_eq!(tex.sample(2.0, -1.0, Vec3::ZERO), Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_image_texture_empty_returns_debug_cyan() {
        let tex = ImageTexture::new(SampledImage::new(0, 0, Vec::new()));
        assert_eq!(tex.sample(0.5, 0.5, Vec3::ZERO), Color::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_noise_texture_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let tex = NoiseTexture::new(4.0, &mut rng);
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 0.13, i as f32 * 0.07, i as f32 * 0.19);
            let c = tex.sample(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            // Greyscale output
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }
}
