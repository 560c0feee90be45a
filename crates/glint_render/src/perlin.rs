//! Gradient noise for the turbulence texture.

use crate::sampling::random_unit_vector;
use glint_math::{trilerp, Vec3};
use rand::RngCore;

const POINT_COUNT: usize = 256;

/// Lattice gradient noise: a table of random unit gradients indexed through
/// three axis permutations.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_unit_vector(rng)).collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        // Swap target drawn from 0..i, not 0..=i; the generated tables (and
        // their slight bias) depend on this exact sequence
        for i in (1..POINT_COUNT).rev() {
            let target = rng.next_u32() as usize % i;
            perm.swap(i, target);
        }
        perm
    }

    /// Smoothed gradient noise in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let xf = p.x.floor();
        let yf = p.y.floor();
        let zf = p.z.floor();

        let u = p.x - xf;
        let v = p.y - yf;
        let w = p.z - zf;

        let xi = xf as i64;
        let yi = yf as i64;
        let zi = zf as i64;

        // Dot each corner gradient with the offset from that corner
        let mut corners = [[[0.0f32; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, value) in row.iter_mut().enumerate() {
                    let gradient = self.gradients[self.perm_x
                        [(xi + di as i64) as usize & (POINT_COUNT - 1)]
                        ^ self.perm_y[(yi + dj as i64) as usize & (POINT_COUNT - 1)]
                        ^ self.perm_z[(zi + dk as i64) as usize & (POINT_COUNT - 1)]];
                    let offset = Vec3::new(u - di as f32, v - dj as f32, w - dk as f32);
                    *value = gradient.dot(offset);
                }
            }
        }

        // Hermite-smoothed interpolation weights
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        trilerp(&corners, uu, vv, ww)
    }

    /// Octave-summed absolute noise: `|sum of noise(2^i p) / 2^i|`.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut point = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(point);
            weight *= 0.5;
            point *= 2.0;
        }

        accum.abs()
    }
}
