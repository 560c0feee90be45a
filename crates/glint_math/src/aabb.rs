use crate::{Interval, Ray, Vec3};

/// Minimum per-axis extent. Planar primitives would otherwise produce a
/// zero-volume box that the slab test can miss.
const MIN_EXTENT: f32 = 1e-4;

/// Axis-aligned bounding box: one [`Interval`] per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanning two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Smallest box covering both inputs.
    pub fn union(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::union(&a.x, &b.x),
            y: Interval::union(&a.y, &b.y),
            z: Interval::union(&a.z, &b.z),
        }
    }

    /// Interval for axis 0 (X), 1 (Y) or 2 (Z).
    pub fn axis(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab-test ray intersection over `ray_t`.
    ///
    /// Each axis clips the running interval; the box is hit iff the interval
    /// stays non-empty after all three. A zero direction component yields
    /// infinite slab bounds and falls out of the comparisons per IEEE rules.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for n in 0..3 {
            let slab = self.axis(n);
            let adinv = 1.0 / ray.direction[n];

            let mut t0 = (slab.min - ray.origin[n]) * adinv;
            let mut t1 = (slab.max - ray.origin[n]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
