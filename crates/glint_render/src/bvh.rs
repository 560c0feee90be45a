//! Bounding volume hierarchy over scene primitives.
//!
//! Built once per scene by median split along a randomly chosen axis, so
//! the tree is deterministic for a seeded build RNG.

use crate::hittable::{HitRecord, Hittable, Primitive, World};
use glint_math::{Aabb, Interval, Ray};
use rand::RngCore;
use std::sync::Arc;

/// A node of the hierarchy: either an interior split or a single primitive.
///
/// A one-element input produces a split whose children are the same
/// primitive; traversal culls the duplicate via the clipped right interval.
pub enum Bvh {
    Split {
        left: Box<Bvh>,
        right: Box<Bvh>,
        bbox: Aabb,
    },
    Leaf {
        primitive: Arc<Primitive>,
    },
}

impl Bvh {
    /// Build a hierarchy over the primitives of `world`.
    pub fn from_world(world: &World, rng: &mut dyn RngCore) -> Self {
        Self::new(world.objects().to_vec(), rng)
    }

    /// Build a hierarchy over shared primitive handles.
    ///
    /// Panics on an empty input; an empty scene has nothing to accelerate.
    pub fn new(mut primitives: Vec<Arc<Primitive>>, rng: &mut dyn RngCore) -> Self {
        assert!(!primitives.is_empty(), "cannot build a BVH over no primitives");
        Self::build(&mut primitives, rng)
    }

    fn build(primitives: &mut [Arc<Primitive>], rng: &mut dyn RngCore) -> Self {
        let axis = (rng.next_u32() % 3) as usize;
        let min_on_axis = |p: &Arc<Primitive>| p.bounding_box().axis(axis).min;

        let (left, right) = match primitives {
            [only] => (
                Bvh::Leaf {
                    primitive: only.clone(),
                },
                Bvh::Leaf {
                    primitive: only.clone(),
                },
            ),
            [a, b] => {
                if min_on_axis(a) > min_on_axis(b) {
                    std::mem::swap(a, b);
                }
                (
                    Bvh::Leaf {
                        primitive: a.clone(),
                    },
                    Bvh::Leaf {
                        primitive: b.clone(),
                    },
                )
            }
            _ => {
                primitives.sort_by(|a, b| {
                    min_on_axis(a)
                        .partial_cmp(&min_on_axis(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                let mid = primitives.len() / 2;
                let (front, back) = primitives.split_at_mut(mid);
                (Self::build(front, rng), Self::build(back, rng))
            }
        };

        let bbox = Aabb::union(&left.bounding_box(), &right.bounding_box());
        Bvh::Split {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }
}

impl Hittable for Bvh {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            Bvh::Leaf { primitive } => primitive.hit(ray, ray_t, rec),

            Bvh::Split { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // The right child only needs to beat the left hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Bvh::Leaf { primitive } => primitive.bounding_box(),
            Bvh::Split { bbox, .. } => *bbox,
        }
    }
}
