//! Collision detection and response for axis-aligned boxes
//!
//! Pairwise AABB tests over a small set of entities. Every overlapping pair is
//! notified through `Collidable::on_collision`; pairs of solid entities are also
//! pushed apart and have their velocities exchanged.

use glam::Vec2;

use super::entity::Collidable;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Penetration depth on each axis (only meaningful when overlapping)
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            (self.max.x - other.min.x).min(other.max.x - self.min.x),
            (self.max.y - other.min.y).min(other.max.y - self.min.y),
        )
    }
}

/// An overlapping pair, by index into the checked slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CollisionManager {
    /// Optional playfield walls that collidable entities are kept inside
    boundaries: Option<Aabb>,
}

impl CollisionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_boundaries(&mut self, boundaries: Option<Aabb>) {
        self.boundaries = boundaries;
    }

    pub fn boundaries(&self) -> Option<Aabb> {
        self.boundaries
    }

    /// Test every pair of collidable entities and resolve the overlaps.
    ///
    /// O(n²), which is fine for the handful of entities on screen.
    pub fn check_collisions(&self, entities: &mut [&mut dyn Collidable]) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for i in 0..entities.len() {
            let (head, tail) = entities.split_at_mut(i + 1);
            let a = &mut *head[i];
            if !a.is_collidable() {
                continue;
            }

            for (offset, b) in tail.iter_mut().enumerate() {
                let b = &mut **b;
                if !b.is_collidable() {
                    continue;
                }
                if a.body().aabb().overlaps(&b.body().aabb()) {
                    resolve_collision(a, b);
                    contacts.push(Contact { a: i, b: i + 1 + offset });
                }
            }

            if let Some(bounds) = self.boundaries {
                keep_inside(a, &bounds);
            }
        }

        contacts
    }
}

fn resolve_collision(a: &mut dyn Collidable, b: &mut dyn Collidable) {
    let kind_a = a.kind();
    let kind_b = b.kind();
    a.on_collision(kind_b);
    b.on_collision(kind_a);

    if !(a.is_solid() && b.is_solid()) {
        return;
    }

    // Push `a` out along the axis of least penetration
    let box_a = a.body().aabb();
    let box_b = b.body().aabb();
    let overlap = box_a.penetration(&box_b);
    let body_a = a.body_mut();
    if overlap.x < overlap.y {
        if box_a.min.x < box_b.min.x {
            body_a.pos.x -= overlap.x;
        } else {
            body_a.pos.x += overlap.x;
        }
    } else if box_a.min.y < box_b.min.y {
        body_a.pos.y -= overlap.y;
    } else {
        body_a.pos.y += overlap.y;
    }

    resolve_velocities(a, b);
}

/// Elastic bounce approximation: swap velocities, then damp
fn resolve_velocities(a: &mut dyn Collidable, b: &mut dyn Collidable) {
    let vel_a = a.body().vel;
    a.body_mut().vel = b.body().vel;
    b.body_mut().vel = vel_a;

    if let Some(factor) = a.bounce_factor() {
        a.body_mut().vel *= factor;
    }
    if let Some(factor) = b.bounce_factor() {
        b.body_mut().vel *= factor;
    }
}

/// Clamp an entity inside the walls, reflecting (or killing) velocity on contact
fn keep_inside(entity: &mut dyn Collidable, bounds: &Aabb) {
    let reflect = -entity.bounce_factor().unwrap_or(0.0);
    let body = entity.body_mut();
    let size = body.size();

    if body.pos.x < bounds.min.x {
        body.pos.x = bounds.min.x;
        body.vel.x *= reflect;
    }
    if body.pos.x + size.x > bounds.max.x {
        body.pos.x = bounds.max.x - size.x;
        body.vel.x *= reflect;
    }
    if body.pos.y < bounds.min.y {
        body.pos.y = bounds.min.y;
        body.vel.y *= reflect;
    }
    if body.pos.y + size.y > bounds.max.y {
        body.pos.y = bounds.max.y - size.y;
        body.vel.y *= reflect;
    }
}
