//! Simulation entities
//!
//! A `Body` is the shared moving rectangle. `Character` and `Obstacle` wrap a
//! body and add their own per-step behavior; the `Collidable` trait is the
//! seam the collision manager works through.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Entity kinds, used for collision notification and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Character,
    Obstacle,
}

/// Axis-aligned moving rectangle. Position is the top-left corner, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "body size must be positive");
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    /// Size is fixed for the lifetime of the body
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Advance position by velocity
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Shared capability for anything the collision manager can test.
///
/// Defaults describe a plain trigger volume: collidable, not solid, no bounce,
/// and no reaction to contact.
pub trait Collidable {
    fn kind(&self) -> EntityKind;
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn is_collidable(&self) -> bool {
        true
    }

    /// Solid entities are pushed apart when they overlap
    fn is_solid(&self) -> bool {
        false
    }

    /// Velocity damping applied after a solid bounce
    fn bounce_factor(&self) -> Option<f32> {
        None
    }

    /// Called once per overlapping pair, on both participants
    fn on_collision(&mut self, _other: EntityKind) {}
}

/// Vertical motion state of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Grounded,
    Airborne,
}

/// The player-controlled potato
#[derive(Debug, Clone)]
pub struct Character {
    body: Body,
    spawn: Vec2,
    gravity: f32,
    jump_impulse: f32,
    /// Top-y of the body when standing on the floor
    ground_y: f32,
    /// Smallest allowed top-y
    ceiling_y: f32,
    motion: Motion,
    dead: bool,
    /// Survival ticks
    score: u64,
}

impl Character {
    pub fn new(spawn: Vec2, size: Vec2, ground_y: f32, gravity: f32, jump_impulse: f32) -> Self {
        let mut character = Self {
            body: Body::new(spawn, size),
            spawn,
            gravity,
            jump_impulse,
            ground_y,
            ceiling_y: 0.0,
            motion: Motion::Airborne,
            dead: false,
            score: 0,
        };
        character.settle();
        character
    }

    /// Character standing on the floor line at the tuned x position
    pub fn from_tuning(tuning: &Tuning, floor_y: f32) -> Self {
        let size = Vec2::new(tuning.character_width, tuning.character_height);
        let ground_y = floor_y - size.y;
        Self::new(
            Vec2::new(tuning.character_x, ground_y),
            size,
            ground_y,
            tuning.gravity,
            tuning.jump_impulse,
        )
    }

    /// Pick the motion state matching the current height
    fn settle(&mut self) {
        if self.body.pos.y >= self.ground_y {
            self.body.pos.y = self.ground_y;
            self.body.vel.y = 0.0;
            self.motion = Motion::Grounded;
        } else {
            self.motion = Motion::Airborne;
        }
    }

    /// Start a jump. Ignored unless grounded and alive.
    pub fn jump(&mut self) -> bool {
        if self.dead || self.motion != Motion::Grounded {
            return false;
        }
        self.body.vel.y = self.jump_impulse;
        self.motion = Motion::Airborne;
        true
    }

    /// Advance one fixed step
    pub fn update(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        self.score += 1;

        if self.motion == Motion::Grounded {
            return;
        }

        self.body.vel.y += self.gravity * dt;
        self.body.integrate(dt);

        if self.body.pos.y >= self.ground_y {
            self.body.pos.y = self.ground_y;
            self.body.vel.y = 0.0;
            self.motion = Motion::Grounded;
        } else if self.body.pos.y < self.ceiling_y {
            self.body.pos.y = self.ceiling_y;
            self.body.vel.y = 0.0;
        }
    }

    pub fn die(&mut self) {
        if !self.dead {
            self.dead = true;
            self.body.vel = Vec2::ZERO;
        }
    }

    /// Back to the spawn point with a fresh score, keeping tuning
    pub fn reset(&mut self) {
        self.body.pos = self.spawn;
        self.body.vel = Vec2::ZERO;
        self.dead = false;
        self.score = 0;
        self.settle();
    }

    /// Move the floor (playfield resize). Spawn follows the floor.
    pub fn set_ground(&mut self, ground_y: f32) {
        let was_grounded = self.motion == Motion::Grounded;
        let shift = ground_y - self.ground_y;
        self.ground_y = ground_y;
        self.spawn.y += shift;
        if was_grounded {
            self.body.pos.y = ground_y;
        }
        self.settle();
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn is_jumping(&self) -> bool {
        self.motion == Motion::Airborne
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }
}

impl Collidable for Character {
    fn kind(&self) -> EntityKind {
        EntityKind::Character
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_collision(&mut self, other: EntityKind) {
        if other == EntityKind::Obstacle {
            self.die();
        }
    }
}

/// A block scrolling right to left at constant speed
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    body: Body,
    active: bool,
    /// Set once the obstacle has fully passed the character
    pub cleared: bool,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec2, size: Vec2, speed: f32) -> Self {
        let mut body = Body::new(pos, size);
        body.vel.x = -speed.abs();
        Self {
            id,
            body,
            active: true,
            cleared: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
        if self.body.right() < 0.0 {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn speed(&self) -> f32 {
        -self.body.vel.x
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Keep the bottom edge on the floor line
    pub fn rest_on(&mut self, floor_y: f32) {
        self.body.pos.y = floor_y - self.body.size().y;
    }
}

impl Collidable for Obstacle {
    fn kind(&self) -> EntityKind {
        EntityKind::Obstacle
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn is_collidable(&self) -> bool {
        self.active
    }
}

/// Read-only drawable view of an entity, handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl From<&Character> for Drawable {
    fn from(character: &Character) -> Self {
        Self {
            kind: EntityKind::Character,
            pos: character.body.pos,
            size: character.body.size(),
            alive: !character.dead,
        }
    }
}

impl From<&Obstacle> for Drawable {
    fn from(obstacle: &Obstacle) -> Self {
        Self {
            kind: EntityKind::Obstacle,
            pos: obstacle.body.pos,
            size: obstacle.body.size(),
            alive: obstacle.active,
        }
    }
}
