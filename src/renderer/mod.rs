//! WebGPU rendering module
//!
//! The scene is rebuilt from a simulation `Snapshot` every frame as a flat
//! triangle list; `RenderState` uploads and draws it.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use pipeline::RenderState;
pub use vertex::{Vertex, colors};

use crate::sim::{Drawable, EntityKind, Snapshot};

/// Anything that can present a frame of the game
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot, options: &SceneOptions);
    fn resize(&mut self, width: u32, height: u32);
}

/// Presentation switches that do not affect the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOptions {
    /// Skip the full-screen flash on death
    pub reduced_motion: bool,
}

/// Map a playfield pixel (origin top-left, y down) to normalized device coordinates
pub fn to_ndc(point: Vec2, playfield: Vec2) -> Vec2 {
    Vec2::new(
        point.x / playfield.x * 2.0 - 1.0,
        1.0 - point.y / playfield.y * 2.0,
    )
}

/// Build the full frame in playfield pixels, back to front
pub fn build_scene(snapshot: &Snapshot, options: &SceneOptions) -> Vec<Vertex> {
    let field = snapshot.playfield;
    let mut vertices = Vec::with_capacity(64 + snapshot.entities.len() * 36);

    vertices.extend(shapes::rect(
        Vec2::new(0.0, snapshot.floor_y),
        Vec2::new(field.x, (field.y - snapshot.floor_y).max(0.0)),
        colors::GROUND,
    ));
    vertices.extend(shapes::rect(
        Vec2::new(0.0, snapshot.floor_y),
        Vec2::new(field.x, 6.0),
        colors::GRASS,
    ));

    for drawable in snapshot.obstacles() {
        vertices.extend(obstacle(drawable));
    }
    for drawable in snapshot
        .entities
        .iter()
        .filter(|d| d.kind == EntityKind::Character)
    {
        vertices.extend(potato(drawable));
    }

    if !snapshot.alive && !options.reduced_motion {
        vertices.extend(shapes::rect(Vec2::ZERO, field, colors::DEATH_FLASH));
    }

    vertices
}

fn obstacle(drawable: &Drawable) -> Vec<Vertex> {
    let mut vertices = shapes::rect(drawable.pos, drawable.size, colors::OBSTACLE);
    vertices.extend(shapes::outline(drawable.pos, drawable.size, 2.0, colors::OUTLINE));
    vertices
}

fn potato(drawable: &Drawable) -> Vec<Vertex> {
    let body = if drawable.alive {
        colors::POTATO
    } else {
        colors::POTATO_DEAD
    };
    let mut vertices = shapes::rect(drawable.pos, drawable.size, body);
    vertices.extend(shapes::outline(drawable.pos, drawable.size, 2.0, colors::OUTLINE));

    // Eyes look forward, towards the incoming obstacles
    let eye_y = drawable.pos.y + drawable.size.y * 0.35;
    let radius = (drawable.size.x * 0.06).max(1.5);
    for fx in [0.55, 0.8] {
        let center = Vec2::new(drawable.pos.x + drawable.size.x * fx, eye_y);
        vertices.extend(shapes::circle(center, radius, colors::EYE, 8));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use crate::tuning::Tuning;

    /// Sink that just remembers what it was asked to draw
    #[derive(Default)]
    struct Recorder {
        frames: Vec<usize>,
        size: (u32, u32),
    }

    impl RenderSink for Recorder {
        fn render(&mut self, snapshot: &Snapshot, options: &SceneOptions) {
            self.frames.push(build_scene(snapshot, options).len());
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
    }

    #[test]
    fn test_ndc_corners() {
        let field = Vec2::new(800.0, 600.0);
        assert_eq!(to_ndc(Vec2::ZERO, field), Vec2::new(-1.0, 1.0));
        assert_eq!(to_ndc(field, field), Vec2::new(1.0, -1.0));
        assert_eq!(to_ndc(field / 2.0, field), Vec2::ZERO);
    }

    #[test]
    fn test_scene_grows_with_obstacles() {
        let mut state = GameState::new(8, Tuning::default());
        let options = SceneOptions::default();
        let mut sink = Recorder::default();

        sink.render(&state.snapshot(), &options);
        state.spawn_obstacle();
        sink.render(&state.snapshot(), &options);
        sink.resize(640, 480);

        // One obstacle is a fill plus a four-sided outline
        assert_eq!(sink.frames[1] - sink.frames[0], 6 + 24);
        assert_eq!(sink.size, (640, 480));
    }

    #[test]
    fn test_death_flash_respects_reduced_motion() {
        let mut state = GameState::new(8, Tuning::default());
        state.character.die();
        let snapshot = state.snapshot();

        let flashing = build_scene(&snapshot, &SceneOptions::default());
        let calm = build_scene(
            &snapshot,
            &SceneOptions {
                reduced_motion: true,
            },
        );
        assert_eq!(flashing.len(), calm.len() + 6);
        let last = flashing.last().map(|v| v.color);
        assert_eq!(last, Some(colors::DEATH_FLASH));
    }
}
