//! Vertex types for 2D rendering
//!
//! Positions are in playfield pixels until the pipeline maps them to NDC.

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.55, 0.78, 0.95, 1.0];
    pub const GROUND: [f32; 4] = [0.36, 0.25, 0.14, 1.0];
    pub const GRASS: [f32; 4] = [0.30, 0.65, 0.25, 1.0];
    pub const POTATO: [f32; 4] = [0.78, 0.63, 0.40, 1.0];
    pub const POTATO_DEAD: [f32; 4] = [0.45, 0.35, 0.25, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.35, 0.35, 0.40, 1.0];
    pub const OUTLINE: [f32; 4] = [0.10, 0.08, 0.06, 1.0];
    pub const EYE: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const DEATH_FLASH: [f32; 4] = [0.9, 0.1, 0.1, 0.25];
}
