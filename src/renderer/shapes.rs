//! Shape generation for 2D primitives
//!
//! All shapes come out as triangle lists in playfield pixels (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Filled axis-aligned rectangle from its top-left corner
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside the rectangle
pub fn outline(pos: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let inner_h = size.y - 2.0 * t;

    let mut vertices = Vec::with_capacity(24);
    // Top and bottom span the full width
    vertices.extend(rect(pos, Vec2::new(size.x, t), color));
    vertices.extend(rect(
        Vec2::new(pos.x, pos.y + size.y - t),
        Vec2::new(size.x, t),
        color,
    ));
    if inner_h > 0.0 {
        vertices.extend(rect(
            Vec2::new(pos.x, pos.y + t),
            Vec2::new(t, inner_h),
            color,
        ));
        vertices.extend(rect(
            Vec2::new(pos.x + size.x - t, pos.y + t),
            Vec2::new(t, inner_h),
            color,
        ));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let vertices = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_outline_of_thin_rect() {
        // Thickness larger than half the height collapses to two strips
        let vertices = outline(Vec2::ZERO, Vec2::new(50.0, 4.0), 3.0, [1.0; 4]);
        assert_eq!(vertices.len(), 12);

        let vertices = outline(Vec2::ZERO, Vec2::new(50.0, 50.0), 3.0, [1.0; 4]);
        assert_eq!(vertices.len(), 24);
    }

    #[test]
    fn test_circle_segment_count() {
        let vertices = circle(Vec2::new(5.0, 5.0), 2.0, [1.0; 4], 12);
        assert_eq!(vertices.len(), 36);
    }
}
