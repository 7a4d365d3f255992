//! Outline generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

/// Segment count that keeps a circle of `radius` smooth without waste
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.75).ceil() as u32).clamp(8, 64)
}

/// Closed outline of a circle
pub fn circle(center: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * 2.0 * PI;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Regular polygon with `sides` corners, the first one at `rotation`
/// (0 points straight up)
pub fn regular_polygon(center: Vec2, radius: f32, sides: u32, rotation: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let theta = rotation + (i as f32 / sides as f32) * 2.0 * PI - PI / 2.0;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Square of side `size`, rotated about its center
pub fn square(center: Vec2, size: f32, rotation: f32) -> Vec<Vec2> {
    let half = size / 2.0;
    let (sin, cos) = rotation.sin_cos();
    [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .iter()
    .map(|c| center + Vec2::new(c.x * cos - c.y * sin, c.x * sin + c.y * cos))
    .collect()
}

/// Upward triangle whose base is `size` wide
pub fn triangle(center: Vec2, size: f32, rotation: f32) -> Vec<Vec2> {
    regular_polygon(center, size / 3f32.sqrt(), 3, rotation)
}

/// Four-point twinkle star
pub fn sparkle(center: Vec2, radius: f32) -> Vec<Vec2> {
    let inner = radius * 0.3;
    (0..8)
        .map(|i| {
            let theta = (i as f32 / 8.0) * 2.0 * PI - PI / 2.0;
            let r = if i % 2 == 0 { radius } else { inner };
            center + Vec2::new(theta.cos(), theta.sin()) * r
        })
        .collect()
}

/// Close an outline for stroking
pub fn closed(mut points: Vec<Vec2>) -> Vec<Vec2> {
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}
