//! Floating decorations and background blobs

use glam::Vec2;

use super::context::SimContext;
use super::entity::{Entity, FloatingShape, ShapeKind};
use super::pool::EntityPool;
use crate::renderer::color::{Rgba, palette};
use crate::settings::ShapeConfig;
use crate::transform::float_keyframe;

/// Which set of decorations a shape effect draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeFamily {
    /// Outlined circles, squares and triangles
    Geometric,
    /// Soft palette-colored blobs
    Blobs,
}

const GEOMETRIC: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Triangle];

pub fn spawn(
    ctx: &mut SimContext,
    config: &ShapeConfig,
    family: ShapeFamily,
    index: usize,
) -> FloatingShape {
    let (kind, color) = match family {
        ShapeFamily::Geometric => {
            let kind = GEOMETRIC[ctx.index(GEOMETRIC.len())];
            let color = match kind {
                ShapeKind::Square => palette::SHAPE_SQUARE,
                ShapeKind::Triangle => palette::SHAPE_TRIANGLE,
                _ => palette::SHAPE_CIRCLE,
            };
            (kind, color)
        }
        ShapeFamily::Blobs => {
            let hex = palette::BLOBS[index % palette::BLOBS.len()];
            (ShapeKind::Blob, Rgba::from_hex(hex).unwrap_or(Rgba::WHITE))
        }
    };

    let base_rotation = if kind == ShapeKind::Square {
        ctx.range(0.0, 45.0).to_radians()
    } else {
        0.0
    };

    FloatingShape {
        kind,
        anchor: Vec2::new(ctx.random(), ctx.random()),
        size: ctx.range(config.size_min, config.size_max),
        duration_secs: ctx.range(config.duration_min, config.duration_max),
        delay_secs: ctx.range(0.0, config.delay_max),
        phase: 0.0,
        base_rotation,
        color,
        offset: Vec2::ZERO,
        rotation: 0.0,
    }
}

/// Fill the fixed set of shapes
pub fn populate(
    pool: &mut EntityPool,
    ctx: &mut SimContext,
    config: &ShapeConfig,
    family: ShapeFamily,
) {
    for index in 0..config.count {
        let shape = spawn(ctx, config, family, index);
        if pool.spawn(Entity::Shape(shape)).is_none() {
            break;
        }
    }
}

/// Place the shape on its keyframe path at `elapsed_secs`
pub fn update(shape: &mut FloatingShape, elapsed_secs: f32) {
    let running = elapsed_secs - shape.delay_secs;
    if running < 0.0 || shape.duration_secs <= 0.0 {
        shape.phase = 0.0;
    } else {
        shape.phase = (running / shape.duration_secs).rem_euclid(1.0);
    }
    let (offset, rotation) = float_keyframe(shape.phase);
    shape.offset = offset;
    shape.rotation = rotation;
}
