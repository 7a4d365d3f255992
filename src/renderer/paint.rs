//! Entity painting
//!
//! Paint order: backdrop (clear, or a translucent full-surface fill that
//! leaves fading ghosts), then every live entity in pool order. Painting
//! only reads the pool.

use glam::Vec2;

use super::color::{Rgba, palette};
use super::shapes;
use super::surface::Surface;
use crate::sim::{Entity, EntityPool, FloatingShape, Particle, ParticleStyle, ShapeKind};
use crate::transform::lerp;
use crate::viewport::ViewportDimensions;

/// What happens to the previous frame's pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    Clear,
    /// Low-alpha overlay; older frames fade out over several paints
    Fade(Rgba),
}

/// How an effect's entities are drawn
#[derive(Debug, Clone, PartialEq)]
pub enum PaintStyle {
    Stars,
    Particles,
    Trail { dot_radius: f32 },
    Follower { dot_radius: f32, outline_radius: f32 },
    /// Filled region below each wave curve
    WaveBand { colors: Vec<Rgba> },
    /// Stroked strands joined by rungs
    Helix { colors: Vec<Rgba>, rung_every: usize },
    Rain { font_size: f32 },
    Shapes,
}

const STROKE_WIDTH: f32 = 2.0;
const FOLLOWER_PRESS_SCALE: f32 = 1.5;

#[derive(Debug, Clone)]
pub struct Renderer {
    pub backdrop: Backdrop,
    pub style: PaintStyle,
}

impl Renderer {
    pub fn new(backdrop: Backdrop, style: PaintStyle) -> Self {
        Self { backdrop, style }
    }

    /// Draw one frame of `pool` onto `surface`
    pub fn paint(&self, pool: &EntityPool, surface: &mut dyn Surface) {
        let dims = surface.size();
        if !dims.is_renderable() {
            return;
        }

        match self.backdrop {
            Backdrop::Clear => surface.clear(),
            Backdrop::Fade(color) => surface.fill_all(color),
        }

        match &self.style {
            PaintStyle::WaveBand { colors } => paint_wave_band(pool, surface, colors, dims),
            PaintStyle::Helix { colors, rung_every } => {
                paint_helix(pool, surface, colors, *rung_every)
            }
            style => {
                for (_, entity) in pool.iter() {
                    paint_entity(entity, style, surface, dims);
                }
            }
        }
    }
}

fn paint_entity(entity: &Entity, style: &PaintStyle, surface: &mut dyn Surface, dims: ViewportDimensions) {
    match entity {
        Entity::Star(star) => {
            surface.fill_circle(star.screen, star.screen_radius, palette::STAR.with_alpha(star.alpha))
        }
        Entity::Particle(p) => paint_particle(p, style, surface),
        Entity::Trail(point) => {
            let radius = match style {
                PaintStyle::Trail { dot_radius } => *dot_radius,
                _ => STROKE_WIDTH,
            };
            surface.fill_circle(point.pos, radius, palette::TRAIL.with_alpha(point.opacity));
        }
        Entity::Shape(shape) => paint_shape(shape, surface, dims),
        Entity::Glyph(column) => {
            let font_size = match style {
                PaintStyle::Rain { font_size } => *font_size,
                _ => return,
            };
            let origin = Vec2::new(column.column as f32 * font_size, (column.row - 1.0) * font_size);
            surface.fill_glyph(column.glyph, origin, font_size, palette::RAIN);
        }
        // Waves are drawn as whole curves
        Entity::Wave(_) => {}
    }
}

fn paint_particle(p: &Particle, style: &PaintStyle, surface: &mut dyn Surface) {
    let color = p.color.fade(p.life);
    match p.style {
        ParticleStyle::Dot => surface.fill_circle(p.pos, p.size, color),
        ParticleStyle::Sparkle => surface.fill_polygon(&shapes::sparkle(p.pos, p.size), color),
        ParticleStyle::Ring => surface.stroke_circle(p.pos, p.size, STROKE_WIDTH, color),
        ParticleStyle::Cursor => {
            let (dot, outline) = match style {
                PaintStyle::Follower {
                    dot_radius,
                    outline_radius,
                } => (*dot_radius, *outline_radius),
                _ => (p.size, p.size * 4.0),
            };
            let press = if p.pressed { 1.0 } else { 0.0 };
            let outline = lerp(outline, outline * FOLLOWER_PRESS_SCALE, press);
            surface.fill_circle(p.pos, dot, p.color);
            surface.stroke_circle(p.pos, outline, STROKE_WIDTH, p.color.fade(0.5));
        }
    }
}

fn paint_shape(shape: &FloatingShape, surface: &mut dyn Surface, dims: ViewportDimensions) {
    let center = Vec2::new(shape.anchor.x * dims.width, shape.anchor.y * dims.height) + shape.offset;
    let rotation = shape.base_rotation + shape.rotation;
    match shape.kind {
        ShapeKind::Circle => surface.stroke_circle(center, shape.size / 2.0, STROKE_WIDTH, shape.color),
        ShapeKind::Square => surface.stroke_polyline(
            &shapes::closed(shapes::square(center, shape.size, rotation)),
            STROKE_WIDTH,
            shape.color,
        ),
        ShapeKind::Triangle => surface.stroke_polyline(
            &shapes::closed(shapes::triangle(center, shape.size, rotation)),
            STROKE_WIDTH,
            shape.color,
        ),
        ShapeKind::Blob => surface.fill_circle(center, shape.size / 2.0, shape.color),
    }
}

/// Group consecutive wave samples into one curve per wave
fn wave_curves(pool: &EntityPool) -> Vec<(usize, Vec<Vec2>)> {
    let mut curves: Vec<(usize, Vec<Vec2>)> = Vec::new();
    for (_, entity) in pool.iter() {
        let Entity::Wave(sample) = entity else {
            continue;
        };
        match curves.last_mut() {
            Some((wave, points)) if *wave == sample.wave => points.push(sample.pos),
            _ => curves.push((sample.wave, vec![sample.pos])),
        }
    }
    curves
}

fn paint_wave_band(pool: &EntityPool, surface: &mut dyn Surface, colors: &[Rgba], dims: ViewportDimensions) {
    for (wave, mut points) in wave_curves(pool) {
        let color = colors.get(wave).copied().unwrap_or(Rgba::WHITE);
        points.insert(0, Vec2::new(0.0, dims.height / 2.0));
        points.push(Vec2::new(dims.width, dims.height));
        points.push(Vec2::new(0.0, dims.height));
        surface.fill_polygon(&points, color);
    }
}

fn paint_helix(pool: &EntityPool, surface: &mut dyn Surface, colors: &[Rgba], rung_every: usize) {
    let curves = wave_curves(pool);
    for (wave, points) in &curves {
        let color = colors.get(*wave).copied().unwrap_or(Rgba::WHITE);
        surface.stroke_polyline(points, STROKE_WIDTH, color);
    }
    if let [(_, a), (_, b), ..] = curves.as_slice() {
        for (pa, pb) in a.iter().zip(b).step_by(rung_every.max(1)) {
            surface.stroke_polyline(&[*pa, *pb], 1.0, palette::HELIX_RUNG);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pixel::PixelSurface;
    use crate::sim::{GlyphColumn, OverflowPolicy, StarPoint, TrailPoint};

    fn surface() -> PixelSurface {
        PixelSurface::new(ViewportDimensions::new(64.0, 64.0))
    }

    fn star(alpha: f32) -> Entity {
        Entity::Star(StarPoint {
            pos: Vec2::splat(32.0),
            depth: 10.0,
            radius: 1.0,
            speed: 1.0,
            screen: Vec2::splat(32.0),
            screen_radius: 3.0,
            alpha,
        })
    }

    #[test]
    fn test_paint_never_mutates_pool() {
        let mut pool = EntityPool::new(4, OverflowPolicy::Reject);
        pool.spawn(star(1.0));
        let before = format!("{:?}", pool.iter().collect::<Vec<_>>());
        let renderer = Renderer::new(Backdrop::Fade(Rgba::BLACK.with_alpha(0.1)), PaintStyle::Stars);
        let mut s = surface();
        renderer.paint(&pool, &mut s);
        renderer.paint(&pool, &mut s);
        assert_eq!(before, format!("{:?}", pool.iter().collect::<Vec<_>>()));
        assert!(s.pixel(32, 32).unwrap().r > 200);
    }

    #[test]
    fn test_expired_entities_not_drawn() {
        let mut pool = EntityPool::new(4, OverflowPolicy::OverwriteAtCursor);
        pool.spawn(Entity::Trail(TrailPoint {
            pos: Vec2::splat(10.0),
            opacity: 0.0,
            fade: 0.05,
            slot: 0,
        }));
        let renderer = Renderer::new(Backdrop::Clear, PaintStyle::Trail { dot_radius: 2.0 });
        let mut s = surface();
        renderer.paint(&pool, &mut s);
        assert_eq!(s.painted(), 0.0);
    }

    #[test]
    fn test_fade_backdrop_leaves_ghost() {
        let mut pool = EntityPool::new(4, OverflowPolicy::Reject);
        let id = pool.spawn(star(1.0)).unwrap();
        let mut s = surface();
        let fade = Renderer::new(Backdrop::Fade(Rgba::BLACK.with_alpha(0.1)), PaintStyle::Stars);
        fade.paint(&pool, &mut s);
        pool.remove(id);
        fade.paint(&pool, &mut s);
        let ghost = s.pixel(32, 32).unwrap();
        assert!(ghost.r > 150 && ghost.r < 255);

        let clear = Renderer::new(Backdrop::Clear, PaintStyle::Stars);
        clear.paint(&pool, &mut s);
        assert_eq!(s.painted(), 0.0);
    }

    #[test]
    fn test_rain_glyph_fills_cell_above_its_row() {
        let mut pool = EntityPool::new(4, OverflowPolicy::Reject);
        pool.spawn(Entity::Glyph(GlyphColumn {
            column: 0,
            row: 1.0,
            glyph: 'A',
            reset_chance: 0.0,
        }));
        let mut s = surface();
        Renderer::new(Backdrop::Clear, PaintStyle::Rain { font_size: 14.0 }).paint(&pool, &mut s);
        let inked = |rows: std::ops::Range<u32>| {
            rows.flat_map(|y| (0..14).map(move |x| (x, y)))
                .any(|(x, y)| s.pixel(x, y).is_some_and(|p| p.a > 0))
        };
        assert!(inked(0..14));
        assert!(!inked(14..28));
    }

    #[test]
    fn test_zero_size_surface_is_noop() {
        let mut pool = EntityPool::new(4, OverflowPolicy::Reject);
        pool.spawn(star(1.0));
        let mut s = PixelSurface::new(ViewportDimensions::new(0.0, 0.0));
        Renderer::new(Backdrop::Clear, PaintStyle::Stars).paint(&pool, &mut s);
        assert!(s.pixels().is_empty());
    }
}
