//! Entity variants
//!
//! A closed set of visual units. The simulator dispatches update rules by
//! matching on the variant; the renderer only reads them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::renderer::color::Rgba;

/// Stable handle returned by `EntityPool::spawn`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// A star flying toward the viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarPoint {
    /// Unprojected position in viewport space
    pub pos: Vec2,
    /// Distance from the eye; `viewport_width` is the far plane
    pub depth: f32,
    pub radius: f32,
    /// Depth lost per tick
    pub speed: f32,
    /// Projected position (written by the simulator)
    pub screen: Vec2,
    pub screen_radius: f32,
    pub alpha: f32,
}

/// Visual flavour of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleStyle {
    /// Filled disc
    Dot,
    /// Four-point twinkle
    Sparkle,
    /// Expanding outline (click ripple)
    Ring,
    /// Smoothed cursor follower; never decays
    Cursor,
}

/// A moving, decaying particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    /// 0-1, decreases by `decay` every tick
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    /// Radius change per tick
    pub growth: f32,
    pub style: ParticleStyle,
    /// Cursor follower only: button held
    pub pressed: bool,
}

/// Orientation of a wave band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveAxis {
    /// Samples run left to right, displacement is vertical
    Horizontal,
    /// Samples run top to bottom, displacement is horizontal (helix strands)
    Vertical,
}

/// One sample of a wave curve, recomputed every tick from the phase accumulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSample {
    /// Index into the simulator's wave table
    pub wave: usize,
    /// Sample index along the curve
    pub index: usize,
    /// Samples in this wave
    pub count: usize,
    /// Computed screen position
    pub pos: Vec2,
}

/// A buffered pointer position that fades out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub opacity: f32,
    /// Opacity lost per tick
    pub fade: f32,
    /// Position in the ring buffer when written
    pub slot: usize,
}

/// Shape of a floating decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    /// Soft filled background blob
    Blob,
}

/// A decorative shape drifting along the float keyframes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingShape {
    pub kind: ShapeKind,
    /// Anchor as a fraction of the viewport (0..1 on both axes)
    pub anchor: Vec2,
    pub size: f32,
    pub duration_secs: f32,
    /// Seconds before the animation starts moving
    pub delay_secs: f32,
    /// Animation progress in [0, 1)
    pub phase: f32,
    /// Static pre-rotation (radians)
    pub base_rotation: f32,
    pub color: Rgba,
    /// Keyframe translation (written by the simulator)
    pub offset: Vec2,
    /// Keyframe rotation in radians (written by the simulator)
    pub rotation: f32,
}

/// A falling column of glyphs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyphColumn {
    pub column: usize,
    /// Row of the head glyph (in font-size units). The glyph occupies the
    /// cell ending at `row * font_size`; 0 until the first tick.
    pub row: f32,
    pub glyph: char,
    /// Per-tick chance to restart once past the bottom
    pub reset_chance: f32,
}

/// Any simulated visual unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Star(StarPoint),
    Particle(Particle),
    Wave(WaveSample),
    Trail(TrailPoint),
    Shape(FloatingShape),
    Glyph(GlyphColumn),
}

impl Entity {
    /// Current position (projected for stars)
    pub fn position(&self) -> Vec2 {
        match self {
            Entity::Star(s) => s.screen,
            Entity::Particle(p) => p.pos,
            Entity::Wave(w) => w.pos,
            Entity::Trail(t) => t.pos,
            Entity::Shape(s) => s.anchor,
            Entity::Glyph(g) => Vec2::new(g.column as f32, g.row),
        }
    }

    /// Expired entities are skipped by traversal and never rendered
    pub fn is_expired(&self) -> bool {
        match self {
            Entity::Star(s) => s.depth <= 0.0,
            Entity::Particle(p) => p.style != ParticleStyle::Cursor && p.life <= 0.0,
            Entity::Trail(t) => t.opacity <= 0.0,
            Entity::Wave(_) | Entity::Shape(_) | Entity::Glyph(_) => false,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Entity::Star(_) => "StarPoint",
            Entity::Particle(_) => "Particle",
            Entity::Wave(_) => "WaveSample",
            Entity::Trail(_) => "TrailPoint",
            Entity::Shape(_) => "FloatingShape",
            Entity::Glyph(_) => "GlyphColumn",
        }
    }
}

impl Particle {
    /// A plain dot drifting with `vel`
    pub fn dot(pos: Vec2, vel: Vec2, color: Rgba, decay: f32, size: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            life: 1.0,
            decay,
            size,
            growth: 0.0,
            style: ParticleStyle::Dot,
            pressed: false,
        }
    }
}
