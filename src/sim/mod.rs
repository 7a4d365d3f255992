//! Deterministic simulation module
//!
//! Entity pools and the rules that mutate them. This module must stay pure:
//! - Seeded RNG only, one per simulator
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies; renderers only read pools

pub mod context;
pub mod cursor;
pub mod entity;
pub mod particles;
pub mod pool;
pub mod rain;
pub mod shapes;
pub mod starfield;
pub mod step;
pub mod trail;
pub mod waves;

pub use context::SimContext;
pub use entity::{
    Entity, EntityId, FloatingShape, GlyphColumn, Particle, ParticleStyle, ShapeKind, StarPoint,
    TrailPoint, WaveAxis, WaveSample,
};
pub use pool::{EntityPool, Live, OverflowPolicy};
pub use shapes::ShapeFamily;
pub use step::{RuleSet, Simulator};
pub use waves::{WaveTable, wave_offset};
