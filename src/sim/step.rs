//! The per-effect simulator
//!
//! Owns its RNG, accumulator and buffered input. `step` first spawns from
//! the tick's input, then updates every live entity by matching on its
//! variant, then compacts the pool.

use glam::Vec2;

use super::context::SimContext;
use super::cursor::{self, SparkleState};
use super::entity::{Entity, ParticleStyle};
use super::pool::EntityPool;
use super::shapes::ShapeFamily;
use super::waves::WaveTable;
use super::{particles, rain, shapes, starfield, trail, waves};
use crate::consts::SIM_DT;
use crate::input::{InputBuffer, InputEvent};
use crate::settings::{
    CursorConfig, ParticleConfig, RainConfig, ShapeConfig, SparkleConfig, StarfieldConfig,
    TrailConfig,
};
use crate::viewport::ViewportDimensions;

/// Spawn and update parameters for one effect
#[derive(Debug, Clone)]
pub enum RuleSet {
    Starfield(StarfieldConfig),
    Particles(ParticleConfig),
    Trail(TrailConfig),
    Follower(CursorConfig),
    Sparkles(SparkleConfig),
    Waves(WaveTable),
    Rain { config: RainConfig, glyphs: Vec<char> },
    Shapes { config: ShapeConfig, family: ShapeFamily },
}

impl RuleSet {
    pub fn rain(config: RainConfig) -> Self {
        let glyphs = config.glyphs.chars().collect();
        RuleSet::Rain { config, glyphs }
    }

    fn wave_table(&self) -> Option<&WaveTable> {
        match self {
            RuleSet::Waves(table) => Some(table),
            _ => None,
        }
    }

    fn rain_glyphs(&self) -> Option<(f32, &[char])> {
        match self {
            RuleSet::Rain { config, glyphs } => Some((config.font_size, glyphs.as_slice())),
            _ => None,
        }
    }

    fn cursor(&self) -> Option<&CursorConfig> {
        match self {
            RuleSet::Follower(config) => Some(config),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Simulator {
    ctx: SimContext,
    rules: RuleSet,
    input: InputBuffer,
    sparkles: SparkleState,
}

impl Simulator {
    pub fn new(rules: RuleSet, seed: u64) -> Self {
        Self {
            ctx: SimContext::new(seed),
            rules,
            input: InputBuffer::new(),
            sparkles: SparkleState::default(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Buffer a host event for the next tick
    pub fn feed(&mut self, event: &InputEvent) {
        self.input.push(event);
    }

    /// Fill a fresh pool with the effect's fixed population
    pub fn populate(&mut self, pool: &mut EntityPool, dims: ViewportDimensions) {
        if !dims.is_renderable() {
            return;
        }
        match &self.rules {
            RuleSet::Starfield(config) => {
                while pool.slot_count() < pool.capacity() {
                    let star = starfield::spawn(&mut self.ctx, config, dims);
                    if pool.spawn(Entity::Star(star)).is_none() {
                        break;
                    }
                }
            }
            RuleSet::Follower(_) => {
                pool.spawn(Entity::Particle(cursor::follower(dims.center())));
            }
            RuleSet::Waves(table) => waves::populate(pool, table, self.ctx.time, dims),
            RuleSet::Rain { config, glyphs } => {
                rain::populate(pool, &mut self.ctx, config, glyphs, dims)
            }
            RuleSet::Shapes { config, family } => {
                shapes::populate(pool, &mut self.ctx, config, *family)
            }
            RuleSet::Particles(_) | RuleSet::Trail(_) | RuleSet::Sparkles(_) => {}
        }
    }

    /// React to a new viewport size before the next step
    pub fn resize(&mut self, pool: &mut EntityPool, dims: ViewportDimensions) {
        if let RuleSet::Rain { config, glyphs } = &self.rules {
            // Also empties the pool when the new size is not renderable
            rain::populate(pool, &mut self.ctx, config, glyphs, dims);
            return;
        }
        let refill = match self.rules {
            RuleSet::Particles(_) | RuleSet::Trail(_) | RuleSet::Sparkles(_) => false,
            // Pools that were never filled (zero-size start) fill on first real size
            _ => pool.slot_count() == 0,
        };
        if refill {
            self.populate(pool, dims);
        }
    }

    /// Advance every live entity by one logical tick of length `dt` seconds
    pub fn step(&mut self, pool: &mut EntityPool, dt: f32, dims: ViewportDimensions) {
        let input = self.input.take();
        if !dims.is_renderable() {
            return;
        }
        let k = dt / SIM_DT;
        let now_ms = self.ctx.elapsed_ms();

        match &self.rules {
            RuleSet::Particles(config) => {
                particles::emit(pool, &mut self.ctx, config, &input.pointer_samples);
            }
            RuleSet::Trail(config) => trail::record(pool, config, &input.pointer_samples),
            RuleSet::Sparkles(config) => {
                cursor::emit(pool, &mut self.ctx, config, &mut self.sparkles, &input, now_ms)
            }
            RuleSet::Waves(table) => self.ctx.time += table.time_step as f64 * k as f64,
            _ => {}
        }

        self.ctx.ticks += 1;
        let elapsed_secs = (self.ctx.elapsed_ms() / 1000.0) as f32;
        let table = self.rules.wave_table();
        let glyphs = self.rules.rain_glyphs();
        let follow = self.rules.cursor();

        for entity in pool.iter_mut() {
            match entity {
                Entity::Star(star) => starfield::update(star, &mut self.ctx, dims, k),
                Entity::Particle(p) if p.style == ParticleStyle::Cursor => {
                    if let Some(config) = follow {
                        cursor::follow(p, &input, config, k);
                    }
                }
                Entity::Particle(p) => particles::update(p, k),
                Entity::Wave(sample) => {
                    if let Some(table) = table {
                        waves::update(sample, table, self.ctx.time, dims);
                    }
                }
                Entity::Trail(point) => trail::update(point, k),
                Entity::Shape(shape) => shapes::update(shape, elapsed_secs),
                Entity::Glyph(column) => {
                    if let Some((font_size, glyphs)) = glyphs {
                        rain::update(column, &mut self.ctx, font_size, glyphs, dims);
                    }
                }
            }
        }

        pool.compact();
    }

    /// Drop one-shot input buffered for a frame that will not be simulated.
    /// Pointer position and button state are kept.
    pub fn discard_input(&mut self) {
        self.input.take();
    }

    /// Drop buffered input and queued spawns (teardown)
    pub fn reset_input(&mut self) {
        self.input = InputBuffer::new();
        self.sparkles.clear();
    }

    /// Latest pointer position seen by this simulator's follower, if any
    pub fn follower_position(pool: &EntityPool) -> Option<Vec2> {
        pool.iter().find_map(|(_, e)| match e {
            Entity::Particle(p) if p.style == ParticleStyle::Cursor => Some(p.pos),
            _ => None,
        })
    }
}
