//! Cursor follower, sparkles, bursts and click ripples
//!
//! Everything time-based here is measured in simulation milliseconds, so a
//! staggered burst replays identically under a manual clock.

use std::collections::VecDeque;

use glam::Vec2;

use super::context::SimContext;
use super::entity::{Entity, Particle, ParticleStyle};
use super::pool::EntityPool;
use crate::consts::TICK_MS;
use crate::input::TickInput;
use crate::renderer::color::palette;
use crate::settings::{CursorConfig, SparkleConfig};

const MOTE_SIZE: f32 = 3.0;
const MOTE_DRIFT: Vec2 = Vec2::new(0.0, -0.5);
const SPARKLE_SIZE: f32 = 6.0;

/// Per-tick decay that empties `life` over `lifetime_ms`
pub fn decay_for(lifetime_ms: f32) -> f32 {
    let ticks = (lifetime_ms as f64 / TICK_MS).max(1.0);
    (1.0 / ticks) as f32
}

/// The single follower particle
pub fn follower(pos: Vec2) -> Particle {
    Particle {
        pos,
        vel: Vec2::ZERO,
        color: palette::CURSOR,
        life: 1.0,
        decay: 0.0,
        size: 1.0,
        growth: 0.0,
        style: ParticleStyle::Cursor,
        pressed: false,
    }
}

/// Ease toward the pointer
pub fn follow(particle: &mut Particle, input: &TickInput, config: &CursorConfig, k: f32) {
    if let Some(target) = input.pointer {
        let t = (config.follow * k).min(1.0);
        particle.pos += (target - particle.pos) * t;
    }
    particle.pressed = input.pressed;
}

/// A sparkle waiting for its release time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSparkle {
    pub due_ms: f64,
    pub pos: Vec2,
}

/// Sparkle bookkeeping carried between ticks
#[derive(Debug, Clone, Default)]
pub struct SparkleState {
    pending: VecDeque<PendingSparkle>,
    last_sparkle_ms: Option<f64>,
}

impl SparkleState {
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue `count` sparkles at `pos`, `stagger_ms` apart
    pub fn schedule_burst(&mut self, pos: Vec2, count: u32, now_ms: f64, stagger_ms: f32) {
        for i in 0..count {
            self.pending.push_back(PendingSparkle {
                due_ms: now_ms + i as f64 * stagger_ms as f64,
                pos,
            });
        }
    }

    /// Pop every sparkle whose time has come
    fn release(&mut self, now_ms: f64) -> Vec<Vec2> {
        let mut released = Vec::new();
        self.pending.retain(|p| {
            if p.due_ms <= now_ms {
                released.push(p.pos);
                false
            } else {
                true
            }
        });
        released
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.last_sparkle_ms = None;
    }
}

fn sparkle(ctx: &mut SimContext, config: &SparkleConfig, pos: Vec2) -> Particle {
    let half = config.sparkle_spread / 2.0;
    let jitter = Vec2::new(ctx.range(-half, half), ctx.range(-half, half));
    Particle {
        style: ParticleStyle::Sparkle,
        ..Particle::dot(
            pos + jitter,
            Vec2::ZERO,
            palette::SPARKLE,
            decay_for(config.sparkle_lifetime_ms),
            SPARKLE_SIZE,
        )
    }
}

fn mote(config: &SparkleConfig, pos: Vec2) -> Particle {
    Particle::dot(
        pos,
        MOTE_DRIFT,
        palette::TRAIL,
        decay_for(config.trail_lifetime_ms),
        MOTE_SIZE,
    )
}

fn ripple(config: &SparkleConfig, pos: Vec2) -> Particle {
    let ticks = (config.ripple_lifetime_ms as f64 / TICK_MS).max(1.0) as f32;
    Particle {
        growth: (config.ripple_end_radius - config.ripple_start_radius) / ticks,
        style: ParticleStyle::Ring,
        ..Particle::dot(
            pos,
            Vec2::ZERO,
            palette::RIPPLE,
            decay_for(config.ripple_lifetime_ms),
            config.ripple_start_radius,
        )
    }
}

/// Turn one tick of pointer input into motes, sparkles and ripples
pub fn emit(
    pool: &mut EntityPool,
    ctx: &mut SimContext,
    config: &SparkleConfig,
    state: &mut SparkleState,
    input: &TickInput,
    now_ms: f64,
) {
    for &pos in &input.pointer_samples {
        if ctx.chance(config.trail_chance) {
            pool.spawn(Entity::Particle(mote(config, pos)));
        }

        let ready = state
            .last_sparkle_ms
            .is_none_or(|last| now_ms - last > config.sparkle_interval_ms as f64);
        if ready && ctx.chance(config.sparkle_chance) {
            let particle = sparkle(ctx, config, pos);
            pool.spawn(Entity::Particle(particle));
            state.last_sparkle_ms = Some(now_ms);
        }
    }

    if let Some(pointer) = input.pointer {
        let bursts = input.pointer_downs * config.click_burst + input.hover_enters * config.hover_burst;
        if bursts > 0 {
            state.schedule_burst(pointer, bursts, now_ms, config.burst_stagger_ms);
        }
    }

    for &pos in &input.clicks {
        pool.spawn(Entity::Particle(ripple(config, pos)));
    }

    for pos in state.release(now_ms) {
        let particle = sparkle(ctx, config, pos);
        pool.spawn(Entity::Particle(particle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particles;
    use crate::sim::pool::OverflowPolicy;

    #[test]
    fn test_follower_lerps() {
        let mut p = follower(Vec2::ZERO);
        let input = TickInput {
            pointer: Some(Vec2::new(100.0, 0.0)),
            pressed: true,
            ..Default::default()
        };
        follow(&mut p, &input, &CursorConfig::default(), 1.0);
        assert!((p.pos.x - 15.0).abs() < 1e-4);
        assert!(p.pressed);
        follow(&mut p, &input, &CursorConfig::default(), 1.0);
        assert!((p.pos.x - 27.75).abs() < 1e-4);
        assert!(!Entity::Particle(p).is_expired());
    }

    #[test]
    fn test_burst_released_by_sim_time() {
        let mut ctx = SimContext::new(1);
        let config = SparkleConfig::default();
        let mut state = SparkleState::default();
        let mut pool = EntityPool::new(256, OverflowPolicy::EvictOldest);
        let down = TickInput {
            pointer: Some(Vec2::new(50.0, 50.0)),
            pointer_downs: 1,
            ..Default::default()
        };

        emit(&mut pool, &mut ctx, &config, &mut state, &down, 0.0);
        assert_eq!(pool.len(), 1);
        assert_eq!(state.pending(), 7);

        let idle = TickInput::default();
        // Sparkles due at 30, 60, ... 210 ms
        emit(&mut pool, &mut ctx, &config, &mut state, &idle, 100.0);
        assert_eq!(pool.len(), 4);
        emit(&mut pool, &mut ctx, &config, &mut state, &idle, 210.0);
        assert_eq!(pool.len(), 8);
        assert_eq!(state.pending(), 0);
    }

    #[test]
    fn test_sparkle_interval_throttles() {
        let mut ctx = SimContext::new(1);
        let config = SparkleConfig {
            trail_chance: 0.0,
            sparkle_chance: 1.0,
            ..Default::default()
        };
        let mut state = SparkleState::default();
        let mut pool = EntityPool::new(256, OverflowPolicy::EvictOldest);
        let moves = TickInput {
            pointer_samples: vec![Vec2::ONE; 10],
            pointer: Some(Vec2::ONE),
            ..Default::default()
        };
        emit(&mut pool, &mut ctx, &config, &mut state, &moves, 0.0);
        assert_eq!(pool.len(), 1);
        emit(&mut pool, &mut ctx, &config, &mut state, &moves, 40.0);
        assert_eq!(pool.len(), 1);
        emit(&mut pool, &mut ctx, &config, &mut state, &moves, 60.0);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_ripple_grows_and_fades() {
        let config = SparkleConfig::default();
        let mut ring = ripple(&config, Vec2::ZERO);
        let mut ticks = 0;
        while ring.life > 0.0 {
            particles::update(&mut ring, 1.0);
            ticks += 1;
        }
        // 600 ms at 60 Hz
        assert!((35..=37).contains(&ticks));
        assert!((ring.size - config.ripple_end_radius).abs() < 3.0);
    }
}
