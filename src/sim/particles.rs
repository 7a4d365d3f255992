//! Pointer-driven particles

use glam::Vec2;

use super::context::SimContext;
use super::entity::{Entity, Particle};
use super::pool::EntityPool;
use crate::renderer::color::Rgba;
use crate::settings::ParticleConfig;

/// One Bernoulli trial per pointer sample. Returns how many were spawned.
pub fn emit(
    pool: &mut EntityPool,
    ctx: &mut SimContext,
    config: &ParticleConfig,
    samples: &[Vec2],
) -> usize {
    let mut spawned = 0;
    for &pos in samples {
        if !ctx.chance(config.spawn_chance) {
            continue;
        }
        let particle = spawn(ctx, config, pos);
        if pool.spawn(Entity::Particle(particle)).is_some() {
            spawned += 1;
        }
    }
    spawned
}

pub fn spawn(ctx: &mut SimContext, config: &ParticleConfig, pos: Vec2) -> Particle {
    let vel = Vec2::new(
        ctx.range(-config.max_speed, config.max_speed),
        ctx.range(-config.max_speed, config.max_speed),
    );
    let decay = ctx.range(config.decay_min, config.decay_max);
    let size = ctx.range(config.size_min, config.size_max);
    let hue = ctx.range(config.hue_min, config.hue_max);
    Particle::dot(pos, vel, Rgba::hsl(hue, 1.0, 0.7), decay, size)
}

/// Drift, grow and decay. The cursor follower is handled separately.
pub fn update(particle: &mut Particle, k: f32) {
    particle.pos += particle.vel * k;
    particle.life -= particle.decay * k;
    particle.size = (particle.size + particle.growth * k).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pool::OverflowPolicy;

    #[test]
    fn test_life_strictly_decreasing_until_gone() {
        let mut ctx = SimContext::new(5);
        let config = ParticleConfig::default();
        let mut pool = EntityPool::new(10, OverflowPolicy::EvictOldest);
        let id = pool
            .spawn(Entity::Particle(spawn(&mut ctx, &config, Vec2::ZERO)))
            .unwrap();

        let mut last = 1.0;
        for _ in 0..1000 {
            for entity in pool.iter_mut() {
                if let Entity::Particle(p) = entity {
                    update(p, 1.0);
                }
            }
            pool.compact();
            match pool.get(id) {
                Some(Entity::Particle(p)) => {
                    assert!(p.life < last);
                    assert!(p.life > 0.0);
                    last = p.life;
                }
                Some(_) => unreachable!(),
                None => return,
            }
        }
        panic!("particle never expired");
    }

    #[test]
    fn test_emit_is_probabilistic() {
        let mut ctx = SimContext::new(9);
        let config = ParticleConfig::default();
        let mut pool = EntityPool::new(10_000, OverflowPolicy::EvictOldest);
        let samples = vec![Vec2::new(10.0, 10.0); 1000];
        let spawned = emit(&mut pool, &mut ctx, &config, &samples);
        // p = 0.2 over 1000 trials
        assert!((120..280).contains(&spawned), "spawned {}", spawned);
        assert_eq!(pool.len(), spawned);
    }

    #[test]
    fn test_spawn_ranges() {
        let mut ctx = SimContext::new(2);
        let config = ParticleConfig::default();
        for _ in 0..200 {
            let p = spawn(&mut ctx, &config, Vec2::ZERO);
            assert_eq!(p.life, 1.0);
            assert!(p.vel.x >= -1.0 && p.vel.x < 1.0);
            assert!((config.decay_min..config.decay_max).contains(&p.decay));
            assert!((config.size_min..config.size_max).contains(&p.size));
        }
    }
}
