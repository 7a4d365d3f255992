//! Star rules: fly toward the eye, reset at the far plane

use glam::Vec2;

use super::context::SimContext;
use super::entity::StarPoint;
use crate::settings::StarfieldConfig;
use crate::transform::{depth_alpha, project_perspective};
use crate::viewport::ViewportDimensions;

/// A fresh star anywhere in the volume, depth in (0, width]
pub fn spawn(ctx: &mut SimContext, config: &StarfieldConfig, dims: ViewportDimensions) -> StarPoint {
    let pos = Vec2::new(ctx.random() * dims.width, ctx.random() * dims.height);
    let depth = dims.width - ctx.random() * dims.width;
    let mut star = StarPoint {
        pos,
        depth,
        radius: ctx.range(0.0, config.radius_max),
        speed: ctx.range(config.speed_min, config.speed_max),
        screen: pos,
        screen_radius: 0.0,
        alpha: 0.0,
    };
    project(&mut star, dims);
    star
}

/// Reuse a star that reached the eye: new position at the far plane
pub fn reset(star: &mut StarPoint, ctx: &mut SimContext, dims: ViewportDimensions) {
    star.pos = Vec2::new(ctx.random() * dims.width, ctx.random() * dims.height);
    star.depth = dims.width;
}

/// Advance one tick (`k` ticks' worth of motion)
pub fn update(star: &mut StarPoint, ctx: &mut SimContext, dims: ViewportDimensions, k: f32) {
    star.depth -= star.speed * k;
    if star.depth <= 0.0 {
        reset(star, ctx, dims);
    }
    project(star, dims);
}

/// Cache screen position, size and brightness for the renderer
pub fn project(star: &mut StarPoint, dims: ViewportDimensions) {
    match project_perspective(star.pos, star.depth, dims) {
        Some(p) => {
            star.screen = p.screen;
            star.screen_radius = star.radius * p.scale;
            star.alpha = depth_alpha(star.depth, dims.width);
        }
        None => star.alpha = 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: ViewportDimensions = ViewportDimensions::new(800.0, 600.0);

    fn star_at(depth: f32, speed: f32) -> StarPoint {
        StarPoint {
            pos: Vec2::new(100.0, 100.0),
            depth,
            radius: 1.0,
            speed,
            screen: Vec2::ZERO,
            screen_radius: 0.0,
            alpha: 0.0,
        }
    }

    #[test]
    fn test_star_resets_after_400_ticks() {
        let mut ctx = SimContext::new(3);
        let mut star = star_at(800.0, 2.0);
        let mut last = star.depth;
        for _ in 0..399 {
            update(&mut star, &mut ctx, VP, 1.0);
            assert!(star.depth < last);
            last = star.depth;
        }
        assert_eq!(star.depth, 2.0);
        assert_eq!(star.pos, Vec2::new(100.0, 100.0));

        update(&mut star, &mut ctx, VP, 1.0);
        assert_eq!(star.depth, 800.0);
        assert_ne!(star.pos, Vec2::new(100.0, 100.0));
        // At the far plane projection is identity and the star is invisible
        assert_eq!(star.screen, star.pos);
        assert_eq!(star.alpha, 0.0);
        assert_eq!(star.speed, 2.0);
    }

    #[test]
    fn test_spawn_depth_in_range() {
        let mut ctx = SimContext::new(11);
        let config = StarfieldConfig::default();
        for _ in 0..500 {
            let star = spawn(&mut ctx, &config, VP);
            assert!(star.depth > 0.0 && star.depth <= VP.width);
            assert!((0.0..=1.0).contains(&star.alpha));
            assert!((config.speed_min..config.speed_max).contains(&star.speed));
        }
    }

    #[test]
    fn test_alpha_clamped_after_shrink() {
        let mut star = star_at(800.0, 1.0);
        project(&mut star, ViewportDimensions::new(400.0, 300.0));
        assert_eq!(star.alpha, 0.0);
    }
}
