//! Cursor trail ring buffer

use glam::Vec2;

use super::entity::{Entity, TrailPoint};
use super::pool::EntityPool;
use crate::settings::TrailConfig;

/// Write one point per pointer sample; the oldest is overwritten when full
pub fn record(pool: &mut EntityPool, config: &TrailConfig, samples: &[Vec2]) {
    for &pos in samples {
        let slot = pool.next_slot();
        pool.spawn(Entity::Trail(TrailPoint {
            pos,
            opacity: 1.0,
            fade: config.fade_step,
            slot,
        }));
    }
}

pub fn update(point: &mut TrailPoint, k: f32) {
    if point.opacity > 0.0 {
        point.opacity -= point.fade * k;
    }
}
