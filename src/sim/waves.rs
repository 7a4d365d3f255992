//! Wave sampling
//!
//! Wave samples carry no state of their own: each position is recomputed
//! every tick from the phase accumulator, so the curve at any moment is a
//! pure function of (u, time, params).

use glam::Vec2;

use super::entity::{Entity, WaveAxis, WaveSample};
use super::pool::EntityPool;
use crate::renderer::color::palette;
use crate::settings::{HelixConfig, WaveConfig, WaveParams};
use crate::viewport::ViewportDimensions;

/// Superimposed waves sharing one axis and one accumulator
#[derive(Debug, Clone)]
pub struct WaveTable {
    pub axis: WaveAxis,
    pub waves: Vec<WaveParams>,
    pub samples: usize,
    /// Accumulator increment per tick
    pub time_step: f32,
}

impl WaveTable {
    /// The header band of horizontal waves
    pub fn band(config: &WaveConfig) -> Self {
        Self {
            axis: WaveAxis::Horizontal,
            waves: config.waves.clone(),
            samples: config.samples,
            time_step: config.time_step,
        }
    }

    /// Two vertical strands half a turn apart
    pub fn helix(config: &HelixConfig) -> Self {
        let strand = |phase_offset, color| WaveParams {
            amplitude: config.amplitude,
            frequency: config.frequency,
            speed: 1.0,
            phase_offset,
            color,
        };
        Self {
            axis: WaveAxis::Vertical,
            waves: vec![
                strand(0.0, palette::HELIX_A),
                strand(std::f32::consts::PI, palette::HELIX_B),
            ],
            samples: config.samples,
            time_step: config.time_step,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.waves.len() * self.samples
    }
}

/// Displacement of one wave at `u`
#[inline]
pub fn wave_offset(u: f32, time: f64, wave: &WaveParams) -> f32 {
    let theta = (u * wave.frequency) as f64 + time * wave.speed as f64 + wave.phase_offset as f64;
    theta.sin() as f32 * wave.amplitude
}

/// Screen position of sample `index` of `count`
pub fn sample_position(
    axis: WaveAxis,
    wave: &WaveParams,
    index: usize,
    count: usize,
    time: f64,
    dims: ViewportDimensions,
) -> Vec2 {
    let t = index as f32 / count.max(1) as f32;
    match axis {
        WaveAxis::Horizontal => {
            let x = t * dims.width;
            Vec2::new(x, dims.height / 2.0 + wave_offset(x, time, wave))
        }
        WaveAxis::Vertical => Vec2::new(
            dims.width / 2.0 + wave_offset(index as f32, time, wave),
            t * dims.height,
        ),
    }
}

/// Allocate the fixed sample grid, wave by wave
pub fn populate(pool: &mut EntityPool, table: &WaveTable, time: f64, dims: ViewportDimensions) {
    for (wave, params) in table.waves.iter().enumerate() {
        for index in 0..table.samples {
            let pos = sample_position(table.axis, params, index, table.samples, time, dims);
            let sample = WaveSample {
                wave,
                index,
                count: table.samples,
                pos,
            };
            if pool.spawn(Entity::Wave(sample)).is_none() {
                return;
            }
        }
    }
}

pub fn update(sample: &mut WaveSample, table: &WaveTable, time: f64, dims: ViewportDimensions) {
    if let Some(params) = table.waves.get(sample.wave) {
        sample.pos = sample_position(table.axis, params, sample.index, sample.count, time, dims);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::color::Rgba;
    use crate::sim::pool::OverflowPolicy;

    fn wave(phase_offset: f32) -> WaveParams {
        WaveParams {
            amplitude: 40.0,
            frequency: 0.025,
            speed: 0.025,
            phase_offset,
            color: Rgba::WHITE,
        }
    }

    #[test]
    fn test_wave_is_pure() {
        let w = wave(0.3);
        for &(x, t) in &[(0.0, 0.0), (17.0, 3.5), (640.0, 1e6)] {
            assert_eq!(wave_offset(x, t, &w).to_bits(), wave_offset(x, t, &w).to_bits());
        }
    }

    #[test]
    fn test_pi_offset_waves_mirror() {
        let a = wave(0.0);
        let b = wave(std::f32::consts::PI);
        let dims = ViewportDimensions::new(800.0, 200.0);
        let baseline = dims.height / 2.0;
        for step in 0..50 {
            let time = step as f64 * 7.5;
            for index in 0..100 {
                let pa = sample_position(WaveAxis::Horizontal, &a, index, 100, time, dims);
                let pb = sample_position(WaveAxis::Horizontal, &b, index, 100, time, dims);
                assert_eq!(pa.x, pb.x);
                assert!(((pa.y - baseline) + (pb.y - baseline)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_helix_strands_mirror_about_center() {
        let table = WaveTable::helix(&HelixConfig::default());
        let dims = ViewportDimensions::new(1000.0, 500.0);
        for index in 0..table.samples {
            let a = sample_position(table.axis, &table.waves[0], index, table.samples, 2.0, dims);
            let b = sample_position(table.axis, &table.waves[1], index, table.samples, 2.0, dims);
            assert_eq!(a.y, b.y);
            assert!(((a.x - 500.0) + (b.x - 500.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_populate_fills_grid_in_wave_order() {
        let table = WaveTable::band(&WaveConfig::default());
        let mut pool = EntityPool::new(table.sample_count(), OverflowPolicy::Reject);
        populate(&mut pool, &table, 0.0, ViewportDimensions::new(1280.0, 200.0));
        assert_eq!(pool.len(), table.sample_count());
        let waves: Vec<usize> = pool
            .iter()
            .filter_map(|(_, e)| match e {
                Entity::Wave(s) => Some(s.wave),
                _ => None,
            })
            .collect();
        assert!(waves.windows(2).all(|w| w[0] <= w[1]));
    }
}
