//! Falling glyph columns

use super::context::SimContext;
use super::entity::{Entity, GlyphColumn};
use super::pool::EntityPool;
use crate::settings::RainConfig;
use crate::viewport::ViewportDimensions;

/// Columns that fit the viewport, capped at `capacity`
pub fn column_count(dims: ViewportDimensions, font_size: f32, capacity: usize) -> usize {
    if !dims.is_renderable() || font_size <= 0.0 {
        return 0;
    }
    ((dims.width / font_size).floor() as usize).min(capacity)
}

/// Rebuild every column for the current width
pub fn populate(
    pool: &mut EntityPool,
    ctx: &mut SimContext,
    config: &RainConfig,
    glyphs: &[char],
    dims: ViewportDimensions,
) {
    pool.clear();
    let columns = column_count(dims, config.font_size, pool.capacity());
    for column in 0..columns {
        pool.spawn(Entity::Glyph(GlyphColumn {
            column,
            row: 0.0,
            glyph: pick(ctx, glyphs),
            reset_chance: config.reset_chance,
        }));
    }
    log::debug!("Rain rebuilt with {} columns", columns);
}

fn pick(ctx: &mut SimContext, glyphs: &[char]) -> char {
    glyphs.get(ctx.index(glyphs.len())).copied().unwrap_or('0')
}

/// Fall one row (restarting from the top once past the bottom), then pick
/// the glyph drawn at the new row
pub fn update(
    column: &mut GlyphColumn,
    ctx: &mut SimContext,
    font_size: f32,
    glyphs: &[char],
    dims: ViewportDimensions,
) {
    if column.row * font_size > dims.height && ctx.chance(column.reset_chance) {
        column.row = 0.0;
    }
    column.row += 1.0;
    column.glyph = pick(ctx, glyphs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pool::OverflowPolicy;

    fn glyphs() -> Vec<char> {
        RainConfig::default().glyphs.chars().collect()
    }

    #[test]
    fn test_column_count() {
        let dims = ViewportDimensions::new(1280.0, 720.0);
        assert_eq!(column_count(dims, 14.0, 400), 91);
        assert_eq!(column_count(dims, 14.0, 50), 50);
        assert_eq!(column_count(ViewportDimensions::new(0.0, 720.0), 14.0, 400), 0);
    }

    #[test]
    fn test_resize_rebuilds_columns() {
        let mut ctx = SimContext::new(8);
        let config = RainConfig::default();
        let mut pool = EntityPool::new(400, OverflowPolicy::Reject);
        populate(&mut pool, &mut ctx, &config, &glyphs(), ViewportDimensions::new(1400.0, 700.0));
        assert_eq!(pool.len(), 100);
        populate(&mut pool, &mut ctx, &config, &glyphs(), ViewportDimensions::new(700.0, 700.0));
        assert_eq!(pool.len(), 50);
    }

    #[test]
    fn test_first_tick_draws_top_row() {
        let mut ctx = SimContext::new(8);
        let mut pool = EntityPool::new(400, OverflowPolicy::Reject);
        let dims = ViewportDimensions::new(140.0, 140.0);
        populate(&mut pool, &mut ctx, &RainConfig::default(), &glyphs(), dims);
        for entity in pool.iter_mut() {
            if let Entity::Glyph(column) = entity {
                assert_eq!(column.row, 0.0);
                update(column, &mut ctx, 14.0, &glyphs(), dims);
                assert_eq!(column.row, 1.0);
            }
        }
    }

    #[test]
    fn test_columns_restart_past_bottom() {
        let mut ctx = SimContext::new(8);
        let alphabet = glyphs();
        let dims = ViewportDimensions::new(140.0, 140.0);
        let mut column = GlyphColumn {
            column: 0,
            row: 1.0,
            glyph: '0',
            reset_chance: 0.025,
        };
        let mut restarted = false;
        for _ in 0..2000 {
            let before = column.row;
            update(&mut column, &mut ctx, 14.0, &alphabet, dims);
            assert!(alphabet.contains(&column.glyph));
            if column.row < before {
                assert!(before * 14.0 > dims.height);
                assert_eq!(column.row, 1.0);
                restarted = true;
            }
        }
        assert!(restarted);
    }
}
