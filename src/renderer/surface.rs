//! Drawing surface abstraction
//!
//! Coordinates are CSS pixels with the origin at the top-left. Colors are
//! straight alpha and composite source-over.

use glam::Vec2;

use super::color::Rgba;
use crate::viewport::ViewportDimensions;

pub trait Surface {
    fn size(&self) -> ViewportDimensions;

    /// Reallocate the backing store. Callers skip this when the size is unchanged.
    fn resize(&mut self, dims: ViewportDimensions);

    /// Reset every pixel to transparent
    fn clear(&mut self);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba);

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// One character cell with its top-left at `origin`
    fn fill_glyph(&mut self, glyph: char, origin: Vec2, size: f32, color: Rgba);

    /// Opacity of the whole layer when presented
    fn set_layer_opacity(&mut self, opacity: f32);

    /// Remove the surface from its host
    fn detach(&mut self) {}

    /// Fraction of painted pixels, where the backing store can be read
    fn coverage(&self) -> Option<f32> {
        None
    }

    /// Paint the whole surface, used by fade backdrops
    fn fill_all(&mut self, color: Rgba) {
        let dims = self.size();
        self.fill_rect(Vec2::ZERO, Vec2::new(dims.width, dims.height), color);
    }
}
