//! Software raster surface
//!
//! Used by the native runner and tests. Pixels are straight-alpha RGBA8,
//! exposed as raw bytes through bytemuck for presentation or snapshots.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::color::Rgba;
use super::surface::Surface;
use crate::viewport::ViewportDimensions;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Source-over blend of a straight-alpha color into a pixel
#[inline]
fn blend(dst: Rgba8, src: Rgba, coverage: f32) -> Rgba8 {
    let sa = (src.a * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba8::default();
    }
    let channel = |s: f32, d: u8| (s * sa + (d as f32 / 255.0) * da * (1.0 - sa)) / out_a;
    Rgba8 {
        r: to_u8(channel(src.r, dst.r)),
        g: to_u8(channel(src.g, dst.g)),
        b: to_u8(channel(src.b, dst.b)),
        a: to_u8(out_a),
    }
}

/// Distance from `p` to the segment `a`-`b`
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// 3x5 bitmap for a glyph cell, derived from the code point
fn glyph_mask(glyph: char) -> u16 {
    let code = glyph as u32;
    let mask = (code.wrapping_mul(2_654_435_761) >> 17) as u16 & 0x7fff;
    // Never blank
    mask | 0b010_000_000_000_000
}

pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    layer_opacity: f32,
}

impl PixelSurface {
    pub fn new(dims: ViewportDimensions) -> Self {
        let (width, height) = dims.pixel_size();
        Self {
            width,
            height,
            pixels: vec![Rgba8::default(); (width * height) as usize],
            layer_opacity: 1.0,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layer_opacity(&self) -> f32 {
        self.layer_opacity
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Fraction of pixels with any alpha
    pub fn painted(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let painted = self.pixels.iter().filter(|p| p.a > 0).count();
        painted as f32 / self.pixels.len() as f32
    }

    #[inline]
    fn plot(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.pixels[idx] = blend(self.pixels[idx], color, coverage);
    }

    /// Clipped pixel bounds of a float rectangle
    fn bounds(&self, min: Vec2, max: Vec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = min.x.floor().max(0.0) as i32;
        let y0 = min.y.floor().max(0.0) as i32;
        let x1 = (max.x.ceil() as i32).min(self.width as i32 - 1);
        let y1 = (max.y.ceil() as i32).min(self.height as i32 - 1);
        if x1 < x0 || y1 < y0 || !min.is_finite() || !max.is_finite() {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }

    /// Plot every pixel whose center satisfies `inside`
    fn fill_where(&mut self, min: Vec2, max: Vec2, color: Rgba, inside: impl Fn(Vec2) -> bool) {
        let Some((x0, y0, x1, y1)) = self.bounds(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.plot(x, y, color, 1.0);
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> ViewportDimensions {
        ViewportDimensions::new(self.width as f32, self.height as f32)
    }

    fn resize(&mut self, dims: ViewportDimensions) {
        let (width, height) = dims.pixel_size();
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgba8::default(); (width * height) as usize];
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba8::default());
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let max = origin + size;
        self.fill_where(origin, max, color, |p| {
            p.x >= origin.x && p.x < max.x && p.y >= origin.y && p.y < max.y
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        // Sub-pixel dots still show, dimmed by their area
        if radius < 0.5 {
            let coverage = (radius * 2.0).min(1.0);
            self.plot(center.x.floor() as i32, center.y.floor() as i32, color, coverage);
            return;
        }
        let r_sq = radius * radius;
        self.fill_where(center - radius, center + radius, color, |p| {
            p.distance_squared(center) <= r_sq
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        let half = (width / 2.0).max(0.5);
        let outer = radius + half;
        self.fill_where(center - outer, center + outer, color, |p| {
            (p.distance(center) - radius).abs() <= half
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        let half = (width / 2.0).max(0.5);
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let min = a.min(b) - half;
            let max = a.max(b) + half;
            self.fill_where(min, max, color, |p| segment_distance(p, a, b) <= half);
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().copied().fold(Vec2::splat(f32::INFINITY), Vec2::min);
        let max = points.iter().copied().fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max);
        // Even-odd rule at pixel centers
        self.fill_where(min, max, color, |p| {
            let mut inside = false;
            let mut j = points.len() - 1;
            for i in 0..points.len() {
                let (a, b) = (points[i], points[j]);
                if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
                {
                    inside = !inside;
                }
                j = i;
            }
            inside
        });
    }

    fn fill_glyph(&mut self, glyph: char, origin: Vec2, size: f32, color: Rgba) {
        let mask = glyph_mask(glyph);
        let cell = Vec2::new(size * 0.6 / 3.0, size / 5.0);
        for row in 0..5 {
            for col in 0..3 {
                if mask & (1 << (row * 3 + col)) != 0 {
                    let at = origin + Vec2::new(col as f32 * cell.x, row as f32 * cell.y);
                    self.fill_rect(at, cell, color);
                }
            }
        }
    }

    fn set_layer_opacity(&mut self, opacity: f32) {
        self.layer_opacity = opacity.clamp(0.0, 1.0);
    }

    fn coverage(&self) -> Option<f32> {
        Some(self.painted())
    }
}
