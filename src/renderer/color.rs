//! Colors for effects

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA, channels in 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From 0-255 channels and a 0-1 alpha, like CSS `rgba()`
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self::rgba8(channel(0)?, channel(2)?, channel(4)?, 1.0))
    }

    /// HSL with hue in degrees, saturation/lightness in 0-1
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        if s == 0.0 {
            return Self::new(l, l, l, 1.0);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h.rem_euclid(360.0) / 360.0;

        Self::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
            1.0,
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Scale alpha (layer opacity, particle life)
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            self.a.clamp(0.0, 1.0)
        )
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Palette shared by the page effects
pub mod palette {
    use super::Rgba;

    pub const STAR: Rgba = Rgba::WHITE;
    /// rgba(100, 150, 255)
    pub const TRAIL: Rgba = Rgba::new(100.0 / 255.0, 150.0 / 255.0, 1.0, 1.0);
    pub const RAIN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    pub const HELIX_A: Rgba = Rgba::new(100.0 / 255.0, 150.0 / 255.0, 1.0, 0.5);
    pub const HELIX_B: Rgba = Rgba::new(1.0, 100.0 / 255.0, 150.0 / 255.0, 0.5);
    pub const HELIX_RUNG: Rgba = Rgba::new(200.0 / 255.0, 200.0 / 255.0, 1.0, 0.3);
    pub const SHAPE_CIRCLE: Rgba = Rgba::new(1.0, 1.0, 1.0, 0.3);
    pub const SHAPE_SQUARE: Rgba = Rgba::new(100.0 / 255.0, 150.0 / 255.0, 1.0, 0.3);
    pub const SHAPE_TRIANGLE: Rgba = Rgba::new(1.0, 100.0 / 255.0, 150.0 / 255.0, 0.3);
    pub const SPARKLE: Rgba = Rgba::new(1.0, 1.0, 1.0, 0.9);
    pub const RIPPLE: Rgba = Rgba::new(1.0, 1.0, 1.0, 0.5);
    pub const CURSOR: Rgba = Rgba::new(1.0, 1.0, 1.0, 0.8);
    /// Background blob fills
    pub const BLOBS: [&str; 4] = ["#667eea", "#764ba2", "#f093fb", "#4facfe"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse() {
        let c = Rgba::from_hex("#667eea").unwrap();
        assert_eq!(c.to_css(), "rgba(102, 126, 234, 1.000)");
        assert!(Rgba::from_hex("667eea").is_none());
        assert!(Rgba::from_hex("#66").is_none());
        assert!(Rgba::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_hsl_primaries() {
        let red = Rgba::hsl(0.0, 1.0, 0.5);
        assert!((red.r - 1.0).abs() < 1e-5 && red.g.abs() < 1e-5 && red.b.abs() < 1e-5);
        let cyan = Rgba::hsl(180.0, 1.0, 0.5);
        assert!(cyan.r.abs() < 1e-5 && (cyan.g - 1.0).abs() < 1e-5 && (cyan.b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fade_clamps() {
        assert_eq!(Rgba::WHITE.fade(2.0).a, 1.0);
        assert_eq!(Rgba::WHITE.fade(-1.0).a, 0.0);
        assert_eq!(Rgba::WHITE.with_alpha(0.25).fade(0.5).a, 0.125);
    }
}
