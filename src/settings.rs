//! Effect settings
//!
//! Loaded from JSON (a file natively, a container data attribute in the
//! browser). Every field has a default, so partial documents are fine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::renderer::color::{Rgba, palette};

/// Which effects the page wants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectToggles {
    pub starfield: bool,
    pub particles: bool,
    pub trail: bool,
    pub cursor: bool,
    pub sparkles: bool,
    pub waves: bool,
    pub helix: bool,
    pub rain: bool,
    pub shapes: bool,
    pub blobs: bool,
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            starfield: true,
            particles: true,
            trail: true,
            cursor: true,
            sparkles: true,
            // Shipped but switched off on the reference page
            waves: false,
            helix: false,
            rain: false,
            shapes: true,
            blobs: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub speed_min: f32,
    pub speed_max: f32,
    pub radius_max: f32,
    /// Alpha of the black fade overlay
    pub fade_alpha: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            speed_min: 0.2,
            speed_max: 0.7,
            radius_max: 1.5,
            fade_alpha: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Chance that one pointer-move sample spawns a particle
    pub spawn_chance: f32,
    /// Velocity components are uniform in [-max_speed, max_speed)
    pub max_speed: f32,
    pub decay_min: f32,
    pub decay_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub hue_min: f32,
    pub hue_max: f32,
    pub fade_alpha: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.2,
            max_speed: 1.0,
            decay_min: 0.005,
            decay_max: 0.015,
            size_min: 1.0,
            size_max: 4.0,
            hue_min: 180.0,
            hue_max: 240.0,
            fade_alpha: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub length: usize,
    /// Opacity lost per tick
    pub fade_step: f32,
    pub dot_radius: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            length: crate::consts::TRAIL_LENGTH,
            fade_step: 0.05,
            dot_radius: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Fraction of the remaining distance covered per tick
    pub follow: f32,
    pub dot_radius: f32,
    pub outline_radius: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            follow: 0.15,
            dot_radius: 4.0,
            outline_radius: 16.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleConfig {
    pub trail_chance: f32,
    pub trail_lifetime_ms: f32,
    pub sparkle_chance: f32,
    /// Minimum spacing between move-triggered sparkles
    pub sparkle_interval_ms: f32,
    pub sparkle_lifetime_ms: f32,
    /// Sparkles land within ±spread/2 of the pointer
    pub sparkle_spread: f32,
    pub click_burst: u32,
    pub hover_burst: u32,
    pub burst_stagger_ms: f32,
    pub ripple_lifetime_ms: f32,
    pub ripple_start_radius: f32,
    pub ripple_end_radius: f32,
}

impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            trail_chance: 0.3,
            trail_lifetime_ms: 800.0,
            sparkle_chance: 0.5,
            sparkle_interval_ms: 50.0,
            sparkle_lifetime_ms: 400.0,
            sparkle_spread: 20.0,
            click_burst: 8,
            hover_burst: 3,
            burst_stagger_ms: 30.0,
            ripple_lifetime_ms: 600.0,
            ripple_start_radius: 5.0,
            ripple_end_radius: 100.0,
        }
    }
}

/// One superimposed sine wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
    pub phase_offset: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub waves: Vec<WaveParams>,
    /// Accumulator increment per tick
    pub time_step: f32,
    /// Samples per wave across the band
    pub samples: usize,
    pub band_height: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        use std::f32::consts::PI;
        let wave = |i: usize, amplitude, frequency, speed, color| WaveParams {
            amplitude,
            frequency,
            speed,
            phase_offset: i as f32 * PI / 3.0,
            color,
        };
        Self {
            waves: vec![
                wave(0, 50.0, 0.02, 0.03, Rgba::rgba8(100, 150, 255, 0.3)),
                wave(1, 30.0, 0.03, 0.02, Rgba::rgba8(150, 100, 255, 0.2)),
                wave(2, 40.0, 0.025, 0.025, Rgba::rgba8(255, 100, 200, 0.2)),
            ],
            time_step: 0.5,
            samples: 256,
            band_height: crate::consts::WAVE_BAND_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixConfig {
    pub amplitude: f32,
    /// Radians per sample index
    pub frequency: f32,
    pub samples: usize,
    pub time_step: f32,
    /// Draw a rung on every n-th sample
    pub rung_every: usize,
    pub layer_opacity: f32,
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            frequency: 0.02,
            samples: 50,
            time_step: 0.02,
            rung_every: 3,
            layer_opacity: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub font_size: f32,
    pub interval_ms: f32,
    pub reset_chance: f32,
    pub fade_alpha: f32,
    pub layer_opacity: f32,
    pub glyphs: String,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            interval_ms: 50.0,
            reset_chance: 0.025,
            fade_alpha: 0.05,
            layer_opacity: 0.2,
            glyphs: "01ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789αβγδεζηθικλμνξοπρστυφχψω"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub count: usize,
    pub size_min: f32,
    pub size_max: f32,
    pub duration_min: f32,
    pub duration_max: f32,
    /// Start delays are uniform in [0, delay_max)
    pub delay_max: f32,
    pub layer_opacity: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            count: 15,
            size_min: 50.0,
            size_max: 150.0,
            duration_min: 10.0,
            duration_max: 30.0,
            delay_max: 0.0,
            layer_opacity: 0.1,
        }
    }
}

impl ShapeConfig {
    /// Large soft background blobs
    pub fn blobs() -> Self {
        Self {
            count: palette::BLOBS.len() + 1,
            size_min: 100.0,
            size_max: 400.0,
            duration_min: 20.0,
            duration_max: 20.0,
            delay_max: 10.0,
            layer_opacity: 0.15,
        }
    }
}

fn default_blobs() -> ShapeConfig {
    ShapeConfig::blobs()
}

/// Complete effect configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed seed for reproducible runs; otherwise the host clock seeds
    pub seed: Option<u64>,
    pub effects: EffectToggles,
    pub starfield: StarfieldConfig,
    pub particles: ParticleConfig,
    pub trail: TrailConfig,
    pub cursor: CursorConfig,
    pub sparkles: SparkleConfig,
    pub waves: WaveConfig,
    pub helix: HelixConfig,
    pub rain: RainConfig,
    pub shapes: ShapeConfig,
    #[serde(default = "default_blobs")]
    pub blobs: ShapeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            effects: EffectToggles::default(),
            starfield: StarfieldConfig::default(),
            particles: ParticleConfig::default(),
            trail: TrailConfig::default(),
            cursor: CursorConfig::default(),
            sparkles: SparkleConfig::default(),
            waves: WaveConfig::default(),
            helix: HelixConfig::default(),
            rain: RainConfig::default(),
            shapes: ShapeConfig::default(),
            blobs: ShapeConfig::blobs(),
        }
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

impl Settings {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse if present; warn and fall back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded effect settings");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring effect settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default effect settings");
                Self::default()
            }
        }
    }

    /// Reject values that would produce invalid draws or non-terminating decay
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.starfield;
        ordered("starfield.speed", s.speed_min, s.speed_max)?;
        positive("starfield.speed_min", s.speed_min)?;
        probability("starfield.fade_alpha", s.fade_alpha)?;

        let p = &self.particles;
        probability("particles.spawn_chance", p.spawn_chance)?;
        positive("particles.decay_min", p.decay_min)?;
        ordered("particles.decay", p.decay_min, p.decay_max)?;
        ordered("particles.size", p.size_min, p.size_max)?;
        ordered("particles.hue", p.hue_min, p.hue_max)?;
        probability("particles.fade_alpha", p.fade_alpha)?;

        positive("trail.length", self.trail.length as f32)?;
        positive("trail.fade_step", self.trail.fade_step)?;

        probability("cursor.follow", self.cursor.follow)?;

        let k = &self.sparkles;
        probability("sparkles.trail_chance", k.trail_chance)?;
        probability("sparkles.sparkle_chance", k.sparkle_chance)?;
        positive("sparkles.trail_lifetime_ms", k.trail_lifetime_ms)?;
        positive("sparkles.sparkle_lifetime_ms", k.sparkle_lifetime_ms)?;
        positive("sparkles.ripple_lifetime_ms", k.ripple_lifetime_ms)?;
        ordered("sparkles.ripple_radius", k.ripple_start_radius, k.ripple_end_radius)?;

        positive("waves.samples", self.waves.samples as f32)?;
        positive("waves.band_height", self.waves.band_height)?;
        positive("helix.samples", self.helix.samples as f32)?;
        positive("helix.rung_every", self.helix.rung_every as f32)?;
        probability("helix.layer_opacity", self.helix.layer_opacity)?;

        let r = &self.rain;
        positive("rain.font_size", r.font_size)?;
        positive("rain.interval_ms", r.interval_ms)?;
        probability("rain.reset_chance", r.reset_chance)?;
        probability("rain.layer_opacity", r.layer_opacity)?;
        if r.glyphs.is_empty() {
            return Err(ConfigError::NonPositive {
                field: "rain.glyphs",
                value: 0.0,
            });
        }

        for (name, shapes) in [("shapes", &self.shapes), ("blobs", &self.blobs)] {
            ordered(name, shapes.size_min, shapes.size_max)?;
            ordered(name, shapes.duration_min, shapes.duration_max)?;
            positive(name, shapes.duration_min)?;
            probability(name, shapes.layer_opacity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "effects": {"rain": true}}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert!(settings.effects.rain);
        assert!(settings.effects.starfield);
        assert_eq!(settings.waves.waves.len(), 3);
        assert_eq!(settings.blobs.count, ShapeConfig::blobs().count);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = Settings::from_json(r#"{"particles": {"spawn_chance": 1.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Probability { field: "particles.spawn_chance", .. }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err =
            Settings::from_json(r#"{"starfield": {"speed_min": 2.0, "speed_max": 1.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedRange { .. }));
    }

    #[test]
    fn test_bad_json_falls_back() {
        let settings = Settings::load_or_default(Some("{not json"));
        assert!(settings.seed.is_none());
        assert!(settings.effects.starfield);
    }
}
