//! Effect instances
//!
//! One effect = one pool, one simulator, one renderer, one scheduler and
//! (optionally) one surface. Instances share nothing mutable; the stage
//! fans events out to each of them.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_RAIN_COLUMNS, SIM_DT};
use crate::device::DeviceProfile;
use crate::input::InputEvent;
use crate::renderer::color::{Rgba, palette};
use crate::renderer::{Backdrop, PaintStyle, Renderer, Surface};
use crate::scheduler::{Cadence, FrameScheduler};
use crate::settings::{EffectToggles, Settings};
use crate::sim::{EntityPool, OverflowPolicy, RuleSet, ShapeFamily, Simulator, WaveTable};
use crate::viewport::{Viewport, ViewportDimensions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Starfield,
    PointerParticles,
    CursorTrail,
    CursorFollower,
    CursorSparkles,
    Waves,
    Helix,
    MatrixRain,
    FloatingShapes,
    BackgroundBlobs,
}

impl EffectKind {
    /// Back-to-front stacking order
    pub const ALL: [EffectKind; 10] = [
        EffectKind::BackgroundBlobs,
        EffectKind::Starfield,
        EffectKind::MatrixRain,
        EffectKind::Helix,
        EffectKind::FloatingShapes,
        EffectKind::Waves,
        EffectKind::PointerParticles,
        EffectKind::CursorTrail,
        EffectKind::CursorSparkles,
        EffectKind::CursorFollower,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Starfield => "starfield",
            EffectKind::PointerParticles => "particles",
            EffectKind::CursorTrail => "trail",
            EffectKind::CursorFollower => "cursor",
            EffectKind::CursorSparkles => "sparkles",
            EffectKind::Waves => "waves",
            EffectKind::Helix => "helix",
            EffectKind::MatrixRain => "rain",
            EffectKind::FloatingShapes => "shapes",
            EffectKind::BackgroundBlobs => "blobs",
        }
    }

    /// Effects skipped entirely on constrained devices
    pub fn is_heavyweight(&self) -> bool {
        matches!(
            self,
            EffectKind::Starfield
                | EffectKind::Waves
                | EffectKind::Helix
                | EffectKind::MatrixRain
                | EffectKind::FloatingShapes
        )
    }

    pub fn enabled(&self, toggles: &EffectToggles) -> bool {
        match self {
            EffectKind::Starfield => toggles.starfield,
            EffectKind::PointerParticles => toggles.particles,
            EffectKind::CursorTrail => toggles.trail,
            EffectKind::CursorFollower => toggles.cursor,
            EffectKind::CursorSparkles => toggles.sparkles,
            EffectKind::Waves => toggles.waves,
            EffectKind::Helix => toggles.helix,
            EffectKind::MatrixRain => toggles.rain,
            EffectKind::FloatingShapes => toggles.shapes,
            EffectKind::BackgroundBlobs => toggles.blobs,
        }
    }

    /// Pool size for this effect on `profile`
    pub fn capacity(&self, settings: &Settings, profile: DeviceProfile) -> usize {
        match self {
            EffectKind::Starfield => profile.max_stars(),
            EffectKind::PointerParticles => profile.max_particles(),
            EffectKind::CursorTrail => settings.trail.length,
            EffectKind::CursorFollower => 1,
            EffectKind::CursorSparkles => profile.max_sparkles(),
            EffectKind::Waves => WaveTable::band(&settings.waves).sample_count(),
            EffectKind::Helix => WaveTable::helix(&settings.helix).sample_count(),
            EffectKind::MatrixRain => MAX_RAIN_COLUMNS,
            EffectKind::FloatingShapes => settings.shapes.count,
            EffectKind::BackgroundBlobs => settings.blobs.count,
        }
    }

    /// Overflow policy, by the entity variant the effect holds
    pub fn overflow_policy(&self) -> OverflowPolicy {
        match self {
            EffectKind::PointerParticles | EffectKind::CursorSparkles => OverflowPolicy::EvictOldest,
            EffectKind::CursorTrail => OverflowPolicy::OverwriteAtCursor,
            _ => OverflowPolicy::Reject,
        }
    }

    /// Size of this effect's surface inside the viewport
    pub fn surface_dims(&self, viewport: ViewportDimensions, settings: &Settings) -> ViewportDimensions {
        match self {
            EffectKind::Waves => ViewportDimensions::new(viewport.width, settings.waves.band_height),
            _ => viewport,
        }
    }

    pub fn layer_opacity(&self, settings: &Settings) -> f32 {
        match self {
            EffectKind::Helix => settings.helix.layer_opacity,
            EffectKind::MatrixRain => settings.rain.layer_opacity,
            EffectKind::FloatingShapes => settings.shapes.layer_opacity,
            EffectKind::BackgroundBlobs => settings.blobs.layer_opacity,
            _ => 1.0,
        }
    }

    pub fn cadence(&self, settings: &Settings) -> Cadence {
        match self {
            EffectKind::MatrixRain => Cadence::Throttled {
                interval_ms: settings.rain.interval_ms as f64,
            },
            _ => Cadence::DisplayRate,
        }
    }

    fn rules(&self, settings: &Settings) -> RuleSet {
        match self {
            EffectKind::Starfield => RuleSet::Starfield(settings.starfield.clone()),
            EffectKind::PointerParticles => RuleSet::Particles(settings.particles.clone()),
            EffectKind::CursorTrail => RuleSet::Trail(settings.trail.clone()),
            EffectKind::CursorFollower => RuleSet::Follower(settings.cursor.clone()),
            EffectKind::CursorSparkles => RuleSet::Sparkles(settings.sparkles.clone()),
            EffectKind::Waves => RuleSet::Waves(WaveTable::band(&settings.waves)),
            EffectKind::Helix => RuleSet::Waves(WaveTable::helix(&settings.helix)),
            EffectKind::MatrixRain => RuleSet::rain(settings.rain.clone()),
            EffectKind::FloatingShapes => RuleSet::Shapes {
                config: settings.shapes.clone(),
                family: ShapeFamily::Geometric,
            },
            EffectKind::BackgroundBlobs => RuleSet::Shapes {
                config: settings.blobs.clone(),
                family: ShapeFamily::Blobs,
            },
        }
    }

    fn renderer(&self, settings: &Settings) -> Renderer {
        let fade = |alpha: f32| Backdrop::Fade(Rgba::BLACK.with_alpha(alpha));
        match self {
            EffectKind::Starfield => Renderer::new(fade(settings.starfield.fade_alpha), PaintStyle::Stars),
            EffectKind::PointerParticles => {
                Renderer::new(fade(settings.particles.fade_alpha), PaintStyle::Particles)
            }
            EffectKind::CursorTrail => Renderer::new(
                Backdrop::Clear,
                PaintStyle::Trail {
                    dot_radius: settings.trail.dot_radius,
                },
            ),
            EffectKind::CursorFollower => Renderer::new(
                Backdrop::Clear,
                PaintStyle::Follower {
                    dot_radius: settings.cursor.dot_radius,
                    outline_radius: settings.cursor.outline_radius,
                },
            ),
            EffectKind::CursorSparkles => Renderer::new(Backdrop::Clear, PaintStyle::Particles),
            EffectKind::Waves => Renderer::new(
                Backdrop::Clear,
                PaintStyle::WaveBand {
                    colors: settings.waves.waves.iter().map(|w| w.color).collect(),
                },
            ),
            EffectKind::Helix => Renderer::new(
                Backdrop::Clear,
                PaintStyle::Helix {
                    colors: vec![palette::HELIX_A, palette::HELIX_B],
                    rung_every: settings.helix.rung_every,
                },
            ),
            EffectKind::MatrixRain => Renderer::new(
                fade(settings.rain.fade_alpha),
                PaintStyle::Rain {
                    font_size: settings.rain.font_size,
                },
            ),
            EffectKind::FloatingShapes | EffectKind::BackgroundBlobs => {
                Renderer::new(Backdrop::Clear, PaintStyle::Shapes)
            }
        }
    }
}

/// A running effect
pub struct EffectInstance {
    kind: EffectKind,
    pool: EntityPool,
    sim: Simulator,
    renderer: Renderer,
    scheduler: FrameScheduler,
    surface: Option<Box<dyn Surface>>,
    settings: Settings,
    dims: ViewportDimensions,
    /// Viewport revision the pool and surface were last sized for
    revision: u64,
}

impl std::fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectInstance")
            .field("kind", &self.kind)
            .field("live", &self.pool.len())
            .field("dims", &self.dims)
            .field("attached", &self.surface.is_some())
            .finish()
    }
}

impl EffectInstance {
    /// Build and populate an effect. `surface` is `None` when the host had
    /// nowhere to draw; the instance then does nothing.
    pub fn new(
        kind: EffectKind,
        settings: &Settings,
        profile: DeviceProfile,
        viewport: &Viewport,
        seed: u64,
        surface: Option<Box<dyn Surface>>,
    ) -> Self {
        let dims = kind.surface_dims(viewport.current_size(), settings);
        let mut pool = EntityPool::new(kind.capacity(settings, profile), kind.overflow_policy());
        let mut sim = Simulator::new(kind.rules(settings), seed);
        sim.populate(&mut pool, dims);

        let mut surface = surface;
        if let Some(surface) = surface.as_mut() {
            surface.resize(dims);
            surface.set_layer_opacity(kind.layer_opacity(settings));
        }

        log::info!(
            "Effect {} started: capacity {}, {} live",
            kind.as_str(),
            pool.capacity(),
            pool.len()
        );

        Self {
            kind,
            pool,
            sim,
            renderer: kind.renderer(settings),
            scheduler: FrameScheduler::new(kind.cadence(settings)),
            surface,
            settings: settings.clone(),
            dims,
            revision: viewport.revision(),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Read-only view of the pool
    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn dims(&self) -> ViewportDimensions {
        self.dims
    }

    pub fn surface(&self) -> Option<&dyn Surface> {
        self.surface.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn feed(&mut self, event: &InputEvent) {
        if self.surface.is_some() {
            self.sim.feed(event);
        }
    }

    /// Simulate and paint one display frame. Returns the ticks run.
    pub fn frame(&mut self, now_ms: f64, viewport: &Viewport) -> u32 {
        let Some(surface) = self.surface.as_mut() else {
            return 0;
        };

        if viewport.revision() != self.revision {
            self.revision = viewport.revision();
            let dims = self.kind.surface_dims(viewport.current_size(), &self.settings);
            if dims != self.dims {
                self.dims = dims;
                surface.resize(dims);
                self.sim.resize(&mut self.pool, dims);
                log::debug!(
                    "Effect {} resized to {}x{}",
                    self.kind.as_str(),
                    dims.width,
                    dims.height
                );
            }
        }

        if !self.dims.is_renderable() {
            self.scheduler.skip();
            self.sim.discard_input();
            return 0;
        }

        let ticks = self.scheduler.on_frame(now_ms);
        for _ in 0..ticks {
            self.sim.step(&mut self.pool, SIM_DT, self.dims);
        }
        if ticks > 0 {
            self.renderer.paint(&self.pool, &mut **surface);
        }
        ticks
    }

    /// Stop drawing and release the surface
    pub fn teardown(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.detach();
        }
        self.sim.reset_input();
        self.pool.clear();
        log::info!("Effect {} torn down", self.kind.as_str());
    }
}
