//! The set of effects running on one page
//!
//! Owns the authoritative viewport and fans host events out to every
//! effect. Effects are independent: one missing surface or one torn-down
//! effect never affects the others.

use glam::Vec2;

use crate::device::DeviceProfile;
use crate::effect::{EffectInstance, EffectKind};
use crate::input::InputEvent;
use crate::renderer::Surface;
use crate::reveal::{RevealCue, RevealScheduler};
use crate::transform::{self, ElementRect, ElementRole};
use crate::settings::Settings;
use crate::viewport::{Viewport, ViewportDimensions};

pub struct Stage {
    viewport: Viewport,
    profile: DeviceProfile,
    effects: Vec<EffectInstance>,
    reveal: RevealScheduler,
    pointer: Option<Vec2>,
    scroll: f32,
    now_ms: f64,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("viewport", &self.viewport)
            .field("profile", &self.profile)
            .field("effects", &self.effects)
            .finish()
    }
}

impl Stage {
    /// Instantiate every enabled effect the device can afford.
    ///
    /// `surfaces` is asked for one surface per effect; returning `None`
    /// leaves that effect as a silent no-op.
    pub fn new(
        settings: &Settings,
        profile: DeviceProfile,
        viewport: Viewport,
        seed: u64,
        mut surfaces: impl FnMut(EffectKind, ViewportDimensions) -> Option<Box<dyn Surface>>,
    ) -> Self {
        let mut effects = Vec::new();
        for (index, kind) in EffectKind::ALL.into_iter().enumerate() {
            if !kind.enabled(&settings.effects) {
                continue;
            }
            if kind.is_heavyweight() && !profile.allows_heavyweight() {
                log::info!("Skipping {} on {} device", kind.as_str(), profile.as_str());
                continue;
            }

            let surface = surfaces(kind, kind.surface_dims(viewport.current_size(), settings));
            if surface.is_none() {
                log::warn!("No surface for {}; effect disabled", kind.as_str());
            }
            effects.push(EffectInstance::new(
                kind,
                settings,
                profile,
                &viewport,
                seed.wrapping_add(index as u64),
                surface,
            ));
        }

        log::info!(
            "Stage ready: {} effects on {} device",
            effects.len(),
            profile.as_str()
        );

        Self {
            viewport,
            profile,
            effects,
            reveal: RevealScheduler::new(),
            pointer: None,
            scroll: 0.0,
            now_ms: 0.0,
        }
    }

    pub fn profile(&self) -> DeviceProfile {
        self.profile
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// For registering resize handlers
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn effects(&self) -> &[EffectInstance] {
        &self.effects
    }

    pub fn effect(&self, kind: EffectKind) -> Option<&EffectInstance> {
        self.effects.iter().find(|fx| fx.kind() == kind)
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    /// Route one host event
    pub fn handle(&mut self, event: InputEvent) {
        match &event {
            InputEvent::Resize { width, height } => {
                self.viewport.resize(*width, *height);
                return;
            }
            InputEvent::Visibility {
                section,
                visible,
                items,
            } => {
                self.reveal.on_visibility(section, *visible, *items, self.now_ms);
                return;
            }
            InputEvent::Scroll { offset } => {
                self.scroll = *offset;
                return;
            }
            InputEvent::PointerMove { x, y } => self.pointer = Some(Vec2::new(*x, *y)),
            _ => {}
        }
        for fx in &mut self.effects {
            fx.feed(&event);
        }
    }

    /// Run every effect for one display frame. Returns the total ticks run.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        self.now_ms = now_ms;
        let viewport = &self.viewport;
        self.effects
            .iter_mut()
            .map(|fx| fx.frame(now_ms, viewport))
            .sum()
    }

    /// Reveal cues due at the last frame time
    pub fn due_reveals(&mut self) -> Vec<RevealCue> {
        self.reveal.due(self.now_ms)
    }

    /// CSS transform for a decorated page element, from the latest pointer
    /// and scroll state
    pub fn element_transform(&self, role: ElementRole, rect: ElementRect) -> String {
        transform::element_transform(
            role,
            rect,
            self.pointer,
            self.scroll,
            self.viewport.current_size(),
        )
    }

    /// Stop one effect. Returns false if it was not running.
    pub fn teardown(&mut self, kind: EffectKind) -> bool {
        match self.effects.iter().position(|fx| fx.kind() == kind) {
            Some(index) => {
                let mut fx = self.effects.remove(index);
                fx.teardown();
                true
            }
            None => false,
        }
    }

    pub fn teardown_all(&mut self) {
        for mut fx in self.effects.drain(..) {
            fx.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::renderer::PixelSurface;
    use crate::scheduler::{Clock, ManualClock};

    fn pixels(_: EffectKind, dims: ViewportDimensions) -> Option<Box<dyn Surface>> {
        Some(Box::new(PixelSurface::new(dims)))
    }

    fn kinds(stage: &Stage) -> Vec<EffectKind> {
        stage.effects().iter().map(|fx| fx.kind()).collect()
    }

    #[test]
    fn test_constrained_skips_heavyweight() {
        let settings = Settings::default();
        let stage = Stage::new(
            &settings,
            DeviceProfile::Constrained,
            Viewport::new(400.0, 800.0),
            1,
            pixels,
        );
        assert!(stage.effects().iter().all(|fx| !fx.kind().is_heavyweight()));
        assert!(stage.effect(EffectKind::CursorFollower).is_some());
        let particles = stage.effect(EffectKind::PointerParticles).unwrap();
        assert_eq!(particles.pool().capacity(), 100);
    }

    #[test]
    fn test_default_effects_on_full_device() {
        let stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(800.0, 600.0),
            1,
            pixels,
        );
        assert_eq!(
            kinds(&stage),
            vec![
                EffectKind::BackgroundBlobs,
                EffectKind::Starfield,
                EffectKind::FloatingShapes,
                EffectKind::PointerParticles,
                EffectKind::CursorTrail,
                EffectKind::CursorSparkles,
                EffectKind::CursorFollower,
            ]
        );
    }

    #[test]
    fn test_missing_surface_only_disables_that_effect() {
        let mut stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(800.0, 600.0),
            1,
            |kind, dims| {
                if kind == EffectKind::Starfield {
                    None
                } else {
                    pixels(kind, dims)
                }
            },
        );
        stage.frame(0.0);
        assert!(!stage.effect(EffectKind::Starfield).unwrap().is_attached());
        assert!(stage.effect(EffectKind::FloatingShapes).unwrap().is_attached());
    }

    #[test]
    fn test_events_fan_out_and_resize() {
        let clock = ManualClock::new(0.0);
        let mut stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(800.0, 600.0),
            9,
            pixels,
        );
        for i in 0..60 {
            stage.handle(InputEvent::PointerMove {
                x: 100.0 + i as f32 * 5.0,
                y: 300.0,
            });
            stage.frame(clock.now_ms());
            clock.advance(TICK_MS);
        }
        let trail = stage.effect(EffectKind::CursorTrail).unwrap();
        // The oldest point may have just faded out
        assert_eq!(trail.pool().slot_count(), 20);
        assert!(trail.pool().len() >= 19);
        assert_eq!(stage.pointer(), Some(Vec2::new(395.0, 300.0)));

        stage.handle(InputEvent::Resize {
            width: 1024.0,
            height: 768.0,
        });
        stage.frame(clock.now_ms());
        for fx in stage.effects() {
            assert_eq!(fx.dims(), ViewportDimensions::new(1024.0, 768.0));
        }
    }

    #[test]
    fn test_zero_viewport_runs_nothing() {
        let mut stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(0.0, 0.0),
            1,
            pixels,
        );
        assert_eq!(stage.frame(0.0), 0);
        assert_eq!(stage.frame(16.0), 0);
        stage.handle(InputEvent::Resize {
            width: 640.0,
            height: 480.0,
        });
        assert!(stage.frame(32.0) > 0);
        assert_eq!(stage.effect(EffectKind::Starfield).unwrap().pool().len(), 200);
    }

    #[test]
    fn test_teardown_one_effect() {
        let mut stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(800.0, 600.0),
            1,
            pixels,
        );
        assert!(stage.teardown(EffectKind::Starfield));
        assert!(!stage.teardown(EffectKind::Starfield));
        assert!(stage.effect(EffectKind::Starfield).is_none());
        assert!(stage.frame(0.0) > 0);
        stage.teardown_all();
        assert!(stage.effects().is_empty());
    }

    #[test]
    fn test_visibility_routed_to_reveal() {
        let mut stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(800.0, 600.0),
            1,
            pixels,
        );
        stage.frame(1000.0);
        stage.handle(InputEvent::Visibility {
            section: "about".to_string(),
            visible: true,
            items: 2,
        });
        assert_eq!(stage.due_reveals().len(), 1);
        stage.frame(1100.0);
        assert_eq!(stage.due_reveals().len(), 1);
    }

    #[test]
    fn test_visibility_reveals_on_frame_clock() {
        let mut stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(800.0, 600.0),
            1,
            pixels,
        );
        let visible = |visible| InputEvent::Visibility {
            section: "work".to_string(),
            visible,
            items: 3,
        };
        let show = |item| RevealCue::Show {
            section: "work".to_string(),
            item,
        };

        stage.frame(2000.0);
        stage.handle(visible(true));
        assert_eq!(stage.due_reveals(), vec![show(0)]);
        stage.frame(2150.0);
        assert_eq!(stage.due_reveals(), vec![show(1)]);

        // Hidden before the last item: it is dropped and the section resets
        stage.handle(visible(false));
        stage.frame(2250.0);
        assert_eq!(
            stage.due_reveals(),
            vec![RevealCue::Reset {
                section: "work".to_string()
            }]
        );

        // Reopening inside the close guard is ignored
        stage.handle(visible(true));
        stage.frame(2700.0);
        assert!(stage.due_reveals().is_empty());

        stage.handle(visible(true));
        stage.frame(2800.0);
        assert_eq!(stage.due_reveals(), vec![show(0), show(1)]);
    }

    #[test]
    fn test_element_transforms_follow_pointer_and_scroll() {
        let mut stage = Stage::new(
            &Settings::default(),
            DeviceProfile::Full,
            Viewport::new(800.0, 600.0),
            1,
            pixels,
        );
        let button = ElementRect {
            left: 100.0,
            top: 100.0,
            width: 100.0,
            height: 40.0,
        };
        let parallax = ElementRole::Parallax {
            speed: 0.5,
            depth: 20.0,
        };

        assert_eq!(
            stage.element_transform(ElementRole::Magnetic, button),
            "translate(0.00px, 0.00px)"
        );
        assert_eq!(
            stage.element_transform(parallax, button),
            "translate(0.00px, 0.00px)"
        );

        stage.handle(InputEvent::PointerMove { x: 160.0, y: 120.0 });
        stage.handle(InputEvent::Scroll { offset: 300.0 });
        assert_eq!(stage.scroll_offset(), 300.0);
        assert_eq!(
            stage.element_transform(ElementRole::Magnetic, button),
            "translate(3.00px, 0.00px)"
        );
        // Pointer shift (-6, -6) plus half the scroll
        assert_eq!(
            stage.element_transform(parallax, button),
            "translate(-6.00px, 144.00px)"
        );
        assert!(stage
            .element_transform(ElementRole::Tilt, button)
            .contains("scale3d(1.05, 1.05, 1.05)"));
    }
}
